use std::net::SocketAddr;

use reqwest::Client;
use reqwest::redirect::Policy;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde_json::Value;

use shelter::config::{
    AppConfig, AuthConfig, BootstrapConfig, CorsConfig, DatabaseConfig, ServerConfig,
};
use shelter::entity::{caretaker, vaccine};
use shelter::state::AppState;

/// Password that passes every strength rule.
pub const PASSWORD: &str = "Password1234@";

pub mod routes {
    pub const LOGIN: &str = "/accounts/login/";
    pub const LOGOUT: &str = "/accounts/logout/";
    pub const BREEDS: &str = "/breeds/";
    pub const BREED_CREATE: &str = "/breeds/create/";
    pub const DOGS: &str = "/dogs/";
    pub const DOG_CREATE: &str = "/dogs/create/";
    pub const VACCINES: &str = "/vaccines/";
    pub const VACCINE_CREATE: &str = "/vaccines/create/";
    pub const CARETAKERS: &str = "/caretakers/";
    pub const CARETAKER_CREATE: &str = "/caretakers/create/";

    pub fn breed(id: i32) -> String {
        format!("/breeds/{id}/")
    }

    pub fn breed_update(id: i32) -> String {
        format!("/breeds/{id}/update/")
    }

    pub fn breed_delete(id: i32) -> String {
        format!("/breeds/{id}/delete/")
    }

    pub fn dog(id: i32) -> String {
        format!("/dogs/{id}/")
    }

    pub fn dog_update(id: i32) -> String {
        format!("/dogs/{id}/update/")
    }

    pub fn dog_delete(id: i32) -> String {
        format!("/dogs/{id}/delete/")
    }

    pub fn vaccine_update(id: i32) -> String {
        format!("/vaccines/{id}/update/")
    }

    pub fn vaccine_delete(id: i32) -> String {
        format!("/vaccines/{id}/delete/")
    }

    pub fn caretaker(id: i32) -> String {
        format!("/caretakers/{id}/")
    }

    pub fn caretaker_update(id: i32) -> String {
        format!("/caretakers/{id}/update/")
    }

    pub fn caretaker_delete(id: i32) -> String {
        format!("/caretakers/{id}/delete/")
    }

    pub fn vaccination_create(dog_id: i32) -> String {
        format!("/vaccination/create/{dog_id}/")
    }

    pub fn vaccination_update(dog_id: i32, id: i32) -> String {
        format!("/vaccination/update/{dog_id}/{id}/")
    }

    pub fn vaccination_delete(dog_id: i32, id: i32) -> String {
        format!("/vaccination/delete/{dog_id}/{id}/")
    }

    pub fn admin(entity: &str) -> String {
        format!("/admin/{entity}/")
    }

    pub fn admin_row(entity: &str, id: i32) -> String {
        format!("/admin/{entity}/{id}/")
    }
}

/// A running test server over its own in-memory SQLite database.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub db: DatabaseConnection,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// `Location` header of redirects.
    pub location: Option<String>,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

/// Client that reports redirects instead of following them.
pub fn client() -> Client {
    Client::builder()
        .redirect(Policy::none())
        .build()
        .expect("Failed to build HTTP client")
}

impl TestApp {
    pub async fn spawn() -> Self {
        let db_url = "sqlite::memory:".to_string();
        let db = shelter::database::init_db(&db_url)
            .await
            .expect("Failed to initialize test database");
        shelter::seed::ensure_indexes(&db)
            .await
            .expect("Failed to create indexes");

        let app_config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig::default(),
            },
            database: DatabaseConfig { url: db_url },
            auth: AuthConfig::with_secret("test-secret-for-integration-tests"),
            bootstrap: BootstrapConfig::default(),
        };

        let state = AppState {
            db: db.clone(),
            config: app_config,
        };

        let app = shelter::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: client(),
            db,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn get_without_token(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    /// POST a urlencoded form. Repeated keys are sent as given.
    pub async fn post_form_with_token(
        &self,
        path: &str,
        form: &[(&str, &str)],
        token: &str,
    ) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .form(form)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_form_without_token(&self, path: &str, form: &[(&str, &str)]) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_without_token(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn patch_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .patch(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send PATCH request");

        TestResponse::from_response(res).await
    }

    /// Register a caretaker through the public form and return its `id`.
    pub async fn register(&self, username: &str, password: &str) -> i32 {
        let res = self
            .post_form_without_token(
                routes::CARETAKER_CREATE,
                &[
                    ("username", username),
                    ("password1", password),
                    ("password2", password),
                ],
            )
            .await;
        assert_eq!(res.status, 303, "Registration failed: {}", res.text);
        res.location_id()
    }

    pub async fn login(&self, username: &str, password: &str) -> String {
        let res = self
            .post_without_token(
                routes::LOGIN,
                &serde_json::json!({"username": username, "password": password}),
            )
            .await;
        assert_eq!(res.status, 200, "Login failed: {}", res.text);

        res.body["token"]
            .as_str()
            .expect("Login response should contain a token")
            .to_string()
    }

    /// Register a caretaker and log in, returning the auth token.
    pub async fn create_authenticated_user(&self, username: &str) -> String {
        self.register(username, PASSWORD).await;
        self.login(username, PASSWORD).await
    }

    /// Register a caretaker, mark it staff in the database and log in.
    pub async fn create_staff_user(&self, username: &str) -> String {
        let id = self.register(username, PASSWORD).await;

        caretaker::Entity::update(caretaker::ActiveModel {
            id: Set(id),
            is_staff: Set(true),
            ..Default::default()
        })
        .exec(&self.db)
        .await
        .expect("Failed to promote caretaker to staff");

        self.login(username, PASSWORD).await
    }

    /// Create a breed via the API and return its `id`.
    pub async fn create_breed(&self, token: &str, name: &str, dog_size: &str) -> i32 {
        let res = self
            .post_form_with_token(
                routes::BREED_CREATE,
                &[("name", name), ("dog_size", dog_size)],
                token,
            )
            .await;
        assert_eq!(res.status, 303, "create_breed failed: {}", res.text);
        res.location_id()
    }

    /// Create a dog via the API and return its `id`.
    pub async fn create_dog(&self, token: &str, name: &str, breed_id: i32, date: &str) -> i32 {
        let breed = breed_id.to_string();
        let res = self
            .post_form_with_token(
                routes::DOG_CREATE,
                &[
                    ("name", name),
                    ("date_registered", date),
                    ("gender", "M"),
                    ("breed", &breed),
                ],
                token,
            )
            .await;
        assert_eq!(res.status, 303, "create_dog failed: {}", res.text);
        res.location_id()
    }

    /// Create a vaccine via the API and return its `id`.
    pub async fn create_vaccine(&self, token: &str, name: &str) -> i32 {
        let res = self
            .post_form_with_token(routes::VACCINE_CREATE, &[("name", name)], token)
            .await;
        assert_eq!(res.status, 303, "create_vaccine failed: {}", res.text);
        assert_eq!(res.location.as_deref(), Some(routes::VACCINES));

        vaccine::Entity::find()
            .filter(vaccine::Column::Name.eq(name))
            .one(&self.db)
            .await
            .expect("DB query failed")
            .expect("Vaccine not found after creation")
            .id
    }

    /// Record a vaccination against a dog.
    pub async fn create_vaccination(&self, token: &str, dog_id: i32, vaccine_id: i32, date: &str) {
        let vaccine = vaccine_id.to_string();
        let res = self
            .post_form_with_token(
                &routes::vaccination_create(dog_id),
                &[("vaccine", &vaccine), ("vaccination_date", date)],
                token,
            )
            .await;
        assert_eq!(res.status, 303, "create_vaccination failed: {}", res.text);
    }
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let location = res
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self {
            status,
            location,
            text,
            body,
        }
    }

    pub fn id(&self) -> i32 {
        self.body["id"]
            .as_i64()
            .expect("response body should contain 'id'") as i32
    }

    /// Id at the end of a `/entity/{id}/` redirect.
    pub fn location_id(&self) -> i32 {
        self.location
            .as_deref()
            .expect("response should redirect")
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .and_then(|id| id.parse().ok())
            .expect("redirect should end in an id")
    }

    /// Messages of one field of a `VALIDATION_ERROR` body.
    pub fn field_errors(&self, field: &str) -> Vec<String> {
        self.body["errors"][field]
            .as_array()
            .map(|msgs| {
                msgs.iter()
                    .filter_map(|m| m.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}
