use reqwest::redirect::Policy;
use sea_orm::{EntityTrait, Set};
use serde_json::json;
use shelter::entity::caretaker;

use crate::common::{PASSWORD, TestApp, TestResponse, routes};

#[tokio::test]
async fn login_form_echoes_a_local_next() {
    let app = TestApp::spawn().await;

    let res = app
        .get_without_token(&format!("{}?next=/dogs/create/", routes::LOGIN))
        .await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["next"], "/dogs/create/");

    let res = app
        .get_without_token(&format!("{}?next=//evil.example/", routes::LOGIN))
        .await;
    assert_eq!(res.body["next"], "/");
}

#[tokio::test]
async fn login_returns_a_token_and_sets_the_cookie() {
    let app = TestApp::spawn().await;
    app.register("alice", PASSWORD).await;

    let res = app
        .client
        .post(app.url(routes::LOGIN))
        .form(&[
            ("username", "alice"),
            ("password", PASSWORD),
            ("next", "/dogs/create/"),
        ])
        .send()
        .await
        .expect("Failed to send login");
    let cookie = res
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .expect("Login should set a cookie");
    let res = TestResponse::from_response(res).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["username"], "alice");
    assert_eq!(res.body["next"], "/dogs/create/");
    let token = res.body["token"].as_str().unwrap();
    assert!(cookie.starts_with(&format!("shelter_session={token}")));
    assert!(cookie.contains("HttpOnly"));
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let app = TestApp::spawn().await;
    app.register("alice", PASSWORD).await;

    let res = app
        .post_without_token(
            routes::LOGIN,
            &json!({"username": "alice", "password": "Wrong1234@"}),
        )
        .await;

    assert_eq!(res.status, 401);
    assert_eq!(res.body["code"], "INVALID_CREDENTIALS");

    let unknown = app
        .post_without_token(
            routes::LOGIN,
            &json!({"username": "nobody", "password": PASSWORD}),
        )
        .await;
    assert_eq!(unknown.status, 401);
}

#[tokio::test]
async fn missing_credentials_are_field_errors() {
    let app = TestApp::spawn().await;

    let res = app.post_without_token(routes::LOGIN, &json!({})).await;

    assert_eq!(res.status, 400);
    assert_eq!(res.field_errors("username"), ["This field is required."]);
    assert_eq!(res.field_errors("password"), ["This field is required."]);
}

#[tokio::test]
async fn inactive_accounts_cannot_log_in_or_use_old_tokens() {
    let app = TestApp::spawn().await;
    let id = app.register("alice", PASSWORD).await;
    let token = app.login("alice", PASSWORD).await;

    caretaker::Entity::update(caretaker::ActiveModel {
        id: Set(id),
        is_active: Set(false),
        ..Default::default()
    })
    .exec(&app.db)
    .await
    .expect("Failed to deactivate caretaker");

    let res = app
        .post_without_token(
            routes::LOGIN,
            &json!({"username": "alice", "password": PASSWORD}),
        )
        .await;
    assert_eq!(res.status, 401);

    let res = app.get_with_token(routes::CARETAKERS, &token).await;
    assert_eq!(res.status, 302);
}

#[tokio::test]
async fn session_cookie_authenticates_until_logout() {
    let app = TestApp::spawn().await;
    app.register("alice", PASSWORD).await;
    let browser = reqwest::Client::builder()
        .redirect(Policy::none())
        .cookie_store(true)
        .build()
        .expect("Failed to build client");

    let res = browser
        .post(app.url(routes::LOGIN))
        .form(&[("username", "alice"), ("password", PASSWORD)])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let res = browser.get(app.url(routes::CARETAKERS)).send().await.unwrap();
    assert_eq!(res.status(), 200);

    let res = browser.post(app.url(routes::LOGOUT)).send().await.unwrap();
    assert_eq!(res.status(), 303);
    assert_eq!(res.headers()["location"], "/");

    let res = browser.get(app.url(routes::CARETAKERS)).send().await.unwrap();
    assert_eq!(res.status(), 302);
}

#[tokio::test]
async fn index_counts_dogs_breeds_and_vaccines() {
    let app = TestApp::spawn().await;

    let empty = app.get_without_token("/").await;
    assert_eq!(empty.status, 200);
    assert_eq!(
        empty.body,
        json!({"number_of_dogs": 0, "number_of_breeds": 0, "number_of_vaccines": 0})
    );

    let token = app.create_authenticated_user("alice").await;
    let small = app.create_breed(&token, "Pekiness", "S").await;
    app.create_breed(&token, "Mastiff", "G").await;
    app.create_dog(&token, "Brovko", small, "2023-06-20").await;
    app.create_vaccine(&token, "Flue").await;

    let res = app.get_without_token("/").await;
    assert_eq!(
        res.body,
        json!({"number_of_dogs": 1, "number_of_breeds": 2, "number_of_vaccines": 1})
    );
}
