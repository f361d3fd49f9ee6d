pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod routes;
pub mod seed;
pub mod state;
pub mod utils;

use std::time::Duration;

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_scalar::{Scalar, Servable as ScalarServable};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::CorsConfig;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Shelter API",
        version = "1.0.0",
        description = "Records of a dog shelter: breeds, dogs, caretakers, vaccines and vaccinations"
    ),
    paths(
        handlers::index::index,
        handlers::auth::login_form,
        handlers::auth::login,
        handlers::auth::logout,
        handlers::breed::list_breeds,
        handlers::breed::get_breed,
        handlers::breed::create_breed_form,
        handlers::breed::create_breed,
        handlers::breed::update_breed_form,
        handlers::breed::update_breed,
        handlers::breed::delete_breed_confirm,
        handlers::breed::delete_breed,
        handlers::vaccine::list_vaccines,
        handlers::vaccine::create_vaccine_form,
        handlers::vaccine::create_vaccine,
        handlers::vaccine::update_vaccine_form,
        handlers::vaccine::update_vaccine,
        handlers::vaccine::delete_vaccine_confirm,
        handlers::vaccine::delete_vaccine,
        handlers::dog::list_dogs,
        handlers::dog::get_dog,
        handlers::dog::create_dog_form,
        handlers::dog::create_dog,
        handlers::dog::update_dog_form,
        handlers::dog::update_dog,
        handlers::dog::delete_dog_confirm,
        handlers::dog::delete_dog,
        handlers::caretaker::list_caretakers,
        handlers::caretaker::get_caretaker,
        handlers::caretaker::create_caretaker_form,
        handlers::caretaker::create_caretaker,
        handlers::caretaker::update_caretaker_form,
        handlers::caretaker::update_caretaker,
        handlers::caretaker::delete_caretaker_confirm,
        handlers::caretaker::delete_caretaker,
        handlers::vaccination::create_vaccination_form,
        handlers::vaccination::create_vaccination,
        handlers::vaccination::update_vaccination_form,
        handlers::vaccination::update_vaccination,
        handlers::vaccination::delete_vaccination_confirm,
        handlers::vaccination::delete_vaccination,
        handlers::admin::list_breeds,
        handlers::admin::list_dogs,
        handlers::admin::list_vaccinations,
        handlers::admin::list_vaccines,
        handlers::admin::list_caretakers,
        handlers::admin::patch_breed,
        handlers::admin::patch_dog,
        handlers::admin::patch_vaccination,
        handlers::admin::patch_vaccine,
        handlers::admin::patch_caretaker,
    ),
    tags(
        (name = "Index", description = "Shelter counters"),
        (name = "Accounts", description = "Login and logout"),
        (name = "Breeds", description = "Breed CRUD operations"),
        (name = "Vaccines", description = "Vaccine CRUD operations"),
        (name = "Dogs", description = "Dog CRUD operations"),
        (name = "Caretakers", description = "Caretaker registry and self-registration"),
        (name = "Vaccinations", description = "Vaccinations recorded against a dog"),
        (name = "Admin", description = "Staff console"),
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();
        components.add_security_scheme(
            "jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = cors
        .allow_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PATCH])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(cors.max_age))
}

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let api = ApiDoc::openapi();
    let cors = cors_layer(&state.config.server.cors);

    routes::routes()
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api.clone()))
        .merge(Scalar::with_url("/scalar", api))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
