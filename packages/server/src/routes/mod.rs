use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::handlers;
use crate::state::AppState;

/// Every page of the shelter, with its trailing slash.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::index::index))
        .merge(account_routes())
        .merge(breed_routes())
        .merge(vaccine_routes())
        .merge(dog_routes())
        .merge(caretaker_routes())
        .merge(vaccination_routes())
        .nest("/admin", admin_routes())
}

fn account_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/accounts/login/",
            get(handlers::auth::login_form).post(handlers::auth::login),
        )
        .route("/accounts/logout/", post(handlers::auth::logout))
}

fn breed_routes() -> Router<AppState> {
    Router::new()
        .route("/breeds/", get(handlers::breed::list_breeds))
        .route(
            "/breeds/create/",
            get(handlers::breed::create_breed_form).post(handlers::breed::create_breed),
        )
        .route("/breeds/{id}/", get(handlers::breed::get_breed))
        .route(
            "/breeds/{id}/update/",
            get(handlers::breed::update_breed_form).post(handlers::breed::update_breed),
        )
        .route(
            "/breeds/{id}/delete/",
            get(handlers::breed::delete_breed_confirm).post(handlers::breed::delete_breed),
        )
}

fn vaccine_routes() -> Router<AppState> {
    Router::new()
        .route("/vaccines/", get(handlers::vaccine::list_vaccines))
        .route(
            "/vaccines/create/",
            get(handlers::vaccine::create_vaccine_form).post(handlers::vaccine::create_vaccine),
        )
        .route(
            "/vaccines/{id}/update/",
            get(handlers::vaccine::update_vaccine_form).post(handlers::vaccine::update_vaccine),
        )
        .route(
            "/vaccines/{id}/delete/",
            get(handlers::vaccine::delete_vaccine_confirm).post(handlers::vaccine::delete_vaccine),
        )
}

fn dog_routes() -> Router<AppState> {
    Router::new()
        .route("/dogs/", get(handlers::dog::list_dogs))
        .route(
            "/dogs/create/",
            get(handlers::dog::create_dog_form).post(handlers::dog::create_dog),
        )
        .route("/dogs/{id}/", get(handlers::dog::get_dog))
        .route(
            "/dogs/{id}/update/",
            get(handlers::dog::update_dog_form).post(handlers::dog::update_dog),
        )
        .route(
            "/dogs/{id}/delete/",
            get(handlers::dog::delete_dog_confirm).post(handlers::dog::delete_dog),
        )
}

fn caretaker_routes() -> Router<AppState> {
    Router::new()
        .route("/caretakers/", get(handlers::caretaker::list_caretakers))
        .route(
            "/caretakers/create/",
            get(handlers::caretaker::create_caretaker_form)
                .post(handlers::caretaker::create_caretaker),
        )
        .route("/caretakers/{id}/", get(handlers::caretaker::get_caretaker))
        .route(
            "/caretakers/{id}/update/",
            get(handlers::caretaker::update_caretaker_form)
                .post(handlers::caretaker::update_caretaker),
        )
        .route(
            "/caretakers/{id}/delete/",
            get(handlers::caretaker::delete_caretaker_confirm)
                .post(handlers::caretaker::delete_caretaker),
        )
}

fn vaccination_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/vaccination/create/{dog_id}/",
            get(handlers::vaccination::create_vaccination_form)
                .post(handlers::vaccination::create_vaccination),
        )
        .route(
            "/vaccination/update/{dog_id}/{id}/",
            get(handlers::vaccination::update_vaccination_form)
                .post(handlers::vaccination::update_vaccination),
        )
        .route(
            "/vaccination/delete/{dog_id}/{id}/",
            get(handlers::vaccination::delete_vaccination_confirm)
                .post(handlers::vaccination::delete_vaccination),
        )
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/breeds/", get(handlers::admin::list_breeds))
        .route("/breeds/{id}/", patch(handlers::admin::patch_breed))
        .route("/dogs/", get(handlers::admin::list_dogs))
        .route("/dogs/{id}/", patch(handlers::admin::patch_dog))
        .route("/vaccinations/", get(handlers::admin::list_vaccinations))
        .route(
            "/vaccinations/{id}/",
            patch(handlers::admin::patch_vaccination),
        )
        .route("/vaccines/", get(handlers::admin::list_vaccines))
        .route("/vaccines/{id}/", patch(handlers::admin::patch_vaccine))
        .route("/caretakers/", get(handlers::admin::list_caretakers))
        .route("/caretakers/{id}/", patch(handlers::admin::patch_caretaker))
}
