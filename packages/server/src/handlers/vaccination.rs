use axum::Json;
use axum::extract::{Path, State};
use axum::response::Redirect;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::Actor;
use crate::extractors::form::AppForm;
use crate::models::vaccination::*;
use crate::repository;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/vaccination/create/{dog_id}/",
    tag = "Vaccinations",
    operation_id = "vaccinationCreateForm",
    summary = "Vaccination form for a dog",
    params(("dog_id" = i32, Path, description = "Dog ID")),
    responses(
        (status = 200, description = "The dog and the vaccines to choose from", body = VaccinationFormContext),
        (status = 302, description = "Not logged in; redirects to the login page"),
        (status = 404, description = "Dog not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, actor))]
pub async fn create_vaccination_form(
    actor: Actor,
    State(state): State<AppState>,
    Path(dog_id): Path<i32>,
) -> Result<Json<VaccinationFormContext>, AppError> {
    actor.require_login()?;
    let dog = repository::dog::find(&state.db, dog_id).await?;
    Ok(Json(VaccinationFormContext {
        dog_id,
        dog_name: dog.name,
        vaccination: None,
        vaccines: repository::vaccine::options(&state.db).await?,
    }))
}

#[utoipa::path(
    post,
    path = "/vaccination/create/{dog_id}/",
    tag = "Vaccinations",
    operation_id = "createVaccination",
    summary = "Record a vaccination",
    description = "The dog comes from the path; a `dog` field in the body is ignored.",
    params(("dog_id" = i32, Path, description = "Dog ID")),
    request_body(content = VaccinationForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Recorded; redirects to `/dogs/{dog_id}/`"),
        (status = 302, description = "Not logged in; redirects to the login page"),
        (status = 400, description = "Invalid form (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Dog not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, actor, form))]
pub async fn create_vaccination(
    actor: Actor,
    State(state): State<AppState>,
    Path(dog_id): Path<i32>,
    form: Result<AppForm<VaccinationForm>, AppError>,
) -> Result<Redirect, AppError> {
    actor.require_login()?;
    let AppForm(form) = form?;
    repository::dog::find(&state.db, dog_id).await?;
    let input = form.clean()?;

    let vaccination = repository::vaccination::create(&state.db, dog_id, input).await?;
    tracing::info!(id = vaccination.id, dog_id, "Vaccination recorded");
    Ok(Redirect::to(&format!("/dogs/{dog_id}/")))
}

#[utoipa::path(
    get,
    path = "/vaccination/update/{dog_id}/{id}/",
    tag = "Vaccinations",
    operation_id = "vaccinationUpdateForm",
    summary = "Vaccination update form",
    params(
        ("dog_id" = i32, Path, description = "Dog ID"),
        ("id" = i32, Path, description = "Vaccination ID"),
    ),
    responses(
        (status = 200, description = "Current values and vaccines", body = VaccinationFormContext),
        (status = 302, description = "Not logged in; redirects to the login page"),
        (status = 404, description = "Dog or vaccination not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, actor))]
pub async fn update_vaccination_form(
    actor: Actor,
    State(state): State<AppState>,
    Path((dog_id, id)): Path<(i32, i32)>,
) -> Result<Json<VaccinationFormContext>, AppError> {
    actor.require_login()?;
    let dog = repository::dog::find(&state.db, dog_id).await?;
    let vaccination = repository::vaccination::find_for_dog(&state.db, dog_id, id).await?;
    Ok(Json(VaccinationFormContext {
        dog_id,
        dog_name: dog.name,
        vaccination: Some(vaccination.into()),
        vaccines: repository::vaccine::options(&state.db).await?,
    }))
}

#[utoipa::path(
    post,
    path = "/vaccination/update/{dog_id}/{id}/",
    tag = "Vaccinations",
    operation_id = "updateVaccination",
    summary = "Update a vaccination",
    params(
        ("dog_id" = i32, Path, description = "Dog ID"),
        ("id" = i32, Path, description = "Vaccination ID"),
    ),
    request_body(content = VaccinationForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Updated; redirects to `/dogs/{dog_id}/`"),
        (status = 302, description = "Not logged in; redirects to the login page"),
        (status = 400, description = "Invalid form (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Dog or vaccination not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, actor, form))]
pub async fn update_vaccination(
    actor: Actor,
    State(state): State<AppState>,
    Path((dog_id, id)): Path<(i32, i32)>,
    form: Result<AppForm<VaccinationForm>, AppError>,
) -> Result<Redirect, AppError> {
    actor.require_login()?;
    let AppForm(form) = form?;
    repository::dog::find(&state.db, dog_id).await?;
    repository::vaccination::find_for_dog(&state.db, dog_id, id).await?;
    let input = form.clean()?;

    repository::vaccination::update(&state.db, id, dog_id, input).await?;
    Ok(Redirect::to(&format!("/dogs/{dog_id}/")))
}

#[utoipa::path(
    get,
    path = "/vaccination/delete/{dog_id}/{id}/",
    tag = "Vaccinations",
    operation_id = "vaccinationDeleteConfirm",
    summary = "Vaccination delete confirmation",
    params(
        ("dog_id" = i32, Path, description = "Dog ID"),
        ("id" = i32, Path, description = "Vaccination ID"),
    ),
    responses(
        (status = 200, description = "The vaccination about to be deleted", body = VaccinationDeleteContext),
        (status = 302, description = "Not logged in; redirects to the login page"),
        (status = 404, description = "Dog or vaccination not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, actor))]
pub async fn delete_vaccination_confirm(
    actor: Actor,
    State(state): State<AppState>,
    Path((dog_id, id)): Path<(i32, i32)>,
) -> Result<Json<VaccinationDeleteContext>, AppError> {
    actor.require_login()?;
    let dog = repository::dog::find(&state.db, dog_id).await?;
    let vaccination = repository::vaccination::find_for_dog(&state.db, dog_id, id).await?;
    let vaccine = repository::vaccine::find(&state.db, vaccination.vaccine_id).await?;
    Ok(Json(VaccinationDeleteContext {
        dog_id,
        dog_name: dog.name,
        vaccination: vaccination.into(),
        vaccine_name: vaccine.name,
    }))
}

#[utoipa::path(
    post,
    path = "/vaccination/delete/{dog_id}/{id}/",
    tag = "Vaccinations",
    operation_id = "deleteVaccination",
    summary = "Delete a vaccination",
    params(
        ("dog_id" = i32, Path, description = "Dog ID"),
        ("id" = i32, Path, description = "Vaccination ID"),
    ),
    responses(
        (status = 303, description = "Deleted; redirects to `/dogs/{dog_id}/`"),
        (status = 302, description = "Not logged in; redirects to the login page"),
        (status = 404, description = "Vaccination not found for this dog (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, actor))]
pub async fn delete_vaccination(
    actor: Actor,
    State(state): State<AppState>,
    Path((dog_id, id)): Path<(i32, i32)>,
) -> Result<Redirect, AppError> {
    actor.require_login()?;
    repository::vaccination::delete(&state.db, id, Some(dog_id)).await?;
    Ok(Redirect::to(&format!("/dogs/{dog_id}/")))
}
