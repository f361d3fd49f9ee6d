use axum::Json;
use axum::extract::{Path, State};
use axum::response::Redirect;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::Actor;
use crate::extractors::form::AppForm;
use crate::models::vaccine::*;
use crate::repository;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/vaccines/",
    tag = "Vaccines",
    operation_id = "listVaccines",
    summary = "List vaccines",
    description = "Every vaccine, ordered by name. Not paginated.",
    responses(
        (status = 200, description = "All vaccines", body = VaccineListResponse),
    ),
)]
#[instrument(skip(state))]
pub async fn list_vaccines(
    State(state): State<AppState>,
) -> Result<Json<VaccineListResponse>, AppError> {
    let data = repository::vaccine::list(&state.db)
        .await?
        .into_iter()
        .map(VaccineResponse::from)
        .collect();
    Ok(Json(VaccineListResponse {
        data,
        is_paginated: false,
    }))
}

#[utoipa::path(
    get,
    path = "/vaccines/create/",
    tag = "Vaccines",
    operation_id = "vaccineCreateForm",
    summary = "Vaccine creation form",
    responses(
        (status = 200, description = "Empty form", body = VaccineFormContext),
        (status = 302, description = "Not logged in; redirects to the login page"),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(actor))]
pub async fn create_vaccine_form(actor: Actor) -> Result<Json<VaccineFormContext>, AppError> {
    actor.require_login()?;
    Ok(Json(VaccineFormContext { vaccine: None }))
}

#[utoipa::path(
    post,
    path = "/vaccines/create/",
    tag = "Vaccines",
    operation_id = "createVaccine",
    summary = "Create a vaccine",
    request_body(content = VaccineForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Created; redirects to `/vaccines/`"),
        (status = 302, description = "Not logged in; redirects to the login page"),
        (status = 400, description = "Invalid form (VALIDATION_ERROR)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, actor, form))]
pub async fn create_vaccine(
    actor: Actor,
    State(state): State<AppState>,
    form: Result<AppForm<VaccineForm>, AppError>,
) -> Result<Redirect, AppError> {
    actor.require_login()?;
    let AppForm(form) = form?;
    let name = form.clean()?;

    let vaccine = repository::vaccine::create(&state.db, name).await?;
    tracing::info!(id = vaccine.id, name = %vaccine.name, "Vaccine created");
    Ok(Redirect::to("/vaccines/"))
}

#[utoipa::path(
    get,
    path = "/vaccines/{id}/update/",
    tag = "Vaccines",
    operation_id = "vaccineUpdateForm",
    summary = "Vaccine update form",
    params(("id" = i32, Path, description = "Vaccine ID")),
    responses(
        (status = 200, description = "Current values", body = VaccineFormContext),
        (status = 302, description = "Not logged in; redirects to the login page"),
        (status = 404, description = "Vaccine not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, actor))]
pub async fn update_vaccine_form(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<VaccineFormContext>, AppError> {
    actor.require_login()?;
    let vaccine = repository::vaccine::find(&state.db, id).await?;
    Ok(Json(VaccineFormContext {
        vaccine: Some(vaccine.into()),
    }))
}

#[utoipa::path(
    post,
    path = "/vaccines/{id}/update/",
    tag = "Vaccines",
    operation_id = "updateVaccine",
    summary = "Rename a vaccine",
    params(("id" = i32, Path, description = "Vaccine ID")),
    request_body(content = VaccineForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Updated; redirects to `/vaccines/`"),
        (status = 302, description = "Not logged in; redirects to the login page"),
        (status = 400, description = "Invalid form (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Vaccine not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, actor, form))]
pub async fn update_vaccine(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    form: Result<AppForm<VaccineForm>, AppError>,
) -> Result<Redirect, AppError> {
    actor.require_login()?;
    let AppForm(form) = form?;
    repository::vaccine::find(&state.db, id).await?;
    let name = form.clean()?;

    repository::vaccine::update(&state.db, id, name).await?;
    Ok(Redirect::to("/vaccines/"))
}

#[utoipa::path(
    get,
    path = "/vaccines/{id}/delete/",
    tag = "Vaccines",
    operation_id = "vaccineDeleteConfirm",
    summary = "Vaccine delete confirmation",
    params(("id" = i32, Path, description = "Vaccine ID")),
    responses(
        (status = 200, description = "The vaccine about to be deleted", body = VaccineResponse),
        (status = 302, description = "Not logged in; redirects to the login page"),
        (status = 404, description = "Vaccine not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, actor))]
pub async fn delete_vaccine_confirm(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<VaccineResponse>, AppError> {
    actor.require_login()?;
    Ok(Json(repository::vaccine::find(&state.db, id).await?.into()))
}

#[utoipa::path(
    post,
    path = "/vaccines/{id}/delete/",
    tag = "Vaccines",
    operation_id = "deleteVaccine",
    summary = "Delete a vaccine",
    description = "Also deletes every vaccination that used the vaccine.",
    params(("id" = i32, Path, description = "Vaccine ID")),
    responses(
        (status = 303, description = "Deleted; redirects to `/vaccines/`"),
        (status = 302, description = "Not logged in; redirects to the login page"),
        (status = 404, description = "Vaccine not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, actor))]
pub async fn delete_vaccine(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Redirect, AppError> {
    actor.require_login()?;
    repository::vaccine::delete(&state.db, id).await?;
    Ok(Redirect::to("/vaccines/"))
}
