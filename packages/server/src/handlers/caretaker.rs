use axum::Json;
use axum::extract::{Path, State};
use axum::response::Redirect;
use common::ExpertLevel;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::Actor;
use crate::extractors::form::AppForm;
use crate::extractors::query::AppQuery;
use crate::models::caretaker::*;
use crate::models::shared::search_term;
use crate::repository;
use crate::repository::caretaker::AccountFlags;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/caretakers/",
    tag = "Caretakers",
    operation_id = "listCaretakers",
    summary = "List caretakers",
    description = "Caretakers ordered by username, 15 per page. `username` filters by a case-insensitive substring. Requires login.",
    params(CaretakerListQuery),
    responses(
        (status = 200, description = "One page of caretakers", body = CaretakerListResponse),
        (status = 302, description = "Not logged in; redirects to the login page"),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, actor, query))]
pub async fn list_caretakers(
    actor: Actor,
    State(state): State<AppState>,
    query: Result<AppQuery<CaretakerListQuery>, AppError>,
) -> Result<Json<CaretakerListResponse>, AppError> {
    actor.require_login()?;
    let AppQuery(query) = query?;

    let (rows, window) = repository::caretaker::list(
        &state.db,
        search_term(query.username.as_deref()),
        CARETAKERS_PER_PAGE,
        query.page,
    )
    .await?;

    Ok(Json(CaretakerListResponse {
        data: rows.into_iter().map(CaretakerListItem::from).collect(),
        is_paginated: window.is_paginated(),
        pagination: window.into(),
    }))
}

#[utoipa::path(
    get,
    path = "/caretakers/{id}/",
    tag = "Caretakers",
    operation_id = "getCaretaker",
    summary = "Get a caretaker with their dogs",
    params(("id" = i32, Path, description = "Caretaker ID")),
    responses(
        (status = 200, description = "Caretaker details", body = CaretakerDetailResponse),
        (status = 302, description = "Not logged in; redirects to the login page"),
        (status = 404, description = "Caretaker not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, actor))]
pub async fn get_caretaker(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CaretakerDetailResponse>, AppError> {
    actor.require_login()?;
    Ok(Json(repository::caretaker::detail(&state.db, id).await?))
}

#[utoipa::path(
    get,
    path = "/caretakers/create/",
    tag = "Caretakers",
    operation_id = "caretakerCreateForm",
    summary = "Caretaker registration form",
    responses(
        (status = 200, description = "Expert levels to choose from", body = CaretakerFormContext),
    ),
)]
#[instrument]
pub async fn create_caretaker_form() -> Json<CaretakerFormContext> {
    Json(CaretakerFormContext {
        caretaker: None,
        expert_levels: ChoiceOption::all::<ExpertLevel>(),
    })
}

#[utoipa::path(
    post,
    path = "/caretakers/create/",
    tag = "Caretakers",
    operation_id = "createCaretaker",
    summary = "Register as a caretaker",
    description = "Open to anyone. `password1` and `password2` must match and pass the password rules. On success redirects to the new caretaker's page.",
    request_body(content = CaretakerForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Registered; redirects to `/caretakers/{id}/`"),
        (status = 400, description = "Invalid form (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, form))]
pub async fn create_caretaker(
    State(state): State<AppState>,
    AppForm(form): AppForm<CaretakerForm>,
) -> Result<Redirect, AppError> {
    let input = form.clean_creation()?;

    let caretaker = repository::caretaker::create(&state.db, input).await?;
    tracing::info!(id = caretaker.id, username = %caretaker.username, "Caretaker registered");
    Ok(Redirect::to(&format!("/caretakers/{}/", caretaker.id)))
}

#[utoipa::path(
    get,
    path = "/caretakers/{id}/update/",
    tag = "Caretakers",
    operation_id = "caretakerUpdateForm",
    summary = "Caretaker update form",
    params(("id" = i32, Path, description = "Caretaker ID")),
    responses(
        (status = 200, description = "Current values and expert levels", body = CaretakerFormContext),
        (status = 302, description = "Not logged in; redirects to the login page"),
        (status = 404, description = "Caretaker not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, actor))]
pub async fn update_caretaker_form(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CaretakerFormContext>, AppError> {
    actor.require_login()?;
    let caretaker = repository::caretaker::find(&state.db, id).await?;
    Ok(Json(CaretakerFormContext {
        caretaker: Some(caretaker.into()),
        expert_levels: ChoiceOption::all::<ExpertLevel>(),
    }))
}

#[utoipa::path(
    post,
    path = "/caretakers/{id}/update/",
    tag = "Caretakers",
    operation_id = "updateCaretaker",
    summary = "Update a caretaker",
    description = "Passwords are optional here; when given they must match and pass the password rules.",
    params(("id" = i32, Path, description = "Caretaker ID")),
    request_body(content = CaretakerForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Updated; redirects to `/caretakers/{id}/`"),
        (status = 302, description = "Not logged in; redirects to the login page"),
        (status = 400, description = "Invalid form (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Caretaker not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, actor, form))]
pub async fn update_caretaker(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    form: Result<AppForm<CaretakerForm>, AppError>,
) -> Result<Redirect, AppError> {
    actor.require_login()?;
    let AppForm(form) = form?;
    repository::caretaker::find(&state.db, id).await?;
    let input = form.clean_change()?;

    repository::caretaker::update(&state.db, id, input, AccountFlags::default()).await?;
    Ok(Redirect::to(&format!("/caretakers/{id}/")))
}

#[utoipa::path(
    get,
    path = "/caretakers/{id}/delete/",
    tag = "Caretakers",
    operation_id = "caretakerDeleteConfirm",
    summary = "Caretaker delete confirmation",
    params(("id" = i32, Path, description = "Caretaker ID")),
    responses(
        (status = 200, description = "The caretaker about to be deleted", body = CaretakerResponse),
        (status = 302, description = "Not logged in; redirects to the login page"),
        (status = 404, description = "Caretaker not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, actor))]
pub async fn delete_caretaker_confirm(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CaretakerResponse>, AppError> {
    actor.require_login()?;
    Ok(Json(repository::caretaker::find(&state.db, id).await?.into()))
}

#[utoipa::path(
    post,
    path = "/caretakers/{id}/delete/",
    tag = "Caretakers",
    operation_id = "deleteCaretaker",
    summary = "Delete a caretaker",
    description = "The caretaker's dogs stay; only the assignments go.",
    params(("id" = i32, Path, description = "Caretaker ID")),
    responses(
        (status = 303, description = "Deleted; redirects to `/caretakers/`"),
        (status = 302, description = "Not logged in; redirects to the login page"),
        (status = 404, description = "Caretaker not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, actor))]
pub async fn delete_caretaker(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Redirect, AppError> {
    actor.require_login()?;
    repository::caretaker::delete(&state.db, id).await?;
    Ok(Redirect::to("/caretakers/"))
}
