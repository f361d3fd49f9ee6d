use axum::Json;
use axum::extract::{Path, State};
use axum::response::Redirect;
use common::DogSize;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::Actor;
use crate::extractors::form::AppForm;
use crate::extractors::query::AppQuery;
use crate::models::breed::*;
use crate::models::shared::search_term;
use crate::repository;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/breeds/",
    tag = "Breeds",
    operation_id = "listBreeds",
    summary = "List breeds",
    description = "Breeds ordered by name, 15 per page, each with the number of dogs of that breed. `name` filters by a case-insensitive substring. A page past the end is empty.",
    params(BreedListQuery),
    responses(
        (status = 200, description = "One page of breeds", body = BreedListResponse),
        (status = 400, description = "Malformed query (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_breeds(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<BreedListQuery>,
) -> Result<Json<BreedListResponse>, AppError> {
    let (data, window) = repository::breed::list(
        &state.db,
        search_term(query.name.as_deref()),
        BREEDS_PER_PAGE,
        query.page,
    )
    .await?;

    Ok(Json(BreedListResponse {
        data,
        is_paginated: window.is_paginated(),
        pagination: window.into(),
    }))
}

#[utoipa::path(
    get,
    path = "/breeds/{id}/",
    tag = "Breeds",
    operation_id = "getBreed",
    summary = "Get a breed with its dogs",
    params(("id" = i32, Path, description = "Breed ID")),
    responses(
        (status = 200, description = "Breed details", body = BreedDetailResponse),
        (status = 404, description = "Breed not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_breed(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<BreedDetailResponse>, AppError> {
    Ok(Json(repository::breed::detail(&state.db, id).await?))
}

#[utoipa::path(
    get,
    path = "/breeds/create/",
    tag = "Breeds",
    operation_id = "breedCreateForm",
    summary = "Breed creation form",
    responses(
        (status = 200, description = "Available sizes", body = BreedFormContext),
        (status = 302, description = "Not logged in; redirects to the login page"),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(actor))]
pub async fn create_breed_form(actor: Actor) -> Result<Json<BreedFormContext>, AppError> {
    actor.require_login()?;
    Ok(Json(BreedFormContext {
        breed: None,
        dog_sizes: ChoiceOption::all::<DogSize>(),
    }))
}

#[utoipa::path(
    post,
    path = "/breeds/create/",
    tag = "Breeds",
    operation_id = "createBreed",
    summary = "Create a breed",
    description = "Accepts a urlencoded or JSON form. The name must be unique. On success redirects to the new breed's page.",
    request_body(content = BreedForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Created; redirects to `/breeds/{id}/`"),
        (status = 302, description = "Not logged in; redirects to the login page"),
        (status = 400, description = "Invalid form (VALIDATION_ERROR)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, actor, form))]
pub async fn create_breed(
    actor: Actor,
    State(state): State<AppState>,
    form: Result<AppForm<BreedForm>, AppError>,
) -> Result<Redirect, AppError> {
    actor.require_login()?;
    let AppForm(form) = form?;
    let input = form.clean()?;

    let breed = repository::breed::create(&state.db, input).await?;
    tracing::info!(id = breed.id, name = %breed.name, "Breed created");
    Ok(Redirect::to(&format!("/breeds/{}/", breed.id)))
}

#[utoipa::path(
    get,
    path = "/breeds/{id}/update/",
    tag = "Breeds",
    operation_id = "breedUpdateForm",
    summary = "Breed update form",
    params(("id" = i32, Path, description = "Breed ID")),
    responses(
        (status = 200, description = "Current values and available sizes", body = BreedFormContext),
        (status = 302, description = "Not logged in; redirects to the login page"),
        (status = 404, description = "Breed not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, actor))]
pub async fn update_breed_form(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<BreedFormContext>, AppError> {
    actor.require_login()?;
    let breed = repository::breed::find(&state.db, id).await?;
    Ok(Json(BreedFormContext {
        breed: Some(breed.into()),
        dog_sizes: ChoiceOption::all::<DogSize>(),
    }))
}

#[utoipa::path(
    post,
    path = "/breeds/{id}/update/",
    tag = "Breeds",
    operation_id = "updateBreed",
    summary = "Update a breed",
    params(("id" = i32, Path, description = "Breed ID")),
    request_body(content = BreedForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Updated; redirects to `/breeds/{id}/`"),
        (status = 302, description = "Not logged in; redirects to the login page"),
        (status = 400, description = "Invalid form (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Breed not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, actor, form))]
pub async fn update_breed(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    form: Result<AppForm<BreedForm>, AppError>,
) -> Result<Redirect, AppError> {
    actor.require_login()?;
    let AppForm(form) = form?;
    repository::breed::find(&state.db, id).await?;
    let input = form.clean()?;

    repository::breed::update(&state.db, id, input).await?;
    Ok(Redirect::to(&format!("/breeds/{id}/")))
}

#[utoipa::path(
    get,
    path = "/breeds/{id}/delete/",
    tag = "Breeds",
    operation_id = "breedDeleteConfirm",
    summary = "Breed delete confirmation",
    params(("id" = i32, Path, description = "Breed ID")),
    responses(
        (status = 200, description = "The breed about to be deleted", body = BreedResponse),
        (status = 302, description = "Not logged in; redirects to the login page"),
        (status = 404, description = "Breed not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, actor))]
pub async fn delete_breed_confirm(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<BreedResponse>, AppError> {
    actor.require_login()?;
    Ok(Json(repository::breed::find(&state.db, id).await?.into()))
}

#[utoipa::path(
    post,
    path = "/breeds/{id}/delete/",
    tag = "Breeds",
    operation_id = "deleteBreed",
    summary = "Delete a breed",
    description = "Refused with 409 while any dog still belongs to the breed.",
    params(("id" = i32, Path, description = "Breed ID")),
    responses(
        (status = 303, description = "Deleted; redirects to `/breeds/`"),
        (status = 302, description = "Not logged in; redirects to the login page"),
        (status = 404, description = "Breed not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Breed still has dogs (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, actor))]
pub async fn delete_breed(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Redirect, AppError> {
    actor.require_login()?;
    repository::breed::delete(&state.db, id).await?;
    Ok(Redirect::to("/breeds/"))
}
