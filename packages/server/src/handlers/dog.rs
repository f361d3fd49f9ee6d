use axum::Json;
use axum::extract::{Path, State};
use axum::response::Redirect;
use common::Gender;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::Actor;
use crate::extractors::form::AppForm;
use crate::extractors::query::AppQuery;
use crate::models::dog::*;
use crate::models::shared::search_term;
use crate::repository;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/dogs/",
    tag = "Dogs",
    operation_id = "listDogs",
    summary = "List dogs",
    description = "Dogs ordered by registration date, 10 per page, each with its breed name. `name` filters by a case-insensitive substring.",
    params(DogListQuery),
    responses(
        (status = 200, description = "One page of dogs", body = DogListResponse),
        (status = 400, description = "Malformed query (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_dogs(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<DogListQuery>,
) -> Result<Json<DogListResponse>, AppError> {
    let (data, window) = repository::dog::list(
        &state.db,
        search_term(query.name.as_deref()),
        DOGS_PER_PAGE,
        query.page,
    )
    .await?;

    Ok(Json(DogListResponse {
        data,
        is_paginated: window.is_paginated(),
        pagination: window.into(),
    }))
}

#[utoipa::path(
    get,
    path = "/dogs/{id}/",
    tag = "Dogs",
    operation_id = "getDog",
    summary = "Get a dog with its breed, caretakers and vaccinations",
    params(("id" = i32, Path, description = "Dog ID")),
    responses(
        (status = 200, description = "Dog details", body = DogDetailResponse),
        (status = 404, description = "Dog not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_dog(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<DogDetailResponse>, AppError> {
    Ok(Json(repository::dog::detail(&state.db, id).await?))
}

async fn form_context(state: &AppState, dog: Option<DogResponse>) -> Result<DogFormContext, AppError> {
    Ok(DogFormContext {
        dog,
        genders: ChoiceOption::all::<Gender>(),
        breeds: repository::breed::options(&state.db).await?,
        caretakers: repository::dog::caretaker_options(&state.db).await?,
    })
}

#[utoipa::path(
    get,
    path = "/dogs/create/",
    tag = "Dogs",
    operation_id = "dogCreateForm",
    summary = "Dog registration form",
    responses(
        (status = 200, description = "Genders, breeds and caretakers to choose from", body = DogFormContext),
        (status = 302, description = "Not logged in; redirects to the login page"),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, actor))]
pub async fn create_dog_form(
    actor: Actor,
    State(state): State<AppState>,
) -> Result<Json<DogFormContext>, AppError> {
    actor.require_login()?;
    Ok(Json(form_context(&state, None).await?))
}

#[utoipa::path(
    post,
    path = "/dogs/create/",
    tag = "Dogs",
    operation_id = "createDog",
    summary = "Register a dog",
    description = "Accepts a urlencoded or JSON form. `caretakers` may repeat. A blank name registers the dog as \"No name\".",
    request_body(content = DogForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Created; redirects to `/dogs/{id}/`"),
        (status = 302, description = "Not logged in; redirects to the login page"),
        (status = 400, description = "Invalid form (VALIDATION_ERROR)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, actor, form))]
pub async fn create_dog(
    actor: Actor,
    State(state): State<AppState>,
    form: Result<AppForm<DogForm>, AppError>,
) -> Result<Redirect, AppError> {
    actor.require_login()?;
    let AppForm(form) = form?;
    let input = form.clean()?;

    let dog = repository::dog::create(&state.db, input).await?;
    tracing::info!(id = dog.id, name = %dog.name, "Dog registered");
    Ok(Redirect::to(&format!("/dogs/{}/", dog.id)))
}

#[utoipa::path(
    get,
    path = "/dogs/{id}/update/",
    tag = "Dogs",
    operation_id = "dogUpdateForm",
    summary = "Dog update form",
    params(("id" = i32, Path, description = "Dog ID")),
    responses(
        (status = 200, description = "Current values and choices", body = DogFormContext),
        (status = 302, description = "Not logged in; redirects to the login page"),
        (status = 404, description = "Dog not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, actor))]
pub async fn update_dog_form(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<DogFormContext>, AppError> {
    actor.require_login()?;
    let dog = repository::dog::find(&state.db, id).await?;
    let caretakers = repository::dog::caretaker_ids(&state.db, id).await?;
    Ok(Json(
        form_context(&state, Some(DogResponse::new(dog, caretakers))).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/dogs/{id}/update/",
    tag = "Dogs",
    operation_id = "updateDog",
    summary = "Update a dog",
    description = "The submitted `caretakers` replace the current assignments.",
    params(("id" = i32, Path, description = "Dog ID")),
    request_body(content = DogForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Updated; redirects to `/dogs/{id}/`"),
        (status = 302, description = "Not logged in; redirects to the login page"),
        (status = 400, description = "Invalid form (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Dog not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, actor, form))]
pub async fn update_dog(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    form: Result<AppForm<DogForm>, AppError>,
) -> Result<Redirect, AppError> {
    actor.require_login()?;
    let AppForm(form) = form?;
    repository::dog::find(&state.db, id).await?;
    let input = form.clean()?;

    repository::dog::update(&state.db, id, input).await?;
    Ok(Redirect::to(&format!("/dogs/{id}/")))
}

#[utoipa::path(
    get,
    path = "/dogs/{id}/delete/",
    tag = "Dogs",
    operation_id = "dogDeleteConfirm",
    summary = "Dog delete confirmation",
    params(("id" = i32, Path, description = "Dog ID")),
    responses(
        (status = 200, description = "The dog about to be deleted", body = DogDetailResponse),
        (status = 302, description = "Not logged in; redirects to the login page"),
        (status = 404, description = "Dog not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, actor))]
pub async fn delete_dog_confirm(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<DogDetailResponse>, AppError> {
    actor.require_login()?;
    Ok(Json(repository::dog::detail(&state.db, id).await?))
}

#[utoipa::path(
    post,
    path = "/dogs/{id}/delete/",
    tag = "Dogs",
    operation_id = "deleteDog",
    summary = "Delete a dog",
    description = "Also deletes the dog's vaccinations and caretaker assignments.",
    params(("id" = i32, Path, description = "Dog ID")),
    responses(
        (status = 303, description = "Deleted; redirects to `/dogs/`"),
        (status = 302, description = "Not logged in; redirects to the login page"),
        (status = 404, description = "Dog not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, actor))]
pub async fn delete_dog(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Redirect, AppError> {
    actor.require_login()?;
    repository::dog::delete(&state.db, id).await?;
    Ok(Redirect::to("/dogs/"))
}
