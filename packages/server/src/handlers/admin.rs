//! Staff console: filtered lists of every table and field-level edits.
//!
//! Every handler checks `require_staff()` first. Edits take a JSON (or
//! urlencoded) patch, lay it over the current values and run the same
//! cleaning as the public forms.

use axum::Json;
use axum::extract::{Path, State};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::Actor;
use crate::extractors::form::AppForm;
use crate::extractors::query::AppQuery;
use crate::models::admin::*;
use crate::models::breed::{BreedForm, BreedResponse};
use crate::models::caretaker::{CaretakerForm, CaretakerResponse};
use crate::models::dog::{DogForm, DogResponse};
use crate::models::form::{FormErrors, required_id};
use crate::models::shared::search_term;
use crate::models::vaccination::{VaccinationForm, VaccinationResponse};
use crate::models::vaccine::{VaccineForm, VaccineResponse};
use crate::repository;
use crate::repository::caretaker::AccountFlags;
use crate::repository::dog::RegisteredFilter;
use crate::repository::vaccination::VaccinatedFilter;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/admin/breeds/",
    tag = "Admin",
    operation_id = "adminListBreeds",
    summary = "Console list of breeds",
    params(AdminBreedQuery),
    responses(
        (status = 200, description = "One page of breeds", body = AdminBreedList),
        (status = 302, description = "Not logged in; redirects to the login page"),
        (status = 403, description = "Not staff (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, actor, query))]
pub async fn list_breeds(
    actor: Actor,
    State(state): State<AppState>,
    query: Result<AppQuery<AdminBreedQuery>, AppError>,
) -> Result<Json<AdminBreedList>, AppError> {
    actor.require_staff()?;
    let AppQuery(query) = query?;

    let (rows, window) = repository::breed::admin_list(
        &state.db,
        search_term(query.q.as_deref()),
        query.dog_size,
        ADMIN_PER_PAGE,
        query.page,
    )
    .await?;

    Ok(Json(AdminBreedList {
        data: rows.into_iter().map(BreedResponse::from).collect(),
        pagination: window.into(),
    }))
}

#[utoipa::path(
    get,
    path = "/admin/dogs/",
    tag = "Admin",
    operation_id = "adminListDogs",
    summary = "Console list of dogs",
    description = "`q` matches the dog name or the breed name.",
    params(AdminDogQuery),
    responses(
        (status = 200, description = "One page of dogs", body = AdminDogList),
        (status = 302, description = "Not logged in; redirects to the login page"),
        (status = 403, description = "Not staff (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, actor, query))]
pub async fn list_dogs(
    actor: Actor,
    State(state): State<AppState>,
    query: Result<AppQuery<AdminDogQuery>, AppError>,
) -> Result<Json<AdminDogList>, AppError> {
    actor.require_staff()?;
    let AppQuery(query) = query?;

    let registered = RegisteredFilter {
        on: query.date_registered,
        after: query.registered_after,
        before: query.registered_before,
    };
    let (data, window) = repository::dog::admin_list(
        &state.db,
        search_term(query.q.as_deref()),
        registered,
        ADMIN_PER_PAGE,
        query.page,
    )
    .await?;

    Ok(Json(AdminDogList {
        data,
        pagination: window.into(),
    }))
}

#[utoipa::path(
    get,
    path = "/admin/vaccinations/",
    tag = "Admin",
    operation_id = "adminListVaccinations",
    summary = "Console list of vaccinations",
    description = "`q` matches the vaccine name.",
    params(AdminVaccinationQuery),
    responses(
        (status = 200, description = "One page of vaccinations", body = AdminVaccinationList),
        (status = 302, description = "Not logged in; redirects to the login page"),
        (status = 403, description = "Not staff (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, actor, query))]
pub async fn list_vaccinations(
    actor: Actor,
    State(state): State<AppState>,
    query: Result<AppQuery<AdminVaccinationQuery>, AppError>,
) -> Result<Json<AdminVaccinationList>, AppError> {
    actor.require_staff()?;
    let AppQuery(query) = query?;

    let vaccinated = VaccinatedFilter {
        on: query.vaccination_date,
        after: query.vaccinated_after,
        before: query.vaccinated_before,
    };
    let (data, window) = repository::vaccination::admin_list(
        &state.db,
        search_term(query.q.as_deref()),
        vaccinated,
        ADMIN_PER_PAGE,
        query.page,
    )
    .await?;

    Ok(Json(AdminVaccinationList {
        data,
        pagination: window.into(),
    }))
}

#[utoipa::path(
    get,
    path = "/admin/vaccines/",
    tag = "Admin",
    operation_id = "adminListVaccines",
    summary = "Console list of vaccines",
    params(AdminSearchQuery),
    responses(
        (status = 200, description = "One page of vaccines", body = AdminVaccineList),
        (status = 302, description = "Not logged in; redirects to the login page"),
        (status = 403, description = "Not staff (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, actor, query))]
pub async fn list_vaccines(
    actor: Actor,
    State(state): State<AppState>,
    query: Result<AppQuery<AdminSearchQuery>, AppError>,
) -> Result<Json<AdminVaccineList>, AppError> {
    actor.require_staff()?;
    let AppQuery(query) = query?;

    let (rows, window) = repository::vaccine::admin_list(
        &state.db,
        search_term(query.q.as_deref()),
        ADMIN_PER_PAGE,
        query.page,
    )
    .await?;

    Ok(Json(AdminVaccineList {
        data: rows.into_iter().map(VaccineResponse::from).collect(),
        pagination: window.into(),
    }))
}

#[utoipa::path(
    get,
    path = "/admin/caretakers/",
    tag = "Admin",
    operation_id = "adminListCaretakers",
    summary = "Console list of caretakers",
    description = "`q` matches the username, first name, last name or email.",
    params(AdminSearchQuery),
    responses(
        (status = 200, description = "One page of caretakers", body = AdminCaretakerList),
        (status = 302, description = "Not logged in; redirects to the login page"),
        (status = 403, description = "Not staff (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, actor, query))]
pub async fn list_caretakers(
    actor: Actor,
    State(state): State<AppState>,
    query: Result<AppQuery<AdminSearchQuery>, AppError>,
) -> Result<Json<AdminCaretakerList>, AppError> {
    actor.require_staff()?;
    let AppQuery(query) = query?;

    let (rows, window) = repository::caretaker::admin_list(
        &state.db,
        search_term(query.q.as_deref()),
        ADMIN_PER_PAGE,
        query.page,
    )
    .await?;

    Ok(Json(AdminCaretakerList {
        data: rows.into_iter().map(CaretakerResponse::from).collect(),
        pagination: window.into(),
    }))
}

#[utoipa::path(
    patch,
    path = "/admin/breeds/{id}/",
    tag = "Admin",
    operation_id = "adminPatchBreed",
    summary = "Edit breed fields",
    params(("id" = i32, Path, description = "Breed ID")),
    request_body = BreedForm,
    responses(
        (status = 200, description = "Updated breed", body = BreedResponse),
        (status = 400, description = "Invalid fields (VALIDATION_ERROR)", body = ErrorBody),
        (status = 403, description = "Not staff (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Breed not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, actor, patch))]
pub async fn patch_breed(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    patch: Result<AppForm<BreedForm>, AppError>,
) -> Result<Json<BreedResponse>, AppError> {
    actor.require_staff()?;
    let AppForm(patch) = patch?;

    let existing = repository::breed::find(&state.db, id).await?;
    let input = BreedForm::from(&existing).overlay(patch).clean()?;
    let breed = repository::breed::update(&state.db, id, input).await?;
    Ok(Json(breed.into()))
}

#[utoipa::path(
    patch,
    path = "/admin/dogs/{id}/",
    tag = "Admin",
    operation_id = "adminPatchDog",
    summary = "Edit dog fields",
    description = "A `caretakers` list, when present, replaces the current assignments.",
    params(("id" = i32, Path, description = "Dog ID")),
    request_body = DogForm,
    responses(
        (status = 200, description = "Updated dog", body = DogResponse),
        (status = 400, description = "Invalid fields (VALIDATION_ERROR)", body = ErrorBody),
        (status = 403, description = "Not staff (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Dog not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, actor, patch))]
pub async fn patch_dog(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    patch: Result<AppForm<DogForm>, AppError>,
) -> Result<Json<DogResponse>, AppError> {
    actor.require_staff()?;
    let AppForm(patch) = patch?;

    let existing = repository::dog::find(&state.db, id).await?;
    let caretakers = repository::dog::caretaker_ids(&state.db, id).await?;
    let input = DogForm::from_existing(&existing, &caretakers)
        .overlay(patch)
        .clean()?;
    let dog = repository::dog::update(&state.db, id, input).await?;
    let caretakers = repository::dog::caretaker_ids(&state.db, id).await?;
    Ok(Json(DogResponse::new(dog, caretakers)))
}

#[utoipa::path(
    patch,
    path = "/admin/vaccinations/{id}/",
    tag = "Admin",
    operation_id = "adminPatchVaccination",
    summary = "Edit vaccination fields",
    description = "Unlike the dog-scoped form, `dog` may move the record to another dog.",
    params(("id" = i32, Path, description = "Vaccination ID")),
    request_body = AdminVaccinationPatch,
    responses(
        (status = 200, description = "Updated vaccination", body = VaccinationResponse),
        (status = 400, description = "Invalid fields (VALIDATION_ERROR)", body = ErrorBody),
        (status = 403, description = "Not staff (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Vaccination not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, actor, patch))]
pub async fn patch_vaccination(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    patch: Result<AppForm<AdminVaccinationPatch>, AppError>,
) -> Result<Json<VaccinationResponse>, AppError> {
    actor.require_staff()?;
    let AppForm(patch) = patch?;

    let existing = repository::vaccination::find(&state.db, id).await?;
    let dog_id = match patch.dog.as_deref() {
        Some(raw) => {
            let mut errors = FormErrors::new();
            match required_id(&mut errors, "dog", Some(raw)) {
                Some(dog_id) => dog_id,
                None => return Err(errors.into()),
            }
        }
        None => existing.dog_id,
    };
    let input = VaccinationForm::from(&existing)
        .overlay(patch.form())
        .clean()?;
    let vaccination = repository::vaccination::update(&state.db, id, dog_id, input).await?;
    Ok(Json(vaccination.into()))
}

#[utoipa::path(
    patch,
    path = "/admin/vaccines/{id}/",
    tag = "Admin",
    operation_id = "adminPatchVaccine",
    summary = "Edit vaccine fields",
    params(("id" = i32, Path, description = "Vaccine ID")),
    request_body = VaccineForm,
    responses(
        (status = 200, description = "Updated vaccine", body = VaccineResponse),
        (status = 400, description = "Invalid fields (VALIDATION_ERROR)", body = ErrorBody),
        (status = 403, description = "Not staff (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Vaccine not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, actor, patch))]
pub async fn patch_vaccine(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    patch: Result<AppForm<VaccineForm>, AppError>,
) -> Result<Json<VaccineResponse>, AppError> {
    actor.require_staff()?;
    let AppForm(patch) = patch?;

    let existing = repository::vaccine::find(&state.db, id).await?;
    let name = VaccineForm {
        name: patch.name.or(Some(existing.name)),
    }
    .clean()?;
    let vaccine = repository::vaccine::update(&state.db, id, name).await?;
    Ok(Json(vaccine.into()))
}

#[utoipa::path(
    patch,
    path = "/admin/caretakers/{id}/",
    tag = "Admin",
    operation_id = "adminPatchCaretaker",
    summary = "Edit caretaker fields and account flags",
    description = "Profile fields validate as on the update form. `is_staff`, `is_superuser` and `is_active` can only be changed here.",
    params(("id" = i32, Path, description = "Caretaker ID")),
    request_body = AdminCaretakerPatch,
    responses(
        (status = 200, description = "Updated caretaker", body = CaretakerResponse),
        (status = 400, description = "Invalid fields (VALIDATION_ERROR)", body = ErrorBody),
        (status = 403, description = "Not staff (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Caretaker not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, actor, patch))]
pub async fn patch_caretaker(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    patch: Result<AppForm<AdminCaretakerPatch>, AppError>,
) -> Result<Json<CaretakerResponse>, AppError> {
    let staff = actor.require_staff()?;
    let AppForm(patch) = patch?;

    let existing = repository::caretaker::find(&state.db, id).await?;
    let input = CaretakerForm::from(&existing)
        .overlay(patch.form())
        .clean_change()?;
    let flags = AccountFlags {
        is_staff: patch.is_staff,
        is_superuser: patch.is_superuser,
        is_active: patch.is_active,
    };
    let caretaker = repository::caretaker::update(&state.db, id, input, flags).await?;
    tracing::info!(id, by = staff.id, "Caretaker edited from the console");
    Ok(Json(caretaker.into()))
}
