use chrono::NaiveDate;
use common::DogSize;
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

use super::breed::BreedResponse;
use super::caretaker::{CaretakerForm, CaretakerResponse};
use super::dog::DogListItem;
use super::form::scalar;
use super::shared::Pagination;
use super::vaccination::VaccinationForm;
use super::vaccine::VaccineResponse;

/// Rows per page on every console list.
pub const ADMIN_PER_PAGE: u64 = 10;

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AdminBreedQuery {
    /// Search in the breed name.
    pub q: Option<String>,
    /// Only breeds of this size.
    pub dog_size: Option<DogSize>,
    pub page: Option<u64>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AdminDogQuery {
    /// Search in the dog name or the breed name.
    pub q: Option<String>,
    /// Registered on exactly this day.
    pub date_registered: Option<NaiveDate>,
    /// Registered on or after this day.
    pub registered_after: Option<NaiveDate>,
    /// Registered on or before this day.
    pub registered_before: Option<NaiveDate>,
    pub page: Option<u64>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AdminVaccinationQuery {
    /// Search in the vaccine name.
    pub q: Option<String>,
    pub vaccination_date: Option<NaiveDate>,
    pub vaccinated_after: Option<NaiveDate>,
    pub vaccinated_before: Option<NaiveDate>,
    pub page: Option<u64>,
}

/// Query of console lists that only search.
#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AdminSearchQuery {
    pub q: Option<String>,
    pub page: Option<u64>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct AdminBreedList {
    pub data: Vec<BreedResponse>,
    pub pagination: Pagination,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct AdminDogList {
    pub data: Vec<DogListItem>,
    pub pagination: Pagination,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct AdminVaccinationRow {
    pub id: i32,
    pub vaccination_date: NaiveDate,
    pub vaccine_id: i32,
    #[schema(example = "Flue")]
    pub vaccine_name: String,
    pub dog_id: i32,
    #[schema(example = "Brovko")]
    pub dog_name: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct AdminVaccinationList {
    pub data: Vec<AdminVaccinationRow>,
    pub pagination: Pagination,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct AdminVaccineList {
    pub data: Vec<VaccineResponse>,
    pub pagination: Pagination,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct AdminCaretakerList {
    pub data: Vec<CaretakerResponse>,
    pub pagination: Pagination,
}

/// Console edit of a vaccination. Unlike the dog-scoped form it may move the record.
#[derive(Deserialize, Default, utoipa::ToSchema)]
pub struct AdminVaccinationPatch {
    /// Dog id.
    #[serde(default, deserialize_with = "scalar")]
    pub dog: Option<String>,
    #[serde(default, deserialize_with = "scalar")]
    pub vaccine: Option<String>,
    #[serde(default, deserialize_with = "scalar")]
    pub vaccination_date: Option<String>,
}

impl AdminVaccinationPatch {
    pub fn form(&self) -> VaccinationForm {
        VaccinationForm {
            vaccine: self.vaccine.clone(),
            vaccination_date: self.vaccination_date.clone(),
        }
    }
}

/// Console edit of a caretaker: the profile fields plus the account flags.
#[derive(Deserialize, Default, utoipa::ToSchema)]
pub struct AdminCaretakerPatch {
    #[serde(default, deserialize_with = "scalar")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "scalar")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "scalar")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "scalar")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "scalar")]
    pub expert_level: Option<String>,
    #[serde(default, deserialize_with = "scalar")]
    pub password1: Option<String>,
    #[serde(default, deserialize_with = "scalar")]
    pub password2: Option<String>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
    pub is_active: Option<bool>,
}

impl AdminCaretakerPatch {
    pub fn form(&self) -> CaretakerForm {
        CaretakerForm {
            username: self.username.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            expert_level: self.expert_level.clone(),
            password1: self.password1.clone(),
            password2: self.password2.clone(),
        }
    }
}
