use chrono::NaiveDate;
use common::{Choice, Gender};
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

use crate::entity::dog;
use crate::error::AppError;

use super::form::{
    FormErrors, checkbox, id_list, optional_text, required_choice, required_date, required_id,
    scalar, scalar_list,
};
pub use super::shared::{ChoiceOption, Pagination, RowOption};

/// Dogs shown per list page.
pub const DOGS_PER_PAGE: u64 = 10;

const NAME_MAX: usize = 60;
const AGE_MAX: usize = 100;

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DogListQuery {
    /// Case-insensitive substring of the dog name.
    pub name: Option<String>,
    /// 1-based page number.
    pub page: Option<u64>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct DogListItem {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Brovko")]
    pub name: String,
    #[schema(example = "2 years")]
    pub age: Option<String>,
    pub date_registered: NaiveDate,
    pub sterilized: bool,
    pub gender: Gender,
    pub breed_id: i32,
    #[schema(example = "Pekiness")]
    pub breed_name: String,
}

impl DogListItem {
    pub fn new(m: dog::Model, breed_name: String) -> Self {
        Self {
            id: m.id,
            name: m.name,
            age: m.age,
            date_registered: m.date_registered,
            sterilized: m.sterilized,
            gender: m.gender,
            breed_id: m.breed_id,
            breed_name,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct DogListResponse {
    pub data: Vec<DogListItem>,
    pub is_paginated: bool,
    pub pagination: Pagination,
}

/// A dog's stored fields with its caretaker ids.
#[derive(Serialize, utoipa::ToSchema)]
pub struct DogResponse {
    pub id: i32,
    pub name: String,
    pub age: Option<String>,
    pub date_registered: NaiveDate,
    pub sterilized: bool,
    pub gender: Gender,
    pub breed_id: i32,
    pub caretakers: Vec<i32>,
}

impl DogResponse {
    pub fn new(m: dog::Model, caretakers: Vec<i32>) -> Self {
        Self {
            id: m.id,
            name: m.name,
            age: m.age,
            date_registered: m.date_registered,
            sterilized: m.sterilized,
            gender: m.gender,
            breed_id: m.breed_id,
            caretakers,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct DogCaretakerItem {
    pub id: i32,
    #[schema(example = "alice")]
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct DogVaccinationItem {
    /// Vaccination id, used by the update and delete routes.
    pub id: i32,
    pub vaccine_id: i32,
    #[schema(example = "Flue")]
    pub vaccine_name: String,
    pub vaccination_date: NaiveDate,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct DogDetailResponse {
    pub id: i32,
    pub name: String,
    pub age: Option<String>,
    pub date_registered: NaiveDate,
    pub sterilized: bool,
    pub gender: Gender,
    pub breed: RowOption,
    pub caretakers: Vec<DogCaretakerItem>,
    /// Ordered by vaccination date.
    pub vaccinations: Vec<DogVaccinationItem>,
}

/// A caretaker offered in the dog form's checkbox list.
#[derive(Serialize, utoipa::ToSchema)]
pub struct CaretakerOption {
    pub id: i32,
    pub username: String,
}

/// Context for the create and update pages.
#[derive(Serialize, utoipa::ToSchema)]
pub struct DogFormContext {
    /// Current values; absent on the create page.
    pub dog: Option<DogResponse>,
    pub genders: Vec<ChoiceOption>,
    pub breeds: Vec<RowOption>,
    pub caretakers: Vec<CaretakerOption>,
}

/// Submitted dog fields.
#[derive(Deserialize, Default, Clone, utoipa::ToSchema)]
pub struct DogForm {
    /// At most 60 characters. Blank registers the dog as "No name".
    #[serde(default, deserialize_with = "scalar")]
    #[schema(example = "Brovko")]
    pub name: Option<String>,
    /// Free text, at most 100 characters.
    #[serde(default, deserialize_with = "scalar")]
    #[schema(example = "2 years")]
    pub age: Option<String>,
    /// `YYYY-MM-DD`.
    #[serde(default, deserialize_with = "scalar")]
    #[schema(example = "2023-06-20")]
    pub date_registered: Option<String>,
    /// Checkbox; absent means false.
    #[serde(default, deserialize_with = "scalar")]
    pub sterilized: Option<String>,
    /// `F`/`M` or `female`/`male`.
    #[serde(default, deserialize_with = "scalar")]
    #[schema(example = "M")]
    pub gender: Option<String>,
    /// Breed id.
    #[serde(default, deserialize_with = "scalar")]
    #[schema(example = "1")]
    pub breed: Option<String>,
    /// Caretaker ids; replaces the current assignments.
    #[serde(default, deserialize_with = "scalar_list")]
    pub caretakers: Option<Vec<String>>,
}

/// A validated dog. References are checked against the database later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DogInput {
    pub name: String,
    pub age: Option<String>,
    pub date_registered: NaiveDate,
    pub sterilized: bool,
    pub gender: Gender,
    pub breed_id: i32,
    pub caretakers: Vec<i32>,
}

impl DogForm {
    pub fn clean(&self) -> Result<DogInput, AppError> {
        let mut errors = FormErrors::new();
        let name = optional_text(&mut errors, "name", self.name.as_deref(), NAME_MAX);
        let age = optional_text(&mut errors, "age", self.age.as_deref(), AGE_MAX);
        let date_registered =
            required_date(&mut errors, "date_registered", self.date_registered.as_deref());
        let gender = required_choice(&mut errors, "gender", self.gender.as_deref());
        let breed_id = required_id(&mut errors, "breed", self.breed.as_deref());
        let caretakers = id_list(
            &mut errors,
            "caretakers",
            self.caretakers.as_deref().unwrap_or_default(),
        );

        match (date_registered, gender, breed_id) {
            (Some(date_registered), Some(gender), Some(breed_id)) if errors.is_empty() => {
                Ok(DogInput {
                    name: name.unwrap_or_else(|| dog::DEFAULT_NAME.to_string()),
                    age,
                    date_registered,
                    sterilized: checkbox(self.sterilized.as_deref()),
                    gender,
                    breed_id,
                    caretakers,
                })
            }
            _ => Err(errors.into()),
        }
    }

    /// Fields present in `patch` replace the current ones.
    pub fn overlay(self, patch: DogForm) -> Self {
        Self {
            name: patch.name.or(self.name),
            age: patch.age.or(self.age),
            date_registered: patch.date_registered.or(self.date_registered),
            sterilized: patch.sterilized.or(self.sterilized),
            gender: patch.gender.or(self.gender),
            breed: patch.breed.or(self.breed),
            caretakers: patch.caretakers.or(self.caretakers),
        }
    }

    /// The form as it would be pre-filled for an existing dog.
    pub fn from_existing(m: &dog::Model, caretakers: &[i32]) -> Self {
        Self {
            name: Some(m.name.clone()),
            age: m.age.clone(),
            date_registered: Some(m.date_registered.format("%Y-%m-%d").to_string()),
            sterilized: Some(m.sterilized.to_string()),
            gender: Some(m.gender.code().to_string()),
            breed: Some(m.breed_id.to_string()),
            caretakers: Some(caretakers.iter().map(i32::to_string).collect()),
        }
    }
}
