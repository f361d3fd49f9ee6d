use chrono::NaiveDate;
use common::{Choice, DogSize, Gender};
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

use crate::entity::{breed, dog};
use crate::error::AppError;

use super::form::{FormErrors, choice_or_default, required_text, scalar};
pub use super::shared::{ChoiceOption, Pagination};

/// Breeds shown per list page.
pub const BREEDS_PER_PAGE: u64 = 15;

const NAME_MAX: usize = 100;

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BreedListQuery {
    /// Case-insensitive substring of the breed name.
    pub name: Option<String>,
    /// 1-based page number.
    pub page: Option<u64>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct BreedListItem {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Pekiness")]
    pub name: String,
    pub dog_size: DogSize,
    /// Dogs currently registered with this breed.
    #[schema(example = 3)]
    pub num_dogs: u64,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct BreedListResponse {
    pub data: Vec<BreedListItem>,
    pub is_paginated: bool,
    pub pagination: Pagination,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct BreedResponse {
    pub id: i32,
    pub name: String,
    pub dog_size: DogSize,
}

impl From<breed::Model> for BreedResponse {
    fn from(m: breed::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            dog_size: m.dog_size,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct BreedDogItem {
    pub id: i32,
    pub name: String,
    pub age: Option<String>,
    pub date_registered: NaiveDate,
    pub gender: Gender,
}

impl From<dog::Model> for BreedDogItem {
    fn from(m: dog::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            age: m.age,
            date_registered: m.date_registered,
            gender: m.gender,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct BreedDetailResponse {
    pub id: i32,
    pub name: String,
    pub dog_size: DogSize,
    /// Dogs of this breed, by registration date.
    pub dogs: Vec<BreedDogItem>,
}

/// Context for the create and update pages.
#[derive(Serialize, utoipa::ToSchema)]
pub struct BreedFormContext {
    /// Current values; absent on the create page.
    pub breed: Option<BreedResponse>,
    pub dog_sizes: Vec<ChoiceOption>,
}

/// Submitted breed fields.
#[derive(Deserialize, Default, Clone, utoipa::ToSchema)]
pub struct BreedForm {
    /// Unique, at most 100 characters.
    #[serde(default, deserialize_with = "scalar")]
    #[schema(example = "Pekiness")]
    pub name: Option<String>,
    /// `S`/`M`/`L`/`G` or `small`/`medium`/`large`/`giant`. Defaults to medium.
    #[serde(default, deserialize_with = "scalar")]
    #[schema(example = "small")]
    pub dog_size: Option<String>,
}

/// A validated breed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreedInput {
    pub name: String,
    pub dog_size: DogSize,
}

impl BreedForm {
    pub fn clean(&self) -> Result<BreedInput, AppError> {
        let mut errors = FormErrors::new();
        let name = required_text(&mut errors, "name", self.name.as_deref(), NAME_MAX);
        let dog_size = choice_or_default(&mut errors, "dog_size", self.dog_size.as_deref());

        errors.finish(|| BreedInput {
            name: name.unwrap_or_default(),
            dog_size: dog_size.unwrap_or_default(),
        })
    }

    /// Fields present in `patch` replace the current ones.
    pub fn overlay(self, patch: BreedForm) -> Self {
        Self {
            name: patch.name.or(self.name),
            dog_size: patch.dog_size.or(self.dog_size),
        }
    }
}

impl From<&breed::Model> for BreedForm {
    fn from(m: &breed::Model) -> Self {
        Self {
            name: Some(m.name.clone()),
            dog_size: Some(m.dog_size.code().to_string()),
        }
    }
}
