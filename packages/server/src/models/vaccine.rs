use serde::{Deserialize, Serialize};

use crate::entity::vaccine;
use crate::error::AppError;

use super::form::{FormErrors, required_text, scalar};

const NAME_MAX: usize = 255;

#[derive(Serialize, utoipa::ToSchema)]
pub struct VaccineResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Flue")]
    pub name: String,
}

impl From<vaccine::Model> for VaccineResponse {
    fn from(m: vaccine::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
        }
    }
}

/// Every vaccine, by name. The list is not paginated.
#[derive(Serialize, utoipa::ToSchema)]
pub struct VaccineListResponse {
    pub data: Vec<VaccineResponse>,
    /// Always false.
    pub is_paginated: bool,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct VaccineFormContext {
    /// Current values; absent on the create page.
    pub vaccine: Option<VaccineResponse>,
}

#[derive(Deserialize, Default, Clone, utoipa::ToSchema)]
pub struct VaccineForm {
    /// At most 255 characters.
    #[serde(default, deserialize_with = "scalar")]
    #[schema(example = "Flue")]
    pub name: Option<String>,
}

impl VaccineForm {
    /// The trimmed vaccine name.
    pub fn clean(&self) -> Result<String, AppError> {
        let mut errors = FormErrors::new();
        let name = required_text(&mut errors, "name", self.name.as_deref(), NAME_MAX);
        errors.finish(|| name.unwrap_or_default())
    }
}
