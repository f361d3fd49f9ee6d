use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entity::vaccination;
use crate::error::AppError;

use super::form::{FormErrors, required_date, required_id, scalar};
pub use super::shared::RowOption;

#[derive(Serialize, utoipa::ToSchema)]
pub struct VaccinationResponse {
    pub id: i32,
    pub dog_id: i32,
    pub vaccine_id: i32,
    pub vaccination_date: NaiveDate,
}

impl From<vaccination::Model> for VaccinationResponse {
    fn from(m: vaccination::Model) -> Self {
        Self {
            id: m.id,
            dog_id: m.dog_id,
            vaccine_id: m.vaccine_id,
            vaccination_date: m.vaccination_date,
        }
    }
}

/// Context for the vaccination create and update pages.
#[derive(Serialize, utoipa::ToSchema)]
pub struct VaccinationFormContext {
    pub dog_id: i32,
    #[schema(example = "Brovko")]
    pub dog_name: String,
    /// Current values; absent on the create page.
    pub vaccination: Option<VaccinationResponse>,
    pub vaccines: Vec<RowOption>,
}

/// Context for the vaccination delete confirmation.
#[derive(Serialize, utoipa::ToSchema)]
pub struct VaccinationDeleteContext {
    pub dog_id: i32,
    pub dog_name: String,
    pub vaccination: VaccinationResponse,
    #[schema(example = "Flue")]
    pub vaccine_name: String,
}

/// Submitted vaccination fields. The dog always comes from the path.
#[derive(Deserialize, Default, Clone, utoipa::ToSchema)]
pub struct VaccinationForm {
    /// Vaccine id.
    #[serde(default, deserialize_with = "scalar")]
    #[schema(example = "1")]
    pub vaccine: Option<String>,
    /// `YYYY-MM-DD`.
    #[serde(default, deserialize_with = "scalar")]
    #[schema(example = "2023-06-20")]
    pub vaccination_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaccinationInput {
    pub vaccine_id: i32,
    pub vaccination_date: NaiveDate,
}

impl VaccinationForm {
    pub fn clean(&self) -> Result<VaccinationInput, AppError> {
        let mut errors = FormErrors::new();
        let vaccine_id = required_id(&mut errors, "vaccine", self.vaccine.as_deref());
        let vaccination_date =
            required_date(&mut errors, "vaccination_date", self.vaccination_date.as_deref());

        match (vaccine_id, vaccination_date) {
            (Some(vaccine_id), Some(vaccination_date)) => Ok(VaccinationInput {
                vaccine_id,
                vaccination_date,
            }),
            _ => Err(errors.into()),
        }
    }

    /// Fields present in `patch` replace the current ones.
    pub fn overlay(self, patch: VaccinationForm) -> Self {
        Self {
            vaccine: patch.vaccine.or(self.vaccine),
            vaccination_date: patch.vaccination_date.or(self.vaccination_date),
        }
    }
}

impl From<&vaccination::Model> for VaccinationForm {
    fn from(m: &vaccination::Model) -> Self {
        Self {
            vaccine: Some(m.vaccine_id.to_string()),
            vaccination_date: Some(m.vaccination_date.format("%Y-%m-%d").to_string()),
        }
    }
}
