#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::choice::{Choice, ParseChoiceError};

/// How much dog-care experience a caretaker has.
///
/// Purely descriptive: it grants no extra permissions.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")
)]
#[serde(rename_all = "lowercase")]
pub enum ExpertLevel {
    /// Never looked after a dog before.
    #[default]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "beginner"))]
    Beginner,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "intermediate"))]
    Intermediate,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "advanced"))]
    Advanced,
    /// Professional experience in taking care of dogs.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "expert"))]
    Expert,
}

impl Choice for ExpertLevel {
    const ALL: &'static [Self] = &[
        Self::Beginner,
        Self::Intermediate,
        Self::Advanced,
        Self::Expert,
    ];

    fn code(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
            Self::Expert => "expert",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
            Self::Expert => "Expert",
        }
    }
}

impl fmt::Display for ExpertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ExpertLevel {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_choice(s)
    }
}
