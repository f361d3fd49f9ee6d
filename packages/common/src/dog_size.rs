#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::choice::{Choice, ParseChoiceError};

/// Size category of a breed.
///
/// Stored as a one-letter code, serialized as the lowercase label.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::N(1))")
)]
#[serde(rename_all = "lowercase")]
pub enum DogSize {
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "S"))]
    #[serde(alias = "S")]
    Small,
    #[default]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "M"))]
    #[serde(alias = "M")]
    Medium,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "L"))]
    #[serde(alias = "L")]
    Large,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "G"))]
    #[serde(alias = "G")]
    Giant,
}

impl Choice for DogSize {
    const ALL: &'static [Self] = &[Self::Small, Self::Medium, Self::Large, Self::Giant];

    fn code(&self) -> &'static str {
        match self {
            Self::Small => "S",
            Self::Medium => "M",
            Self::Large => "L",
            Self::Giant => "G",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::Giant => "giant",
        }
    }
}

impl fmt::Display for DogSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DogSize {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_choice(s)
    }
}
