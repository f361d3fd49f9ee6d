#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::choice::{Choice, ParseChoiceError};

/// Gender of a dog. Stored as `F` / `M`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::N(1))")
)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "F"))]
    #[serde(alias = "F")]
    Female,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "M"))]
    #[serde(alias = "M")]
    Male,
}

impl Choice for Gender {
    const ALL: &'static [Self] = &[Self::Female, Self::Male];

    fn code(&self) -> &'static str {
        match self {
            Self::Female => "F",
            Self::Male => "M",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Female => "female",
            Self::Male => "male",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Gender {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_choice(s)
    }
}
