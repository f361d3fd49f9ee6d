use chrono::{DateTime, NaiveDate, Utc};
use common::{Choice, ExpertLevel, Gender};
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

use crate::entity::{caretaker, dog};
use crate::error::AppError;

use super::auth::clean_password_pair;
use super::form::{FormErrors, choice_or_default, optional_text, required_text, scalar};
pub use super::shared::{ChoiceOption, Pagination};

/// Caretakers shown per list page.
pub const CARETAKERS_PER_PAGE: u64 = 15;

pub const USERNAME_MAX: usize = 150;
const NAME_MAX: usize = 150;
const EMAIL_MAX: usize = 254;

pub const INVALID_USERNAME: &str = "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.";
pub const USERNAME_TAKEN: &str = "A user with that username already exists.";
const INVALID_EMAIL: &str = "Enter a valid email address.";

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CaretakerListQuery {
    /// Case-insensitive substring of the username.
    pub username: Option<String>,
    /// 1-based page number.
    pub page: Option<u64>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CaretakerListItem {
    pub id: i32,
    #[schema(example = "alice")]
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub expert_level: ExpertLevel,
}

impl From<caretaker::Model> for CaretakerListItem {
    fn from(m: caretaker::Model) -> Self {
        Self {
            id: m.id,
            username: m.username,
            first_name: m.first_name,
            last_name: m.last_name,
            expert_level: m.expert_level,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CaretakerListResponse {
    pub data: Vec<CaretakerListItem>,
    pub is_paginated: bool,
    pub pagination: Pagination,
}

/// A caretaker account without its password hash.
#[derive(Serialize, utoipa::ToSchema)]
pub struct CaretakerResponse {
    pub id: i32,
    #[schema(example = "alice")]
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub expert_level: ExpertLevel,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub is_active: bool,
    pub date_joined: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl From<caretaker::Model> for CaretakerResponse {
    fn from(m: caretaker::Model) -> Self {
        Self {
            id: m.id,
            username: m.username,
            first_name: m.first_name,
            last_name: m.last_name,
            email: m.email,
            expert_level: m.expert_level,
            is_staff: m.is_staff,
            is_superuser: m.is_superuser,
            is_active: m.is_active,
            date_joined: m.date_joined,
            last_login: m.last_login,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CaretakerDogItem {
    pub id: i32,
    #[schema(example = "Brovko")]
    pub name: String,
    pub gender: Gender,
    pub date_registered: NaiveDate,
}

impl From<dog::Model> for CaretakerDogItem {
    fn from(m: dog::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            gender: m.gender,
            date_registered: m.date_registered,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CaretakerDetailResponse {
    pub caretaker: CaretakerResponse,
    /// Dogs this caretaker looks after, by registration date.
    pub dogs: Vec<CaretakerDogItem>,
}

/// Context for the registration and update pages.
#[derive(Serialize, utoipa::ToSchema)]
pub struct CaretakerFormContext {
    /// Current values; absent on the registration page.
    pub caretaker: Option<CaretakerResponse>,
    pub expert_levels: Vec<ChoiceOption>,
}

/// Submitted caretaker fields.
///
/// Registration requires `password1`/`password2`. On update they are optional
/// and change the password when given.
#[derive(Deserialize, Default, Clone, utoipa::ToSchema)]
pub struct CaretakerForm {
    /// Unique; letters, digits and `@.+-_`, at most 150 characters.
    #[serde(default, deserialize_with = "scalar")]
    #[schema(example = "alice")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "scalar")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "scalar")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "scalar")]
    #[schema(example = "alice@example.com")]
    pub email: Option<String>,
    /// `beginner`, `intermediate`, `advanced` or `expert`. Defaults to beginner.
    #[serde(default, deserialize_with = "scalar")]
    #[schema(example = "beginner")]
    pub expert_level: Option<String>,
    #[serde(default, deserialize_with = "scalar")]
    pub password1: Option<String>,
    #[serde(default, deserialize_with = "scalar")]
    pub password2: Option<String>,
}

/// A validated caretaker. `password` is plain text and still needs hashing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaretakerInput {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub expert_level: ExpertLevel,
    pub password: Option<String>,
}

impl CaretakerForm {
    /// Validate a registration.
    pub fn clean_creation(&self) -> Result<CaretakerInput, AppError> {
        self.clean(true)
    }

    /// Validate an update of an existing account.
    pub fn clean_change(&self) -> Result<CaretakerInput, AppError> {
        let wants_password = [&self.password1, &self.password2]
            .iter()
            .any(|p| p.as_deref().is_some_and(|p| !p.is_empty()));
        self.clean(wants_password)
    }

    fn clean(&self, with_password: bool) -> Result<CaretakerInput, AppError> {
        let mut errors = FormErrors::new();
        let username = clean_username(&mut errors, self.username.as_deref());
        let first_name = optional_text(&mut errors, "first_name", self.first_name.as_deref(), NAME_MAX);
        let last_name = optional_text(&mut errors, "last_name", self.last_name.as_deref(), NAME_MAX);
        let email = clean_email(&mut errors, self.email.as_deref());
        let expert_level = choice_or_default(&mut errors, "expert_level", self.expert_level.as_deref());
        let password = if with_password {
            clean_password_pair(
                &mut errors,
                self.password1.as_deref(),
                self.password2.as_deref(),
                username.as_deref().unwrap_or_default(),
            )
        } else {
            None
        };

        errors.finish(|| CaretakerInput {
            username: username.unwrap_or_default(),
            first_name: first_name.unwrap_or_default(),
            last_name: last_name.unwrap_or_default(),
            email: email.unwrap_or_default(),
            expert_level: expert_level.unwrap_or_default(),
            password,
        })
    }

    /// Fields present in `patch` replace the current ones.
    pub fn overlay(self, patch: CaretakerForm) -> Self {
        Self {
            username: patch.username.or(self.username),
            first_name: patch.first_name.or(self.first_name),
            last_name: patch.last_name.or(self.last_name),
            email: patch.email.or(self.email),
            expert_level: patch.expert_level.or(self.expert_level),
            password1: patch.password1.or(self.password1),
            password2: patch.password2.or(self.password2),
        }
    }
}

impl From<&caretaker::Model> for CaretakerForm {
    fn from(m: &caretaker::Model) -> Self {
        Self {
            username: Some(m.username.clone()),
            first_name: Some(m.first_name.clone()),
            last_name: Some(m.last_name.clone()),
            email: Some(m.email.clone()),
            expert_level: Some(m.expert_level.code().to_string()),
            password1: None,
            password2: None,
        }
    }
}

pub fn is_valid_username(username: &str) -> bool {
    !username.is_empty()
        && username
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
}

fn clean_username(errors: &mut FormErrors, value: Option<&str>) -> Option<String> {
    let username = required_text(errors, "username", value, USERNAME_MAX)?;
    if is_valid_username(&username) {
        Some(username)
    } else {
        errors.add("username", INVALID_USERNAME);
        None
    }
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.rsplit_once('@') else {
        return false;
    };
    !local.is_empty()
        && !local.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain.contains('.')
        && domain.split('.').all(|label| {
            !label.is_empty()
                && label
                    .chars()
                    .all(|c| c.is_alphanumeric() || c == '-')
        })
}

fn clean_email(errors: &mut FormErrors, value: Option<&str>) -> Option<String> {
    let email = optional_text(errors, "email", value, EMAIL_MAX)?;
    if is_valid_email(&email) {
        Some(email)
    } else {
        errors.add("email", INVALID_EMAIL);
        None
    }
}
