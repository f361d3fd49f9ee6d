//! Field cleaning shared by every submitted form.
//!
//! Forms arrive either urlencoded (every value is a string, multi-selects are
//! repeated keys) or as JSON (numbers and booleans allowed). Form structs keep
//! every field as `Option<String>` via [`scalar`] / [`scalar_list`], and the
//! helpers below turn those raw values into typed input while collecting one
//! or more messages per offending field.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use common::Choice;
use serde::{Deserialize, Deserializer};

use crate::error::AppError;

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_DATE: &str = "Enter a valid date.";
pub const INVALID_REFERENCE: &str =
    "Select a valid choice. That choice is not one of the available choices.";

/// Validation messages keyed by field name.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_map(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }

    /// `Ok(value)` when no field failed, the collected errors otherwise.
    pub fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, AppError> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(AppError::Form(self))
        }
    }

    /// Shorthand for a single failing field.
    pub fn single(field: &str, message: impl Into<String>) -> AppError {
        let mut errors = Self::new();
        errors.add(field, message);
        AppError::Form(errors)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Scalar::Bool(b) => b.to_string(),
            Scalar::Int(i) => i.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Str(s) => s,
        }
    }
}

/// Accept a string, number, boolean or null as an optional raw field value.
pub fn scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(Scalar::into_string))
}

/// Accept a list of scalars (or repeated form keys) as an optional list of raw values.
pub fn scalar_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Scalar>>::deserialize(deserializer)?
        .map(|values| values.into_iter().map(Scalar::into_string).collect()))
}

fn too_long(max: usize, len: usize) -> String {
    format!("Ensure this value has at most {max} characters (it has {len}).")
}

fn trimmed(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Non-blank text of at most `max` characters, trimmed.
pub fn required_text(
    errors: &mut FormErrors,
    field: &str,
    value: Option<&str>,
    max: usize,
) -> Option<String> {
    let Some(value) = trimmed(value) else {
        errors.add(field, REQUIRED);
        return None;
    };
    optional_text(errors, field, Some(value), max)
}

/// Text of at most `max` characters; blank becomes `None`.
pub fn optional_text(
    errors: &mut FormErrors,
    field: &str,
    value: Option<&str>,
    max: usize,
) -> Option<String> {
    let value = trimmed(value)?;
    let len = value.chars().count();
    if len > max {
        errors.add(field, too_long(max, len));
        return None;
    }
    Some(value.to_string())
}

/// A choice that must be present.
pub fn required_choice<T: Choice>(
    errors: &mut FormErrors,
    field: &str,
    value: Option<&str>,
) -> Option<T> {
    let Some(value) = trimmed(value) else {
        errors.add(field, REQUIRED);
        return None;
    };
    match T::parse_choice(value) {
        Ok(choice) => Some(choice),
        Err(e) => {
            errors.add(field, e.to_string());
            None
        }
    }
}

/// A choice that falls back to the type's default when blank.
pub fn choice_or_default<T: Choice + Default>(
    errors: &mut FormErrors,
    field: &str,
    value: Option<&str>,
) -> Option<T> {
    match trimmed(value) {
        None => Some(T::default()),
        Some(value) => required_choice(errors, field, Some(value)),
    }
}

/// An ISO `YYYY-MM-DD` date that must be present.
pub fn required_date(
    errors: &mut FormErrors,
    field: &str,
    value: Option<&str>,
) -> Option<NaiveDate> {
    let Some(value) = trimmed(value) else {
        errors.add(field, REQUIRED);
        return None;
    };
    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            errors.add(field, INVALID_DATE);
            None
        }
    }
}

/// The id of a referenced row that must be present. Existence is checked later.
pub fn required_id(errors: &mut FormErrors, field: &str, value: Option<&str>) -> Option<i32> {
    let Some(value) = trimmed(value) else {
        errors.add(field, REQUIRED);
        return None;
    };
    match value.parse::<i32>() {
        Ok(id) => Some(id),
        Err(_) => {
            errors.add(field, INVALID_REFERENCE);
            None
        }
    }
}

/// Ids of a multi-select, deduplicated in submission order.
pub fn id_list(errors: &mut FormErrors, field: &str, values: &[String]) -> Vec<i32> {
    let mut ids = Vec::with_capacity(values.len());
    for raw in values.iter().map(|v| v.trim()).filter(|v| !v.is_empty()) {
        match raw.parse::<i32>() {
            Ok(id) if !ids.contains(&id) => ids.push(id),
            Ok(_) => {}
            Err(_) => errors.add(
                field,
                format!("Select a valid choice. {raw} is not one of the available choices."),
            ),
        }
    }
    ids
}

/// HTML checkbox semantics: absent or unrecognised means unchecked.
pub fn checkbox(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("on" | "true" | "1" | "yes")
    )
}
