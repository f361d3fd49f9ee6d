use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

use crate::error::AppError;

use super::form::{FormErrors, REQUIRED, scalar};

pub const PASSWORD_MIN: usize = 8;
pub const PASSWORD_MAX: usize = 128;
pub const PASSWORD_MISMATCH: &str = "The two password fields didn’t match.";

/// Passwords refused outright, compared case-insensitively.
const COMMON_PASSWORDS: &[&str] = &[
    "password",
    "password1",
    "password123",
    "passw0rd",
    "12345678",
    "123456789",
    "1234567890",
    "qwerty123",
    "qwertyuiop",
    "iloveyou",
    "sunshine",
    "princess",
    "football",
    "baseball",
    "welcome1",
    "letmein1",
    "admin123",
    "abc12345",
    "trustno1",
    "superman",
    "starwars",
    "whatever",
    "dragon12",
    "11111111",
    "00000000",
];

/// Check a new password against the strength rules.
///
/// Returns every violated rule, in a stable order.
pub fn password_problems(password: &str, username: &str) -> Vec<String> {
    let mut problems = Vec::new();
    let len = password.chars().count();

    if len < PASSWORD_MIN {
        problems.push(format!(
            "This password is too short. It must contain at least {PASSWORD_MIN} characters."
        ));
    }
    if len > PASSWORD_MAX {
        problems.push(format!(
            "This password is too long. It must contain at most {PASSWORD_MAX} characters."
        ));
    }

    let lowered = password.to_lowercase();
    let user = username.trim().to_lowercase();
    if !user.is_empty() && !lowered.is_empty() && (lowered.contains(&user) || user.contains(&lowered))
    {
        problems.push("The password is too similar to the username.".into());
    }
    if COMMON_PASSWORDS.contains(&lowered.as_str()) {
        problems.push("This password is too common.".into());
    }
    if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
        problems.push("This password is entirely numeric.".into());
    }
    problems
}

/// Validate a `password1`/`password2` pair. Messages land on `password2`.
pub fn clean_password_pair(
    errors: &mut FormErrors,
    password1: Option<&str>,
    password2: Option<&str>,
    username: &str,
) -> Option<String> {
    let password1 = password1.filter(|p| !p.is_empty());
    let password2 = password2.filter(|p| !p.is_empty());
    if password1.is_none() {
        errors.add("password1", REQUIRED);
    }
    if password2.is_none() {
        errors.add("password2", REQUIRED);
    }
    let (password1, password2) = (password1?, password2?);

    if password1 != password2 {
        errors.add("password2", PASSWORD_MISMATCH);
        return None;
    }
    let problems = password_problems(password2, username);
    if problems.is_empty() {
        Some(password2.to_string())
    } else {
        for problem in problems {
            errors.add("password2", problem);
        }
        None
    }
}

/// Only same-site absolute paths are followed after login; anything else goes home.
pub fn safe_next(next: Option<&str>) -> String {
    match next.map(str::trim) {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.contains('\\')
                && !path.chars().any(char::is_control) =>
        {
            path.to_string()
        }
        _ => "/".to_string(),
    }
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LoginQuery {
    /// Path to return to after logging in.
    pub next: Option<String>,
}

/// Context of the login page.
#[derive(Serialize, utoipa::ToSchema)]
pub struct LoginContext {
    #[schema(example = "/dogs/create/")]
    pub next: String,
}

/// Submitted login fields.
#[derive(Deserialize, Default, utoipa::ToSchema)]
pub struct LoginForm {
    #[serde(default, deserialize_with = "scalar")]
    #[schema(example = "alice")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "scalar")]
    #[schema(example = "s3cure_P@ss!")]
    pub password: Option<String>,
    /// Path to return to; ignored unless it is a local path.
    #[serde(default, deserialize_with = "scalar")]
    #[schema(example = "/dogs/create/")]
    pub next: Option<String>,
}

impl LoginForm {
    /// Username and password, both required.
    pub fn clean(&self) -> Result<(String, String), AppError> {
        let mut errors = FormErrors::new();
        let username = self
            .username
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty());
        let password = self.password.as_deref().filter(|p| !p.is_empty());
        if username.is_none() {
            errors.add("username", REQUIRED);
        }
        if password.is_none() {
            errors.add("password", REQUIRED);
        }
        match (username, password) {
            (Some(u), Some(p)) => Ok((u.to_string(), p.to_string())),
            _ => Err(errors.into()),
        }
    }
}

/// Successful login response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    /// JWT bearer token, also set as the session cookie.
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    #[schema(example = "alice")]
    pub username: String,
    /// Where the client should go next.
    #[schema(example = "/dogs/create/")]
    pub next: String,
}
