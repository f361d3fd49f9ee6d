use axum::Json;
use axum::extract::State;
use axum::response::Redirect;
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::form::AppForm;
use crate::extractors::query::AppQuery;
use crate::models::auth::{LoginContext, LoginForm, LoginQuery, LoginResponse, safe_next};
use crate::repository;
use crate::state::AppState;
use crate::utils::{hash, jwt};

#[utoipa::path(
    get,
    path = "/accounts/login/",
    tag = "Accounts",
    operation_id = "loginForm",
    summary = "Login form",
    params(LoginQuery),
    responses(
        (status = 200, description = "Where to go after logging in", body = LoginContext),
    ),
)]
#[instrument(skip(query))]
pub async fn login_form(AppQuery(query): AppQuery<LoginQuery>) -> Json<LoginContext> {
    Json(LoginContext {
        next: safe_next(query.next.as_deref()),
    })
}

#[utoipa::path(
    post,
    path = "/accounts/login/",
    tag = "Accounts",
    operation_id = "login",
    summary = "Log in",
    description = "Checks the credentials of an active caretaker, sets the session cookie and returns the same token for bearer use.",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 400, description = "Missing username or password (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Wrong credentials or inactive account (INVALID_CREDENTIALS)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, jar, form))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    AppForm(form): AppForm<LoginForm>,
) -> Result<(CookieJar, Json<LoginResponse>), AppError> {
    let (username, password) = form.clean()?;

    let caretaker = repository::caretaker::find_by_username(&state.db, &username)
        .await?
        .filter(|c| c.is_active)
        .ok_or(AppError::InvalidCredentials)?;

    let is_valid = hash::verify_password(&password, &caretaker.password)
        .map_err(|e| AppError::Internal(format!("Password verify error: {}", e)))?;
    if !is_valid {
        tracing::debug!(%username, "Rejected login");
        return Err(AppError::InvalidCredentials);
    }

    let auth = &state.config.auth;
    let token = jwt::sign(caretaker.id, &caretaker.username, &auth.jwt_secret, auth.token_days)
        .map_err(|e| AppError::Internal(format!("JWT sign error: {}", e)))?;
    repository::caretaker::record_login(&state.db, caretaker.id).await?;

    let cookie = Cookie::build((auth.cookie_name.clone(), token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::days(auth.token_days));

    tracing::info!(id = caretaker.id, username = %caretaker.username, "Caretaker logged in");
    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            token,
            username: caretaker.username,
            next: safe_next(form.next.as_deref()),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/accounts/logout/",
    tag = "Accounts",
    operation_id = "logout",
    summary = "Log out",
    description = "Drops the session cookie. Bearer tokens stay valid until they expire.",
    responses(
        (status = 303, description = "Logged out; redirects to `/`"),
    ),
)]
#[instrument(skip(state, jar))]
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    let cookie = Cookie::build((state.config.auth.cookie_name.clone(), "")).path("/");
    (jar.remove(cookie), Redirect::to("/"))
}
