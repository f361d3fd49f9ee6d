use axum::extract::{FromRequestParts, OriginalUri};
use axum::http::{header, request::Parts};
use axum_extra::extract::CookieJar;
use sea_orm::EntityTrait;

use crate::entity::caretaker;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt;

/// A logged-in caretaker, as stored when the request arrived.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i32,
    pub username: String,
    pub is_staff: bool,
    pub is_superuser: bool,
}

/// Whoever sent the request, logged in or anonymous.
///
/// The session token comes from `Authorization: Bearer <token>` or the
/// session cookie. A missing, expired or forged token, or one naming a
/// deleted or inactive caretaker, yields an anonymous actor. Access checks
/// happen via `require_login()` / `require_staff()` in the handler body.
#[derive(Debug)]
pub struct Actor {
    pub user: Option<AuthUser>,
    /// Path and query of the request, used as `next` on the login redirect.
    path: String,
    login_url: String,
}

impl Actor {
    pub fn anonymous(path: impl Into<String>, login_url: impl Into<String>) -> Self {
        Self {
            user: None,
            path: path.into(),
            login_url: login_url.into(),
        }
    }

    /// The logged-in caretaker, or a redirect to the login page.
    pub fn require_login(&self) -> Result<&AuthUser, AppError> {
        self.user.as_ref().ok_or_else(|| AppError::LoginRequired {
            login_url: self.login_url.clone(),
            next: self.path.clone(),
        })
    }

    /// Like `require_login()`, but the caretaker must also be staff.
    pub fn require_staff(&self) -> Result<&AuthUser, AppError> {
        let user = self.require_login()?;
        if user.is_staff {
            Ok(user)
        } else {
            Err(AppError::PermissionDenied)
        }
    }
}

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
}

impl FromRequestParts<AppState> for Actor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let uri = parts
            .extensions
            .get::<OriginalUri>()
            .map(|o| &o.0)
            .unwrap_or(&parts.uri);
        let path = uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| uri.path().to_string());

        let auth = &state.config.auth;
        let mut actor = Actor::anonymous(path, auth.login_url.as_str());

        let token = bearer_token(parts).or_else(|| {
            CookieJar::from_headers(&parts.headers)
                .get(&auth.cookie_name)
                .map(|c| c.value().to_string())
        });
        let Some(token) = token else {
            return Ok(actor);
        };
        let claims = match jwt::verify(&token, &auth.jwt_secret) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!("Ignoring session token: {}", e);
                return Ok(actor);
            }
        };

        actor.user = caretaker::Entity::find_by_id(claims.uid)
            .one(&state.db)
            .await?
            .filter(|c| c.is_active && c.username == claims.sub)
            .map(|c| AuthUser {
                id: c.id,
                username: c.username,
                is_staff: c.is_staff,
                is_superuser: c.is_superuser,
            });

        Ok(actor)
    }
}
