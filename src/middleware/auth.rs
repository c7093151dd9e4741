//! Token gate.
//!
//! A request is authenticated by a token taken from `Authorization: Bearer`
//! or, failing that, the `token` cookie. The user is reloaded on every
//! request so deleted accounts and password changes take effect at once.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use axum_extra::extract::cookie::CookieJar;
use devcamper_auth::{TokenError, verify_token};
use devcamper_core::AppError;
use devcamper_models::{User, UserId};
use tracing::debug;

use crate::modules::users::service::UserService;
use crate::state::AppState;

pub const TOKEN_COOKIE: &str = "token";

pub const MISSING_TOKEN_MESSAGE: &str = "Not authorized to access this route";
pub const USER_GONE_MESSAGE: &str = "The user belonging to this token no longer exists.";
pub const PASSWORD_CHANGED_MESSAGE: &str = "User recently changed password! Please log in again.";

/// Token from the bearer header, else from the cookie. A logged-out
/// cookie (`none`) counts as absent.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());

    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    CookieJar::from_headers(headers)
        .get(TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty() && token != "none")
}

/// Verifies `token` and loads the user it was issued to.
pub async fn authenticate(state: &AppState, token: &str) -> Result<User, AppError> {
    let claims = verify_token(token, &state.jwt_config)?;
    let user_id: UserId = claims.sub.parse().map_err(|_| TokenError::Invalid)?;

    let user = UserService::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::unauthorized(USER_GONE_MESSAGE))?;

    if user.changed_password_after(claims.iat) {
        debug!(user.id = %user.id, "Rejected token issued before password change");
        return Err(AppError::unauthorized(PASSWORD_CHANGED_MESSAGE));
    }

    Ok(user)
}

/// The signed-in user.
///
/// Reuses the user a role layer already loaded for this request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(current) = parts.extensions.get::<CurrentUser>() {
            return Ok(current.clone());
        }

        let token = extract_token(&parts.headers)
            .ok_or_else(|| AppError::unauthorized(MISSING_TOKEN_MESSAGE))?;
        let user = authenticate(state, &token).await?;

        let current = CurrentUser(user);
        parts.extensions.insert(current.clone());
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_takes_precedence_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        headers.insert(header::COOKIE, HeaderValue::from_static("token=from.cookie.jwt"));
        assert_eq!(extract_token(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_cookie_is_used_without_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark; token=from.cookie.jwt"));
        assert_eq!(extract_token(&headers).as_deref(), Some("from.cookie.jwt"));
    }

    #[test]
    fn test_missing_or_cleared_token() {
        assert_eq!(extract_token(&HeaderMap::new()), None);

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("token=none"));
        assert_eq!(extract_token(&headers), None);

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        assert_eq!(extract_token(&headers), None);
    }
}
