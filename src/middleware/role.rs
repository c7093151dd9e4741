//! Role gates.
//!
//! Two forms, as with the token gate:
//!
//! 1. [`require_roles`] as a route layer, for routers where every route
//!    shares one policy (see [`require_admin`]);
//! 2. extractors generated by [`require_roles!`](crate::require_roles) for
//!    routers that mix public reads with restricted writes.
//!
//! Both authenticate first, so a missing token is 401 and a wrong role 403.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use devcamper_core::AppError;
use devcamper_models::{Role, User};

use crate::middleware::auth::CurrentUser;
use crate::state::AppState;

pub fn authorize(user: &User, allowed: &[Role]) -> Result<(), AppError> {
    if allowed.contains(&user.role) {
        return Ok(());
    }

    Err(AppError::forbidden(format!(
        "User role {} is not authorized to access this route",
        user.role
    )))
}

/// Layer body: authenticates, checks the role and leaves the user in the
/// request extensions for [`CurrentUser`].
pub async fn require_roles(
    State(state): State<AppState>,
    req: Request,
    next: Next,
    allowed: &'static [Role],
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let CurrentUser(user) = CurrentUser::from_request_parts(&mut parts, &state).await?;
    authorize(&user, allowed)?;

    Ok(next.run(Request::from_parts(parts, body)).await)
}

pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(State(state), req, next, &[Role::Admin]).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// Declares an extractor that yields the signed-in user when their role is
/// one of the listed roles.
#[macro_export]
macro_rules! require_roles {
    ($name:ident, [$($role:expr),+ $(,)?]) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub devcamper_models::User);

        impl $name {
            pub const ROLES: &'static [devcamper_models::Role] = &[$($role),+];
        }

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = devcamper_core::AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let $crate::middleware::auth::CurrentUser(user) = <$crate::middleware::auth::CurrentUser as axum::extract::FromRequestParts<
                    $crate::state::AppState,
                >>::from_request_parts(parts, state)
                .await?;
                $crate::middleware::role::authorize(&user, Self::ROLES)?;
                Ok($name(user))
            }
        }
    };
}

require_roles!(PublisherOrAdmin, [Role::Publisher, Role::Admin]);
require_roles!(UserOrAdmin, [Role::User, Role::Admin]);

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use devcamper_models::UserId;

    fn user(role: Role) -> User {
        User {
            id: UserId::new(),
            name: "Jane".to_string(),
            email: "jane@gmail.com".to_string(),
            role,
            avatar: None,
            password_hash: String::new(),
            password_changed_at: None,
            reset_password_token: None,
            reset_password_expire: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_authorize_allows_listed_role() {
        assert!(authorize(&user(Role::Publisher), PublisherOrAdmin::ROLES).is_ok());
        assert!(authorize(&user(Role::Admin), UserOrAdmin::ROLES).is_ok());
    }

    #[test]
    fn test_authorize_rejects_other_roles() {
        let err = authorize(&user(Role::User), PublisherOrAdmin::ROLES).unwrap_err();
        assert_eq!(err.status.as_u16(), 403);
        assert_eq!(
            err.message(),
            "User role user is not authorized to access this route"
        );

        let err = authorize(&user(Role::Publisher), UserOrAdmin::ROLES).unwrap_err();
        assert_eq!(
            err.message(),
            "User role publisher is not authorized to access this route"
        );
    }
}
