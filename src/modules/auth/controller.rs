use axum::{
    Json,
    extract::State,
    http::{HeaderMap, header},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use devcamper_core::AppError;
use devcamper_core::errors::ErrorBody;
use devcamper_models::{
    DataResponse, Empty, ForgotPasswordDto, ForgotPasswordResponse, LoginDto, RegisterDto,
    ResetPasswordDto, TokenResponse, UpdateDetailsDto, UpdatePasswordDto, User,
};
use tracing::instrument;

use crate::middleware::auth::{CurrentUser, TOKEN_COOKIE};
use crate::state::AppState;
use crate::validator::{ValidatedJson, ValidatedPath};

use super::service::AuthService;

/// Seconds the `none` cookie set on logout lives.
const LOGOUT_COOKIE_SECS: i64 = 10;

fn token_cookie(value: String, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, value))
        .http_only(true)
        .path("/")
        .secure(secure)
        .max_age(time::Duration::seconds(max_age_secs))
        .build()
}

/// `{ success, token }` plus the matching `token` cookie.
fn token_response(
    state: &AppState,
    jar: CookieJar,
    user: &User,
) -> Result<(CookieJar, Json<TokenResponse>), AppError> {
    let token = AuthService::issue_token(user, &state.jwt_config)?;
    let cookie = token_cookie(
        token.clone(),
        state.jwt_config.cookie_max_age_secs(),
        state.environment.is_production(),
    );

    Ok((
        jar.add(cookie),
        Json(TokenResponse {
            success: true,
            token,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterDto,
    responses(
        (status = 200, description = "Registered; token issued", body = TokenResponse),
        (status = 400, description = "Validation error or admin role requested", body = ErrorBody),
        (status = 409, description = "Email already registered", body = ErrorBody)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, jar, dto))]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(dto): ValidatedJson<RegisterDto>,
) -> Result<(CookieJar, Json<TokenResponse>), AppError> {
    let user = AuthService::register(&state.db, dto).await?;
    token_response(&state, jar, &user)
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginDto,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Missing email or password", body = ErrorBody),
        (status = 401, description = "Invalid credentials", body = ErrorBody)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, jar, dto))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(dto): ValidatedJson<LoginDto>,
) -> Result<(CookieJar, Json<TokenResponse>), AppError> {
    let user = AuthService::login(&state.db, dto).await?;
    token_response(&state, jar, &user)
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/logout",
    responses(
        (status = 200, description = "Token cookie cleared", body = DataResponse<Empty>)
    ),
    tag = "Authentication"
)]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<DataResponse<Empty>>) {
    let cookie = token_cookie(
        "none".to_string(),
        LOGOUT_COOKIE_SECS,
        state.environment.is_production(),
    );
    (jar.add(cookie), Json(DataResponse::new(Empty {})))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "The logged in user", body = DataResponse<User>),
        (status = 401, description = "Unauthorized", body = ErrorBody)
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
pub async fn get_me(CurrentUser(user): CurrentUser) -> Json<DataResponse<User>> {
    Json(DataResponse::new(user))
}

#[utoipa::path(
    put,
    path = "/api/v1/auth/updatedetails",
    request_body = UpdateDetailsDto,
    responses(
        (status = 200, description = "Details updated", body = DataResponse<User>),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 409, description = "Email already registered", body = ErrorBody)
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, user, dto), fields(user.id = %user.id))]
pub async fn update_details(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(dto): ValidatedJson<UpdateDetailsDto>,
) -> Result<Json<DataResponse<User>>, AppError> {
    let user = AuthService::update_details(&state.db, user.id, dto).await?;
    Ok(Json(DataResponse::new(user)))
}

#[utoipa::path(
    put,
    path = "/api/v1/auth/updatepassword",
    request_body = UpdatePasswordDto,
    responses(
        (status = 200, description = "Password changed; new token issued", body = TokenResponse),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 401, description = "Current password is incorrect", body = ErrorBody)
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, user, jar, dto), fields(user.id = %user.id))]
pub async fn update_password(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    jar: CookieJar,
    ValidatedJson(dto): ValidatedJson<UpdatePasswordDto>,
) -> Result<(CookieJar, Json<TokenResponse>), AppError> {
    let user = AuthService::update_password(&state.db, &user, dto).await?;
    token_response(&state, jar, &user)
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/forgotpassword",
    request_body = ForgotPasswordDto,
    responses(
        (status = 200, description = "Reset token issued; the URL is returned in development", body = ForgotPasswordResponse),
        (status = 404, description = "No user with that email", body = ErrorBody)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, headers, dto))]
pub async fn forgot_password(
    State(state): State<AppState>,
    headers: HeaderMap,
    ValidatedJson(dto): ValidatedJson<ForgotPasswordDto>,
) -> Result<Json<ForgotPasswordResponse>, AppError> {
    let raw_token = AuthService::forgot_password(&state.db, &dto.email).await?;

    let reset_url = state.environment.is_development().then(|| {
        let host = headers
            .get(header::HOST)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("localhost");
        format!("http://{}/api/v1/auth/resetpassword/{}", host, raw_token)
    });

    Ok(Json(ForgotPasswordResponse {
        success: true,
        data: "Password reset token issued".to_string(),
        reset_url,
    }))
}

#[utoipa::path(
    put,
    path = "/api/v1/auth/resetpassword/{resettoken}",
    params(("resettoken" = String, Path, description = "Raw reset token")),
    request_body = ResetPasswordDto,
    responses(
        (status = 200, description = "Password reset; token issued", body = TokenResponse),
        (status = 400, description = "Invalid or expired token", body = ErrorBody)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, jar, reset_token, dto))]
pub async fn reset_password(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedPath(reset_token): ValidatedPath<String>,
    ValidatedJson(dto): ValidatedJson<ResetPasswordDto>,
) -> Result<(CookieJar, Json<TokenResponse>), AppError> {
    let user = AuthService::reset_password(&state.db, &reset_token, dto).await?;
    token_response(&state, jar, &user)
}
