use axum::{Json, extract::State, http::StatusCode};
use devcamper_core::AppError;
use devcamper_core::errors::ErrorBody;
use devcamper_models::{CreateUserDto, DataResponse, Empty, ListResponse, UpdateUserDto, User, UserId};
use serde_json::Value;
use tracing::instrument;

use crate::query::AdvancedResults;
use crate::state::AppState;
use crate::validator::{ValidatedJson, ValidatedPath};

use super::model::UserResource;
use super::service::{NewUser, UserService};

#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Paginated list of users", body = ListResponse<User>),
        (status = 400, description = "Invalid query", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Forbidden - admin only", body = ErrorBody)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
pub async fn get_users(results: AdvancedResults<UserResource>) -> Json<ListResponse<Value>> {
    Json(results.into_inner())
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = DataResponse<User>),
        (status = 404, description = "User not found", body = ErrorBody)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<UserId>,
) -> Result<Json<DataResponse<User>>, AppError> {
    let user = UserService::get_user(&state.db, id).await?;
    Ok(Json(DataResponse::new(user)))
}

#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "User created", body = DataResponse<User>),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 409, description = "Email already registered", body = ErrorBody)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateUserDto>,
) -> Result<(StatusCode, Json<DataResponse<User>>), AppError> {
    let user = UserService::create_user(
        &state.db,
        NewUser {
            name: dto.name,
            email: dto.email,
            password: dto.password,
            role: dto.role.unwrap_or_default(),
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(DataResponse::new(user))))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User ID")),
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "User updated", body = DataResponse<User>),
        (status = 404, description = "User not found", body = ErrorBody),
        (status = 409, description = "Email taken, or demoted owner of several bootcamps", body = ErrorBody)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_user(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<UserId>,
    ValidatedJson(dto): ValidatedJson<UpdateUserDto>,
) -> Result<Json<DataResponse<User>>, AppError> {
    let user = UserService::update_user(&state.db, id, dto).await?;
    Ok(Json(DataResponse::new(user)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = DataResponse<Empty>),
        (status = 404, description = "User not found", body = ErrorBody)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<UserId>,
) -> Result<Json<DataResponse<Empty>>, AppError> {
    UserService::delete_user(&state.db, id).await?;
    Ok(Json(DataResponse::new(Empty {})))
}
