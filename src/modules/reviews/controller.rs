use axum::{Json, extract::State, http::StatusCode};
use devcamper_core::AppError;
use devcamper_core::errors::ErrorBody;
use devcamper_models::{
    BootcampId, CreateReviewDto, DataResponse, Empty, ListResponse, Review, ReviewId,
    UpdateReviewDto,
};
use serde_json::Value;
use tracing::instrument;

use crate::middleware::role::UserOrAdmin;
use crate::query::AdvancedResults;
use crate::state::AppState;
use crate::validator::{ValidatedJson, ValidatedPath};

use super::model::ReviewResource;
use super::service::ReviewService;

#[utoipa::path(
    get,
    path = "/api/v1/reviews",
    responses(
        (status = 200, description = "Paginated list of reviews with their bootcamp", body = ListResponse<Review>),
        (status = 400, description = "Invalid query", body = ErrorBody)
    ),
    tag = "Reviews"
)]
pub async fn get_reviews(results: AdvancedResults<ReviewResource>) -> Json<ListResponse<Value>> {
    Json(results.into_inner())
}

#[utoipa::path(
    get,
    path = "/api/v1/bootcamps/{bootcampId}/reviews",
    params(("bootcampId" = String, Path, description = "Bootcamp ID")),
    responses(
        (status = 200, description = "Reviews of one bootcamp", body = ListResponse<Review>),
        (status = 400, description = "Invalid query or id", body = ErrorBody)
    ),
    tag = "Reviews"
)]
pub async fn get_bootcamp_reviews(
    results: AdvancedResults<ReviewResource>,
) -> Json<ListResponse<Value>> {
    Json(results.into_inner())
}

#[utoipa::path(
    get,
    path = "/api/v1/reviews/{id}",
    params(("id" = String, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review with its bootcamp", body = DataResponse<Review>),
        (status = 404, description = "Review not found", body = ErrorBody)
    ),
    tag = "Reviews"
)]
#[instrument(skip(state))]
pub async fn get_review(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<ReviewId>,
) -> Result<Json<DataResponse<Value>>, AppError> {
    let review = ReviewService::get_review(&state.db, id).await?;
    Ok(Json(DataResponse::new(review)))
}

#[utoipa::path(
    post,
    path = "/api/v1/bootcamps/{bootcampId}/reviews",
    params(("bootcampId" = String, Path, description = "Bootcamp ID")),
    request_body = CreateReviewDto,
    responses(
        (status = 201, description = "Review created", body = DataResponse<Review>),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Bootcamp not found", body = ErrorBody),
        (status = 409, description = "Already reviewed", body = ErrorBody)
    ),
    tag = "Reviews",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, user, dto))]
pub async fn add_review(
    State(state): State<AppState>,
    UserOrAdmin(user): UserOrAdmin,
    ValidatedPath(bootcamp_id): ValidatedPath<BootcampId>,
    ValidatedJson(dto): ValidatedJson<CreateReviewDto>,
) -> Result<(StatusCode, Json<DataResponse<Review>>), AppError> {
    let review = ReviewService::create_review(&state.db, bootcamp_id, &user, dto).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(review))))
}

#[utoipa::path(
    put,
    path = "/api/v1/reviews/{id}",
    params(("id" = String, Path, description = "Review ID")),
    request_body = UpdateReviewDto,
    responses(
        (status = 200, description = "Review updated", body = DataResponse<Review>),
        (status = 403, description = "Not the author", body = ErrorBody),
        (status = 404, description = "Review not found", body = ErrorBody)
    ),
    tag = "Reviews",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, user, dto))]
pub async fn update_review(
    State(state): State<AppState>,
    UserOrAdmin(user): UserOrAdmin,
    ValidatedPath(id): ValidatedPath<ReviewId>,
    ValidatedJson(dto): ValidatedJson<UpdateReviewDto>,
) -> Result<Json<DataResponse<Review>>, AppError> {
    let review = ReviewService::update_review(&state.db, id, &user, dto).await?;
    Ok(Json(DataResponse::new(review)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/reviews/{id}",
    params(("id" = String, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review deleted", body = DataResponse<Empty>),
        (status = 403, description = "Not the author", body = ErrorBody),
        (status = 404, description = "Review not found", body = ErrorBody)
    ),
    tag = "Reviews",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, user))]
pub async fn delete_review(
    State(state): State<AppState>,
    UserOrAdmin(user): UserOrAdmin,
    ValidatedPath(id): ValidatedPath<ReviewId>,
) -> Result<Json<DataResponse<Empty>>, AppError> {
    ReviewService::delete_review(&state.db, id, &user).await?;
    Ok(Json(DataResponse::new(Empty {})))
}
