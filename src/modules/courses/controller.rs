use axum::{Json, extract::State};
use devcamper_core::AppError;
use devcamper_core::errors::ErrorBody;
use devcamper_models::{
    BootcampId, Course, CourseId, CreateCourseDto, DataResponse, Empty, ListResponse,
    UpdateCourseDto,
};
use serde_json::Value;
use tracing::instrument;

use crate::middleware::role::PublisherOrAdmin;
use crate::query::AdvancedResults;
use crate::state::AppState;
use crate::validator::{ValidatedJson, ValidatedPath};

use super::model::CourseResource;
use super::service::CourseService;

#[utoipa::path(
    get,
    path = "/api/v1/courses",
    responses(
        (status = 200, description = "Paginated list of courses with their bootcamp", body = ListResponse<Course>),
        (status = 400, description = "Invalid query", body = ErrorBody)
    ),
    tag = "Courses"
)]
pub async fn get_courses(results: AdvancedResults<CourseResource>) -> Json<ListResponse<Value>> {
    Json(results.into_inner())
}

#[utoipa::path(
    get,
    path = "/api/v1/bootcamps/{bootcampId}/courses",
    params(("bootcampId" = String, Path, description = "Bootcamp ID")),
    responses(
        (status = 200, description = "Courses of one bootcamp", body = ListResponse<Course>),
        (status = 400, description = "Invalid query or id", body = ErrorBody)
    ),
    tag = "Courses"
)]
pub async fn get_bootcamp_courses(
    results: AdvancedResults<CourseResource>,
) -> Json<ListResponse<Value>> {
    Json(results.into_inner())
}

#[utoipa::path(
    get,
    path = "/api/v1/courses/{id}",
    params(("id" = String, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course with its bootcamp", body = DataResponse<Course>),
        (status = 404, description = "Course not found", body = ErrorBody)
    ),
    tag = "Courses"
)]
#[instrument(skip(state))]
pub async fn get_course(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<CourseId>,
) -> Result<Json<DataResponse<Value>>, AppError> {
    let course = CourseService::get_course(&state.db, id).await?;
    Ok(Json(DataResponse::new(course)))
}

#[utoipa::path(
    post,
    path = "/api/v1/bootcamps/{bootcampId}/courses",
    params(("bootcampId" = String, Path, description = "Bootcamp ID")),
    request_body = CreateCourseDto,
    responses(
        (status = 200, description = "Course created", body = DataResponse<Course>),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Not the bootcamp owner", body = ErrorBody),
        (status = 404, description = "Bootcamp not found", body = ErrorBody)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, user, dto))]
pub async fn add_course(
    State(state): State<AppState>,
    PublisherOrAdmin(user): PublisherOrAdmin,
    ValidatedPath(bootcamp_id): ValidatedPath<BootcampId>,
    ValidatedJson(dto): ValidatedJson<CreateCourseDto>,
) -> Result<Json<DataResponse<Course>>, AppError> {
    let course = CourseService::create_course(&state.db, bootcamp_id, &user, dto).await?;
    Ok(Json(DataResponse::new(course)))
}

#[utoipa::path(
    put,
    path = "/api/v1/courses/{id}",
    params(("id" = String, Path, description = "Course ID")),
    request_body = UpdateCourseDto,
    responses(
        (status = 200, description = "Course updated", body = DataResponse<Course>),
        (status = 403, description = "Not the course owner", body = ErrorBody),
        (status = 404, description = "Course not found", body = ErrorBody)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, user, dto))]
pub async fn update_course(
    State(state): State<AppState>,
    PublisherOrAdmin(user): PublisherOrAdmin,
    ValidatedPath(id): ValidatedPath<CourseId>,
    ValidatedJson(dto): ValidatedJson<UpdateCourseDto>,
) -> Result<Json<DataResponse<Course>>, AppError> {
    let course = CourseService::update_course(&state.db, id, &user, dto).await?;
    Ok(Json(DataResponse::new(course)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/courses/{id}",
    params(("id" = String, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course deleted", body = DataResponse<Empty>),
        (status = 403, description = "Not the course owner", body = ErrorBody),
        (status = 404, description = "Course not found", body = ErrorBody)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, user))]
pub async fn delete_course(
    State(state): State<AppState>,
    PublisherOrAdmin(user): PublisherOrAdmin,
    ValidatedPath(id): ValidatedPath<CourseId>,
) -> Result<Json<DataResponse<Empty>>, AppError> {
    CourseService::delete_course(&state.db, id, &user).await?;
    Ok(Json(DataResponse::new(Empty {})))
}
