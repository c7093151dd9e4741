use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
};
use devcamper_core::AppError;
use devcamper_core::errors::ErrorBody;
use devcamper_models::{
    Bootcamp, BootcampId, BootcampWithCourses, CreateBootcampDto, DataResponse, Empty,
    ListResponse, UpdateBootcampDto,
};
use serde_json::Value;
use tracing::instrument;

use crate::middleware::role::PublisherOrAdmin;
use crate::query::AdvancedResults;
use crate::state::AppState;
use crate::validator::{ValidatedJson, ValidatedPath};

use super::model::{BootcampResource, PhotoUpload, RadiusResponse};
use super::service::BootcampService;

#[utoipa::path(
    get,
    path = "/api/v1/bootcamps",
    params(
        ("select" = Option<String>, Query, description = "Comma-separated fields to return"),
        ("sort" = Option<String>, Query, description = "Comma-separated sort fields, `-` for descending"),
        ("page" = Option<i64>, Query, description = "Page number (default: 1)"),
        ("limit" = Option<i64>, Query, description = "Items per page (default: 25, max: 100)")
    ),
    responses(
        (status = 200, description = "Paginated list of bootcamps with their courses", body = ListResponse<BootcampWithCourses>),
        (status = 400, description = "Invalid query", body = ErrorBody)
    ),
    tag = "Bootcamps"
)]
pub async fn get_bootcamps(
    results: AdvancedResults<BootcampResource>,
) -> Json<ListResponse<Value>> {
    Json(results.into_inner())
}

#[utoipa::path(
    get,
    path = "/api/v1/bootcamps/{bootcampId}",
    params(("bootcampId" = String, Path, description = "Bootcamp ID")),
    responses(
        (status = 200, description = "Bootcamp details", body = DataResponse<Bootcamp>),
        (status = 400, description = "Invalid id", body = ErrorBody),
        (status = 404, description = "Bootcamp not found", body = ErrorBody)
    ),
    tag = "Bootcamps"
)]
#[instrument(skip(state))]
pub async fn get_bootcamp(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<BootcampId>,
) -> Result<Json<DataResponse<Bootcamp>>, AppError> {
    let bootcamp = BootcampService::find_by_id(&state.db, id).await?;
    Ok(Json(DataResponse::new(bootcamp)))
}

#[utoipa::path(
    get,
    path = "/api/v1/bootcamps/radius/{zipcode}/{distance}",
    params(
        ("zipcode" = String, Path, description = "Zipcode at the center of the search"),
        ("distance" = f64, Path, description = "Search radius in miles")
    ),
    responses(
        (status = 200, description = "Bootcamps within the radius", body = RadiusResponse),
        (status = 400, description = "Invalid distance or unknown zipcode", body = ErrorBody)
    ),
    tag = "Bootcamps"
)]
#[instrument(skip(state))]
pub async fn get_bootcamps_in_radius(
    State(state): State<AppState>,
    ValidatedPath((zipcode, distance)): ValidatedPath<(String, f64)>,
) -> Result<Json<RadiusResponse>, AppError> {
    if !distance.is_finite() || distance < 0.0 {
        return Err(AppError::bad_request(
            "Distance must be a non-negative number of miles",
        ));
    }

    let bootcamps =
        BootcampService::list_by_radius(&state.db, state.geocoder.as_ref(), &zipcode, distance)
            .await?;
    Ok(Json(RadiusResponse::new(bootcamps)))
}

#[utoipa::path(
    post,
    path = "/api/v1/bootcamps",
    request_body = CreateBootcampDto,
    responses(
        (status = 201, description = "Bootcamp created", body = DataResponse<Bootcamp>),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Role not allowed", body = ErrorBody),
        (status = 409, description = "Publisher already owns a bootcamp, or duplicate name", body = ErrorBody)
    ),
    tag = "Bootcamps",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, user, dto))]
pub async fn create_bootcamp(
    State(state): State<AppState>,
    PublisherOrAdmin(user): PublisherOrAdmin,
    ValidatedJson(dto): ValidatedJson<CreateBootcampDto>,
) -> Result<(StatusCode, Json<DataResponse<Bootcamp>>), AppError> {
    let bootcamp =
        BootcampService::create_bootcamp(&state.db, state.geocoder.as_ref(), &user, dto).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(bootcamp))))
}

#[utoipa::path(
    put,
    path = "/api/v1/bootcamps/{bootcampId}",
    params(("bootcampId" = String, Path, description = "Bootcamp ID")),
    request_body = UpdateBootcampDto,
    responses(
        (status = 200, description = "Bootcamp updated", body = DataResponse<Bootcamp>),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "Bootcamp not found", body = ErrorBody)
    ),
    tag = "Bootcamps",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, user, dto))]
pub async fn update_bootcamp(
    State(state): State<AppState>,
    PublisherOrAdmin(user): PublisherOrAdmin,
    ValidatedPath(id): ValidatedPath<BootcampId>,
    ValidatedJson(dto): ValidatedJson<UpdateBootcampDto>,
) -> Result<Json<DataResponse<Bootcamp>>, AppError> {
    let bootcamp =
        BootcampService::update_bootcamp(&state.db, state.geocoder.as_ref(), id, &user, dto)
            .await?;
    Ok(Json(DataResponse::new(bootcamp)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/bootcamps/{bootcampId}",
    params(("bootcampId" = String, Path, description = "Bootcamp ID")),
    responses(
        (status = 200, description = "Bootcamp, its courses and reviews deleted", body = DataResponse<Empty>),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "Bootcamp not found", body = ErrorBody)
    ),
    tag = "Bootcamps",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, user))]
pub async fn delete_bootcamp(
    State(state): State<AppState>,
    PublisherOrAdmin(user): PublisherOrAdmin,
    ValidatedPath(id): ValidatedPath<BootcampId>,
) -> Result<Json<DataResponse<Empty>>, AppError> {
    BootcampService::delete_bootcamp(&state.db, state.file_storage.as_ref(), id, &user).await?;
    Ok(Json(DataResponse::new(Empty {})))
}

#[utoipa::path(
    put,
    path = "/api/v1/bootcamps/{bootcampId}/photo",
    params(("bootcampId" = String, Path, description = "Bootcamp ID")),
    request_body(content_type = "multipart/form-data", description = "A single image file"),
    responses(
        (status = 200, description = "Stored file name", body = DataResponse<String>),
        (status = 400, description = "Missing, non-image or oversized file", body = ErrorBody),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "Bootcamp not found", body = ErrorBody),
        (status = 500, description = "Problem with file upload", body = ErrorBody)
    ),
    tag = "Bootcamps",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, user, multipart))]
pub async fn upload_bootcamp_photo(
    State(state): State<AppState>,
    PublisherOrAdmin(user): PublisherOrAdmin,
    ValidatedPath(id): ValidatedPath<BootcampId>,
    multipart: Multipart,
) -> Result<Json<DataResponse<String>>, AppError> {
    let bootcamp =
        BootcampService::find_owned(&state.db, id, &user, "update this bootcamp").await?;

    let max_size = state.upload_config.max_size;
    let upload = read_photo(multipart, max_size).await?;

    let file_name = BootcampService::upload_photo(
        &state.db,
        state.image_processor.as_ref(),
        state.file_storage.as_ref(),
        &bootcamp,
        upload,
        max_size,
    )
    .await?;

    Ok(Json(DataResponse::new(file_name)))
}

/// Reads the single file field of a photo upload. Streaming stops as soon
/// as the file exceeds `max_size`.
async fn read_photo(mut multipart: Multipart, max_size: usize) -> Result<PhotoUpload, AppError> {
    let mut upload: Option<PhotoUpload> = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(e.body_text()))?
    {
        if field.file_name().is_none() {
            continue;
        }
        if upload.is_some() {
            return Err(AppError::bad_request("Please upload a single file"));
        }

        let mut photo = PhotoUpload {
            file_name: field.file_name().map(str::to_string),
            content_type: field.content_type().map(str::to_string),
            bytes: Vec::new(),
        };
        if !photo.is_image() {
            return Err(AppError::bad_request("Please upload an image file"));
        }

        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| AppError::bad_request(e.body_text()))?
        {
            photo.bytes.extend_from_slice(&chunk);
            if photo.bytes.len() > max_size {
                return Err(AppError::bad_request(format!(
                    "Please upload an image less than {} bytes",
                    max_size
                )));
            }
        }

        upload = Some(photo);
    }

    upload.ok_or_else(|| AppError::bad_request("Please upload a file"))
}
