//! Request body and path extractors that answer with [`AppError`] instead
//! of axum's plain-text rejections.

use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts, Path, RawPathParams, Request,
        path::ErrorKind,
        rejection::{JsonRejection, PathRejection},
    },
    http::request::Parts,
};
use devcamper_core::AppError;
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON body that has passed its `validator` rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
        return AppError::bad_request("Missing 'Content-Type: application/json' header");
    }

    let error_msg = rejection.body_text();

    if let Some(field) = error_msg
        .split("missing field `")
        .nth(1)
        .and_then(|rest| rest.split('`').next())
    {
        return AppError::bad_request(format!("{} is required", field));
    }

    if error_msg.contains("unknown variant") {
        if let Some(detail) = error_msg.split(": ").last() {
            return AppError::bad_request(format!("Invalid value: {}", detail));
        }
    }

    if error_msg.contains("invalid type") {
        return AppError::bad_request("Invalid field type in request");
    }

    AppError::bad_request("Invalid request body")
}

/// Path parameters. A value that does not parse (a malformed id, say)
/// yields 400 `Invalid <param>: <value>`.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(ValidatedPath(value)),
            Err(rejection) => {
                let raw = RawPathParams::from_request_parts(parts, state).await.ok();
                Err(path_rejection(rejection, raw.as_ref()))
            }
        }
    }
}

fn path_rejection(rejection: PathRejection, raw: Option<&RawPathParams>) -> AppError {
    let PathRejection::FailedToDeserializePathParams(err) = &rejection else {
        return AppError::unexpected(anyhow::anyhow!(rejection.body_text()));
    };

    let (key, value) = match err.kind() {
        ErrorKind::ParseErrorAtKey { key, value, .. }
        | ErrorKind::DeserializeError { key, value, .. } => (Some(key.clone()), value.clone()),
        ErrorKind::ParseErrorAtIndex { value, .. } | ErrorKind::ParseError { value, .. } => {
            (None, value.clone())
        }
        // Custom deserializers (uuid among them) only report a message.
        _ => match raw.map(|params| params.iter().collect::<Vec<_>>()).as_deref() {
            Some([(key, value)]) => (Some(key.to_string()), value.to_string()),
            _ => return AppError::bad_request(err.body_text()),
        },
    };

    let key = key
        .or_else(|| {
            raw.and_then(|params| {
                params
                    .iter()
                    .find(|(_, raw_value)| *raw_value == value)
                    .map(|(name, _)| name.to_string())
            })
        })
        .unwrap_or_else(|| "id".to_string());

    AppError::bad_request(format!("Invalid {}: {}", key, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::StatusCode, routing::get};
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use uuid::Uuid;

    async fn by_id(ValidatedPath(id): ValidatedPath<Uuid>) -> String {
        id.to_string()
    }

    async fn radius(ValidatedPath((zipcode, distance)): ValidatedPath<(String, f64)>) -> String {
        format!("{zipcode}:{distance}")
    }

    async fn call(uri: &str) -> (StatusCode, String) {
        let app = Router::new()
            .route("/things/{id}", get(by_id))
            .route("/radius/{zipcode}/{distance}", get(radius));
        let response = app
            .oneshot(axum::http::Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_malformed_uuid_is_bad_request() {
        let (status, body) = call("/things/not-a-uuid").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("Invalid id: not-a-uuid"), "{body}");
    }

    #[tokio::test]
    async fn test_malformed_distance_names_the_param() {
        let (status, body) = call("/radius/02118/far").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("Invalid distance: far"), "{body}");
    }

    #[tokio::test]
    async fn test_valid_path_passes() {
        let (status, body) = call("/radius/02118/10").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "02118:10");
    }
}
