//! Development-mode error detail.
//!
//! [`AppError`](devcamper_core::AppError) always renders the terse
//! `{ success, message }` body and stashes an [`ErrorReport`] on the
//! response. In development this layer swaps the body for one that also
//! carries the error chain and stack.

use axum::{
    Json,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use devcamper_core::errors::ErrorReport;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DetailedErrorBody {
    pub success: bool,
    pub message: String,
    pub error: String,
    pub stack: String,
}

impl From<&ErrorReport> for DetailedErrorBody {
    fn from(report: &ErrorReport) -> Self {
        Self {
            success: false,
            message: report.message.clone(),
            error: report.chain.clone(),
            stack: report.stack.clone(),
        }
    }
}

pub async fn error_detail_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let response = next.run(req).await;

    if !state.environment.is_development() {
        return response;
    }

    match response.extensions().get::<ErrorReport>().cloned() {
        Some(report) => {
            let mut detailed =
                (response.status(), Json(DetailedErrorBody::from(&report))).into_response();
            detailed.extensions_mut().insert(report);
            detailed
        }
        None => response,
    }
}
