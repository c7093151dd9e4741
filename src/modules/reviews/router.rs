use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    add_review, delete_review, get_bootcamp_reviews, get_review, get_reviews, update_review,
};

pub fn init_reviews_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_reviews))
        .route("/{id}", get(get_review).put(update_review).delete(delete_review))
}

/// Mounted under `/bootcamps/{bootcampId}/reviews`.
pub fn init_bootcamp_reviews_router() -> Router<AppState> {
    Router::new().route("/", get(get_bootcamp_reviews).post(add_review))
}
