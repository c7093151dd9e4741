use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, put},
};

use crate::modules::courses::router::init_bootcamp_courses_router;
use crate::modules::reviews::router::init_bootcamp_reviews_router;
use crate::state::AppState;

use super::controller::{
    create_bootcamp, delete_bootcamp, get_bootcamp, get_bootcamps, get_bootcamps_in_radius,
    update_bootcamp, upload_bootcamp_photo,
};

pub fn init_bootcamps_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_bootcamps).post(create_bootcamp))
        .route("/radius/{zipcode}/{distance}", get(get_bootcamps_in_radius))
        .route(
            "/{bootcampId}",
            get(get_bootcamp).put(update_bootcamp).delete(delete_bootcamp),
        )
        // The upload handler enforces MAX_FILE_UPLOAD while streaming.
        .route(
            "/{bootcampId}/photo",
            put(upload_bootcamp_photo).layer(DefaultBodyLimit::disable()),
        )
        .nest("/{bootcampId}/courses", init_bootcamp_courses_router())
        .nest("/{bootcampId}/reviews", init_bootcamp_reviews_router())
}
