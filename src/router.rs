use axum::http::{HeaderValue, Method, Uri, header};
use axum::{Router, middleware};
use devcamper_core::AppError;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::middleware::error::error_detail_middleware;
use crate::middleware::rate_limit::rate_limit_middleware;
use crate::middleware::role::require_admin;
use crate::modules::auth::router::init_auth_router;
use crate::modules::bootcamps::router::init_bootcamps_router;
use crate::modules::courses::router::init_courses_router;
use crate::modules::reviews::router::init_reviews_router;
use crate::modules::users::router::init_users_router;
use crate::state::AppState;
use devcamper_config::upload::UPLOADS_ROUTE;

async fn route_not_found(uri: Uri) -> AppError {
    AppError::not_found(format!("Can't find {} on this server!", uri.path()))
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let origin = if state.cors_config.allows_any() {
        // Credentials rule out a literal `*`.
        AllowOrigin::mirror_request()
    } else {
        let allowed_origins: Vec<HeaderValue> = state
            .cors_config
            .allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        AllowOrigin::list(allowed_origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest(
            "/api/v1",
            Router::new()
                .nest("/bootcamps", init_bootcamps_router())
                .nest("/courses", init_courses_router())
                .nest("/reviews", init_reviews_router())
                .nest("/auth", init_auth_router())
                .nest(
                    "/users",
                    init_users_router()
                        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin)),
                ),
        )
        .nest_service(UPLOADS_ROUTE, ServeDir::new(&state.upload_config.path))
        .fallback(route_not_found)
        .with_state(state.clone())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            error_detail_middleware,
        ))
        .layer(cors_layer(&state))
        .layer(middleware::from_fn(logging_middleware))
}
