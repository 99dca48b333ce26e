use axum::{
    http::StatusCode,
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};
use tracing::Level;

use crate::{access_log, cors, errors::ApiError, identity, state::AppState};

pub mod customers;

async fn not_found() -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, "Not Found")
}

/// Build the application router.
///
/// Layers, outermost first: tracing span, access log, CORS (answers preflight),
/// identification (403 for unidentified callers on every path, routed or not).
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/add", post(customers::add_customer))
        .route("/customers", get(customers::list_customers))
        .route("/customer/:id", get(customers::show_customer))
        .route("/update/:id", put(customers::update_customer))
        .route("/update", put(customers::update_customer))
        .route("/delete/:id", delete(customers::delete_customer))
        .route("/delete", delete(customers::delete_customer))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state.clone(), identity::require_user_id))
        .layer(middleware::from_fn(cors::allow_cross_domain))
        .layer(middleware::from_fn(access_log::log_request))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(Level::DEBUG).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
        .with_state(state)
}
