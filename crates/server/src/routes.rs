pub mod entries;

use axum::{
    routing::{get, put},
    Json, Router,
};
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};
use tracing::Level;

use common::types::Health;
use service::entries::EntryService;

pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

/// Build the application router over a shared entry service.
pub fn build_router(entries: EntryService) -> Router {
    Router::new()
        .route("/", get(entries::welcome))
        .route("/health", get(health))
        .route("/list", get(entries::list_entries))
        .route("/entry/:key", get(entries::show_entry))
        .route("/entry/:key/:value", put(entries::update_entry))
        .with_state(entries)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
