use axum::{routing::get, routing::post, Router};

use crate::http::handlers;
use crate::AppState;

pub fn health() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health))
}

pub fn triggers() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/triggers/message-created",
            post(handlers::message_created),
        )
        .route(
            "/v1/triggers/application-updated",
            post(handlers::application_updated),
        )
}
