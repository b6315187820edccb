use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::app::applications::ApplicationStatusDispatcher;
use crate::app::chat::ChatDispatcher;
use crate::app::DispatchOutcome;
use crate::domain::document::Document;
use crate::http::AppError;
use crate::AppState;

#[derive(Serialize)]
pub(crate) struct HealthResponse {
    status: &'static str,
}

/// Generic acknowledgment. Sends, expected no-ops, and logged failures all
/// resolve the same way, so the trigger infrastructure never retries (a
/// retry would risk a duplicate send).
#[derive(Serialize)]
pub struct AckResponse {
    status: &'static str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageCreatedEvent {
    pub chat_id: String,
    pub message_id: String,
    /// The new message document's fields.
    #[serde(default)]
    pub fields: Document,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationUpdatedEvent {
    pub application_id: String,
    /// Snapshots on either side of the update.
    #[serde(default)]
    pub before: Document,
    #[serde(default)]
    pub after: Document,
}

pub(crate) async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn message_created(
    State(state): State<AppState>,
    Json(event): Json<MessageCreatedEvent>,
) -> Result<Json<AckResponse>, AppError> {
    if event.chat_id.is_empty() || event.message_id.is_empty() {
        return Err(AppError::bad_request("missing chatId or messageId"));
    }

    let dispatcher = ChatDispatcher::new(state.users.clone(), state.push.clone());
    match dispatcher
        .dispatch(&event.chat_id, &event.message_id, &event.fields)
        .await
    {
        Ok(DispatchOutcome::Sent { receipt_id }) => {
            tracing::info!(
                chat_id = %event.chat_id,
                message_id = %event.message_id,
                receipt_id = %receipt_id,
                "chat notification sent"
            );
        }
        Ok(DispatchOutcome::Skipped(reason)) => {
            tracing::debug!(
                chat_id = %event.chat_id,
                message_id = %event.message_id,
                reason = %reason,
                "chat notification skipped"
            );
        }
        Err(err) => {
            tracing::error!(
                error = ?err,
                chat_id = %event.chat_id,
                message_id = %event.message_id,
                "failed to dispatch chat notification"
            );
        }
    }

    Ok(Json(AckResponse { status: "ok" }))
}

pub async fn application_updated(
    State(state): State<AppState>,
    Json(event): Json<ApplicationUpdatedEvent>,
) -> Result<Json<AckResponse>, AppError> {
    if event.application_id.is_empty() {
        return Err(AppError::bad_request("missing applicationId"));
    }

    let dispatcher = ApplicationStatusDispatcher::new(state.users.clone(), state.push.clone());
    match dispatcher
        .dispatch(&event.application_id, &event.before, &event.after)
        .await
    {
        Ok(DispatchOutcome::Sent { receipt_id }) => {
            tracing::info!(
                application_id = %event.application_id,
                receipt_id = %receipt_id,
                "application notification sent"
            );
        }
        Ok(DispatchOutcome::Skipped(reason)) => {
            tracing::debug!(
                application_id = %event.application_id,
                reason = %reason,
                "application notification skipped"
            );
        }
        Err(err) => {
            tracing::error!(
                error = ?err,
                application_id = %event.application_id,
                "failed to dispatch application notification"
            );
        }
    }

    Ok(Json(AckResponse { status: "ok" }))
}
