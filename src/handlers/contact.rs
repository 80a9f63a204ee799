use crate::dtos::{ContactMessageCreate, ContactMessageResponse, SubmitContactResponse};
use crate::error::AppError;
use crate::services::NotifyOutcome;
use crate::startup::AppState;
use crate::utils::ValidatedJson;
use axum::{extract::State, Json};

#[tracing::instrument(skip(state, payload))]
pub async fn submit_contact_message(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ContactMessageCreate>,
) -> Result<Json<SubmitContactResponse>, AppError> {
    let email = payload.email.clone();

    let message = state
        .store
        .create_contact_message(payload)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to save contact message");
            e
        })?;

    tracing::info!(id = %message.id, email = %email, "Contact message received");

    let response = SubmitContactResponse {
        success: true,
        message: "Message sent successfully! I'll get back to you soon.".to_string(),
        id: message.id.clone(),
    };

    // Delivery runs detached; the response never waits on it and never
    // reflects its outcome.
    let mailer = state.mailer.clone();
    tokio::spawn(async move {
        match mailer.notify(&message).await {
            NotifyOutcome::Sent => {
                tracing::info!(id = %message.id, "Contact notification delivered");
            }
            NotifyOutcome::Skipped => {
                tracing::debug!(id = %message.id, "Contact notification skipped");
            }
            NotifyOutcome::Failed => {
                tracing::warn!(id = %message.id, "Contact notification failed, message is saved");
            }
        }
    });

    Ok(Json(response))
}

pub async fn list_contact_messages(
    State(state): State<AppState>,
) -> Result<Json<Vec<ContactMessageResponse>>, AppError> {
    let messages = state.store.list_contact_messages().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch contact messages");
        e
    })?;

    Ok(Json(
        messages
            .into_iter()
            .map(ContactMessageResponse::from)
            .collect(),
    ))
}
