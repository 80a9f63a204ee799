use crate::dtos::{StatusCheckCreate, StatusCheckResponse};
use crate::error::AppError;
use crate::startup::AppState;
use crate::utils::ValidatedJson;
use axum::{extract::State, Json};

pub async fn create_status_check(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<StatusCheckCreate>,
) -> Result<Json<StatusCheckResponse>, AppError> {
    let check = state.store.create_status_check(payload).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to save status check");
        e
    })?;

    Ok(Json(StatusCheckResponse::from(check)))
}

pub async fn list_status_checks(
    State(state): State<AppState>,
) -> Result<Json<Vec<StatusCheckResponse>>, AppError> {
    let checks = state.store.list_status_checks().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch status checks");
        e
    })?;

    Ok(Json(
        checks.into_iter().map(StatusCheckResponse::from).collect(),
    ))
}
