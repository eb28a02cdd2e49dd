//! Warden handlers.

use crate::error::AppError;
use crate::extractors::ApiJson;
use crate::response;
use crate::service::wardens::{self, WardenAssignment};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::response::IntoResponse;

pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let mut conn = state.acquire().await?;
    Ok(response::rows(wardens::list(&mut conn).await?))
}

pub async fn students(
    State(state): State<AppState>,
    Path(w_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = state.acquire().await?;
    Ok(response::rows(wardens::students(&mut conn, &w_id).await?))
}

pub async fn assign(
    State(state): State<AppState>,
    ApiJson(assignment): ApiJson<WardenAssignment>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = state.acquire().await?;
    wardens::assign(&mut conn, &assignment).await?;
    Ok(response::ok("Warden assigned successfully"))
}
