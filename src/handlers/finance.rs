//! Fees, dashboard and report handlers.

use crate::error::AppError;
use crate::response;
use crate::service::finance;
use crate::state::AppState;
use axum::extract::State;
use axum::response::IntoResponse;

pub async fn list_fees(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let mut conn = state.acquire().await?;
    Ok(response::rows(finance::list_fees(&mut conn).await?))
}

pub async fn dashboard_stats(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let mut conn = state.acquire().await?;
    Ok(response::one(finance::dashboard_stats(&mut conn).await?))
}

pub async fn report(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let mut conn = state.acquire().await?;
    Ok(response::rows(finance::report(&mut conn).await?))
}
