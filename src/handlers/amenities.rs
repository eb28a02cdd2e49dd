//! Mess and laundry handlers.

use crate::error::AppError;
use crate::extractors::ApiJson;
use crate::response;
use crate::service::amenities::{self, LaundrySubmission, MessBooking};
use crate::state::AppState;
use axum::extract::State;
use axum::response::IntoResponse;

pub async fn list_mess(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let mut conn = state.acquire().await?;
    Ok(response::rows(amenities::list_mess(&mut conn).await?))
}

pub async fn book_mess(
    State(state): State<AppState>,
    ApiJson(booking): ApiJson<MessBooking>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = state.acquire().await?;
    amenities::book_mess(&mut conn, &booking).await?;
    Ok(response::created("Mess booked successfully"))
}

pub async fn list_laundry(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let mut conn = state.acquire().await?;
    Ok(response::rows(amenities::list_laundry(&mut conn).await?))
}

pub async fn list_submissions(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let mut conn = state.acquire().await?;
    Ok(response::rows(amenities::list_submissions(&mut conn).await?))
}

pub async fn submit_laundry(
    State(state): State<AppState>,
    ApiJson(submission): ApiJson<LaundrySubmission>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = state.acquire().await?;
    amenities::submit_laundry(&mut conn, &submission).await?;
    Ok(response::created("Laundry submitted successfully"))
}
