//! Room handlers: listings, occupancy and the allocation workflows.

use crate::error::AppError;
use crate::extractors::ApiJson;
use crate::response::{self, Message};
use crate::service::rooms::{self, Allocation, Deallocation, Transfer};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

pub async fn list_available(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let mut conn = state.acquire().await?;
    Ok(response::rows(rooms::list_available(&mut conn).await?))
}

pub async fn list_filled(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let mut conn = state.acquire().await?;
    Ok(response::rows(rooms::list_filled(&mut conn).await?))
}

pub async fn occupants(
    State(state): State<AppState>,
    Path(r_no): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = state.acquire().await?;
    Ok(response::rows(rooms::occupants(&mut conn, &r_no).await?))
}

pub async fn available_slots(
    State(state): State<AppState>,
    Path(r_no): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = state.acquire().await?;
    Ok(response::one(rooms::available_slots(&mut conn, &r_no).await?))
}

pub async fn allocate(
    State(state): State<AppState>,
    ApiJson(allocation): ApiJson<Allocation>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = state.acquire().await?;
    let today = chrono::Local::now().date_naive();
    let p_id = rooms::allocate(&mut conn, &allocation, today).await?;
    Ok((
        StatusCode::CREATED,
        Json(Message {
            message: "Room allocated successfully",
            p_id: Some(p_id),
        }),
    ))
}

pub async fn deallocate(
    State(state): State<AppState>,
    ApiJson(deallocation): ApiJson<Deallocation>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = state.acquire().await?;
    rooms::deallocate(&mut conn, &deallocation).await?;
    Ok(response::ok("Deallocated successfully"))
}

pub async fn transfer(
    State(state): State<AppState>,
    ApiJson(transfer): ApiJson<Transfer>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = state.acquire().await?;
    rooms::transfer(&mut conn, &transfer).await?;
    Ok(response::ok("Student transferred successfully"))
}
