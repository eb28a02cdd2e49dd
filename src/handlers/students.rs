//! Student handlers: CRUD, payments and monthly charges.

use crate::error::AppError;
use crate::extractors::ApiJson;
use crate::response;
use crate::service::students::{self, NewStudent, StudentUpdate};
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use std::collections::HashMap;

pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let mut conn = state.acquire().await?;
    Ok(response::rows(students::list(&mut conn).await?))
}

pub async fn read(
    State(state): State<AppState>,
    Path(s_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = state.acquire().await?;
    let student = students::details(&mut conn, &s_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Student not found".into()))?;
    Ok(response::one(student))
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(student): ApiJson<NewStudent>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = state.acquire().await?;
    students::create(&mut conn, &student).await?;
    Ok(response::created("Student added successfully"))
}

pub async fn update(
    State(state): State<AppState>,
    Path(s_id): Path<String>,
    ApiJson(update): ApiJson<StudentUpdate>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = state.acquire().await?;
    students::update(&mut conn, &s_id, &update).await?;
    Ok(response::ok("Student updated successfully"))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(s_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = state.acquire().await?;
    students::delete(&mut conn, &s_id).await?;
    Ok(response::ok("Student deleted successfully"))
}

pub async fn payments(
    State(state): State<AppState>,
    Path(s_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = state.acquire().await?;
    Ok(response::one(students::total_paid(&mut conn, &s_id).await?))
}

/// `month` and `year` must both be present, non-zero integers. Checked before a
/// connection is taken.
pub fn billing_period(params: &HashMap<String, String>) -> Result<(u32, i32), AppError> {
    let month = params
        .get("month")
        .and_then(|m| m.trim().parse::<u32>().ok())
        .filter(|m| *m != 0);
    let year = params
        .get("year")
        .and_then(|y| y.trim().parse::<i32>().ok())
        .filter(|y| *y != 0);
    match (month, year) {
        (Some(month), Some(year)) => Ok((month, year)),
        _ => Err(AppError::BadRequest(
            "month and year query parameters required (e.g. ?month=1&year=2025)".into(),
        )),
    }
}

pub async fn monthly_charges(
    State(state): State<AppState>,
    Path(s_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let (month, year) = billing_period(&params)?;
    let mut conn = state.acquire().await?;
    let charges = students::monthly_charges(&mut conn, &s_id, month, year)
        .await?
        .ok_or_else(|| AppError::NotFound("No data returned".into()))?;
    Ok(response::one(charges))
}
