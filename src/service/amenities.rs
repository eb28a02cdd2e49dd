//! Mess and laundry services.

use super::call_in_transaction;
use crate::error::AppError;
use crate::sql::{row_to_json, SqlValue};
use serde::Deserialize;
use serde_json::Value;
use sqlx::mysql::MySqlConnection;

const SUBMISSIONS_SQL: &str = r#"
    SELECT gl.s_id AS student_id,
           CONCAT(s.f_name, ' ', s.l_name) AS student_name,
           gl.l_no AS service_name,
           l.days_of_laundry AS days,
           (l.days_of_laundry * l.rate_per_day) AS cost,
           gl.submission_date AS date
    FROM gives_laundry gl
    JOIN student s ON gl.s_id = s.s_id
    JOIN laundry l ON gl.l_no = l.l_no
    ORDER BY gl.submission_date DESC
"#;

#[derive(Debug, Clone, Deserialize)]
pub struct MessBooking {
    pub s_id: SqlValue,
    pub m_no: SqlValue,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LaundrySubmission {
    pub s_id: SqlValue,
    pub l_no: SqlValue,
}

pub async fn list_mess(conn: &mut MySqlConnection) -> Result<Vec<Value>, AppError> {
    let rows = sqlx::query("SELECT * FROM mess").fetch_all(&mut *conn).await?;
    Ok(rows.iter().map(row_to_json).collect())
}

/// `sp_change_mess_booking(s_id, m_no)`.
pub async fn book_mess(conn: &mut MySqlConnection, booking: &MessBooking) -> Result<(), AppError> {
    let call = sqlx::query("CALL sp_change_mess_booking(?, ?)")
        .bind(&booking.s_id)
        .bind(&booking.m_no);
    call_in_transaction(conn, call).await
}

pub async fn list_laundry(conn: &mut MySqlConnection) -> Result<Vec<Value>, AppError> {
    let rows = sqlx::query("SELECT * FROM laundry").fetch_all(&mut *conn).await?;
    Ok(rows.iter().map(row_to_json).collect())
}

/// Laundry submissions, newest first, with student name and cost.
pub async fn list_submissions(conn: &mut MySqlConnection) -> Result<Vec<Value>, AppError> {
    let rows = sqlx::query(SUBMISSIONS_SQL).fetch_all(&mut *conn).await?;
    Ok(rows.iter().map(row_to_json).collect())
}

/// `sp_submit_laundry(s_id, l_no)`.
pub async fn submit_laundry(conn: &mut MySqlConnection, submission: &LaundrySubmission) -> Result<(), AppError> {
    let call = sqlx::query("CALL sp_submit_laundry(?, ?)")
        .bind(&submission.s_id)
        .bind(&submission.l_no);
    call_in_transaction(conn, call).await
}
