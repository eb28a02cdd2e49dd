//! Wardens and the students they monitor.

use super::finish;
use crate::error::AppError;
use crate::sql::{row_to_json, SqlValue};
use serde::Deserialize;
use serde_json::Value;
use sqlx::mysql::MySqlConnection;
use sqlx::Connection;

#[derive(Debug, Clone, Deserialize)]
pub struct WardenAssignment {
    pub w_id: SqlValue,
    pub s_id: SqlValue,
}

/// Wardens with the number of students each monitors.
pub async fn list(conn: &mut MySqlConnection) -> Result<Vec<Value>, AppError> {
    let rows = sqlx::query(
        "SELECT w.*, COUNT(m.s_id) AS student_count \
         FROM warden w \
         LEFT JOIN monitors m ON w.w_id = m.w_id \
         GROUP BY w.w_id",
    )
    .fetch_all(&mut *conn)
    .await?;
    Ok(rows.iter().map(row_to_json).collect())
}

pub async fn students(conn: &mut MySqlConnection, w_id: &str) -> Result<Vec<Value>, AppError> {
    let rows = sqlx::query(
        "SELECT s.*, m.assigned_date \
         FROM student s \
         JOIN monitors m ON s.s_id = m.s_id \
         WHERE m.w_id = ?",
    )
    .bind(w_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(rows.iter().map(row_to_json).collect())
}

/// Replace the student's warden: drop any current assignment, insert the new one
/// dated today.
pub async fn assign(conn: &mut MySqlConnection, assignment: &WardenAssignment) -> Result<(), AppError> {
    let mut tx = conn.begin().await?;
    let outcome = reassign(&mut tx, assignment).await;
    finish(tx, outcome).await
}

async fn reassign(conn: &mut MySqlConnection, assignment: &WardenAssignment) -> Result<(), AppError> {
    sqlx::query("DELETE FROM monitors WHERE s_id = ?")
        .bind(&assignment.s_id)
        .execute(&mut *conn)
        .await?;
    sqlx::query("INSERT INTO monitors (w_id, s_id, assigned_date) VALUES (?, ?, CURDATE())")
        .bind(&assignment.w_id)
        .bind(&assignment.s_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}
