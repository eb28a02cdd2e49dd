//! Student records and their local guardians.

use super::finish;
use crate::error::AppError;
use crate::sql::{call_first_result_set, numeric_column, row_to_json, SqlValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::mysql::MySqlConnection;
use sqlx::Connection;

const LIST_SQL: &str = r#"
    SELECT s.*,
           srf.r_no,
           f.amount AS fees_paid,
           f.p_date,
           f.p_method,
           m.m_name AS mess_name,
           lg.name AS guardian_name,
           lg.p_no AS guardian_phone
    FROM student s
    LEFT JOIN student_room_fees srf ON s.s_id = srf.s_id
    LEFT JOIN fees f ON srf.p_id = f.p_id
    LEFT JOIN books_mess bm ON s.s_id = bm.s_id
    LEFT JOIN mess m ON bm.m_no = m.m_no
    LEFT JOIN local_guardian lg ON s.s_id = lg.s_id
"#;

#[derive(Debug, Clone, Deserialize)]
pub struct NewStudent {
    pub s_id: SqlValue,
    pub f_name: String,
    #[serde(default)]
    pub m_name: Option<String>,
    pub l_name: String,
    pub p_no: SqlValue,
    #[serde(default)]
    pub leader_id: Option<SqlValue>,
    #[serde(default)]
    pub guardian_name: Option<String>,
    #[serde(default)]
    pub guardian_phone: Option<SqlValue>,
}

impl NewStudent {
    /// The guardian row is written only when both name and phone were supplied.
    pub fn guardian(&self) -> Option<(&str, &SqlValue)> {
        match (&self.guardian_name, &self.guardian_phone) {
            (Some(name), Some(phone)) => Some((name.as_str(), phone)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StudentUpdate {
    pub f_name: String,
    #[serde(default)]
    pub m_name: Option<String>,
    pub l_name: String,
    pub p_no: SqlValue,
    #[serde(default)]
    pub leader_id: Option<SqlValue>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TotalPaid {
    pub s_id: String,
    pub total_paid: f64,
}

/// Every student with room, latest fee, mess and guardian columns joined in.
pub async fn list(conn: &mut MySqlConnection) -> Result<Vec<Value>, AppError> {
    let rows = sqlx::query(LIST_SQL).fetch_all(&mut *conn).await?;
    Ok(rows.iter().map(row_to_json).collect())
}

/// `sp_get_student_details(s_id)`; `None` when the procedure returns no row.
pub async fn details(conn: &mut MySqlConnection, s_id: &str) -> Result<Option<Value>, AppError> {
    let rows = call_first_result_set(
        conn,
        sqlx::query("CALL sp_get_student_details(?)").bind(s_id),
    )
    .await?;
    Ok(rows.into_iter().next())
}

/// Insert the student and, when given, upsert the guardian, as one unit.
pub async fn create(conn: &mut MySqlConnection, student: &NewStudent) -> Result<(), AppError> {
    let mut tx = conn.begin().await?;
    let outcome = insert_with_guardian(&mut tx, student).await;
    finish(tx, outcome).await
}

async fn insert_with_guardian(conn: &mut MySqlConnection, student: &NewStudent) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO student (s_id, f_name, m_name, l_name, p_no, leader_id) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&student.s_id)
    .bind(&student.f_name)
    .bind(&student.m_name)
    .bind(&student.l_name)
    .bind(&student.p_no)
    .bind(&student.leader_id)
    .execute(&mut *conn)
    .await?;

    if let Some((name, phone)) = student.guardian() {
        sqlx::query(
            "INSERT INTO local_guardian (s_id, name, p_no) VALUES (?, ?, ?) \
             ON DUPLICATE KEY UPDATE name = VALUES(name)",
        )
        .bind(&student.s_id)
        .bind(name)
        .bind(phone)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

pub async fn update(conn: &mut MySqlConnection, s_id: &str, update: &StudentUpdate) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE student SET f_name = ?, m_name = ?, l_name = ?, p_no = ?, leader_id = ? WHERE s_id = ?",
    )
    .bind(&update.f_name)
    .bind(&update.m_name)
    .bind(&update.l_name)
    .bind(&update.p_no)
    .bind(&update.leader_id)
    .bind(s_id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn delete(conn: &mut MySqlConnection, s_id: &str) -> Result<(), AppError> {
    sqlx::query("DELETE FROM student WHERE s_id = ?")
        .bind(s_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// `student_total_paid(s_id)`, zero when the function yields NULL.
pub async fn total_paid(conn: &mut MySqlConnection, s_id: &str) -> Result<TotalPaid, AppError> {
    let row = sqlx::query("SELECT student_total_paid(?) AS total")
        .bind(s_id)
        .fetch_optional(&mut *conn)
        .await?;
    let total_paid = row.as_ref().and_then(|r| numeric_column(r, "total")).unwrap_or(0.0);
    Ok(TotalPaid {
        s_id: s_id.to_string(),
        total_paid,
    })
}

/// `sp_calculate_student_monthly_charges(s_id, month, year)`: mess fee, laundry
/// charges, totals and balance for one month. `None` when no row comes back.
pub async fn monthly_charges(
    conn: &mut MySqlConnection,
    s_id: &str,
    month: u32,
    year: i32,
) -> Result<Option<Value>, AppError> {
    let rows = call_first_result_set(
        conn,
        sqlx::query("CALL sp_calculate_student_monthly_charges(?, ?, ?)")
            .bind(s_id)
            .bind(month)
            .bind(year),
    )
    .await?;
    Ok(rows.into_iter().next())
}
