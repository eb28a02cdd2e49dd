//! Fees, dashboard aggregates and the hostel report.

use crate::error::AppError;
use crate::sql::{call_first_result_set, numeric_column, row_to_json};
use serde::Serialize;
use serde_json::Value;
use sqlx::mysql::MySqlConnection;

const FEES_SQL: &str = r#"
    SELECT f.p_id,
           f.p_date,
           f.p_method,
           f.amount,
           s.s_id,
           CONCAT(s.f_name, ' ', IFNULL(s.m_name, ''), ' ', s.l_name) AS student_name
    FROM fees f
    LEFT JOIN student_room_fees srf ON f.p_id = srf.p_id
    LEFT JOIN student s ON srf.s_id = s.s_id
    ORDER BY f.p_date DESC
"#;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_students: i64,
    pub total_rooms: i64,
    pub occupied_rooms: i64,
    pub total_revenue: f64,
    pub mess_bookings: i64,
}

/// Every fee, newest first, with the paying student when an allocation links one.
pub async fn list_fees(conn: &mut MySqlConnection) -> Result<Vec<Value>, AppError> {
    let rows = sqlx::query(FEES_SQL).fetch_all(&mut *conn).await?;
    Ok(rows.iter().map(row_to_json).collect())
}

pub async fn dashboard_stats(conn: &mut MySqlConnection) -> Result<DashboardStats, AppError> {
    let total_students = count(conn, "SELECT COUNT(*) FROM student").await?;
    let total_rooms = count(conn, "SELECT COUNT(*) FROM room").await?;
    let occupied_rooms = count(conn, "SELECT COUNT(*) FROM room WHERE no_of_people > 0").await?;
    let revenue = sqlx::query("SELECT SUM(amount) AS total FROM fees")
        .fetch_one(&mut *conn)
        .await?;
    let mess_bookings = count(conn, "SELECT COUNT(*) FROM books_mess").await?;
    Ok(DashboardStats {
        total_students,
        total_rooms,
        occupied_rooms,
        total_revenue: numeric_column(&revenue, "total").unwrap_or(0.0),
        mess_bookings,
    })
}

async fn count(conn: &mut MySqlConnection, sql: &'static str) -> Result<i64, AppError> {
    Ok(sqlx::query_scalar::<_, i64>(sql).fetch_one(&mut *conn).await?)
}

/// `sp_generate_hostel_report()`.
pub async fn report(conn: &mut MySqlConnection) -> Result<Vec<Value>, AppError> {
    Ok(call_first_result_set(conn, sqlx::query("CALL sp_generate_hostel_report()")).await?)
}
