//! Rooms, occupancy, and the allocation workflows.
//!
//! Capacity and the one-room-per-student rule belong to the `student_room_fees`
//! triggers. A rejected insert surfaces here as a database error and rolls the whole
//! allocation back, fee row included.

use super::{call_in_transaction, finish};
use crate::error::AppError;
use crate::sql::{call_first_result_set, numeric_column, SqlValue};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::mysql::MySqlConnection;
use sqlx::Connection;

/// Prefix of generated fee ids.
pub const PAYMENT_ID_PREFIX: &str = "F";
const PAYMENT_ID_HEX_LEN: usize = 18;

#[derive(Debug, Clone, Deserialize)]
pub struct Allocation {
    pub s_id: SqlValue,
    pub r_no: SqlValue,
    pub p_method: String,
    pub amount: SqlValue,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Deallocation {
    pub s_id: SqlValue,
    pub r_no: SqlValue,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Transfer {
    pub s_id: SqlValue,
    pub new_r_no: SqlValue,
}

#[derive(Debug, Clone, Serialize)]
pub struct AvailableSlots {
    pub r_no: String,
    pub available_slots: i64,
}

/// New fee id: the prefix followed by upper-case hex from a random v4 UUID.
pub fn new_payment_id() -> String {
    let hex = uuid::Uuid::new_v4().simple().to_string().to_uppercase();
    format!("{}{}", PAYMENT_ID_PREFIX, &hex[..PAYMENT_ID_HEX_LEN])
}

/// `sp_list_available_rooms()`.
pub async fn list_available(conn: &mut MySqlConnection) -> Result<Vec<Value>, AppError> {
    Ok(call_first_result_set(conn, sqlx::query("CALL sp_list_available_rooms()")).await?)
}

/// `sp_list_filled_rooms()`.
pub async fn list_filled(conn: &mut MySqlConnection) -> Result<Vec<Value>, AppError> {
    Ok(call_first_result_set(conn, sqlx::query("CALL sp_list_filled_rooms()")).await?)
}

/// `sp_get_room_occupants(r_no)`.
pub async fn occupants(conn: &mut MySqlConnection, r_no: &str) -> Result<Vec<Value>, AppError> {
    Ok(call_first_result_set(conn, sqlx::query("CALL sp_get_room_occupants(?)").bind(r_no)).await?)
}

/// `room_available_slots(r_no)`; an unknown room or NULL result counts as zero.
pub async fn available_slots(conn: &mut MySqlConnection, r_no: &str) -> Result<AvailableSlots, AppError> {
    let row = sqlx::query("SELECT room_available_slots(?) AS available")
        .bind(r_no)
        .fetch_optional(&mut *conn)
        .await?;
    let available = row
        .as_ref()
        .and_then(|r| numeric_column(r, "available"))
        .unwrap_or(0.0);
    Ok(AvailableSlots {
        r_no: r_no.to_string(),
        available_slots: available as i64,
    })
}

/// Record the fee and the allocation dated `today`, both or neither. Returns the new
/// fee id.
pub async fn allocate(
    conn: &mut MySqlConnection,
    allocation: &Allocation,
    today: NaiveDate,
) -> Result<String, AppError> {
    let p_id = new_payment_id();
    let mut tx = conn.begin().await?;
    let outcome = insert_fee_and_allocation(&mut tx, allocation, &p_id, today).await;
    finish(tx, outcome).await?;
    tracing::info!(p_id = %p_id, s_id = %allocation.s_id, r_no = %allocation.r_no, "room allocated");
    Ok(p_id)
}

async fn insert_fee_and_allocation(
    conn: &mut MySqlConnection,
    allocation: &Allocation,
    p_id: &str,
    today: NaiveDate,
) -> Result<(), AppError> {
    sqlx::query("INSERT INTO fees (p_id, p_date, p_method, amount) VALUES (?, ?, ?, ?)")
        .bind(p_id)
        .bind(today)
        .bind(&allocation.p_method)
        .bind(&allocation.amount)
        .execute(&mut *conn)
        .await?;
    sqlx::query("INSERT INTO student_room_fees (s_id, r_no, p_id, allotment_date) VALUES (?, ?, ?, ?)")
        .bind(&allocation.s_id)
        .bind(&allocation.r_no)
        .bind(p_id)
        .bind(today)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Remove the (student, room) allocation. `NotFound` when no such row exists, in
/// which case nothing is committed.
pub async fn deallocate(conn: &mut MySqlConnection, deallocation: &Deallocation) -> Result<(), AppError> {
    let mut tx = conn.begin().await?;
    let outcome = sqlx::query("DELETE FROM student_room_fees WHERE s_id = ? AND r_no = ?")
        .bind(&deallocation.s_id)
        .bind(&deallocation.r_no)
        .execute(&mut *tx)
        .await
        .map_err(AppError::from)
        .and_then(|done| {
            if done.rows_affected() == 0 {
                Err(AppError::NotFound("Allocation not found".into()))
            } else {
                Ok(())
            }
        });
    finish(tx, outcome).await
}

/// `sp_transfer_student_room(s_id, new_r_no)`.
pub async fn transfer(conn: &mut MySqlConnection, transfer: &Transfer) -> Result<(), AppError> {
    let call = sqlx::query("CALL sp_transfer_student_room(?, ?)")
        .bind(&transfer.s_id)
        .bind(&transfer.new_r_no);
    call_in_transaction(conn, call).await
}
