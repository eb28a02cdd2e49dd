//! SQL for each area of the hostel. Every function runs on a connection the caller
//! acquired for the request; multi-statement writes open their own transaction on it.

pub mod amenities;
pub mod finance;
pub mod rooms;
pub mod students;
pub mod wardens;

use crate::error::AppError;
use crate::sql::call_to_completion;
use sqlx::mysql::{MySql, MySqlArguments, MySqlConnection};
use sqlx::query::Query;
use sqlx::{Connection, Transaction};

/// Commit `tx` when `outcome` succeeded, roll it back otherwise. A failed rollback is
/// logged; the caller sees the outcome's error.
pub(crate) async fn finish<T>(
    tx: Transaction<'_, MySql>,
    outcome: Result<T, AppError>,
) -> Result<T, AppError> {
    match outcome {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback) = tx.rollback().await {
                tracing::warn!(error = %rollback, "rollback failed");
            }
            Err(e)
        }
    }
}

/// Run a data-changing procedure inside its own transaction. The commit happens only
/// when every result set was read without error.
pub(crate) async fn call_in_transaction(
    conn: &mut MySqlConnection,
    call: Query<'_, MySql, MySqlArguments>,
) -> Result<(), AppError> {
    let mut tx = conn.begin().await?;
    let outcome = call_to_completion(&mut tx, call)
        .await
        .map(|_| ())
        .map_err(AppError::from);
    finish(tx, outcome).await
}
