//! Stored-procedure calls.
//!
//! A MySQL `CALL` answers with every result set the procedure produced, followed by a
//! final status packet. Every one of them has to be read before the connection can
//! run another statement, even though callers only want the first.

use super::rows::row_to_json;
use futures_util::TryStreamExt;
use serde_json::Value;
use sqlx::mysql::{MySql, MySqlArguments, MySqlConnection};
use sqlx::query::Query;
use sqlx::{Either, Execute, Executor};

/// What happens to an error raised after the first result set was read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Drain {
    /// Logged and dropped.
    Lenient,
    /// Returned to the caller.
    Strict,
}

/// Run `call` and return the rows of its first result set as JSON objects. Later
/// result sets are drained and discarded; errors while draining are logged only.
pub async fn call_first_result_set<'q>(
    conn: &mut MySqlConnection,
    call: Query<'q, MySql, MySqlArguments>,
) -> Result<Vec<Value>, sqlx::Error> {
    run(conn, call, Drain::Lenient).await
}

/// Like [`call_first_result_set`], but a failure anywhere in the procedure is an
/// error, including one raised after the first result set. Use inside a transaction
/// that must roll back when the procedure did not run to completion.
pub async fn call_to_completion<'q>(
    conn: &mut MySqlConnection,
    call: Query<'q, MySql, MySqlArguments>,
) -> Result<Vec<Value>, sqlx::Error> {
    run(conn, call, Drain::Strict).await
}

async fn run<'q>(
    conn: &mut MySqlConnection,
    call: Query<'q, MySql, MySqlArguments>,
    drain: Drain,
) -> Result<Vec<Value>, sqlx::Error> {
    let sql = call.sql();
    tracing::debug!(sql = %sql, "procedure call");
    let mut stream = conn.fetch_many(call);

    let mut rows = Vec::new();
    loop {
        match stream.try_next().await? {
            Some(Either::Right(row)) => rows.push(row_to_json(&row)),
            Some(Either::Left(_)) => break,
            None => return Ok(rows),
        }
    }

    loop {
        match stream.try_next().await {
            Ok(Some(_)) => {}
            Ok(None) => break,
            Err(e) if drain == Drain::Strict => return Err(e),
            Err(e) => {
                tracing::warn!(sql = %sql, error = %e, "ignoring error while draining result sets");
                break;
            }
        }
    }
    Ok(rows)
}
