//! Provision the hostel database from a SQL script.
//!
//! Scripts follow the `mysql` client convention where a `DELIMITER <token>` line
//! changes the statement terminator, so procedure and trigger bodies can contain `;`.
//! The client consumes those lines; the server never sees them.

use crate::config::DatabaseConfig;
use crate::error::SchemaError;
use crate::store::ensure_database_exists;
use std::path::Path;

const DEFAULT_DELIMITER: &str = ";";

/// Statements recovered from a script, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SchemaScript {
    pub statements: Vec<String>,
    /// Text after the last terminator. Never executed.
    pub unterminated: Option<String>,
}

/// What [`apply_schema_file`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaOutcome {
    /// The script file does not exist; nothing was touched.
    Skipped,
    Applied { statements: usize },
}

/// Split `script` into executable statements.
pub fn split_statements(script: &str) -> SchemaScript {
    let mut delimiter = DEFAULT_DELIMITER.to_string();
    let mut statements = Vec::new();
    let mut buf = String::new();

    for line in script.lines() {
        let trimmed = line.trim();
        if let Some(next) = delimiter_directive(trimmed) {
            delimiter = next.to_string();
            continue;
        }

        buf.push_str(line);
        buf.push('\n');

        if trimmed.ends_with(delimiter.as_str()) {
            let body = buf.trim();
            let body = body.strip_suffix(delimiter.as_str()).unwrap_or(body).trim();
            if !body.is_empty() {
                statements.push(body.to_string());
            }
            buf.clear();
        }
    }

    let rest = buf.trim();
    SchemaScript {
        statements,
        unterminated: (!rest.is_empty()).then(|| rest.to_string()),
    }
}

/// `DELIMITER $$` -> `Some("$$")`. The keyword is case-insensitive and must be
/// followed by a token.
fn delimiter_directive(trimmed: &str) -> Option<&str> {
    let mut parts = trimmed.split_whitespace();
    let keyword = parts.next()?;
    if !keyword.eq_ignore_ascii_case("delimiter") {
        return None;
    }
    parts.next()
}

/// Read and split the script at `path`. `Ok(None)` when the file does not exist.
pub async fn read_script(path: &Path) -> Result<Option<SchemaScript>, SchemaError> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => Ok(Some(split_statements(&text))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(SchemaError::Io {
            path: path.display().to_string(),
            source,
        }),
    }
}

/// Create the configured database if needed and run every statement of the script at
/// `path` on one connection, stopping at the first failure.
pub async fn apply_schema_file(config: &DatabaseConfig, path: &Path) -> Result<SchemaOutcome, SchemaError> {
    let Some(script) = read_script(path).await? else {
        tracing::warn!(path = %path.display(), "schema script not found, skipping initialization");
        return Ok(SchemaOutcome::Skipped);
    };
    if let Some(tail) = &script.unterminated {
        tracing::warn!(
            path = %path.display(),
            tail = %tail,
            "schema script ends with an unterminated statement; it will not be executed"
        );
    }

    let mut conn = ensure_database_exists(config).await?;
    for (index, statement) in script.statements.iter().enumerate() {
        tracing::debug!(index, sql = %statement, "schema statement");
        if let Err(source) = sqlx::raw_sql(statement).execute(&mut conn).await {
            tracing::error!(index, sql = %statement, error = %source, "schema statement failed");
            return Err(SchemaError::Statement {
                index,
                statement: statement.clone(),
                source,
            });
        }
    }

    tracing::info!(
        database = %config.name,
        statements = script.statements.len(),
        "database initialized"
    );
    Ok(SchemaOutcome::Applied {
        statements: script.statements.len(),
    })
}
