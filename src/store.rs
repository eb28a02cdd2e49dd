//! Connection sources: the request pool and the one-off provisioning connection.

use crate::config::DatabaseConfig;
use sqlx::mysql::{MySqlConnection, MySqlPoolOptions};
use sqlx::{ConnectOptions, MySqlPool};

/// Build the request pool. Connections open on first use, so the server starts while
/// the database is down and each request reports its own acquisition failure.
pub fn connect_lazy(config: &DatabaseConfig) -> MySqlPool {
    MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect_lazy_with(config.connect_options())
}

/// Connect to the server without a default database, create `config.name` if it does
/// not exist and switch the connection to it.
pub async fn ensure_database_exists(config: &DatabaseConfig) -> Result<MySqlConnection, sqlx::Error> {
    let mut conn = config.server_options().connect().await?;
    let quoted = quote_ident(&config.name);
    let create = format!("CREATE DATABASE IF NOT EXISTS {}", quoted);
    sqlx::raw_sql(&create).execute(&mut conn).await?;
    let use_db = format!("USE {}", quoted);
    sqlx::raw_sql(&use_db).execute(&mut conn).await?;
    Ok(conn)
}

/// Backtick-quote a MySQL identifier.
pub fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_ident_escapes_backticks() {
        assert_eq!(quote_ident("hostel_management"), "`hostel_management`");
        assert_eq!(quote_ident("odd`name"), "`odd``name`");
    }
}
