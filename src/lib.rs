//! Hostel Office: REST back office for a hostel's MySQL database.
//!
//! Room capacity, fee computation and the other business rules live in the database's
//! triggers, functions and stored procedures. This crate exposes them over HTTP and
//! provisions the schema that defines them.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod migration;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::{AppConfig, DatabaseConfig, ServerConfig};
pub use error::{AppError, ConfigError, SchemaError};
pub use migration::{apply_schema_file, split_statements, SchemaOutcome, SchemaScript};
pub use routes::{api_routes, app, common_routes};
pub use state::AppState;
pub use store::{connect_lazy, ensure_database_exists};
