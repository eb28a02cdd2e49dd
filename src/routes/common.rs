//! Liveness and readiness.
//!
//! `/ready` counts rooms rather than pinging, so a server whose database is reachable
//! but not yet provisioned with the hostel schema reports itself as not ready.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
struct Liveness {
    service: &'static str,
    version: &'static str,
    status: &'static str,
}

#[derive(Serialize)]
struct Readiness {
    status: &'static str,
    database: &'static str,
    rooms: Option<i64>,
}

async fn health() -> Json<Liveness> {
    Json(Liveness {
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        status: "ok",
    })
}

async fn ready(State(state): State<AppState>) -> (StatusCode, Json<Readiness>) {
    match sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM room")
        .fetch_one(&state.pool)
        .await
    {
        Ok(rooms) => (
            StatusCode::OK,
            Json(Readiness {
                status: "ok",
                database: "ok",
                rooms: Some(rooms),
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            let database = match e {
                sqlx::Error::Database(_) => "schema_missing",
                _ => "unavailable",
            };
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(Readiness {
                    status: "degraded",
                    database,
                    rooms: None,
                }),
            )
        }
    }
}

/// GET /health (process liveness), GET /ready (hostel schema reachable).
pub fn common_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .with_state(state)
}
