//! Workflows against a live MySQL server, provisioned from `tests/fixtures/schema.sql`.
//!
//! Set `HOSTEL_TEST_DB_HOST` (and optionally `HOSTEL_TEST_DB_PORT`, `_USER`,
//! `_PASSWORD`) to run them; each test creates and drops its own database. Without
//! the variables every test returns immediately.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use hostel_office::{
    app, apply_schema_file, connect_lazy, split_statements, AppState, DatabaseConfig, SchemaOutcome,
    ServerConfig,
};
use serde_json::{json, Value};
use sqlx::{ConnectOptions, MySqlPool};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tower::ServiceExt;

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/schema.sql")
}

fn test_database(name: &str) -> Option<DatabaseConfig> {
    let host = std::env::var("HOSTEL_TEST_DB_HOST").ok()?;
    let var = |key: &str, default: &str| std::env::var(key).unwrap_or_else(|_| default.to_string());
    Some(DatabaseConfig {
        host,
        port: var("HOSTEL_TEST_DB_PORT", "3306").parse().unwrap(),
        user: var("HOSTEL_TEST_DB_USER", "root"),
        password: var("HOSTEL_TEST_DB_PASSWORD", ""),
        name: format!("hostel_office_test_{name}"),
        max_connections: 2,
        acquire_timeout: Duration::from_secs(5),
    })
}

async fn drop_database(config: &DatabaseConfig) {
    let mut conn = config.server_options().connect().await.unwrap();
    let sql = format!("DROP DATABASE IF EXISTS `{}`", config.name);
    sqlx::raw_sql(&sql).execute(&mut conn).await.unwrap();
}

struct Harness {
    config: DatabaseConfig,
    pool: MySqlPool,
    router: Router,
}

impl Harness {
    async fn start(name: &str) -> Option<Self> {
        let config = test_database(name)?;
        drop_database(&config).await;
        let outcome = apply_schema_file(&config, &fixture()).await.unwrap();
        assert!(matches!(outcome, SchemaOutcome::Applied { .. }));
        let pool = connect_lazy(&config);
        let server = ServerConfig {
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            cors_origins: Vec::new(),
            body_limit: 64 * 1024,
        };
        let router = app(AppState::new(pool.clone()), &server);
        Some(Self { config, pool, router })
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap()).await
    }

    async fn json(&self, method: Method, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn add_student(&self, s_id: &str) {
        let (status, _) = self
            .json(
                Method::POST,
                "/api/students",
                json!({ "s_id": s_id, "f_name": "Asha", "l_name": "Rao", "p_no": "9000000001" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    async fn allocate(&self, s_id: &str, r_no: i64) {
        let allocation = json!({ "s_id": s_id, "r_no": r_no, "p_method": "Cash", "amount": 4000 });
        let (status, _) = self.json(Method::POST, "/api/rooms/allocate", allocation).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    async fn occupant_ids(&self, r_no: i64) -> Vec<String> {
        let (status, rows) = self.get(&format!("/api/rooms/{r_no}/students")).await;
        assert_eq!(status, StatusCode::OK);
        rows.as_array()
            .unwrap()
            .iter()
            .map(|row| row["s_id"].as_str().unwrap().to_string())
            .collect()
    }

    async fn count(&self, sql: &str) -> i64 {
        sqlx::query_scalar(sql).fetch_one(&self.pool).await.unwrap()
    }

    async fn finish(self) {
        self.pool.close().await;
        drop_database(&self.config).await;
    }
}

#[tokio::test]
async fn allocated_student_appears_among_occupants() {
    let Some(h) = Harness::start("allocate").await else { return };
    h.add_student("S1").await;

    let (status, body) = h
        .json(
            Method::POST,
            "/api/rooms/allocate",
            json!({ "s_id": "S1", "r_no": 101, "p_method": "UPI", "amount": 4500.5 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["p_id"].as_str().unwrap().starts_with('F'));

    let (status, occupants) = h.get("/api/rooms/101/students").await;
    assert_eq!(status, StatusCode::OK);
    assert!(occupants
        .as_array()
        .unwrap()
        .iter()
        .any(|row| row["s_id"] == "S1"));

    let (_, slots) = h.get("/api/rooms/101/available").await;
    assert_eq!(slots, json!({ "r_no": "101", "available_slots": 1 }));

    let (_, paid) = h.get("/api/students/S1/payments").await;
    assert_eq!(paid, json!({ "s_id": "S1", "total_paid": 4500.5 }));
    h.finish().await;
}

#[tokio::test]
async fn allocation_into_full_room_rolls_back() {
    let Some(h) = Harness::start("full_room").await else { return };
    h.add_student("S1").await;
    h.add_student("S2").await;

    let first = json!({ "s_id": "S1", "r_no": 102, "p_method": "Cash", "amount": 4000 });
    let (status, _) = h.json(Method::POST, "/api/rooms/allocate", first).await;
    assert_eq!(status, StatusCode::CREATED);

    let second = json!({ "s_id": "S2", "r_no": 102, "p_method": "Cash", "amount": 4000 });
    let (status, body) = h.json(Method::POST, "/api/rooms/allocate", second).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Room is full");

    assert_eq!(h.count("SELECT COUNT(*) FROM fees").await, 1);
    assert_eq!(h.count("SELECT COUNT(*) FROM student_room_fees").await, 1);
    h.finish().await;
}

#[tokio::test]
async fn deallocating_unknown_pair_is_not_found() {
    let Some(h) = Harness::start("deallocate").await else { return };
    h.add_student("S1").await;
    let allocation = json!({ "s_id": "S1", "r_no": 101, "p_method": "UPI", "amount": 100 });
    h.json(Method::POST, "/api/rooms/allocate", allocation).await;

    let (status, body) = h
        .json(Method::POST, "/api/rooms/deallocate", json!({ "s_id": "S1", "r_no": 102 }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Allocation not found" }));
    assert_eq!(h.count("SELECT COUNT(*) FROM student_room_fees").await, 1);

    let (status, _) = h
        .json(Method::POST, "/api/rooms/deallocate", json!({ "s_id": "S1", "r_no": 101 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(h.count("SELECT COUNT(*) FROM student_room_fees").await, 0);
    h.finish().await;
}

#[tokio::test]
async fn created_student_reads_back_and_deletes() {
    let Some(h) = Harness::start("students").await else { return };
    let (status, _) = h
        .json(
            Method::POST,
            "/api/students",
            json!({
                "s_id": "S9", "f_name": "Ravi", "m_name": "K", "l_name": "Iyer",
                "p_no": "9000000009", "guardian_name": "Kiran Iyer", "guardian_phone": "9000000010"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, student) = h.get("/api/students/S9").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(student["f_name"], "Ravi");
    assert_eq!(student["m_name"], "K");
    assert_eq!(student["l_name"], "Iyer");
    assert_eq!(student["p_no"], "9000000009");
    assert_eq!(student["guardian_name"], "Kiran Iyer");

    let (status, _) = h
        .json(
            Method::PUT,
            "/api/students/S9",
            json!({ "f_name": "Ravi", "l_name": "Iyengar", "p_no": "9000000009" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, student) = h.get("/api/students/S9").await;
    assert_eq!(student["l_name"], "Iyengar");
    assert_eq!(student["m_name"], Value::Null);

    let request = Request::builder()
        .method(Method::DELETE)
        .uri("/api/students/S9")
        .body(Body::empty())
        .unwrap();
    let (status, _) = h.send(request).await;
    assert_eq!(status, StatusCode::OK);

    let (_, list) = h.get("/api/students").await;
    assert!(list.as_array().unwrap().iter().all(|row| row["s_id"] != "S9"));
    let (status, _) = h.get("/api/students/S9").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    h.finish().await;
}

#[tokio::test]
async fn failed_guardian_insert_leaves_no_student() {
    let Some(h) = Harness::start("guardian").await else { return };
    let long_phone = "9".repeat(40);
    let (status, _) = h
        .json(
            Method::POST,
            "/api/students",
            json!({
                "s_id": "S5", "f_name": "Asha", "l_name": "Rao", "p_no": "9000000001",
                "guardian_name": "Meera Rao", "guardian_phone": long_phone
            }),
        )
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(h.count("SELECT COUNT(*) FROM student WHERE s_id = 'S5'").await, 0);
    h.finish().await;
}

#[tokio::test]
async fn warden_assignment_replaces_previous() {
    let Some(h) = Harness::start("wardens").await else { return };
    h.add_student("S1").await;
    sqlx::query("INSERT INTO warden (w_id, name) VALUES ('W2', 'P. Das')")
        .execute(&h.pool)
        .await
        .unwrap();

    for w_id in ["W1", "W2"] {
        let (status, _) = h
            .json(Method::POST, "/api/wardens/assign", json!({ "w_id": w_id, "s_id": "S1" }))
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, w1) = h.get("/api/wardens/W1/students").await;
    let (_, w2) = h.get("/api/wardens/W2/students").await;
    assert!(w1.as_array().unwrap().is_empty());
    assert_eq!(w2.as_array().unwrap().len(), 1);
    h.finish().await;
}

#[tokio::test]
async fn dashboard_counts_and_revenue() {
    let Some(h) = Harness::start("dashboard").await else { return };
    h.add_student("S1").await;
    let allocation = json!({ "s_id": "S1", "r_no": 101, "p_method": "UPI", "amount": 1250.25 });
    h.json(Method::POST, "/api/rooms/allocate", allocation).await;

    let (status, stats) = h.get("/api/dashboard/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        stats,
        json!({
            "total_students": 1,
            "total_rooms": 2,
            "occupied_rooms": 1,
            "total_revenue": 1250.25,
            "mess_bookings": 0
        })
    );
    h.finish().await;
}

#[tokio::test]
async fn transfer_moves_the_allocation() {
    let Some(h) = Harness::start("transfer").await else { return };
    h.add_student("S1").await;
    h.allocate("S1", 101).await;

    let (status, body) = h
        .json(Method::POST, "/api/rooms/transfer", json!({ "s_id": "S1", "new_r_no": 102 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Student transferred successfully");

    assert!(h.occupant_ids(101).await.is_empty());
    assert_eq!(h.occupant_ids(102).await, vec!["S1".to_string()]);
    let (_, slots) = h.get("/api/rooms/101/available").await;
    assert_eq!(slots["available_slots"], 2);
    h.finish().await;
}

#[tokio::test]
async fn transfer_rejected_by_procedure_rolls_back() {
    let Some(h) = Harness::start("transfer_full").await else { return };
    h.add_student("S1").await;
    h.add_student("S2").await;
    h.allocate("S1", 101).await;
    h.allocate("S2", 102).await;

    // The procedure moves the row and the counters before it signals.
    let (status, body) = h
        .json(Method::POST, "/api/rooms/transfer", json!({ "s_id": "S1", "new_r_no": 102 }))
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Room is full" }));

    assert_eq!(h.occupant_ids(101).await, vec!["S1".to_string()]);
    assert_eq!(h.occupant_ids(102).await, vec!["S2".to_string()]);
    let (_, slots) = h.get("/api/rooms/101/available").await;
    assert_eq!(slots["available_slots"], 1);
    h.finish().await;
}

#[tokio::test]
async fn mess_booking_is_created_and_failed_rebooking_keeps_it() {
    let Some(h) = Harness::start("mess").await else { return };
    h.add_student("S1").await;

    let (status, body) = h
        .json(Method::POST, "/api/mess/book", json!({ "s_id": "S1", "m_no": 1 }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Mess booked successfully");

    // Unknown mess: the procedure has already answered its first result set and
    // deleted the old booking when the insert fails.
    let (status, _) = h
        .json(Method::POST, "/api/mess/book", json!({ "s_id": "S1", "m_no": 99 }))
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        h.count("SELECT COUNT(*) FROM books_mess WHERE s_id = 'S1' AND m_no = 1").await,
        1
    );
    h.finish().await;
}

#[tokio::test]
async fn laundry_submission_is_listed_with_cost() {
    let Some(h) = Harness::start("laundry").await else { return };
    h.add_student("S1").await;

    let (status, body) = h
        .json(Method::POST, "/api/laundry/submit", json!({ "s_id": "S1", "l_no": 1 }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Laundry submitted successfully");

    let (status, submissions) = h.get("/api/laundry/submissions").await;
    assert_eq!(status, StatusCode::OK);
    let submissions = submissions.as_array().unwrap();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0]["student_id"], "S1");
    assert_eq!(submissions[0]["student_name"], "Asha Rao");
    assert_eq!(submissions[0]["cost"].as_f64(), Some(100.0));
    h.finish().await;
}

#[tokio::test]
async fn monthly_charges_for_known_and_unknown_students() {
    let Some(h) = Harness::start("charges").await else { return };
    h.add_student("S1").await;
    h.json(Method::POST, "/api/mess/book", json!({ "s_id": "S1", "m_no": 1 })).await;

    let (status, charges) = h.get("/api/students/S1/monthly_charges?month=1&year=2000").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(charges["s_id"], "S1");
    assert_eq!(charges["mess_fee"].as_f64(), Some(3000.0));
    assert_eq!(charges["laundry_charges"].as_f64(), Some(0.0));

    let (status, body) = h.get("/api/students/NOBODY/monthly_charges?month=1&year=2000").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "No data returned" }));
    h.finish().await;
}

#[tokio::test]
async fn report_returns_only_the_first_result_set() {
    let Some(h) = Harness::start("report").await else { return };
    h.add_student("S1").await;

    let (status, report) = h.get("/api/report").await;
    assert_eq!(status, StatusCode::OK);
    let rows = report.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["r_no"], 101);
    assert_eq!(rows[1]["r_no"], 102);
    assert!(rows.iter().all(|row| row.get("total_students").is_none()));

    // The connection is usable again after the drained call.
    let (status, _) = h.get("/api/rooms").await;
    assert_eq!(status, StatusCode::OK);
    h.finish().await;
}

#[tokio::test]
async fn ready_counts_provisioned_rooms() {
    let Some(h) = Harness::start("ready").await else { return };
    let (status, body) = h.get("/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok", "database": "ok", "rooms": 2 }));
    h.finish().await;
}

#[tokio::test]
async fn schema_loads_identically_after_recreate() {
    let Some(config) = test_database("reload") else { return };
    let text = std::fs::read_to_string(fixture()).unwrap();

    drop_database(&config).await;
    let first = apply_schema_file(&config, &fixture()).await.unwrap();
    drop_database(&config).await;
    let second = apply_schema_file(&config, &fixture()).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(
        first,
        SchemaOutcome::Applied {
            statements: split_statements(&text).statements.len()
        }
    );
    drop_database(&config).await;
}
