//! `/api` routes.

use crate::handlers::{amenities, finance, rooms, students, wardens};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/students", get(students::list).post(students::create))
        .route(
            "/students/:id",
            get(students::read).put(students::update).delete(students::delete),
        )
        .route("/students/:id/payments", get(students::payments))
        .route("/students/:id/monthly_charges", get(students::monthly_charges))
        .route("/rooms", get(rooms::list_available))
        .route("/rooms/filled", get(rooms::list_filled))
        .route("/rooms/allocate", post(rooms::allocate))
        .route("/rooms/deallocate", post(rooms::deallocate))
        .route("/rooms/transfer", post(rooms::transfer))
        .route("/rooms/:no/students", get(rooms::occupants))
        .route("/rooms/:no/available", get(rooms::available_slots))
        .route("/mess", get(amenities::list_mess))
        .route("/mess/book", post(amenities::book_mess))
        .route("/laundry", get(amenities::list_laundry))
        .route("/laundry/submissions", get(amenities::list_submissions))
        .route("/laundry/submit", post(amenities::submit_laundry))
        .route("/wardens", get(wardens::list))
        .route("/wardens/assign", post(wardens::assign))
        .route("/wardens/:id/students", get(wardens::students))
        .route("/fees", get(finance::list_fees))
        .route("/dashboard/stats", get(finance::dashboard_stats))
        .route("/report", get(finance::report))
        .with_state(state)
}
