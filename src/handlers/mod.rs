//! HTTP handlers. Each one takes a connection for the request, calls into
//! [`crate::service`], and maps the outcome to JSON.

pub mod amenities;
pub mod finance;
pub mod rooms;
pub mod students;
pub mod wardens;
