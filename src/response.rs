//! Response helpers. Lists are returned as bare JSON arrays, writes as `{"message": ...}`.

use axum::{http::StatusCode, Json};
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize, Debug)]
pub struct Message {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p_id: Option<String>,
}

pub fn message(status: StatusCode, message: &'static str) -> (StatusCode, Json<Message>) {
    (status, Json(Message { message, p_id: None }))
}

pub fn ok(message_text: &'static str) -> (StatusCode, Json<Message>) {
    message(StatusCode::OK, message_text)
}

pub fn created(message_text: &'static str) -> (StatusCode, Json<Message>) {
    message(StatusCode::CREATED, message_text)
}

pub fn rows(data: Vec<Value>) -> (StatusCode, Json<Vec<Value>>) {
    (StatusCode::OK, Json(data))
}

pub fn one<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::OK, Json(data))
}
