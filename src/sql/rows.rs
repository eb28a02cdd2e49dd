//! Decode arbitrary MySQL rows into JSON objects.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{Map, Number, Value};
use sqlx::mysql::MySqlRow;
use sqlx::{Column, Row};

pub fn row_to_json(row: &MySqlRow) -> Value {
    let mut map = Map::new();
    for (index, col) in row.columns().iter().enumerate() {
        map.insert(col.name().to_string(), cell_to_value(row, index));
    }
    Value::Object(map)
}

/// Read a numeric column as `f64`, whatever MySQL chose for it (`SUM` over DECIMAL
/// yields DECIMAL, `COUNT` yields BIGINT, functions may return either). `None` for
/// SQL NULL or a non-numeric column.
pub fn numeric_column(row: &MySqlRow, name: &str) -> Option<f64> {
    if let Ok(Some(d)) = row.try_get::<Option<Decimal>, _>(name) {
        return d.to_f64();
    }
    if let Ok(Some(n)) = row.try_get::<Option<i64>, _>(name) {
        return Some(n as f64);
    }
    if let Ok(Some(n)) = row.try_get::<Option<u64>, _>(name) {
        return Some(n as f64);
    }
    if let Ok(Some(x)) = row.try_get::<Option<f64>, _>(name) {
        return Some(x);
    }
    None
}

fn float(x: f64) -> Value {
    Number::from_f64(x).map(Value::Number).unwrap_or(Value::Null)
}

fn cell_to_value(row: &MySqlRow, index: usize) -> Value {
    if let Ok(v) = row.try_get::<Option<i64>, _>(index) {
        return v.map(|n| Value::Number(n.into())).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<u64>, _>(index) {
        return v.map(|n| Value::Number(n.into())).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<Decimal>, _>(index) {
        return v.and_then(|d| d.to_f64()).map(float).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(index) {
        return v.map(float).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<f32>, _>(index) {
        return v.map(|x| float(x as f64)).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<chrono::NaiveDate>, _>(index) {
        return v
            .map(|d| Value::String(d.format("%Y-%m-%d").to_string()))
            .unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<chrono::NaiveDateTime>, _>(index) {
        return v
            .map(|d| Value::String(d.format("%Y-%m-%dT%H:%M:%S").to_string()))
            .unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(index) {
        return v.map(|d| Value::String(d.to_rfc3339())).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<chrono::NaiveTime>, _>(index) {
        return v
            .map(|t| Value::String(t.format("%H:%M:%S").to_string()))
            .unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<bool>, _>(index) {
        return v.map(Value::Bool).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<String>, _>(index) {
        return v.map(Value::String).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<Value>, _>(index) {
        return v.unwrap_or(Value::Null);
    }
    // CONCAT over mixed collations and some procedure outputs come back flagged binary.
    if let Ok(v) = row.try_get::<Option<Vec<u8>>, _>(index) {
        return v
            .map(|b| Value::String(String::from_utf8_lossy(&b).into_owned()))
            .unwrap_or(Value::Null);
    }
    Value::Null
}
