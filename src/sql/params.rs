//! Scalars from request bodies that may arrive as JSON numbers or strings.

use serde::Deserialize;
use sqlx::encode::{Encode, IsNull};
use sqlx::mysql::{MySql, MySqlTypeInfo};
use sqlx::{Database, Type};
use std::fmt;

/// A key or amount bound positionally. Deserializes from either JSON form, so
/// `{"s_id": 7}` and `{"s_id": "7"}` both reach the database; MySQL converts to the
/// column's type.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SqlValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Int(n) => write!(f, "{}", n),
            SqlValue::Float(x) => write!(f, "{}", x),
            SqlValue::Text(s) => f.write_str(s),
        }
    }
}

impl<'q> Encode<'q, MySql> for SqlValue {
    fn encode_by_ref(
        &self,
        buf: &mut <MySql as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        match self {
            SqlValue::Int(n) => <i64 as Encode<MySql>>::encode_by_ref(n, buf),
            SqlValue::Float(x) => <f64 as Encode<MySql>>::encode_by_ref(x, buf),
            SqlValue::Text(s) => <&str as Encode<MySql>>::encode_by_ref(&s.as_str(), buf),
        }
    }

    fn produces(&self) -> Option<MySqlTypeInfo> {
        Some(match self {
            SqlValue::Int(_) => <i64 as Type<MySql>>::type_info(),
            SqlValue::Float(_) => <f64 as Type<MySql>>::type_info(),
            SqlValue::Text(_) => <str as Type<MySql>>::type_info(),
        })
    }
}

impl Type<MySql> for SqlValue {
    fn type_info() -> MySqlTypeInfo {
        <str as Type<MySql>>::type_info()
    }

    fn compatible(_ty: &MySqlTypeInfo) -> bool {
        true
    }
}
