//! Request extractor for the calling user

use crate::auth::{DATA_OWNER_HEADER, USER_HEADER};
use crate::error::AppError;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderValue;
use serde_json::Value;

/// Identity and role of the caller, validated once per request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user: String,
    pub data_owner: bool,
}

impl Caller {
    /// Identity is checked before the role so a missing user is always 401
    pub fn from_headers(user: Option<&HeaderValue>, data_owner: Option<&HeaderValue>) -> Result<Self, AppError> {
        let user = user
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| AppError::Unauthorized("Missing X-User header".to_string()))?;

        Ok(Self {
            user: user.to_string(),
            data_owner: parse_data_owner(data_owner)?,
        })
    }
}

/// The role header holds any JSON value, read by truthiness. A missing
/// header or text that is not JSON is rejected.
fn parse_data_owner(value: Option<&HeaderValue>) -> Result<bool, AppError> {
    value
        .and_then(|v| v.to_str().ok())
        .and_then(|v| serde_json::from_str::<Value>(v).ok())
        .map(|v| is_truthy(&v))
        .ok_or_else(|| AppError::BadRequest("Invalid header X-Data-Owner".to_string()))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Caller::from_headers(
            parts.headers.get(USER_HEADER),
            parts.headers.get(DATA_OWNER_HEADER),
        )
    }
}
