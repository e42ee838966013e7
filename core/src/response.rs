//! Response classifier: status code + raw text body → `ResponseEnvelope`.
//!
//! # Design
//! Classification is driven by the status code alone. Anything other than
//! 200 is an error envelope, whatever the body says. The error path parses
//! the body opportunistically; the text-mode success path never parses. A
//! 200 that was expected to be JSON but is not produces no envelope at all,
//! only a diagnostic on the `tracing` error channel.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The only status code classified as success.
pub const SUCCESS_STATUS: u16 = 200;

/// How the caller wants a successful body interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExpectedFormat {
    #[default]
    Json,
    Text,
}

impl ExpectedFormat {
    /// `"JSON"` (exact, case-sensitive) selects JSON; any other hint is text.
    pub fn from_hint(hint: &str) -> Self {
        if hint == "JSON" {
            ExpectedFormat::Json
        } else {
            ExpectedFormat::Text
        }
    }
}

impl FromStr for ExpectedFormat {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_hint(s))
    }
}

impl From<&str> for ExpectedFormat {
    fn from(hint: &str) -> Self {
        Self::from_hint(hint)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Success => f.write_str("success"),
            Status::Error => f.write_str("error"),
        }
    }
}

/// Normalized result of one round trip.
///
/// `data` is the parsed JSON value, or the raw body as a JSON string when it
/// was not parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub status: Status,
    pub data: Value,
}

impl ResponseEnvelope {
    pub fn success(data: Value) -> Self {
        Self {
            status: Status::Success,
            data,
        }
    }

    pub fn error(data: Value) -> Self {
        Self {
            status: Status::Error,
            data,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    pub fn is_error(&self) -> bool {
        self.status == Status::Error
    }
}

/// Parse `text` if it counts as JSON.
///
/// Text counts as JSON when it parses and the result is not one of the
/// falsy literals `0`, `""`, `false` or `null`. Those parse cleanly but are
/// reported as "not JSON". Numbers outside the `f64` range (`1e400`) do not
/// parse at all.
pub fn parse_json(text: &str) -> Option<Value> {
    let value: Value = serde_json::from_str(text).ok()?;
    if is_falsy(&value) {
        return None;
    }
    Some(value)
}

pub fn is_json(text: &str) -> bool {
    parse_json(text).is_some()
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Classify a raw response.
///
/// Returns `None` only for a 200 whose body was expected to be JSON and was
/// not; that case is reported through `tracing::error!`.
pub fn classify(status: u16, raw: &str, expected: ExpectedFormat) -> Option<ResponseEnvelope> {
    if status != SUCCESS_STATUS {
        let data = parse_json(raw).unwrap_or_else(|| Value::String(raw.to_string()));
        return Some(ResponseEnvelope::error(data));
    }

    match expected {
        ExpectedFormat::Json => match parse_json(raw) {
            Some(data) => Some(ResponseEnvelope::success(data)),
            None => {
                tracing::error!(body = %raw, "Expected JSON. Response received");
                None
            }
        },
        ExpectedFormat::Text => Some(ResponseEnvelope::success(Value::String(raw.to_string()))),
    }
}
