//! Request model: turns a route, a data map and per-call overrides into a
//! `FinalizedRequest`.
//!
//! # Design
//! Every method shares one base step (resolve mode and headers, encode the
//! body) and one override point, `finalize`. GET is the only method whose
//! finalize does anything: it moves the data into a query suffix on the
//! route and drops the body. POST, PUT and DELETE differ only in the method
//! token.
//!
//! Both encodings are flat and lossy. Nested objects and arrays survive only
//! as embedded JSON text, never as nested form fields.

use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::error::FetchError;
use crate::http::{FinalizedRequest, Headers, HttpMethod, Mode};
use crate::response::ExpectedFormat;

/// Ordered key/value payload of a request. Iteration follows insertion order.
pub type Data = Map<String, Value>;

/// Integral floats below this magnitude are written without a fraction.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Mode and headers applied when a call does not override them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDefaults {
    pub mode: Mode,
    pub headers: Headers,
}

impl Default for RequestDefaults {
    fn default() -> Self {
        Self {
            mode: Mode::Cors,
            headers: vec![
                ("Accept".to_string(), "application/json".to_string()),
                (
                    "Content-type".to_string(),
                    "application/x-www-form-urlencoded".to_string(),
                ),
            ],
        }
    }
}

/// Partial transport options supplied by a caller. Each field independently
/// falls back to `RequestDefaults`; supplied values are used verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub mode: Option<Mode>,
    pub headers: Option<Headers>,
}

impl Overrides {
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn headers(mut self, headers: Headers) -> Self {
        self.headers = Some(headers);
        self
    }
}

/// Everything a single call knows before it is finalized.
///
/// `data` is `None` when the caller passed no data at all; an empty map is
/// still data.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub route: String,
    pub data: Option<Data>,
    pub method: HttpMethod,
    pub overrides: Option<Overrides>,
    pub expected_format: ExpectedFormat,
}

impl RequestSpec {
    pub fn new(method: HttpMethod, route: impl Into<String>, data: Option<Data>) -> Self {
        Self {
            route: route.into(),
            data,
            method,
            overrides: None,
            expected_format: ExpectedFormat::Json,
        }
    }

    pub fn with_overrides(mut self, overrides: Option<Overrides>) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn expecting(mut self, format: ExpectedFormat) -> Self {
        self.expected_format = format;
        self
    }

    /// Resolve this spec into a wire-ready request.
    pub fn finalize(&self, defaults: &RequestDefaults) -> FinalizedRequest {
        match self.method {
            HttpMethod::Get => FinalizedRequest {
                method: HttpMethod::Get,
                mode: defaults.mode,
                headers: Vec::new(),
                body: None,
                route: match &self.data {
                    Some(data) => format!("{}{}", self.route, query_string(data)),
                    None => self.route.clone(),
                },
            },
            HttpMethod::Post | HttpMethod::Put | HttpMethod::Delete => {
                let overrides = self.overrides.as_ref();
                FinalizedRequest {
                    method: self.method,
                    mode: overrides.and_then(|o| o.mode).unwrap_or(defaults.mode),
                    headers: overrides
                        .and_then(|o| o.headers.clone())
                        .unwrap_or_else(|| defaults.headers.clone()),
                    body: Some(self.data.as_ref().map(encode_body).unwrap_or_default()),
                    route: self.route.clone(),
                }
            }
        }
    }
}

/// Build a finalized request in one step.
///
/// `expected_format` plays no part in the wire request; it is accepted so the
/// call shape matches the dispatcher's.
pub fn build(
    method: HttpMethod,
    route: &str,
    data: Option<&Data>,
    overrides: Option<&Overrides>,
    expected_format: ExpectedFormat,
    defaults: &RequestDefaults,
) -> FinalizedRequest {
    RequestSpec {
        route: route.to_string(),
        data: data.cloned(),
        method,
        overrides: overrides.cloned(),
        expected_format,
    }
    .finalize(defaults)
}

/// Convert caller data into an ordered key/value map.
///
/// `()` and `None` serialize to `null` and come back as `Ok(None)`.
pub fn to_data<D: Serialize + ?Sized>(data: &D) -> Result<Option<Data>, FetchError> {
    match serde_json::to_value(data)? {
        Value::Object(map) => Ok(Some(map)),
        Value::Null => Ok(None),
        Value::Array(_) => Err(FetchError::InvalidData { kind: "array" }),
        Value::String(_) => Err(FetchError::InvalidData { kind: "string" }),
        Value::Number(_) => Err(FetchError::InvalidData { kind: "number" }),
        Value::Bool(_) => Err(FetchError::InvalidData { kind: "bool" }),
    }
}

/// `key=value` pairs joined by `&`. Null values are omitted, objects and
/// arrays are embedded as JSON, strings are written without quotes.
pub fn encode_body(data: &Data) -> String {
    data.iter()
        .filter_map(|(key, value)| {
            let text = match value {
                Value::Null => return None,
                Value::String(s) => s.clone(),
                Value::Object(_) | Value::Array(_) => to_js_value(value).to_string(),
                Value::Number(n) => to_js_number(n).to_string(),
                Value::Bool(b) => b.to_string(),
            };
            Some(format!("{key}={text}"))
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// `?key=value&...` with every value JSON-encoded, so strings keep their
/// quotes. Empty data still yields a bare `?`.
pub fn query_string(data: &Data) -> String {
    let pairs: Vec<String> = data
        .iter()
        .map(|(key, value)| format!("{key}={}", to_js_value(value)))
        .collect();
    format!("?{}", pairs.join("&"))
}

/// Integral floats (`1.0`, `-0.0`) become integers so they print as `1` and
/// `0`, the way a JavaScript caller would send them.
fn to_js_number(n: &Number) -> Number {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < MAX_SAFE_INTEGER => {
            Number::from(f as i64)
        }
        _ => n.clone(),
    }
}

fn to_js_value(value: &Value) -> Value {
    match value {
        Value::Number(n) => Value::Number(to_js_number(n)),
        Value::Array(items) => Value::Array(items.iter().map(to_js_value).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| (key.clone(), to_js_value(value)))
                .collect(),
        ),
        other => other.clone(),
    }
}
