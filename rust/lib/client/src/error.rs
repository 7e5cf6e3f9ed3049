use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::session::StoreError;

// ── Error ───────────────────────────────────────────────────────────

/// Client-side API error.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No access token stored. The login redirect has already been issued.
    #[error("login required")]
    LoginRequired,

    /// HTTP 401/403.
    #[error("HTTP {status}: {body}")]
    Auth { status: u16, body: ErrorBody },

    /// Any other non-2xx response.
    #[error("HTTP {status}: {body}")]
    Rejected { status: u16, body: ErrorBody },

    #[error("network: {0}")]
    Network(#[from] reqwest::Error),

    #[error("decode: {0}")]
    Decode(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("session store: {0}")]
    Store(#[from] StoreError),
}

/// Coarse classification of an [`ApiError`] by cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Auth,
    Validation,
    Network,
    Storage,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::LoginRequired | ApiError::Auth { .. } => ErrorKind::Auth,
            ApiError::Rejected { .. } | ApiError::Decode(_) | ApiError::InvalidRequest(_) => {
                ErrorKind::Validation
            }
            ApiError::Network(_) => ErrorKind::Network,
            ApiError::Store(_) => ErrorKind::Storage,
        }
    }

    /// HTTP status of the response, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Auth { status, .. } | ApiError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// One display string for the failure, suitable for an inline message.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::LoginRequired => "You need to be logged in.".to_string(),
            ApiError::Auth { status: 401, .. } => {
                "Your session has expired. Please log in again.".to_string()
            }
            ApiError::Auth { body, .. } => format!("Not allowed: {}", body),
            ApiError::Rejected { body, .. } => format!("Error: {}", body),
            ApiError::Network(_) => "Could not connect to the server.".to_string(),
            ApiError::Decode(msg) => format!("Unexpected response from the server: {}", msg),
            ApiError::InvalidRequest(msg) => format!("Invalid request: {}", msg),
            ApiError::Store(e) => format!("Could not access the stored session: {}", e),
        }
    }
}

// ── Error payload ───────────────────────────────────────────────────

/// Error payload returned by the server, normalized to a known set of shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorBody {
    /// `{"detail": "..."}`
    Detail(String),
    /// `{"field": ["msg", ...], ...}`, including `non_field_errors`.
    Fields(BTreeMap<String, Vec<String>>),
    /// `["msg", ...]`
    Messages(Vec<String>),
    /// Any other JSON document.
    Json(Value),
    /// Body that is not JSON at all.
    Text(String),
}

impl ErrorBody {
    /// Parse a raw response body.
    pub fn parse(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => Self::from_value(value),
            Err(_) => ErrorBody::Text(raw.trim().to_string()),
        }
    }

    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => {
                if let Some(Value::String(detail)) = map.get("detail") {
                    return ErrorBody::Detail(detail.clone());
                }
                let fields: Option<BTreeMap<String, Vec<String>>> = map
                    .iter()
                    .map(|(key, v)| messages_of(v).map(|msgs| (key.clone(), msgs)))
                    .collect();
                match fields {
                    Some(fields) if !fields.is_empty() => ErrorBody::Fields(fields),
                    _ => ErrorBody::Json(Value::Object(map)),
                }
            }
            Value::Array(_) => match messages_of(&value) {
                Some(msgs) => ErrorBody::Messages(msgs),
                None => ErrorBody::Json(value),
            },
            Value::String(s) => ErrorBody::Text(s),
            other => ErrorBody::Json(other),
        }
    }

    /// Messages attached to one field, if the body is a field map.
    pub fn field(&self, name: &str) -> Option<&[String]> {
        match self {
            ErrorBody::Fields(fields) => fields.get(name).map(Vec::as_slice),
            _ => None,
        }
    }
}

/// A string or a list of strings.
fn messages_of(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::String(s) => Some(vec![s.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => None,
    }
}

impl fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorBody::Detail(detail) => f.write_str(detail),
            ErrorBody::Fields(fields) => {
                let parts: Vec<String> = fields
                    .iter()
                    .map(|(field, msgs)| format!("{}: {}", field, msgs.join(", ")))
                    .collect();
                f.write_str(&parts.join("; "))
            }
            ErrorBody::Messages(msgs) => f.write_str(&msgs.join("; ")),
            ErrorBody::Json(value) => write!(f, "{}", value),
            ErrorBody::Text(text) if text.is_empty() => f.write_str("no details"),
            ErrorBody::Text(text) => f.write_str(text),
        }
    }
}
