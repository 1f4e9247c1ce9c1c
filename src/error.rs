//! Client error taxonomy
//!
//! Every failure surfaced by the services is classified into one of these
//! variants so the CLI can print a message the operator can act on.

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

use crate::forms::FieldErrors;

pub const NETWORK_ERROR_MESSAGE: &str =
    "Network error. Please check if the server is running and your internet connection is working.";
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired or invalid. Please log in again.";
pub const TIMEOUT_MESSAGE: &str = "Request timed out. The server is taking too long to respond.";

#[derive(Error, Debug)]
pub enum ClientError {
    /// No response was received, even after the configured retry.
    #[error("{message}")]
    Network {
        message: String,
        details: Option<String>,
    },

    #[error("{}", TIMEOUT_MESSAGE)]
    Timeout,

    /// The server answered 401. The local session is already cleared.
    #[error("{message}")]
    Unauthorized { message: String },

    #[error("Access forbidden: {message}")]
    Forbidden { message: String },

    #[error("{message}")]
    Validation {
        message: String,
        errors: BTreeMap<String, String>,
    },

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Form is invalid: {0}")]
    Form(FieldErrors),

    #[error("You must be logged in to do that")]
    NotAuthenticated,

    #[error("Session storage error: {0}")]
    Storage(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Request setup error: {0}")]
    Request(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;

impl ClientError {
    pub fn network(target: &str) -> Self {
        ClientError::Network {
            message: NETWORK_ERROR_MESSAGE.to_string(),
            details: Some(format!(
                "The backend server might not be running. Make sure it's started at {}.",
                target
            )),
        }
    }

    /// Build an error from a non-2xx response body.
    ///
    /// Structured field errors win, then a `message` field, then a plain
    /// string body, and finally `"<context> with status <code>"`.
    pub fn from_response(status: u16, body: &str, context: &str) -> Self {
        let parsed: Option<Value> = serde_json::from_str(body).ok();

        let message = match &parsed {
            Some(Value::Object(map)) => map
                .get("message")
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .map(str::to_string),
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            None if !body.trim().is_empty() => Some(body.trim().to_string()),
            _ => None,
        };

        if status == 401 {
            return ClientError::Unauthorized {
                message: message.unwrap_or_else(|| SESSION_EXPIRED_MESSAGE.to_string()),
            };
        }

        if status == 403 {
            return ClientError::Forbidden {
                message: message.unwrap_or_else(|| "forbidden".to_string()),
            };
        }

        if let Some(Value::Object(map)) = &parsed {
            if let Some(errors) = map.get("errors").and_then(collect_field_errors) {
                return ClientError::Validation {
                    message: message.unwrap_or_else(|| "Validation failed".to_string()),
                    errors,
                };
            }
        }

        ClientError::Api {
            status,
            message: message.unwrap_or_else(|| format!("{} with status {}", context, status)),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Unauthorized { .. } => Some(401),
            ClientError::Forbidden { .. } => Some(403),
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// The backend reports field errors either as `{"field": "msg"}` or as an
// array of `{"field": ..., "message": ...}` objects.
fn collect_field_errors(value: &Value) -> Option<BTreeMap<String, String>> {
    let mut out = BTreeMap::new();
    match value {
        Value::Object(map) => {
            for (field, msg) in map {
                let text = msg.as_str().map(str::to_string).unwrap_or_else(|| msg.to_string());
                out.insert(field.clone(), text);
            }
        }
        Value::Array(items) => {
            for (idx, item) in items.iter().enumerate() {
                match item {
                    Value::Object(obj) => {
                        let field = obj
                            .get("field")
                            .and_then(Value::as_str)
                            .map(str::to_string)
                            .unwrap_or_else(|| idx.to_string());
                        let text = obj
                            .get("message")
                            .or_else(|| obj.get("defaultMessage"))
                            .and_then(Value::as_str)
                            .unwrap_or("invalid")
                            .to_string();
                        out.insert(field, text);
                    }
                    Value::String(s) => {
                        out.insert(idx.to_string(), s.clone());
                    }
                    _ => {}
                }
            }
        }
        _ => return None,
    }
    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Storage(err.to_string())
    }
}
