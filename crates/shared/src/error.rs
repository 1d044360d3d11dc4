use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shown when a failed response carries no usable `detail`.
pub const UNKNOWN_SERVER_ERROR: &str = "Unknown Server Error";

/// Error body the generation service attaches to non-2xx responses. `detail` is usually a
/// string but request validation failures report a list of objects.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<serde_json::Value>,
}

impl ErrorDetail {
    /// String details as-is, structured ones as compact JSON.
    pub fn message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::Null => None,
            serde_json::Value::String(detail) => Some(detail.clone()),
            other => Some(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceCallError {
    /// The service answered with a non-2xx status.
    #[error("service returned {status}: {}", detail_text(.detail))]
    Service { status: u16, detail: Option<String> },
    /// No response was obtained.
    #[error("{0}")]
    Transport(String),
    /// A 2xx response whose body did not match the contract.
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl ServiceCallError {
    pub fn service(status: u16, detail: Option<String>) -> Self {
        Self::Service { status, detail }
    }

    /// Message shown in place of generated output for service-side failures.
    pub fn detail_or_fallback(&self) -> String {
        match self {
            ServiceCallError::Service { detail, .. } => detail_text(detail).to_string(),
            ServiceCallError::Decode(_) => self.to_string(),
            ServiceCallError::Transport(message) => message.clone(),
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ServiceCallError::Transport(_))
    }
}

/// Only a missing or empty detail falls back; whitespace is the service's own message.
fn detail_text(detail: &Option<String>) -> &str {
    detail
        .as_deref()
        .filter(|detail| !detail.is_empty())
        .unwrap_or(UNKNOWN_SERVER_ERROR)
}
