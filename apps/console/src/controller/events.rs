//! UI/backend events and error modeling for the console controller.

use client_core::GenerationResult;
use shared::{domain::RequestToken, error::ServiceCallError};

pub enum UiEvent {
    /// Exactly one per queued generation command, whatever the outcome.
    GenerationSettled {
        token: RequestToken,
        outcome: Result<GenerationResult, ServiceCallError>,
    },
    Input(InputEvent),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Submit(String),
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    /// The service answered with an error status or an unreadable body.
    Service,
    /// No response was obtained.
    Transport,
}

/// Error text shown in the output slot in place of generated tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiError {
    category: UiErrorCategory,
    output: String,
}

impl UiError {
    pub fn from_call_error(err: &ServiceCallError, service_url: &str) -> Self {
        match err {
            ServiceCallError::Transport(message) => Self {
                category: UiErrorCategory::Transport,
                output: format!(
                    "# Connectivity Error: {message}\n# Make sure the test generation service is running at {service_url}."
                ),
            },
            ServiceCallError::Service { .. } | ServiceCallError::Decode(_) => Self {
                category: UiErrorCategory::Service,
                output: format!("# Error: {}", err.detail_or_fallback()),
            },
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn output(&self) -> &str {
        &self.output
    }
}
