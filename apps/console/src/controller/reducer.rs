//! Form state and its transitions. The view is one enum replaced as a whole on every
//! transition; the renderer only ever sees immutable snapshots.

use client_core::GenerationResult;
#[cfg(test)]
use shared::domain::{Breakdown, CoveragePercent};
use shared::{
    domain::RequestToken,
    error::ServiceCallError,
    protocol::GenerationRequest,
};
use tracing::{debug, info, warn};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorCategory, UiEvent};

pub const EMPTY_INPUT_NOTICE: &str = "Please paste some code first.";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Idle,
    Loading {
        token: RequestToken,
    },
    Result(GenerationResult),
    Error(UiError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSnapshot {
    pub view: ViewState,
    pub notice: Option<String>,
}

impl ViewSnapshot {
    /// Process exit status for a finished session: 0 on success, 1 for a rejected input or a
    /// service error, 2 when the service could not be reached.
    pub fn exit_status(&self) -> u8 {
        match &self.view {
            ViewState::Error(error) if error.category() == UiErrorCategory::Transport => 2,
            ViewState::Error(_) => 1,
            _ if self.notice.is_some() => 1,
            _ => 0,
        }
    }
}

#[cfg(test)]
impl ViewSnapshot {
    pub fn is_loading(&self) -> bool {
        matches!(self.view, ViewState::Loading { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self.view, ViewState::Error(_))
    }

    pub fn output(&self) -> Option<&str> {
        match &self.view {
            ViewState::Result(result) => Some(&result.test_code),
            ViewState::Error(error) => Some(error.output()),
            ViewState::Idle | ViewState::Loading { .. } => None,
        }
    }

    pub fn coverage(&self) -> Option<CoveragePercent> {
        match &self.view {
            ViewState::Result(result) => Some(result.coverage),
            _ => None,
        }
    }

    pub fn breakdown(&self) -> Option<&Breakdown> {
        match &self.view {
            ViewState::Result(result) => Some(&result.breakdown),
            _ => None,
        }
    }
}

pub struct Controller {
    service_url: String,
    request_template: GenerationRequest,
    view: ViewState,
    notice: Option<String>,
    latest_token: RequestToken,
}

impl Controller {
    /// `request_template` supplies every request field except the code.
    pub fn new(service_url: impl Into<String>, request_template: GenerationRequest) -> Self {
        Self {
            service_url: service_url.into(),
            request_template,
            view: ViewState::Idle,
            notice: None,
            latest_token: RequestToken(0),
        }
    }

    /// Returns the command to queue, or `None` when the input was rejected.
    pub fn submit(&mut self, source_code: &str) -> Option<BackendCommand> {
        if source_code.trim().is_empty() {
            self.notice = Some(EMPTY_INPUT_NOTICE.to_string());
            return None;
        }

        let token = self.latest_token.next();
        self.latest_token = token;
        self.notice = None;
        self.view = ViewState::Loading { token };

        let request = GenerationRequest {
            code_content: source_code.to_string(),
            ..self.request_template.clone()
        };
        info!(%token, code_bytes = source_code.len(), "submitting code for test generation");
        Some(BackendCommand::Generate { token, request })
    }

    /// Applies a backend event. Returns whether the view changed.
    pub fn apply(&mut self, event: UiEvent) -> bool {
        match event {
            UiEvent::GenerationSettled { token, outcome } => self.settle(token, outcome),
            UiEvent::Input(_) => false,
        }
    }

    /// Settles a token whose command never reached the backend worker.
    pub fn dispatch_failed(&mut self, token: RequestToken, reason: impl Into<String>) -> bool {
        self.settle(token, Err(ServiceCallError::Transport(reason.into())))
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            view: self.view.clone(),
            notice: self.notice.clone(),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.view, ViewState::Loading { .. })
    }

    #[cfg(test)]
    pub fn latest_token(&self) -> RequestToken {
        self.latest_token
    }

    fn settle(
        &mut self,
        token: RequestToken,
        outcome: Result<GenerationResult, ServiceCallError>,
    ) -> bool {
        let pending = match self.view {
            ViewState::Loading { token: pending } => pending,
            _ => {
                debug!(%token, "ignoring generation result with no pending request");
                return false;
            }
        };
        if token != pending {
            debug!(%token, latest = %pending, "discarding superseded generation result");
            return false;
        }

        self.view = match outcome {
            Ok(result) => {
                info!(
                    %token,
                    coverage = result.coverage.value(),
                    total_tests = result.total_tests,
                    "generation finished"
                );
                ViewState::Result(result)
            }
            Err(err) => {
                warn!(%token, error = %err, "generation failed");
                ViewState::Error(UiError::from_call_error(&err, &self.service_url))
            }
        };
        true
    }
}

#[cfg(test)]
#[path = "tests/reducer_tests.rs"]
mod tests;
