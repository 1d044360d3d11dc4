//! Backend commands queued from UI to backend worker.

use shared::{domain::RequestToken, protocol::GenerationRequest};

#[derive(Debug)]
pub enum BackendCommand {
    Generate {
        token: RequestToken,
        request: GenerationRequest,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Generate { .. } => "generate",
        }
    }

    pub fn token(&self) -> RequestToken {
        match self {
            BackendCommand::Generate { token, .. } => *token,
        }
    }
}
