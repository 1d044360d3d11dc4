use serde::{Deserialize, Serialize};

use crate::domain::{deserialize_optional_count, Breakdown};

pub const DEFAULT_FILE_NAME: &str = "uploaded.py";
pub const DEFAULT_LANGUAGE: &str = "python";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub code_content: String,
    pub file_name: String,
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub existing_tests: Option<String>,
}

impl GenerationRequest {
    pub fn new(code_content: impl Into<String>) -> Self {
        Self {
            code_content: code_content.into(),
            file_name: DEFAULT_FILE_NAME.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            existing_tests: None,
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_existing_tests(mut self, existing_tests: Option<String>) -> Self {
        self.existing_tests = existing_tests;
        self
    }
}

/// Success body of `POST /generate-tests`. Every field may be absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationResponse {
    #[serde(default)]
    pub test_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage_estimate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakdown_stats: Option<Breakdown>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_tests: Option<u32>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub tested_functions: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiMode {
    Connected,
    MissingKey,
    #[serde(other)]
    Unknown,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: String,
    pub ai_mode: AiMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiConnection {
    Connected,
    Error,
    NotConfigured,
    #[serde(other)]
    Unknown,
}

/// Body of `GET /ai-status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiStatus {
    pub status: AiConnection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Body of `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub message: String,
    pub status: String,
    #[serde(default)]
    pub ai_enabled: bool,
}

/// Body of `POST /analyze-code` and `POST /analyze-tests`. The analysis itself is model output
/// and has no fixed shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub success: bool,
    #[serde(default)]
    pub analysis: serde_json::Value,
}
