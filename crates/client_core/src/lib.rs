use std::error::Error as StdError;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Breakdown, CoveragePercent},
    error::{ErrorDetail, ServiceCallError},
    protocol::{
        AiStatus, AnalysisResponse, GenerationRequest, GenerationResponse, HealthStatus,
        ServiceInfo,
    },
};
use tracing::{info, warn};

pub mod config;

pub use config::{load_settings, normalize_service_url, Settings, SettingsError};

/// Generated tests plus the statistics the service reported for them, with absent fields
/// resolved to their documented defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub test_code: String,
    pub coverage: CoveragePercent,
    pub breakdown: Breakdown,
    pub total_tests: u32,
    pub tested_functions: u32,
    pub explanation: Option<String>,
}

impl From<GenerationResponse> for GenerationResult {
    fn from(response: GenerationResponse) -> Self {
        Self {
            test_code: response.test_code,
            coverage: CoveragePercent::from_estimate(response.coverage_estimate),
            breakdown: response.breakdown_stats.unwrap_or_default(),
            total_tests: response.total_tests.unwrap_or(0),
            tested_functions: response.tested_functions.unwrap_or(0),
            explanation: response
                .explanation
                .filter(|explanation| !explanation.trim().is_empty()),
        }
    }
}

#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn generate_tests(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, ServiceCallError>;
}

/// HTTP client for the test generation service.
#[derive(Clone)]
pub struct GenerationClient {
    http: Client,
    service_url: String,
}

impl GenerationClient {
    pub fn new(service_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            service_url: service_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn service_url(&self) -> &str {
        &self.service_url
    }

    pub async fn service_info(&self) -> Result<ServiceInfo, ServiceCallError> {
        self.send_json(self.http.get(self.url("/"))).await
    }

    pub async fn health(&self) -> Result<HealthStatus, ServiceCallError> {
        self.send_json(self.http.get(self.url("/health"))).await
    }

    pub async fn ai_status(&self) -> Result<AiStatus, ServiceCallError> {
        self.send_json(self.http.get(self.url("/ai-status"))).await
    }

    pub async fn analyze_code(
        &self,
        request: &GenerationRequest,
    ) -> Result<AnalysisResponse, ServiceCallError> {
        self.send_json(self.http.post(self.url("/analyze-code")).json(request))
            .await
    }

    pub async fn analyze_tests(
        &self,
        request: &GenerationRequest,
    ) -> Result<AnalysisResponse, ServiceCallError> {
        self.send_json(self.http.post(self.url("/analyze-tests")).json(request))
            .await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.service_url)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ServiceCallError> {
        let response = request
            .send()
            .await
            .map_err(|err| ServiceCallError::Transport(error_chain(&err)))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            return Err(ServiceCallError::service(
                status.as_u16(),
                detail_from_body(&body),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| ServiceCallError::Transport(error_chain(&err)))?;
        serde_json::from_slice(&body).map_err(|err| ServiceCallError::Decode(err.to_string()))
    }
}

#[async_trait]
impl GenerationService for GenerationClient {
    async fn generate_tests(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, ServiceCallError> {
        info!(
            service_url = %self.service_url,
            file_name = %request.file_name,
            language = %request.language,
            code_bytes = request.code_content.len(),
            "requesting test generation"
        );
        let response: GenerationResponse = self
            .send_json(self.http.post(self.url("/generate-tests")).json(request))
            .await
            .map_err(|err| {
                warn!(service_url = %self.service_url, error = %err, "test generation failed");
                err
            })?;
        Ok(response.into())
    }
}

/// Bodies that are not JSON, or carry no detail, yield `None`.
fn detail_from_body(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorDetail>(body).ok()?.message()
}

/// Renders an error followed by its source chain; reqwest's own message omits the cause.
fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
