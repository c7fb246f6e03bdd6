//! LLM text-generation provider, treated as an opaque remote call.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::config;
use crate::services::ProviderError;

#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    /// Generate analysis text from a prompt template and user input.
    async fn generate(&self, prompt: &str, input: &str) -> Result<String, ProviderError>;
}

pub struct HttpAnalysisProvider {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl HttpAnalysisProvider {
    pub fn from_config() -> Result<Self, ProviderError> {
        let providers = &config::config().providers;
        if providers.analysis_url.is_empty() {
            return Err(ProviderError::NotConfigured("ANALYSIS_PROVIDER_URL"));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(providers.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            url: providers.analysis_url.clone(),
            api_key: providers.analysis_api_key.clone(),
        })
    }
}

#[async_trait]
impl AnalysisProvider for HttpAnalysisProvider {
    async fn generate(&self, prompt: &str, input: &str) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "prompt": prompt,
                "input": input,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: serde_json::Value = response.json().await?;
        body.get("text")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or(ProviderError::MalformedResponse("text"))
    }
}
