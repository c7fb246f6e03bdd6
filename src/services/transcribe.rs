//! Speech-to-text pass-through: (audio bytes, MIME type, optional language
//! hint) in, transcription out.

use std::time::Duration;

use async_trait::async_trait;

use crate::config;
use crate::services::ProviderError;

#[derive(Debug, Clone)]
pub struct Transcript {
    pub text: String,
    pub language: Option<String>,
}

#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    async fn transcribe(
        &self,
        audio: &[u8],
        mime_type: &str,
        language_hint: Option<&str>,
    ) -> Result<Transcript, ProviderError>;
}

pub struct HttpTranscriptionProvider {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl HttpTranscriptionProvider {
    pub fn from_config() -> Result<Self, ProviderError> {
        let providers = &config::config().providers;
        if providers.transcription_url.is_empty() {
            return Err(ProviderError::NotConfigured("TRANSCRIPTION_PROVIDER_URL"));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(providers.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            url: providers.transcription_url.clone(),
            api_key: providers.transcription_api_key.clone(),
        })
    }
}

#[async_trait]
impl TranscriptionProvider for HttpTranscriptionProvider {
    async fn transcribe(
        &self,
        audio: &[u8],
        mime_type: &str,
        language_hint: Option<&str>,
    ) -> Result<Transcript, ProviderError> {
        let mut request = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .header("content-type", mime_type)
            .body(audio.to_vec());

        if let Some(hint) = language_hint {
            request = request.query(&[("language", hint)]);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: serde_json::Value = response.json().await?;
        let text = body
            .get("text")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or(ProviderError::MalformedResponse("text"))?;

        Ok(Transcript {
            text,
            language: body
                .get("language")
                .and_then(|v| v.as_str())
                .map(str::to_string),
        })
    }
}
