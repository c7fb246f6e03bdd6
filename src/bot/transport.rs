//! Outbound/inbound chat transport. The dispatcher only sees the trait;
//! the HTTP implementation speaks a Telegram-style bot API.

use async_trait::async_trait;
use serde_json::{json, Value};
use thiserror::Error;

use crate::bot::update::{parse_message, BotUpdate, VoiceNote};
use crate::config;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("transport returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("transport response malformed: {0}")]
    MalformedResponse(&'static str),
}

#[async_trait]
pub trait BotTransport: Send + Sync {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TransportError>;
}

pub struct HttpBotTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBotTransport {
    pub fn from_config() -> Result<Self, TransportError> {
        let bot = &config::config().bot;
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            base_url: format!("{}/bot{}", bot.api_url.trim_end_matches('/'), bot.token),
        })
    }

    async fn call(&self, method: &str, payload: Value) -> Result<Value, TransportError> {
        let response = self
            .client
            .post(format!("{}/{}", self.base_url, method))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response.json().await?;
        body.get("result")
            .cloned()
            .ok_or(TransportError::MalformedResponse("result"))
    }

    /// Long-poll for updates and normalize them into `BotUpdate`s. Voice
    /// attachments are downloaded here so downstream code never does
    /// transport I/O.
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<(i64, BotUpdate)>, TransportError> {
        let timeout = config::config().bot.poll_timeout_secs;
        let result = self
            .call(
                "getUpdates",
                json!({ "offset": offset, "timeout": timeout }),
            )
            .await?;

        let raw_updates = result
            .as_array()
            .ok_or(TransportError::MalformedResponse("result array"))?;

        let mut updates = Vec::new();
        for raw in raw_updates {
            let Some(update_id) = raw.get("update_id").and_then(Value::as_i64) else {
                continue;
            };
            let Some(message) = raw.get("message") else {
                continue;
            };
            let Some(chat_id) = message.pointer("/chat/id").and_then(Value::as_i64) else {
                continue;
            };
            let Some(user_id) = message.pointer("/from/id").and_then(Value::as_i64) else {
                continue;
            };
            let language_code = message
                .pointer("/from/language_code")
                .and_then(Value::as_str)
                .map(str::to_string);

            let text = message.get("text").and_then(Value::as_str).unwrap_or_default();
            let (command, args) = parse_message(text);

            let voice = match message.pointer("/voice/file_id").and_then(Value::as_str) {
                Some(file_id) => match self.download_voice(file_id).await {
                    Ok(note) => Some(note),
                    Err(e) => {
                        tracing::warn!(chat_id, error = %e, "failed to fetch voice attachment");
                        None
                    }
                },
                None => None,
            };

            updates.push((
                update_id,
                BotUpdate {
                    chat_id,
                    user_id,
                    language_code,
                    command,
                    args,
                    voice,
                },
            ));
        }

        Ok(updates)
    }

    async fn download_voice(&self, file_id: &str) -> Result<VoiceNote, TransportError> {
        let result = self.call("getFile", json!({ "file_id": file_id })).await?;
        let path = result
            .get("file_path")
            .and_then(Value::as_str)
            .ok_or(TransportError::MalformedResponse("file_path"))?;

        let bot = &config::config().bot;
        let url = format!(
            "{}/file/bot{}/{}",
            bot.api_url.trim_end_matches('/'),
            bot.token,
            path
        );
        let response = self.client.get(url).send().await?;
        let data = response.bytes().await?.to_vec();

        Ok(VoiceNote {
            data,
            mime_type: "audio/ogg".to_string(),
        })
    }
}

#[async_trait]
impl BotTransport for HttpBotTransport {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TransportError> {
        self.call("sendMessage", json!({ "chat_id": chat_id, "text": text }))
            .await?;
        Ok(())
    }
}
