//! Built-in bot commands and the database-backed caller resolver.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::auth::Caller;
use crate::bot::dispatch::{CallerResolver, CommandContext, CommandHandler};
use crate::bot::update::BotUpdate;
use crate::database::manager::DatabaseManager;
use crate::database::repository::{PlayerRepository, PromptRepository, WaveRepository};
use crate::locale::{catalog, keys, Language};
use crate::services::{AnalysisProvider, TranscriptionProvider};
use crate::types::ARCHETYPES;
use crate::validation::TypedPayload;

/// Resolves the caller from the players table. Unknown chats become
/// anonymous callers, which the gate denies.
pub struct DbCallerResolver;

#[async_trait]
impl CallerResolver for DbCallerResolver {
    async fn resolve(&self, update: &BotUpdate) -> anyhow::Result<Caller> {
        let pool = DatabaseManager::pool().await?;
        let player = PlayerRepository::find_by_chat(&pool, update.chat_id).await?;

        Ok(match player {
            Some(player) => Caller {
                identity: Some(player.chat_id.to_string()),
                language: player
                    .language
                    .as_deref()
                    .and_then(Language::from_tag)
                    .or_else(|| update.language()),
                authorized: player.is_authorized,
            },
            None => Caller::anonymous(update.language()),
        })
    }
}

/// `/start` - public greeting.
pub struct StartCommand;

#[async_trait]
impl CommandHandler for StartCommand {
    fn command(&self) -> &'static str {
        "start"
    }

    fn protected(&self) -> bool {
        false
    }

    async fn execute(&self, ctx: &CommandContext, _payload: TypedPayload) -> anyhow::Result<String> {
        Ok(catalog().resolve(ctx.language, keys::BOT_START)?.to_string())
    }
}

/// `/profile` - protected; shows the player's archetype once profiled.
pub struct ProfileCommand;

#[async_trait]
impl CommandHandler for ProfileCommand {
    fn command(&self) -> &'static str {
        "profile"
    }

    async fn execute(&self, ctx: &CommandContext, _payload: TypedPayload) -> anyhow::Result<String> {
        let pool = DatabaseManager::pool().await?;
        let player = PlayerRepository::find_by_chat(&pool, ctx.chat_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("player {} vanished after gate", ctx.chat_id))?;

        let locale = catalog();
        match player.archetype.as_deref() {
            Some(code) if ARCHETYPES.contains(code) => {
                let header = locale.resolve(ctx.language, keys::BOT_PROFILE_HEADER)?;
                let name = locale.resolve(ctx.language, &ARCHETYPES.locale_key(code))?;
                Ok(format!("{header} {name}"))
            }
            _ => Ok(locale
                .resolve(ctx.language, keys::BOT_PROFILE_PENDING)?
                .to_string()),
        }
    }
}

/// `/wave <waveId> <answer>` - protected; records a submission and runs the
/// analysis prompt over it. Voice answers are transcribed first.
pub struct WaveCommand {
    analysis: Arc<dyn AnalysisProvider>,
    transcription: Arc<dyn TranscriptionProvider>,
}

impl WaveCommand {
    pub fn new(
        analysis: Arc<dyn AnalysisProvider>,
        transcription: Arc<dyn TranscriptionProvider>,
    ) -> Self {
        Self {
            analysis,
            transcription,
        }
    }
}

#[async_trait]
impl CommandHandler for WaveCommand {
    fn command(&self) -> &'static str {
        "wave"
    }

    fn schema(&self) -> Option<&'static str> {
        Some(crate::validation::registry::BOT_WAVE_PARAMS)
    }

    async fn execute(&self, ctx: &CommandContext, payload: TypedPayload) -> anyhow::Result<String> {
        let wave_id = payload
            .int("waveId")
            .ok_or_else(|| anyhow::anyhow!("validated payload missing waveId"))?;

        let answer = match &ctx.voice {
            Some(note) => {
                let hint = ctx.language.map(|l| l.tag());
                self.transcription
                    .transcribe(&note.data, &note.mime_type, hint)
                    .await?
                    .text
            }
            None => raw_text(ctx),
        };

        let pool = DatabaseManager::pool().await?;
        WaveRepository::record_submission(&pool, wave_id, ctx.chat_id, &answer).await?;

        let prompt = PromptRepository::get(&pool, "wave_analysis").await?;
        let analysis = self.analysis.generate(&prompt.value, &answer).await?;

        let accepted = catalog().resolve(ctx.language, keys::BOT_WAVE_ACCEPTED)?;
        Ok(format!("{accepted}\n\n{analysis}"))
    }
}

fn raw_text(ctx: &CommandContext) -> String {
    // The free-text remainder of the command, kept outside the schema: it
    // has no constraints and may be empty.
    ctx.raw_args
        .get("text")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
