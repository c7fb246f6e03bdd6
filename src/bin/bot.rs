// Long-polling bot front end. Every update runs through the dispatch
// pipeline: authorize -> validate -> execute -> on-fault.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use wavecoach_api::bot::commands::{DbCallerResolver, ProfileCommand, StartCommand, WaveCommand};
use wavecoach_api::bot::{Dispatcher, HttpBotTransport};
use wavecoach_api::services::{HttpAnalysisProvider, HttpTranscriptionProvider};
use wavecoach_api::{config, locale, validation};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let config = config::config();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting wavecoach bot in {:?} mode", config.environment);

    // Same fail-fast startup checks as the API server.
    validation::registry();
    locale::catalog()
        .verify()
        .unwrap_or_else(|e| panic!("locale configuration fault: {e}"));

    if config.bot.token.is_empty() {
        anyhow::bail!("BOT_TOKEN is not configured");
    }

    let transport = Arc::new(HttpBotTransport::from_config().context("bot transport")?);
    let analysis = Arc::new(HttpAnalysisProvider::from_config().context("analysis provider")?);
    let transcription =
        Arc::new(HttpTranscriptionProvider::from_config().context("transcription provider")?);

    let mut dispatcher = Dispatcher::new(transport.clone(), Arc::new(DbCallerResolver));
    dispatcher.register(Box::new(StartCommand));
    dispatcher.register(Box::new(ProfileCommand));
    dispatcher.register(Box::new(WaveCommand::new(analysis, transcription)));

    let mut offset = 0i64;
    loop {
        match transport.get_updates(offset).await {
            Ok(updates) => {
                for (update_id, update) in updates {
                    offset = offset.max(update_id + 1);
                    dispatcher.dispatch(update).await;
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "polling failed, backing off");
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
        }
    }
}
