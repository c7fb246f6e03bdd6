//! The command dispatch driver: an explicit ordered pipeline of
//! authorize -> validate -> execute -> on-fault, applied uniformly to every
//! command instead of per-handler checks.
//!
//! Expected failures (denial, validation) are handled where they occur and
//! replied to directly. An unhandled fault from a handler is caught exactly
//! once here, logged with caller and channel identifiers, and answered with
//! the localized generic-failure message; if even that reply fails, the
//! secondary failure is logged and swallowed.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::auth::{authorize, Access, Caller};
use crate::bot::transport::BotTransport;
use crate::bot::update::BotUpdate;
use crate::locale::{catalog, keys, Language};
use crate::validation::{registry, validate, TypedPayload, ValidationResult};

/// Per-command context handed to handlers after the gate and validation
/// have passed. `raw_args` carries unconstrained extras (e.g. free text)
/// that no schema field covers.
pub struct CommandContext {
    pub caller: Caller,
    pub chat_id: i64,
    pub language: Option<Language>,
    pub voice: Option<crate::bot::update::VoiceNote>,
    pub raw_args: serde_json::Map<String, serde_json::Value>,
}

#[async_trait]
pub trait CommandHandler: Send + Sync {
    fn command(&self) -> &'static str;

    /// Protected commands run the authorization gate first.
    fn protected(&self) -> bool {
        true
    }

    /// Name of the registered schema for this command's arguments, if any.
    fn schema(&self) -> Option<&'static str> {
        None
    }

    /// Business logic; runs only for an allowed caller with a valid
    /// payload. Returns the reply text.
    async fn execute(&self, ctx: &CommandContext, payload: TypedPayload) -> anyhow::Result<String>;
}

/// Supplies the caller for an update. On the bot surface authorization
/// status lives in the players table, so the resolver is async and
/// injectable; the gate itself stays pure.
#[async_trait]
pub trait CallerResolver: Send + Sync {
    async fn resolve(&self, update: &BotUpdate) -> anyhow::Result<Caller>;
}

pub struct Dispatcher {
    transport: Arc<dyn BotTransport>,
    resolver: Arc<dyn CallerResolver>,
    handlers: HashMap<&'static str, Box<dyn CommandHandler>>,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn BotTransport>, resolver: Arc<dyn CallerResolver>) -> Self {
        Self {
            transport,
            resolver,
            handlers: HashMap::new(),
        }
    }

    pub fn register(&mut self, handler: Box<dyn CommandHandler>) {
        tracing::debug!("registered bot command '{}'", handler.command());
        self.handlers.insert(handler.command(), handler);
    }

    /// Run one update through the pipeline. Never propagates a failure:
    /// every outcome ends in either a reply or a logged drop.
    pub async fn dispatch(&self, update: BotUpdate) {
        let chat_id = update.chat_id;
        let language = update.language();

        let Some(handler) = self.handlers.get(update.command.as_str()) else {
            self.reply_key(chat_id, language, keys::UNKNOWN_COMMAND).await;
            return;
        };

        // Caller resolution happens before the gate; a resolver failure is
        // an unhandled fault, not a denial.
        let caller = match self.resolver.resolve(&update).await {
            Ok(caller) => caller,
            Err(fault) => {
                tracing::error!(
                    chat_id,
                    user_id = update.user_id,
                    command = %update.command,
                    error = %fault,
                    "caller resolution failed"
                );
                self.reply_key(chat_id, language, keys::GENERAL).await;
                return;
            }
        };

        let language = caller.language.or(language);

        if handler.protected() {
            if let Access::Denied { reason_key } = authorize(&caller) {
                tracing::info!(
                    chat_id,
                    user_id = update.user_id,
                    command = %update.command,
                    "command denied"
                );
                self.reply_key(chat_id, language, reason_key).await;
                return;
            }
        }

        let payload = match handler.schema() {
            Some(name) => {
                let schema = match registry().expect(name) {
                    Ok(schema) => schema,
                    Err(fault) => {
                        // An unregistered schema is a deployment defect.
                        tracing::error!(command = %update.command, error = %fault, "schema lookup failed");
                        self.reply_key(chat_id, language, keys::GENERAL).await;
                        return;
                    }
                };
                match validate(schema, &update.args) {
                    ValidationResult::Valid(payload) => payload,
                    ValidationResult::Invalid(errors) => {
                        let text = errors
                            .iter()
                            .map(ToString::to_string)
                            .collect::<Vec<_>>()
                            .join("\n");
                        self.reply(chat_id, &text).await;
                        return;
                    }
                }
            }
            None => TypedPayload::empty(),
        };

        let ctx = CommandContext {
            caller,
            chat_id,
            language,
            voice: update.voice.clone(),
            raw_args: update.args.clone(),
        };

        match handler.execute(&ctx, payload).await {
            Ok(text) => self.reply(chat_id, &text).await,
            Err(fault) => {
                tracing::error!(
                    chat_id,
                    user_id = update.user_id,
                    command = %update.command,
                    error = %fault,
                    "command handler failed"
                );
                self.reply_key(chat_id, language, keys::GENERAL).await;
            }
        }
    }

    async fn reply_key(&self, chat_id: i64, language: Option<Language>, key: &str) {
        match catalog().resolve(language, key) {
            Ok(text) => self.reply(chat_id, text).await,
            Err(fault) => {
                tracing::error!(chat_id, error = %fault, "message key unresolvable");
            }
        }
    }

    /// Best-effort send. A delivery failure is logged and swallowed; the
    /// caller simply receives no response.
    async fn reply(&self, chat_id: i64, text: &str) {
        if let Err(e) = self.transport.send_message(chat_id, text).await {
            tracing::warn!(chat_id, error = %e, "failed to deliver reply");
        }
    }
}
