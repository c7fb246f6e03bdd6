// Bot dispatch pipeline: authorize -> validate -> execute -> on-fault.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Map, Value};

use wavecoach_api::auth::Caller;
use wavecoach_api::bot::{
    BotTransport, BotUpdate, CallerResolver, CommandContext, CommandHandler, Dispatcher,
    TransportError,
};
use wavecoach_api::locale::Language;
use wavecoach_api::validation::registry::BOT_WAVE_PARAMS;
use wavecoach_api::validation::TypedPayload;

/// Records outbound messages; optionally fails every send.
struct RecordingTransport {
    sent: Mutex<Vec<(i64, String)>>,
    fail_sends: bool,
}

impl RecordingTransport {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            fail_sends: false,
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            fail_sends: true,
        })
    }

    fn messages(&self) -> Vec<(i64, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl BotTransport for RecordingTransport {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TransportError> {
        if self.fail_sends {
            return Err(TransportError::Status {
                status: 502,
                body: "simulated outage".to_string(),
            });
        }
        self.sent.lock().unwrap().push((chat_id, text.to_string()));
        Ok(())
    }
}

struct FixedResolver {
    caller: Caller,
}

#[async_trait]
impl CallerResolver for FixedResolver {
    async fn resolve(&self, _update: &BotUpdate) -> anyhow::Result<Caller> {
        Ok(self.caller.clone())
    }
}

/// Counts executions and remembers the validated waveId.
struct ProbeHandler {
    executions: Arc<AtomicUsize>,
    seen_wave_id: Arc<Mutex<Option<i64>>>,
    fail: bool,
}

#[async_trait]
impl CommandHandler for ProbeHandler {
    fn command(&self) -> &'static str {
        "wave"
    }

    fn schema(&self) -> Option<&'static str> {
        Some(BOT_WAVE_PARAMS)
    }

    async fn execute(&self, _ctx: &CommandContext, payload: TypedPayload) -> anyhow::Result<String> {
        self.executions.fetch_add(1, Ordering::SeqCst);
        *self.seen_wave_id.lock().unwrap() = payload.int("waveId");
        if self.fail {
            anyhow::bail!("simulated downstream fault");
        }
        Ok("recorded".to_string())
    }
}

fn update(command: &str, args: Value, language: Option<&str>) -> BotUpdate {
    let args = match args {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        _ => panic!("args must be an object"),
    };
    BotUpdate {
        chat_id: 100,
        user_id: 7,
        language_code: language.map(str::to_string),
        command: command.to_string(),
        args,
        voice: None,
    }
}

fn authorized_caller(language: Option<Language>) -> Caller {
    Caller {
        identity: Some("7".to_string()),
        language,
        authorized: true,
    }
}

fn dispatcher(
    transport: Arc<RecordingTransport>,
    caller: Caller,
    handler: ProbeHandler,
) -> Dispatcher {
    let mut dispatcher = Dispatcher::new(transport, Arc::new(FixedResolver { caller }));
    dispatcher.register(Box::new(handler));
    dispatcher
}

fn probe(fail: bool) -> (ProbeHandler, Arc<AtomicUsize>, Arc<Mutex<Option<i64>>>) {
    let executions = Arc::new(AtomicUsize::new(0));
    let seen = Arc::new(Mutex::new(None));
    (
        ProbeHandler {
            executions: executions.clone(),
            seen_wave_id: seen.clone(),
            fail,
        },
        executions,
        seen,
    )
}

#[tokio::test]
async fn unauthorized_caller_never_reaches_the_handler() {
    let transport = RecordingTransport::new();
    let (handler, executions, _) = probe(false);
    let caller = Caller {
        identity: Some("7".to_string()),
        language: Some(Language::Ru),
        authorized: false,
    };
    let dispatcher = dispatcher(transport.clone(), caller, handler);

    dispatcher
        .dispatch(update("wave", serde_json::json!({"waveId": "3"}), Some("ru")))
        .await;

    assert_eq!(executions.load(Ordering::SeqCst), 0);
    let messages = transport.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].1, "У вас нет доступа к этой команде.");
}

#[tokio::test]
async fn denial_falls_back_to_english_for_unsupported_language() {
    let transport = RecordingTransport::new();
    let (handler, executions, _) = probe(false);
    let caller = Caller {
        identity: Some("7".to_string()),
        language: None,
        authorized: false,
    };
    let dispatcher = dispatcher(transport.clone(), caller, handler);

    dispatcher
        .dispatch(update("wave", serde_json::json!({"waveId": "3"}), Some("fr")))
        .await;

    assert_eq!(executions.load(Ordering::SeqCst), 0);
    let messages = transport.messages();
    assert_eq!(messages[0].1, "You are not authorized to use this command.");
}

#[tokio::test]
async fn invalid_arguments_are_rejected_before_the_handler() {
    let transport = RecordingTransport::new();
    let (handler, executions, _) = probe(false);
    let dispatcher = dispatcher(transport.clone(), authorized_caller(Some(Language::En)), handler);

    dispatcher
        .dispatch(update("wave", serde_json::json!({"waveId": "0"}), Some("en")))
        .await;

    assert_eq!(executions.load(Ordering::SeqCst), 0);
    let messages = transport.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].1.contains("waveId"));
    assert!(messages[0].1.contains("positive"));
}

#[tokio::test]
async fn valid_command_reaches_the_handler_with_typed_payload() {
    let transport = RecordingTransport::new();
    let (handler, executions, seen) = probe(false);
    let dispatcher = dispatcher(transport.clone(), authorized_caller(Some(Language::En)), handler);

    dispatcher
        .dispatch(update("wave", serde_json::json!({"waveId": "5"}), Some("en")))
        .await;

    assert_eq!(executions.load(Ordering::SeqCst), 1);
    assert_eq!(*seen.lock().unwrap(), Some(5));
    let messages = transport.messages();
    assert_eq!(messages[0].1, "recorded");
}

#[tokio::test]
async fn handler_fault_becomes_localized_generic_message() {
    let transport = RecordingTransport::new();
    let (handler, executions, _) = probe(true);
    let dispatcher = dispatcher(transport.clone(), authorized_caller(Some(Language::Ru)), handler);

    dispatcher
        .dispatch(update("wave", serde_json::json!({"waveId": "5"}), Some("ru")))
        .await;

    assert_eq!(executions.load(Ordering::SeqCst), 1);
    let messages = transport.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].1, "Что-то пошло не так. Попробуйте позже.");
}

#[tokio::test]
async fn secondary_send_failure_is_swallowed() {
    let transport = RecordingTransport::failing();
    let (handler, _, _) = probe(true);
    let dispatcher = dispatcher(transport.clone(), authorized_caller(None), handler);

    // Both the fault reply and any other send fail; dispatch must still
    // return normally.
    dispatcher
        .dispatch(update("wave", serde_json::json!({"waveId": "5"}), None))
        .await;

    assert!(transport.messages().is_empty());
}

#[tokio::test]
async fn unknown_command_gets_a_localized_hint() {
    let transport = RecordingTransport::new();
    let (handler, executions, _) = probe(false);
    let dispatcher = dispatcher(transport.clone(), authorized_caller(Some(Language::En)), handler);

    dispatcher.dispatch(update("frobnicate", Value::Null, Some("en"))).await;

    assert_eq!(executions.load(Ordering::SeqCst), 0);
    let messages = transport.messages();
    assert!(messages[0].1.contains("Unknown command"));
}
