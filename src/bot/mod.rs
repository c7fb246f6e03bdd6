pub mod commands;
pub mod dispatch;
pub mod transport;
pub mod update;

pub use dispatch::{CallerResolver, CommandContext, CommandHandler, Dispatcher};
pub use transport::{BotTransport, HttpBotTransport, TransportError};
pub use update::{BotUpdate, VoiceNote};
