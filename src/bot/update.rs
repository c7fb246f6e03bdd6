//! Inbound bot updates, normalized to a command name plus a raw argument
//! map so commands validate through the same schema registry as the REST
//! API.

use serde_json::{Map, Value};

use crate::locale::Language;

/// Voice attachment already fetched by the transport.
#[derive(Debug, Clone)]
pub struct VoiceNote {
    pub data: Vec<u8>,
    pub mime_type: String,
}

#[derive(Debug, Clone)]
pub struct BotUpdate {
    pub chat_id: i64,
    pub user_id: i64,
    /// Language tag as reported by the chat platform ("ru", "en-US", ...).
    pub language_code: Option<String>,
    pub command: String,
    /// Raw command arguments; validated against the command's schema.
    pub args: Map<String, Value>,
    pub voice: Option<VoiceNote>,
}

impl BotUpdate {
    pub fn language(&self) -> Option<Language> {
        self.language_code.as_deref().and_then(Language::from_tag)
    }
}

/// Parse a chat message into a command and positional arguments.
///
/// `/wave 3 my answer` becomes command `wave` with args
/// `{"waveId": "3", "text": "my answer"}`; plain text becomes the implicit
/// `text` command. Argument values stay as strings; schema coercion turns
/// path-like segments into integers.
pub fn parse_message(text: &str) -> (String, Map<String, Value>) {
    let trimmed = text.trim();
    let mut args = Map::new();

    let Some(rest) = trimmed.strip_prefix('/') else {
        args.insert("text".to_string(), Value::String(trimmed.to_string()));
        return ("text".to_string(), args);
    };

    let mut parts = rest.splitn(2, char::is_whitespace);
    let command = parts.next().unwrap_or_default().to_ascii_lowercase();
    let tail = parts.next().map(str::trim).unwrap_or_default();

    match command.as_str() {
        "wave" => {
            let mut tail_parts = tail.splitn(2, char::is_whitespace);
            if let Some(id) = tail_parts.next().filter(|s| !s.is_empty()) {
                args.insert("waveId".to_string(), Value::String(id.to_string()));
            }
            if let Some(answer) = tail_parts.next() {
                args.insert("text".to_string(), Value::String(answer.trim().to_string()));
            }
        }
        _ => {
            if !tail.is_empty() {
                args.insert("text".to_string(), Value::String(tail.to_string()));
            }
        }
    }

    (command, args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slash_command_with_wave_args() {
        let (command, args) = parse_message("/wave 3 I led the retro");
        assert_eq!(command, "wave");
        assert_eq!(args["waveId"], "3");
        assert_eq!(args["text"], "I led the retro");
    }

    #[test]
    fn bare_command() {
        let (command, args) = parse_message("/start");
        assert_eq!(command, "start");
        assert!(args.is_empty());
    }

    #[test]
    fn plain_text_becomes_text_command() {
        let (command, args) = parse_message("hello there");
        assert_eq!(command, "text");
        assert_eq!(args["text"], "hello there");
    }
}
