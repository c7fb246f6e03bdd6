//! Message localization with a deterministic default-language fallback.
//!
//! Bundles are built once at startup and never mutated. Startup verification
//! treats a missing required key, or a missing entry for a surfaced enum
//! value, as a configuration fault rather than a runtime error.

use std::collections::HashMap;
use std::sync::OnceLock;

use thiserror::Error;

use crate::types::SURFACED_SETS;

pub mod keys {
    pub const NOT_AUTHORIZED: &str = "errors.notAuthorized";
    pub const GENERAL: &str = "errors.general";
    pub const UNKNOWN_COMMAND: &str = "errors.unknownCommand";
    pub const BOT_START: &str = "bot.start";
    pub const BOT_WAVE_ACCEPTED: &str = "bot.waveAccepted";
    pub const BOT_PROFILE_HEADER: &str = "bot.profileHeader";
    pub const BOT_PROFILE_PENDING: &str = "bot.profilePending";
}

/// Supported caller languages. English is the designated default and its
/// bundle must be complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    En,
    Ru,
}

impl Language {
    pub const DEFAULT: Language = Language::En;

    pub const ALL: &'static [Language] = &[Language::En, Language::Ru];

    /// Parse an IETF-ish tag from the surrounding framework ("ru",
    /// "ru-RU"). Unsupported tags resolve to `None` and fall back.
    pub fn from_tag(tag: &str) -> Option<Language> {
        match tag.split(['-', '_']).next().map(str::to_ascii_lowercase).as_deref() {
            Some("en") => Some(Language::En),
            Some("ru") => Some(Language::Ru),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ru => "ru",
        }
    }
}

#[derive(Debug, Error)]
pub enum LocaleError {
    #[error("message key '{key}' missing from the default ({default}) bundle")]
    MissingKey { key: String, default: &'static str },

    #[error("enum value '{value}' of set '{set}' has no non-empty entry for language '{language}'")]
    MissingEnumEntry {
        set: &'static str,
        value: &'static str,
        language: &'static str,
    },
}

const EN_MESSAGES: &[(&str, &str)] = &[
    (keys::NOT_AUTHORIZED, "You are not authorized to use this command."),
    (keys::GENERAL, "Something went wrong. Please try again later."),
    (keys::UNKNOWN_COMMAND, "Unknown command. Send /start to see what I can do."),
    (keys::BOT_START, "Welcome! Complete your waves and I will profile your archetype."),
    (keys::BOT_WAVE_ACCEPTED, "Your wave submission has been recorded."),
    (keys::BOT_PROFILE_HEADER, "Your archetype:"),
    (keys::BOT_PROFILE_PENDING, "Your profile is not ready yet. Finish your current wave first."),
    ("prompts.wave_intro", "Wave introduction prompt"),
    ("prompts.wave_analysis", "Wave analysis prompt"),
    ("prompts.archetype_profile", "Archetype profiling prompt"),
    ("prompts.final_report", "Final report prompt"),
    ("archetypes.strategist", "Strategist"),
    ("archetypes.diplomat", "Diplomat"),
    ("archetypes.vanguard", "Vanguard"),
    ("archetypes.anchor", "Anchor"),
];

const RU_MESSAGES: &[(&str, &str)] = &[
    (keys::NOT_AUTHORIZED, "У вас нет доступа к этой команде."),
    (keys::GENERAL, "Что-то пошло не так. Попробуйте позже."),
    (keys::UNKNOWN_COMMAND, "Неизвестная команда. Отправьте /start, чтобы узнать, что я умею."),
    (keys::BOT_START, "Добро пожаловать! Пройдите волны, и я определю ваш архетип."),
    (keys::BOT_WAVE_ACCEPTED, "Ваш ответ по волне записан."),
    (keys::BOT_PROFILE_HEADER, "Ваш архетип:"),
    (keys::BOT_PROFILE_PENDING, "Профиль ещё не готов. Сначала завершите текущую волну."),
    ("prompts.wave_intro", "Промпт вступления к волне"),
    ("prompts.wave_analysis", "Промпт анализа волны"),
    ("prompts.archetype_profile", "Промпт профилирования архетипа"),
    ("prompts.final_report", "Промпт финального отчёта"),
    ("archetypes.strategist", "Стратег"),
    ("archetypes.diplomat", "Дипломат"),
    ("archetypes.vanguard", "Авангард"),
    ("archetypes.anchor", "Якорь"),
];

/// Keys that every deployment must be able to surface.
const REQUIRED_KEYS: &[&str] = &[keys::NOT_AUTHORIZED, keys::GENERAL];

/// One bundle per supported language plus the fallback rule.
pub struct MessageCatalog {
    bundles: HashMap<Language, HashMap<&'static str, &'static str>>,
}

impl MessageCatalog {
    fn built_in() -> Self {
        let mut bundles = HashMap::new();
        bundles.insert(Language::En, EN_MESSAGES.iter().copied().collect());
        bundles.insert(Language::Ru, RU_MESSAGES.iter().copied().collect());
        Self { bundles }
    }

    /// Resolve a key for a caller. Tries the caller's language first; an
    /// unsupported language or a miss in its bundle falls back to the
    /// default bundle. A miss even there is a configuration fault.
    pub fn resolve(&self, language: Option<Language>, key: &str) -> Result<&'static str, LocaleError> {
        if let Some(lang) = language {
            if let Some(text) = self.bundles.get(&lang).and_then(|b| b.get(key)).copied() {
                return Ok(text);
            }
        }

        self.bundles
            .get(&Language::DEFAULT)
            .and_then(|b| b.get(key))
            .copied()
            .ok_or_else(|| LocaleError::MissingKey {
                key: key.to_string(),
                default: Language::DEFAULT.tag(),
            })
    }

    /// Startup verification: required keys exist in the default bundle, and
    /// every surfaced enum value has a non-empty entry in every language.
    pub fn verify(&self) -> Result<(), LocaleError> {
        for key in REQUIRED_KEYS {
            self.resolve(None, key)?;
        }

        for set in SURFACED_SETS {
            for value in set.values {
                let key = set.locale_key(value);
                for language in Language::ALL {
                    let entry = self
                        .bundles
                        .get(language)
                        .and_then(|b| b.get(key.as_str()))
                        .copied()
                        .unwrap_or("");
                    if entry.is_empty() {
                        return Err(LocaleError::MissingEnumEntry {
                            set: set.name,
                            value,
                            language: language.tag(),
                        });
                    }
                }
            }
        }

        Ok(())
    }
}

/// Process-wide catalog, built once on first access.
pub fn catalog() -> &'static MessageCatalog {
    static CATALOG: OnceLock<MessageCatalog> = OnceLock::new();
    CATALOG.get_or_init(MessageCatalog::built_in)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_in_caller_language() {
        let text = catalog()
            .resolve(Some(Language::Ru), keys::NOT_AUTHORIZED)
            .unwrap();
        assert_eq!(text, "У вас нет доступа к этой команде.");
    }

    #[test]
    fn unsupported_language_falls_back_to_default() {
        assert_eq!(Language::from_tag("fr"), None);
        let text = catalog().resolve(None, keys::GENERAL).unwrap();
        assert_eq!(text, "Something went wrong. Please try again later.");
    }

    #[test]
    fn missing_key_in_default_bundle_is_a_fault() {
        let err = catalog().resolve(Some(Language::En), "errors.noSuchKey");
        assert!(matches!(err, Err(LocaleError::MissingKey { .. })));
    }

    #[test]
    fn startup_verification_passes_for_built_in_catalog() {
        catalog().verify().unwrap();
    }

    #[test]
    fn language_tag_parsing() {
        assert_eq!(Language::from_tag("ru-RU"), Some(Language::Ru));
        assert_eq!(Language::from_tag("en"), Some(Language::En));
        assert_eq!(Language::from_tag(""), None);
    }
}
