//! Closed constant sets shared between the schema registry and the locale
//! catalog. Validation accepts only members of these sets, and the catalog
//! must carry a localized entry for every member it can surface to a user.

/// A named, closed set of string constants.
///
/// `locale_prefix` is prepended to each value to form the message key the
/// locale catalog must provide (e.g. `prompts.wave_intro`).
#[derive(Debug)]
pub struct EnumSet {
    pub name: &'static str,
    pub locale_prefix: &'static str,
    pub values: &'static [&'static str],
}

impl EnumSet {
    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|v| *v == value)
    }

    /// Message key for one member of the set.
    pub fn locale_key(&self, value: &str) -> String {
        format!("{}{}", self.locale_prefix, value)
    }
}

/// Prompt templates editable through the admin panel.
pub static PROMPT_KEYS: EnumSet = EnumSet {
    name: "prompt_keys",
    locale_prefix: "prompts.",
    values: &["wave_intro", "wave_analysis", "archetype_profile", "final_report"],
};

/// Archetype codes a player can be profiled into.
pub static ARCHETYPES: EnumSet = EnumSet {
    name: "archetypes",
    locale_prefix: "archetypes.",
    values: &["strategist", "diplomat", "vanguard", "anchor"],
};

/// Every set whose members can appear in user-facing text. The locale
/// catalog's startup verification walks this list.
pub static SURFACED_SETS: &[&EnumSet] = &[&PROMPT_KEYS, &ARCHETYPES];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_keys_membership() {
        assert!(PROMPT_KEYS.contains("wave_analysis"));
        assert!(!PROMPT_KEYS.contains("wave_outro"));
    }

    #[test]
    fn locale_key_is_prefixed() {
        assert_eq!(ARCHETYPES.locale_key("anchor"), "archetypes.anchor");
    }
}
