//! The authorization gate. One boolean predicate, no roles or scopes: a
//! caller is either recognized as authorized or it is not. The gate runs
//! before payload validation for every protected operation, on both the
//! REST and the bot surface.

use crate::locale::{keys, Language};

/// An actor attempting an operation. Identity and language are supplied by
/// the surrounding framework (JWT claims on the REST surface, the chat
/// update on the bot surface) and are read-only here. Identity may be
/// absent; an anonymous caller is never authorized.
#[derive(Debug, Clone)]
pub struct Caller {
    pub identity: Option<String>,
    pub language: Option<Language>,
    pub authorized: bool,
}

impl Caller {
    pub fn anonymous(language: Option<Language>) -> Self {
        Self {
            identity: None,
            language,
            authorized: false,
        }
    }
}

/// Gate outcome. `Denied` carries the message key for the localized denial
/// text; the protected operation must not run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allowed,
    Denied { reason_key: &'static str },
}

pub fn authorize(caller: &Caller) -> Access {
    if caller.authorized && caller.identity.is_some() {
        Access::Allowed
    } else {
        Access::Denied {
            reason_key: keys::NOT_AUTHORIZED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorized_caller_is_allowed() {
        let caller = Caller {
            identity: Some("42".into()),
            language: Some(Language::En),
            authorized: true,
        };
        assert_eq!(authorize(&caller), Access::Allowed);
    }

    #[test]
    fn unauthorized_caller_is_denied_with_reason_key() {
        let caller = Caller {
            identity: Some("42".into()),
            language: Some(Language::Ru),
            authorized: false,
        };
        assert_eq!(
            authorize(&caller),
            Access::Denied {
                reason_key: keys::NOT_AUTHORIZED
            }
        );
    }

    #[test]
    fn missing_identity_is_denied_even_when_flagged_authorized() {
        let caller = Caller {
            identity: None,
            language: None,
            authorized: true,
        };
        assert!(matches!(authorize(&caller), Access::Denied { .. }));
    }

    #[test]
    fn anonymous_caller_is_denied() {
        assert!(matches!(
            authorize(&Caller::anonymous(None)),
            Access::Denied { .. }
        ));
    }
}
