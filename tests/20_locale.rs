// Locale fallback and startup verification behavior.

use wavecoach_api::locale::{catalog, keys, Language, LocaleError};

#[test]
fn denial_message_resolves_in_every_supported_language() {
    for language in Language::ALL {
        let text = catalog()
            .resolve(Some(*language), keys::NOT_AUTHORIZED)
            .unwrap();
        assert!(!text.is_empty());
    }
}

#[test]
fn unsupported_language_tag_falls_back_to_english() {
    assert_eq!(Language::from_tag("de-DE"), None);
    let text = catalog().resolve(None, keys::NOT_AUTHORIZED).unwrap();
    assert_eq!(text, "You are not authorized to use this command.");
}

#[test]
fn key_absent_from_default_bundle_is_a_configuration_fault() {
    let err = catalog().resolve(Some(Language::Ru), "errors.doesNotExist");
    match err {
        Err(LocaleError::MissingKey { key, .. }) => assert_eq!(key, "errors.doesNotExist"),
        other => panic!("expected MissingKey fault, got {other:?}"),
    }
}

#[test]
fn every_surfaced_enum_value_is_localized() {
    catalog().verify().unwrap();

    for set in wavecoach_api::types::SURFACED_SETS {
        for value in set.values {
            for language in Language::ALL {
                let text = catalog()
                    .resolve(Some(*language), &set.locale_key(value))
                    .unwrap();
                assert!(!text.is_empty(), "{}.{value} empty for {language:?}", set.name);
            }
        }
    }
}
