//! Free-text city normalization.

use puch_core::types::ResolvedCity;

use crate::cities::find_city;

/// Normalizes a city name against the known-city table.
///
/// Returns `None` for absent or blank input. Known names and aliases resolve
/// to the canonical record; anything else comes back title-cased with no
/// slug, so free text never fails outright.
pub fn normalize_city(text: Option<&str>) -> Option<ResolvedCity> {
    let text = text?.trim();
    if text.is_empty() {
        return None;
    }

    let key = lookup_key(text);
    Some(match find_city(&key) {
        Some(record) => record.resolved(),
        None => ResolvedCity::unmapped(title_case(text)),
    })
}

/// Lowercases and collapses every run of characters outside `a-z` to a
/// single space.
fn lookup_key(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut key = String::with_capacity(lowered.len());
    let mut pending_space = false;
    for ch in lowered.chars() {
        if ch.is_ascii_lowercase() {
            if pending_space && !key.is_empty() {
                key.push(' ');
            }
            pending_space = false;
            key.push(ch);
        } else {
            pending_space = true;
        }
    }
    key
}

/// Upper-cases the first letter of every word and lower-cases the rest.
///
/// A word starts after any non-alphabetic character, so "o'hare" becomes
/// "O'Hare".
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test_case("Bombay", "Mumbai", "mumbai" ; "alias")]
    #[test_case("mumbai", "Mumbai", "mumbai" ; "slug")]
    #[test_case("  BANGALORE ", "Bengaluru", "bengaluru" ; "padded upper case")]
    #[test_case("New-Delhi", "Delhi-NCR", "delhi" ; "hyphenated alias")]
    #[test_case("new   delhi!!", "Delhi-NCR", "delhi" ; "punctuation collapses")]
    #[test_case("Delhi-NCR", "Delhi-NCR", "delhi" ; "canonical name round trips")]
    #[test_case("Vizag", "Visakhapatnam", "visakhapatnam" ; "short alias")]
    fn test_known_cities(input: &str, display: &str, slug: &str) {
        assert_eq!(
            normalize_city(Some(input)),
            Some(ResolvedCity::known(display, slug))
        );
    }

    #[test_case("Timbuktu", "Timbuktu" ; "plain")]
    #[test_case("  san francisco ", "San Francisco" ; "trimmed and title cased")]
    #[test_case("o'hare", "O'Hare" ; "apostrophe starts a word")]
    #[test_case("SHIMLA", "Shimla" ; "upper case lowered")]
    fn test_unmapped_cities(input: &str, display: &str) {
        assert_eq!(
            normalize_city(Some(input)),
            Some(ResolvedCity::unmapped(display))
        );
    }

    #[test]
    fn test_absent_and_blank() {
        assert_eq!(normalize_city(None), None);
        assert_eq!(normalize_city(Some("")), None);
        assert_eq!(normalize_city(Some("   ")), None);
    }

    #[test]
    fn test_non_latin_letters_do_not_match() {
        // Devanagari "Mumbai" collapses to an empty key and falls through.
        let city = normalize_city(Some("मुंबई")).unwrap();
        assert!(!city.is_known());
    }

    #[test]
    fn test_lookup_key() {
        assert_eq!(lookup_key("  New--Delhi 2024 "), "new delhi");
        assert_eq!(lookup_key("123"), "");
    }

    proptest! {
        #[test]
        fn normalize_is_pure(s in "\\PC{0,32}") {
            prop_assert_eq!(normalize_city(Some(&s)), normalize_city(Some(&s)));
        }

        #[test]
        fn known_display_names_stay_known(idx in 0usize..crate::cities::CITIES.len()) {
            let record = &crate::cities::CITIES[idx];
            let city = normalize_city(Some(record.canonical_name)).unwrap();
            prop_assert_eq!(city.slug.as_deref(), Some(record.slug));
        }
    }
}
