use std::collections::HashSet;

use nproj_protocol::{LexicalEntry, Token, PLACEHOLDER};
use tracing::{debug, trace};

/// Checks whether two tokens can agree in gender, number and case.
///
/// Tokens the lexicon knows nothing about are always compatible.
pub fn compatible(a: &Token, b: &Token) -> bool {
    if a.entries.is_empty() || b.entries.is_empty() {
        debug!(
            "automatic match for {} ({} readings) and {} ({} readings)",
            a,
            a.entries.len(),
            b,
            b.entries.len()
        );
        return true;
    }

    let matched = readings_compatible(&a.entries, &b.entries);
    debug!("{} and {} compatible: {}", a, b, matched);
    matched
}

/// True if at least one pair of readings agrees on all three attributes.
pub fn readings_compatible(a: &[LexicalEntry], b: &[LexicalEntry]) -> bool {
    if a.is_empty() || b.is_empty() {
        return true;
    }

    a.iter()
        .any(|left| b.iter().any(|right| entries_agree(left, right)))
}

fn entries_agree(a: &LexicalEntry, b: &LexicalEntry) -> bool {
    let checks = [
        ("gender", &a.gender, &b.gender),
        ("number", &a.number, &b.number),
        ("case", &a.case, &b.case),
    ];

    for (attribute, left, right) in checks {
        if !values_agree(left, right) {
            trace!("no match on {}: {:?} vs {:?}", attribute, left, right);
            return false;
        }
    }
    true
}

/// Two value sets agree unless both are specified and share nothing.
fn values_agree(a: &[String], b: &[String]) -> bool {
    let left: HashSet<&str> = specified(a).collect();
    if left.is_empty() {
        return true;
    }

    let mut right = specified(b).peekable();
    if right.peek().is_none() {
        return true;
    }
    right.any(|value| left.contains(value))
}

fn specified(values: &[String]) -> impl Iterator<Item = &str> {
    values
        .iter()
        .map(String::as_str)
        .filter(|value| *value != PLACEHOLDER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nproj_protocol::{PosTag, TokenId};
    use proptest::prelude::*;

    fn token(entries: Vec<LexicalEntry>) -> Token {
        Token {
            id: TokenId(1),
            text: "x".to_string(),
            start: 0,
            end: 1,
            empty: false,
            tag: PosTag::Noun,
            entries,
        }
    }

    fn reading(gender: &[&str], number: &[&str], case: &[&str]) -> LexicalEntry {
        LexicalEntry::new(
            gender.iter().copied(),
            number.iter().copied(),
            case.iter().copied(),
        )
    }

    #[test]
    fn test_unknown_morphology_matches() {
        let known = token(vec![reading(&["f"], &["s"], &["nom"])]);
        let unknown = token(vec![]);
        assert!(compatible(&known, &unknown));
        assert!(compatible(&unknown, &known));
    }

    #[test]
    fn test_gender_mismatch() {
        let noun = token(vec![reading(&["m"], &["s"], &["nom"])]);
        let adj = token(vec![reading(&["f"], &["s"], &["nom"])]);
        assert!(!compatible(&noun, &adj));
    }

    #[test]
    fn test_case_mismatch() {
        let noun = token(vec![reading(&["m"], &["s"], &["acc"])]);
        let adj = token(vec![reading(&["m"], &["s"], &["nom", "voc"])]);
        assert!(!compatible(&noun, &adj));
    }

    #[test]
    fn test_placeholder_is_unspecified() {
        // "-" never conflicts with a real value
        let noun = token(vec![reading(&["-"], &["s"], &["nom"])]);
        let adj = token(vec![reading(&["f"], &["-"], &["nom"])]);
        assert!(compatible(&noun, &adj));
    }

    #[test]
    fn test_empty_attribute_is_unspecified() {
        let noun = token(vec![reading(&[], &["p"], &[])]);
        let adj = token(vec![reading(&["n"], &["p"], &["gen"])]);
        assert!(compatible(&noun, &adj));
    }

    #[test]
    fn test_any_reading_pair_matches() {
        // Ambiguous adjective: one of its readings agrees with the noun
        let noun = token(vec![reading(&["f"], &["p"], &["gen"])]);
        let adj = token(vec![
            reading(&["m"], &["s"], &["nom"]),
            reading(&["f"], &["p"], &["gen", "dat"]),
        ]);
        assert!(compatible(&noun, &adj));
    }

    fn value() -> impl Strategy<Value = String> {
        prop::sample::select(vec!["-", "m", "f", "n", "s", "p", "nom", "gen", "acc"])
            .prop_map(str::to_string)
    }

    fn entry() -> impl Strategy<Value = LexicalEntry> {
        (
            prop::collection::vec(value(), 0..3),
            prop::collection::vec(value(), 0..3),
            prop::collection::vec(value(), 0..3),
        )
            .prop_map(|(gender, number, case)| LexicalEntry {
                gender,
                number,
                case,
            })
    }

    proptest! {
        #[test]
        fn test_compatibility_is_symmetric(
            a in prop::collection::vec(entry(), 0..3),
            b in prop::collection::vec(entry(), 0..3),
        ) {
            prop_assert_eq!(readings_compatible(&a, &b), readings_compatible(&b, &a));
        }

        #[test]
        fn test_reading_agrees_with_itself(e in entry()) {
            prop_assert!(readings_compatible(&[e.clone()], &[e]));
        }
    }
}
