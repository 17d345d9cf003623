//! Trigger-gated drug extraction over live transcript fragments.
//!
//! A fragment must first look like a prescription-intent utterance
//! ("I'll prescribe...", "let's start you on...") before any
//! extraction is attempted; ungated fragments never produce a
//! candidate, which keeps unrelated conversation from firing checks.

use std::sync::LazyLock;

use regex::Regex;

use super::drugs::SUFFIX_ALTERNATION;
use super::DrugName;

/// Prescription-intent gate. Stems ("prescrib") deliberately match
/// "prescribe", "prescribing" and "prescription" alike.
static TRIGGER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:prescrib|recommend|take\s+\w+|start\s+\w+|put you on|give you|we'll add|adding)",
    )
    .expect("valid trigger regex")
});

/// Last-resort capture: the first 4+ letter word right after a
/// trigger phrase.
static AFTER_TRIGGER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:prescrib\w*|recommend\w*|take|start|put you on|give you|adding)\s+(?:you\s+)?(?:some\s+)?([A-Za-z]{4,})",
    )
    .expect("valid after-trigger regex")
});

/// Word ends in a pharmacological suffix.
static SUFFIX_TAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)(?:{SUFFIX_ALTERNATION})$")).expect("valid suffix-tail regex")
});

/// Words that follow trigger phrases without being drug names.
const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "for", "with", "you", "your", "some", "twice", "once", "daily",
    "mg", "mcg", "tablet", "tablets", "capsule", "capsules", "medicine", "medication", "drug",
];

fn is_stop_word(word: &str) -> bool {
    let lower = word.to_lowercase();
    STOP_WORDS.contains(&lower.as_str())
}

fn letters_only(word: &str) -> String {
    word.chars().filter(|c| c.is_ascii_alphabetic()).collect()
}

/// Extract at most one candidate drug name from a transcript fragment.
///
/// Returns `None` when the fragment fails the prescription-intent
/// gate. Within a gated fragment, candidates are tried in order:
/// (a) first token ending in a pharmacological suffix, (b) first
/// capitalized token at a non-initial position, (c) first 4+ letter
/// word following a trigger phrase. Stop words never qualify.
pub fn extract_from_fragment(fragment: &str) -> Option<DrugName> {
    if fragment.trim().len() < 4 {
        return None;
    }
    if !TRIGGER_RE.is_match(fragment) {
        return None;
    }

    let words: Vec<&str> = fragment.split_whitespace().collect();

    // (a) pharmacological suffix anywhere in the fragment
    for word in &words {
        let cleaned = letters_only(word);
        if cleaned.len() < 3 || is_stop_word(&cleaned) {
            continue;
        }
        if SUFFIX_TAIL_RE.is_match(&cleaned) {
            return DrugName::new(&cleaned);
        }
    }

    // (b) capitalized (brand-style) token past the fragment start
    for (i, word) in words.iter().enumerate() {
        if i == 0 {
            continue;
        }
        let cleaned = letters_only(word);
        if cleaned.len() < 3 || is_stop_word(&cleaned) {
            continue;
        }
        if word.chars().next().is_some_and(|c| c.is_ascii_uppercase()) {
            return DrugName::new(&cleaned);
        }
    }

    // (c) first long word right after the trigger itself
    if let Some(cap) = AFTER_TRIGGER_RE.captures(fragment) {
        let word = &cap[1];
        if !is_stop_word(word) {
            return DrugName::new(word);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(fragment: &str) -> Option<String> {
        extract_from_fragment(fragment).map(|d| d.display().to_string())
    }

    #[test]
    fn ungated_fragment_yields_nothing() {
        assert_eq!(candidate("The weather is nice today"), None);
        assert_eq!(candidate("How have you been feeling lately"), None);
    }

    #[test]
    fn gated_fragment_yields_suffix_match() {
        assert_eq!(
            candidate("I'm going to prescribe Metformin for you"),
            Some("Metformin".to_string())
        );
    }

    #[test]
    fn lowercase_suffix_match_accepted() {
        // STT output is often uncapitalized; the suffix pass is
        // case-insensitive on transcript fragments.
        assert_eq!(
            candidate("we'll start you on lisinopril tomorrow"),
            Some("lisinopril".to_string())
        );
    }

    #[test]
    fn capitalized_token_fallback() {
        // "Xarelto" matches no suffix; the brand-style pass takes it.
        assert_eq!(
            candidate("I recommend Xarelto with your evening meal"),
            Some("Xarelto".to_string())
        );
    }

    #[test]
    fn after_trigger_fallback_takes_first_long_word() {
        // "turmeric" matches no suffix and isn't capitalized; only the
        // after-trigger capture picks it up, skipping "some".
        assert_eq!(
            candidate("we're adding some turmeric today"),
            Some("turmeric".to_string())
        );
    }

    #[test]
    fn stop_words_never_qualify() {
        assert_eq!(candidate("please take your medicine twice daily"), None);
    }

    #[test]
    fn tiny_fragment_yields_nothing() {
        assert_eq!(candidate("ok"), None);
        assert_eq!(candidate(""), None);
    }

    #[test]
    fn punctuation_stripped_from_candidate() {
        assert_eq!(
            candidate("I'll prescribe Metformin, alright?"),
            Some("Metformin".to_string())
        );
    }
}
