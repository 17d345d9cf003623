//! Document-text drug extraction: two regex passes merged in
//! first-seen order with case-insensitive dedup.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::DrugName;

/// Pharmacological suffixes, longest first so the alternation prefers
/// the most specific ending.
pub(crate) const SUFFIX_ALTERNATION: &str = "cycline|prazole|oxetine|azepam|dipine|statin|formin|tadine|artan|olone|mycin|tide|dine|pine|done|olol|pril|ide|cin";

/// Pass 1: capitalized word-like token ending in a known suffix,
/// bounded by word boundaries.
static SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\b([A-Z][A-Za-z]*(?:{SUFFIX_ALTERNATION}))\b"))
        .expect("valid suffix regex")
});

/// Pass 2: line-leading capitalized token (hyphens allowed) followed by
/// an optional number and a dosage unit or frequency word.
static DOSE_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*([A-Z][A-Za-z-]+)\s+(?:\d+\s*)?(?i:mg|mcg|ml|tablets?|capsules?|daily|twice|once)\b",
    )
    .expect("valid dosage regex")
});

/// Extract candidate drug names from free medical text.
///
/// Pure and deterministic. Runs the suffix pass over the whole text,
/// then the dosage-context pass line by line, and returns the union in
/// order of first detection (suffix pass wins ties). Dedup uses the
/// lower-cased key; display keeps source casing. Empty input yields an
/// empty list, never an error.
pub fn extract_drug_names(text: &str) -> Vec<DrugName> {
    let mut seen = HashSet::new();
    let mut drugs = Vec::new();

    for cap in SUFFIX_RE.captures_iter(text) {
        push_candidate(&cap[1], &mut seen, &mut drugs);
    }

    for line in text.lines() {
        if let Some(cap) = DOSE_LINE_RE.captures(line) {
            push_candidate(&cap[1], &mut seen, &mut drugs);
        }
    }

    drugs
}

fn push_candidate(token: &str, seen: &mut HashSet<String>, out: &mut Vec<DrugName>) {
    if let Some(drug) = DrugName::new(token) {
        if seen.insert(drug.key().to_string()) {
            out.push(drug);
        }
    }
}
