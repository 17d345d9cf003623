//! Heuristic medication-name extraction.
//!
//! Two independent extractors share one suffix vocabulary: a
//! document-text scan (`drugs`) applied to parsed PDF text, and a
//! trigger-gated fragment scan (`transcript`) applied to short live
//! transcript pieces. Both are pure functions over text.

pub mod document;
pub mod drugs;
pub mod transcript;

pub use document::{pdf_text, DocumentError};
pub use drugs::extract_drug_names;
pub use transcript::extract_from_fragment;

use std::fmt;

/// A candidate medication name produced by heuristic matching.
///
/// Identity is case-insensitive: comparisons and dedup use the
/// lower-cased key, while the original casing from the source text is
/// kept for display. Candidates are not validated against any
/// authoritative vocabulary — capitalized common words that happen to
/// match a pharmacological suffix are accepted (known limitation).
#[derive(Debug, Clone)]
pub struct DrugName {
    display: String,
    key: String,
}

impl DrugName {
    /// Build from a raw token. Rejects tokens of trimmed length <= 2.
    pub fn new(token: &str) -> Option<Self> {
        let display = token.trim();
        if display.is_empty() || display.len() <= 2 {
            return None;
        }
        Some(Self {
            display: display.to_string(),
            key: display.to_lowercase(),
        })
    }

    /// Original casing, for display.
    pub fn display(&self) -> &str {
        &self.display
    }

    /// Lower-cased identity key.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl PartialEq for DrugName {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for DrugName {}

impl fmt::Display for DrugName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

impl serde::Serialize for DrugName {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.display)
    }
}
