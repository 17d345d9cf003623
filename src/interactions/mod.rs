//! Drug–drug interaction checking with an ordered two-source fallback.
//!
//! Each source reports a `SourceOutcome`; the checker advances past
//! `Unavailable` and `Failed` outcomes and stops at the first
//! `Resolved` verdict. Total failure degrades to a neutral verdict —
//! a tooling failure must never block the clinical workflow.

pub mod checker;
pub mod scrape;
pub mod terminology;

pub use checker::InteractionChecker;
pub use scrape::{ScrapeClient, ScrapeSource};
pub use terminology::TerminologySource;

use serde::Serialize;

/// Which source produced a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VerdictSource {
    #[serde(rename = "browser-scrape")]
    BrowserScrape,
    #[serde(rename = "terminology-api")]
    TerminologyApi,
    #[serde(rename = "error")]
    Error,
}

impl VerdictSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BrowserScrape => "browser-scrape",
            Self::TerminologyApi => "terminology-api",
            Self::Error => "error",
        }
    }
}

/// Outcome of an interaction check. Immutable once produced; never
/// persisted beyond the response.
#[derive(Debug, Clone, Serialize)]
pub struct InteractionVerdict {
    #[serde(rename = "hasConflict")]
    pub has_conflict: bool,
    /// Human-readable summary, truncated to a handful of pairs.
    pub details: String,
    pub source: VerdictSource,
}

impl InteractionVerdict {
    /// Neutral verdict for total source failure.
    pub fn check_failed() -> Self {
        Self {
            has_conflict: false,
            details: "Conflict check failed. Please verify manually.".to_string(),
            source: VerdictSource::Error,
        }
    }
}

/// Per-source result for the fallback combinator.
#[derive(Debug)]
pub enum SourceOutcome {
    /// The source produced a verdict; stop here.
    Resolved(InteractionVerdict),
    /// The source cannot run (unconfigured, or degraded mid-check).
    Unavailable,
    /// The source ran and broke.
    Failed(String),
}
