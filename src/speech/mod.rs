//! Live-speech monitoring: transcript gating, extraction, debounce.

pub mod debounce;

pub use debounce::TriggerDebouncer;

use std::time::Duration;

use crate::extraction::{extract_from_fragment, DrugName};

/// What a transcript fragment produced.
#[derive(Debug, Clone, PartialEq)]
pub enum FragmentOutcome {
    /// No prescription-like candidate in the fragment.
    None,
    /// Candidate detected but inside its own cooldown window.
    Suppressed(DrugName),
    /// New detection; the caller should run an interaction check.
    Fire(DrugName),
}

/// Consumes transcript fragments and decides when a spoken drug name
/// warrants an interaction check.
pub struct SpeechMonitor {
    debouncer: TriggerDebouncer,
}

impl SpeechMonitor {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            debouncer: TriggerDebouncer::new(cooldown),
        }
    }

    /// Run a fragment through the trigger gate, extraction and the
    /// debouncer.
    pub fn handle_fragment(&self, fragment: &str) -> FragmentOutcome {
        let Some(candidate) = extract_from_fragment(fragment) else {
            return FragmentOutcome::None;
        };
        if self.debouncer.observe(&candidate) {
            tracing::info!(drug = %candidate, "prescription mention detected");
            FragmentOutcome::Fire(candidate)
        } else {
            tracing::debug!(drug = %candidate, "repeat mention suppressed");
            FragmentOutcome::Suppressed(candidate)
        }
    }
}
