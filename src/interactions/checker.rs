//! Ordered source fallback: scrape first, terminology second.

use crate::config::Settings;
use crate::extraction::DrugName;

use super::{
    InteractionVerdict, ScrapeClient, ScrapeSource, SourceOutcome, TerminologySource,
    VerdictSource,
};

/// Tries sources in strict priority order, advancing only past
/// `Unavailable` / `Failed` outcomes and stopping at the first
/// `Resolved` verdict. Total failure yields the neutral verdict —
/// `check` can never error across the boundary.
pub struct InteractionChecker {
    scrape: Option<ScrapeSource>,
    terminology: TerminologySource,
}

impl InteractionChecker {
    pub fn new(scrape: Option<ScrapeSource>, terminology: TerminologySource) -> Self {
        Self {
            scrape,
            terminology,
        }
    }

    /// Wire sources from settings. The scrape source exists only when
    /// credentials are configured.
    pub fn from_settings(settings: &Settings) -> Self {
        let scrape = settings.scrape.as_ref().map(|credentials| {
            ScrapeSource::new(
                ScrapeClient::new(&settings.scrape_base_url, credentials, settings.http_timeout),
                &settings.interactions_page_base,
            )
        });
        let terminology =
            TerminologySource::new(&settings.terminology_base_url, settings.http_timeout);
        Self::new(scrape, terminology)
    }

    /// Produce a conflict verdict for a newly named drug against the
    /// known list.
    pub async fn check(&self, new_drug: &DrugName, known: &[DrugName]) -> InteractionVerdict {
        match &self.scrape {
            Some(scrape) => match scrape.check(new_drug, known).await {
                SourceOutcome::Resolved(verdict) => {
                    tracing::info!(
                        drug = %new_drug,
                        conflict = verdict.has_conflict,
                        source = verdict.source.as_str(),
                        "interaction check resolved"
                    );
                    return verdict;
                }
                SourceOutcome::Unavailable => {
                    tracing::debug!("scrape source unavailable, trying terminology API")
                }
                SourceOutcome::Failed(reason) => {
                    tracing::warn!(reason, "scrape source failed, trying terminology API")
                }
            },
            None => tracing::debug!("scrape source not configured"),
        }

        match self.terminology.check(new_drug, known).await {
            SourceOutcome::Resolved(verdict) => {
                tracing::info!(
                    drug = %new_drug,
                    conflict = verdict.has_conflict,
                    source = verdict.source.as_str(),
                    "interaction check resolved"
                );
                verdict
            }
            SourceOutcome::Unavailable | SourceOutcome::Failed(_) => {
                tracing::error!(drug = %new_drug, "all interaction sources failed");
                InteractionVerdict::check_failed()
            }
        }
    }
}
