//! Terminology-API interaction source (fallback).
//!
//! Resolves each drug name to a normalized identifier, then queries
//! the interaction-list endpoint once and flattens the nested
//! group/type/pair structure into "DrugA + DrugB" labels.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::extraction::DrugName;

use super::{InteractionVerdict, SourceOutcome, VerdictSource};

/// Pair labels shown in the details string before truncation.
const MAX_PAIR_DETAILS: usize = 5;

#[derive(Debug, Error)]
pub enum TerminologyError {
    #[error("terminology request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

// ── Wire shapes ─────────────────────────────────────────────

#[derive(Deserialize, Default)]
struct RxcuiResponse {
    #[serde(rename = "idGroup", default)]
    id_group: IdGroup,
}

#[derive(Deserialize, Default)]
struct IdGroup {
    #[serde(rename = "rxnormId", default)]
    rxnorm_id: Vec<String>,
}

#[derive(Deserialize, Default)]
struct InteractionListResponse {
    #[serde(rename = "fullInteractionTypeGroup", default)]
    groups: Vec<InteractionTypeGroup>,
}

#[derive(Deserialize)]
struct InteractionTypeGroup {
    #[serde(rename = "fullInteractionType", default)]
    types: Vec<InteractionType>,
}

#[derive(Deserialize)]
struct InteractionType {
    #[serde(rename = "interactionPair", default)]
    pairs: Vec<InteractionPair>,
}

#[derive(Deserialize)]
struct InteractionPair {
    #[serde(rename = "interactionConcept", default)]
    concepts: Vec<InteractionConcept>,
}

#[derive(Deserialize, Default)]
struct InteractionConcept {
    #[serde(rename = "minConceptItem", default)]
    item: MinConceptItem,
}

#[derive(Deserialize, Default)]
struct MinConceptItem {
    #[serde(default)]
    name: String,
}

// ── Source ──────────────────────────────────────────────────

/// The terminology-API interaction source.
pub struct TerminologySource {
    http: reqwest::Client,
    base_url: String,
}

impl TerminologySource {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Resolve a drug name to its terminology identifier (first match).
    async fn resolve(&self, name: &DrugName) -> Result<Option<String>, TerminologyError> {
        let response: RxcuiResponse = self
            .http
            .get(format!("{}/rxcui.json", self.base_url))
            .query(&[("name", name.display())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response.id_group.rxnorm_id.into_iter().next())
    }

    /// Check {new drug} ∪ known drugs via the interaction-list endpoint.
    pub async fn check(&self, new_drug: &DrugName, known: &[DrugName]) -> SourceOutcome {
        match self.check_inner(new_drug, known).await {
            Ok(verdict) => SourceOutcome::Resolved(verdict),
            Err(e) => {
                tracing::warn!(error = %e, "terminology source failed");
                SourceOutcome::Failed(e.to_string())
            }
        }
    }

    async fn check_inner(
        &self,
        new_drug: &DrugName,
        known: &[DrugName],
    ) -> Result<InteractionVerdict, TerminologyError> {
        let mut ids = Vec::new();
        for name in std::iter::once(new_drug).chain(known.iter()) {
            match self.resolve(name).await? {
                Some(id) => ids.push(id),
                // Unresolved names are silently dropped.
                None => tracing::debug!(drug = %name, "no terminology identifier"),
            }
        }

        if ids.len() < 2 {
            return Ok(InteractionVerdict {
                has_conflict: false,
                details: "Insufficient drug data to check.".to_string(),
                source: VerdictSource::TerminologyApi,
            });
        }

        let response: InteractionListResponse = self
            .http
            .get(format!("{}/interaction/list.json", self.base_url))
            .query(&[("rxcui", ids.join(","))])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let pairs = flatten_pairs(&response);
        let has_conflict = !pairs.is_empty();
        let details = if has_conflict {
            conflict_details(&pairs)
        } else {
            "No known interactions found.".to_string()
        };

        Ok(InteractionVerdict {
            has_conflict,
            details,
            source: VerdictSource::TerminologyApi,
        })
    }
}

/// Flatten group → type → pair into "DrugA + DrugB" labels.
fn flatten_pairs(response: &InteractionListResponse) -> Vec<String> {
    let mut labels = Vec::new();
    for group in &response.groups {
        for interaction_type in &group.types {
            for pair in &interaction_type.pairs {
                let names: Vec<&str> = pair
                    .concepts
                    .iter()
                    .map(|c| c.item.name.as_str())
                    .filter(|n| !n.is_empty())
                    .collect();
                if !names.is_empty() {
                    labels.push(names.join(" + "));
                }
            }
        }
    }
    labels
}

/// Up to `MAX_PAIR_DETAILS` labels joined by "; ", with a truncation
/// marker when more exist.
fn conflict_details(pairs: &[String]) -> String {
    let shown = pairs.len().min(MAX_PAIR_DETAILS);
    let marker = if pairs.len() > MAX_PAIR_DETAILS {
        " ..."
    } else {
        ""
    };
    format!(
        "Possible interaction(s): {}{marker}",
        pairs[..shown].join("; ")
    )
}
