//! Browser-scrape interaction source (primary).
//!
//! Fetches rendered interaction pages through a remote-browser render
//! service and classifies each drug pair by keyword. Only constructed
//! when scrape credentials are configured; any failure inside this
//! source degrades to `Unavailable` so the checker falls through to
//! the terminology API instead of surfacing an error.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::config::ScrapeCredentials;
use crate::extraction::DrugName;

use super::{InteractionVerdict, SourceOutcome, VerdictSource};

/// Pair generation considers at most this many names (new drug first),
/// so at most 10 unordered pairs per check.
const MAX_NAMES: usize = 5;
/// Conflicting pairs summarized in the details string.
const MAX_PAIR_SUMMARIES: usize = 3;
/// Page-text snippet length per pair summary, in characters.
const SNIPPET_CHARS: usize = 400;

/// A rendered page mentioning any of these marks the pair as
/// conflicting.
static CONFLICT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)interaction|interact|contraindicated|moderate|major")
        .expect("valid conflict regex")
});

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("render request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("render service returned {0}")]
    Status(reqwest::StatusCode),
}

#[derive(Serialize)]
struct RenderRequest<'a> {
    url: &'a str,
    project_id: &'a str,
}

/// Thin client for the render service: URL in, rendered page text out.
/// The browser-automation control protocol itself lives behind the
/// service and is out of scope here.
pub struct ScrapeClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    project_id: String,
}

impl ScrapeClient {
    pub fn new(base_url: &str, credentials: &ScrapeCredentials, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: credentials.api_key.clone(),
            project_id: credentials.project_id.clone(),
        }
    }

    /// Fetch the rendered page's visible text for a URL.
    pub async fn rendered_text(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self
            .http
            .post(format!("{}/v1/render", self.base_url))
            .header("x-api-key", &self.api_key)
            .json(&RenderRequest {
                url,
                project_id: &self.project_id,
            })
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ScrapeError::Status(response.status()));
        }
        Ok(response.text().await?)
    }
}

/// The scrape-based interaction source.
pub struct ScrapeSource {
    client: ScrapeClient,
    pages_base: String,
}

impl ScrapeSource {
    pub fn new(client: ScrapeClient, pages_base: &str) -> Self {
        Self {
            client,
            pages_base: pages_base.trim_end_matches('/').to_string(),
        }
    }

    /// Check every unordered pair among {new drug} ∪ known drugs,
    /// capped at the first `MAX_NAMES` names.
    pub async fn check(&self, new_drug: &DrugName, known: &[DrugName]) -> SourceOutcome {
        match self.check_pairs(new_drug, known).await {
            Ok(verdict) => SourceOutcome::Resolved(verdict),
            Err(e) => {
                tracing::warn!(error = %e, "scrape source degraded to unavailable");
                SourceOutcome::Unavailable
            }
        }
    }

    async fn check_pairs(
        &self,
        new_drug: &DrugName,
        known: &[DrugName],
    ) -> Result<InteractionVerdict, ScrapeError> {
        let mut summaries = Vec::new();
        for (a, b) in drug_pairs(new_drug, known) {
            let url = format!("{}/{}-with-{}.html", self.pages_base, slug(a), slug(b));
            tracing::debug!(%url, "fetching interaction page");
            let body = self.client.rendered_text(&url).await?;
            if CONFLICT_RE.is_match(&body) {
                summaries.push(format!(
                    "{} + {}: {}",
                    a.display(),
                    b.display(),
                    snippet(&body)
                ));
            }
        }

        let has_conflict = !summaries.is_empty();
        let details = if has_conflict {
            let shown = summaries.len().min(MAX_PAIR_SUMMARIES);
            summaries[..shown].join(" | ")
        } else {
            "No interactions found.".to_string()
        };

        Ok(InteractionVerdict {
            has_conflict,
            details,
            source: VerdictSource::BrowserScrape,
        })
    }
}

/// Unordered pairs among {new drug} ∪ known, new drug first, names
/// capped at `MAX_NAMES`.
fn drug_pairs<'a>(
    new_drug: &'a DrugName,
    known: &'a [DrugName],
) -> Vec<(&'a DrugName, &'a DrugName)> {
    let names: Vec<&DrugName> = std::iter::once(new_drug)
        .chain(known.iter())
        .take(MAX_NAMES)
        .collect();
    let mut pairs = Vec::new();
    for i in 0..names.len() {
        for j in (i + 1)..names.len() {
            pairs.push((names[i], names[j]));
        }
    }
    pairs
}

/// Deterministic page slug: lower-cased, whitespace to hyphens.
fn slug(name: &DrugName) -> String {
    name.key().split_whitespace().collect::<Vec<_>>().join("-")
}

/// First `SNIPPET_CHARS` characters of page text, whitespace collapsed.
fn snippet(body: &str) -> String {
    let head: String = body.chars().take(SNIPPET_CHARS).collect();
    head.split_whitespace().collect::<Vec<_>>().join(" ")
}
