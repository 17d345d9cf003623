//! Runtime configuration: constants plus environment-driven settings.
//!
//! Scrape-source credentials are optional; when either half is absent
//! the scrape source is unconfigured and the checker goes straight to
//! the terminology API.

use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "medsentry";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default HTTP port for the boundary server.
pub const DEFAULT_PORT: u16 = 3001;

/// Stored document text cap, in characters.
pub const TEXT_CAP_CHARS: usize = 50_000;

/// Upload body limit (matches the UI's 10 MB file cap).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Cooldown window suppressing repeat notifications for the same
/// spoken drug name.
pub const DEFAULT_COOLDOWN_SECS: u64 = 8;

/// Bounded timeout for outbound source calls. A source that times out
/// is treated as unavailable for fallback purposes.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 8;

/// Default log filter when RUST_LOG is unset.
pub fn default_log_filter() -> String {
    format!("{APP_NAME}=info,tower_http=info")
}

/// Credentials for the remote-browser render service.
#[derive(Debug, Clone)]
pub struct ScrapeCredentials {
    pub api_key: String,
    pub project_id: String,
}

/// Resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub port: u16,
    /// `None` means the scrape source is unconfigured and skipped.
    pub scrape: Option<ScrapeCredentials>,
    /// Base URL of the render service (rendered-page text fetch).
    pub scrape_base_url: String,
    /// Base URL for interaction pages fed to the render service.
    pub interactions_page_base: String,
    /// Base URL of the terminology REST API.
    pub terminology_base_url: String,
    pub http_timeout: Duration,
    pub cooldown: Duration,
}

impl Settings {
    /// Read settings from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let scrape = match (
            std::env::var("SCRAPE_API_KEY"),
            std::env::var("SCRAPE_PROJECT_ID"),
        ) {
            (Ok(api_key), Ok(project_id))
                if !api_key.trim().is_empty() && !project_id.trim().is_empty() =>
            {
                Some(ScrapeCredentials {
                    api_key,
                    project_id,
                })
            }
            _ => None,
        };

        Self {
            port: env_parsed("PORT", DEFAULT_PORT),
            scrape,
            scrape_base_url: env_url("SCRAPE_BASE_URL", "https://api.browserbase.com"),
            interactions_page_base: env_url(
                "INTERACTIONS_PAGE_BASE",
                "https://www.drugs.com/drug_interactions",
            ),
            terminology_base_url: env_url(
                "RXNAV_BASE_URL",
                "https://rxnav.nlm.nih.gov/REST",
            ),
            http_timeout: Duration::from_secs(env_parsed(
                "MEDSENTRY_HTTP_TIMEOUT_SECS",
                DEFAULT_HTTP_TIMEOUT_SECS,
            )),
            cooldown: Duration::from_secs(env_parsed(
                "MEDSENTRY_COOLDOWN_SECS",
                DEFAULT_COOLDOWN_SECS,
            )),
        }
    }
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_url(key: &str, default: &str) -> String {
    std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .trim_end_matches('/')
        .to_string()
}
