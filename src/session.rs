//! Single-slot session state for the active clinical document.
//!
//! One `DocumentSession` lives per process: last write wins, the whole
//! value is replaced on upload and never partially mutated, so readers
//! only ever see a consistent snapshot. Multi-call support would key
//! this store by a call/session id instead of holding a singleton.

use std::sync::RwLock;

use serde::Serialize;
use thiserror::Error;

use crate::config::TEXT_CAP_CHARS;
use crate::extraction::DrugName;

/// The most recently parsed document's extracted state.
#[derive(Debug, Clone, Default)]
pub struct DocumentSession {
    /// Parsed document text, capped at `TEXT_CAP_CHARS` characters.
    pub text: Option<String>,
    /// Drug names in order of first detection, unique by key.
    pub drugs: Vec<DrugName>,
}

/// Read-only view returned by status queries.
#[derive(Debug, Serialize)]
pub struct SessionStatus {
    pub loaded: bool,
    #[serde(rename = "drugCount")]
    pub drug_count: usize,
    pub drugs: Vec<DrugName>,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session lock poisoned")]
    LockPoisoned,
}

/// Process-wide single-slot store with replace-on-write semantics.
pub struct SessionStore {
    slot: RwLock<DocumentSession>,
}

impl SessionStore {
    /// Create an empty store (no text, no drugs).
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(DocumentSession::default()),
        }
    }

    /// Replace the slot with a freshly parsed document.
    ///
    /// Text is truncated to the storage cap on a char boundary.
    /// Returns the stored drug list.
    pub fn replace(
        &self,
        text: String,
        drugs: Vec<DrugName>,
    ) -> Result<Vec<DrugName>, SessionError> {
        let session = DocumentSession {
            text: Some(truncate_chars(text, TEXT_CAP_CHARS)),
            drugs,
        };
        let stored = session.drugs.clone();
        let mut slot = self.slot.write().map_err(|_| SessionError::LockPoisoned)?;
        *slot = session;
        Ok(stored)
    }

    /// Snapshot of the current drug list.
    pub fn drugs(&self) -> Result<Vec<DrugName>, SessionError> {
        let slot = self.slot.read().map_err(|_| SessionError::LockPoisoned)?;
        Ok(slot.drugs.clone())
    }

    /// Pure read of the current slot.
    pub fn status(&self) -> Result<SessionStatus, SessionError> {
        let slot = self.slot.read().map_err(|_| SessionError::LockPoisoned)?;
        Ok(SessionStatus {
            loaded: slot.text.is_some(),
            drug_count: slot.drugs.len(),
            drugs: slot.drugs.clone(),
        })
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

fn truncate_chars(mut text: String, cap: usize) -> String {
    if let Some((idx, _)) = text.char_indices().nth(cap) {
        text.truncate(idx);
    }
    text
}
