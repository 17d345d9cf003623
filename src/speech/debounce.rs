//! Repeat-suppression for spoken drug detections.
//!
//! Two states: Idle and Cooling(key). An exact repeat of the cooling
//! key is suppressed without resetting its timer; any other detection
//! fires and takes over the slot. A single slot, not a per-key map —
//! a distinct drug always fires even while another's cooldown is
//! pending. One expiry task is pending at a time: arming a new one
//! supersedes the old via a generation counter, and the armed expiry
//! resets the slot to Idle when it fires.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::extraction::DrugName;

#[derive(Debug, Default)]
struct CoolingSlot {
    key: Option<String>,
    generation: u64,
}

/// Single-slot cooldown state machine.
///
/// `observe` spawns the expiry task on the current tokio runtime, so
/// the debouncer must be used from within one.
pub struct TriggerDebouncer {
    window: Duration,
    slot: Arc<Mutex<CoolingSlot>>,
}

impl TriggerDebouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            slot: Arc::new(Mutex::new(CoolingSlot::default())),
        }
    }

    /// Observe a detected candidate. Returns `true` when the caller
    /// should be notified, `false` when the detection is a suppressed
    /// repeat of the currently cooling key.
    pub fn observe(&self, candidate: &DrugName) -> bool {
        let generation = {
            let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
            if slot.key.as_deref() == Some(candidate.key()) {
                return false;
            }
            slot.key = Some(candidate.key().to_string());
            slot.generation += 1;
            slot.generation
        };

        let slot = Arc::clone(&self.slot);
        let window = self.window;
        tokio::spawn(async move {
            tokio::time::sleep(window).await;
            let mut slot = slot.lock().unwrap_or_else(PoisonError::into_inner);
            // A later detection re-armed the slot; this expiry is stale.
            if slot.generation == generation {
                slot.key = None;
            }
        });

        true
    }
}
