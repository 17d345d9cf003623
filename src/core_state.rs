//! Shared application state for the HTTP boundary.
//!
//! Wrapped in `Arc` at startup; every handler reads through it. The
//! session store is the only shared mutable piece and uses
//! replace-whole-value writes, so readers never observe a partial
//! update.

use crate::config::Settings;
use crate::interactions::InteractionChecker;
use crate::session::SessionStore;
use crate::speech::SpeechMonitor;

pub struct CoreState {
    pub settings: Settings,
    pub session: SessionStore,
    pub checker: InteractionChecker,
    pub monitor: SpeechMonitor,
}

impl CoreState {
    pub fn new(settings: Settings) -> Self {
        let checker = InteractionChecker::from_settings(&settings);
        let monitor = SpeechMonitor::new(settings.cooldown);
        Self {
            settings,
            session: SessionStore::new(),
            checker,
            monitor,
        }
    }
}
