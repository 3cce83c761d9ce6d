//! # Profession Gate
//!
//! Four independent kill switches, one per profession, consulted before
//! any award. All default to enabled; an operator can flip each at runtime
//! and the service layer persists the new state.
//!
//! The flags are plain atomics: gate checks sit on the gather hot path and
//! must not contend with a reload.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::types::{Profession, ALL_PROFESSIONS};

/// Per-profession enable/disable state.
#[derive(Debug)]
pub struct ProfessionGate {
    flags: [AtomicBool; 4],
}

impl ProfessionGate {
    /// Creates a gate with every profession enabled.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            flags: [
                AtomicBool::new(true),
                AtomicBool::new(true),
                AtomicBool::new(true),
                AtomicBool::new(true),
            ],
        }
    }

    /// Whether awards for a profession are currently enabled.
    #[inline]
    #[must_use]
    pub fn is_enabled(&self, profession: Profession) -> bool {
        self.flags[profession.index()].load(Ordering::Acquire)
    }

    /// Sets a profession's state directly; used when loading persisted
    /// settings.
    pub fn set(&self, profession: Profession, enabled: bool) {
        self.flags[profession.index()].store(enabled, Ordering::Release);
    }

    /// Flips a profession's state and returns the new value. Persistence
    /// is the caller's job.
    pub fn toggle(&self, profession: Profession) -> bool {
        !self.flags[profession.index()].fetch_xor(true, Ordering::AcqRel)
    }

    /// Current state of every profession, in storage-id order; used by the
    /// admin status listing and by persistence.
    #[must_use]
    pub fn states(&self) -> [(Profession, bool); 4] {
        ALL_PROFESSIONS.map(|p| (p, self.is_enabled(p)))
    }
}

impl Default for ProfessionGate {
    fn default() -> Self {
        Self::new()
    }
}
