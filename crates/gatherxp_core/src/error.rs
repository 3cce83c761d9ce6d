//! # Error Types
//!
//! The shared error taxonomy. Nothing here is fatal to the host process:
//! lookup misses are defaults, validation failures are operator feedback,
//! and storage failures degrade the affected table to empty.

use thiserror::Error;

use crate::types::{ItemId, ZoneId};

/// Errors surfaced by the gathering module.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatherError {
    /// Item has no gathering definition. Only an error on the admin
    /// surface; the gather path treats it as "not a gathering item".
    #[error("item {0} not found in gathering database")]
    ItemNotFound(ItemId),

    /// Zone has no stored multiplier. Only an error on the admin surface;
    /// the gather path treats it as multiplier 1.0.
    #[error("zone {0} not found in gathering database")]
    ZoneNotFound(ZoneId),

    /// Admin input named a profession this module does not know.
    #[error("invalid profession: {0} (valid: Mining, Herbalism, Skinning, Fishing)")]
    InvalidProfession(String),

    /// Admin input named a field the modify operation does not accept.
    #[error("invalid field: {0} (valid: basexp, reqskill, profession, rarity, name)")]
    InvalidField(String),

    /// Zone multipliers must be strictly positive.
    #[error("multiplier must be greater than 0, got {0}")]
    InvalidMultiplier(f32),

    /// A numeric or enum field failed to parse or violated an invariant.
    #[error("invalid value for {field}: {value}")]
    InvalidValue {
        /// The field being set.
        field: &'static str,
        /// The rejected input.
        value: String,
    },

    /// The backing store failed. The loader logs this and serves the
    /// affected table as empty rather than aborting.
    #[error("storage error: {reason}")]
    Storage {
        /// What the store reported.
        reason: String,
    },
}

/// Result type for gathering operations.
pub type GatherResult<T> = Result<T, GatherError>;
