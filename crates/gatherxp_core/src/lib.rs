//! # GATHERXP Core
//!
//! Pure reward logic for the gathering experience module.
//!
//! ## Design Principles
//!
//! 1. **Deterministic math** - the calculator is a pure function of its
//!    inputs; no I/O, no clocks, no RNG
//! 2. **Immutable snapshots** - the catalog is rebuilt wholesale and
//!    published with a single atomic swap; readers never see a half-updated
//!    table
//! 3. **External reference data** - every tuning value that is not a game
//!    constant lives in the backing store, not in code
//!
//! ## Thread Safety
//!
//! Calculation and lookup run against whichever snapshot is current at call
//! time. A reload in progress never blocks an in-flight calculation.
//!
//! ## Example
//!
//! ```rust,ignore
//! use gatherxp_core::{calc, Catalog, CatalogHandle};
//!
//! let handle = CatalogHandle::new(Catalog::default());
//! let snapshot = handle.snapshot();
//!
//! if let Some(def) = snapshot.lookup(item_id) {
//!     let xp = calc::calculate(def, skill, level, snapshot.zone_scale(zone_id));
//! }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod calc;
pub mod catalog;
pub mod error;
pub mod gate;
pub mod types;

pub use calc::{MAX_GATHER_LEVEL, MAX_XP, MIN_XP, SkillTier, TIER_SIZE};
pub use catalog::{Catalog, CatalogHandle, CITY_PENALTY, CITY_ZONES};
pub use error::{GatherError, GatherResult};
pub use gate::ProfessionGate;
pub use types::{GatheringDefinition, ItemId, Profession, RarityTier, ZoneId, ALL_PROFESSIONS};
