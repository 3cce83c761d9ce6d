//! # Gathering Catalog
//!
//! The immutable in-memory snapshot of all gathering reference data, and
//! the handle that publishes new snapshots.
//!
//! ## Architecture
//!
//! ```text
//!                 ┌──────────────────────────────┐
//!                 │        CatalogHandle         │
//!                 │                              │
//!                 │   RwLock<Arc<Catalog>>       │
//!                 │        (one swap)            │
//!                 └──────────────────────────────┘
//!                      │                   │
//!                      ▼                   ▼
//!              ┌──────────────┐    ┌──────────────┐
//!              │  snapshot()  │    │  publish()   │
//!              │ (any reader) │    │ (the loader) │
//!              └──────────────┘    └──────────────┘
//! ```
//!
//! Readers clone the `Arc` and keep calculating against their snapshot for
//! as long as they hold it; a publish never invalidates an in-flight read.
//! There is no partial update path - the only way content changes is a
//! wholesale rebuild followed by one swap.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::types::{GatheringDefinition, ItemId, ZoneId};

/// Compiled-in set of safe city zones. Gathering inside these pays half;
/// the penalty is intentionally not stored, so an operator cannot edit a
/// capital into a farming spot.
pub const CITY_ZONES: [ZoneId; 10] = [
    1519, // Stormwind
    1537, // Ironforge
    1657, // Darnassus
    1637, // Orgrimmar
    1638, // Thunder Bluff
    1497, // Undercity
    3557, // The Exodar
    3487, // Silvermoon City
    3703, // Shattrath City
    4395, // Dalaran
];

/// Fixed penalty applied on top of the stored multiplier in city zones.
pub const CITY_PENALTY: f32 = 0.5;

/// Immutable snapshot of definitions and zone multipliers.
///
/// Built wholesale by the loader; exposes lookups only. The `generation`
/// stamp identifies which publication a snapshot came from.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    definitions: HashMap<ItemId, GatheringDefinition>,
    zones: HashMap<ZoneId, f32>,
    generation: u64,
}

impl Catalog {
    /// Builds a catalog from fully-validated tables.
    ///
    /// The generation stamp is assigned at publication, not here.
    #[must_use]
    pub fn new(
        definitions: HashMap<ItemId, GatheringDefinition>,
        zones: HashMap<ZoneId, f32>,
    ) -> Self {
        Self {
            definitions,
            zones,
            generation: 0,
        }
    }

    /// Looks up the definition for an item. `None` means "not a gathering
    /// item" - callers short-circuit without involving the calculator.
    #[inline]
    #[must_use]
    pub fn lookup(&self, item_id: ItemId) -> Option<&GatheringDefinition> {
        self.definitions.get(&item_id)
    }

    /// Stored multiplier for a zone; `1.0` when the zone has no entry.
    #[inline]
    #[must_use]
    pub fn zone_multiplier(&self, zone_id: ZoneId) -> f32 {
        self.zones.get(&zone_id).copied().unwrap_or(1.0)
    }

    /// Whether a zone is one of the compiled-in safe cities.
    #[inline]
    #[must_use]
    pub fn is_city(zone_id: ZoneId) -> bool {
        CITY_ZONES.contains(&zone_id)
    }

    /// Effective zone factor: the stored multiplier, halved in cities.
    /// This is the value the calculator consumes.
    #[inline]
    #[must_use]
    pub fn zone_scale(&self, zone_id: ZoneId) -> f32 {
        let mult = self.zone_multiplier(zone_id);
        if Self::is_city(zone_id) {
            mult * CITY_PENALTY
        } else {
            mult
        }
    }

    /// Number of loaded definitions.
    #[must_use]
    pub fn definition_count(&self) -> usize {
        self.definitions.len()
    }

    /// Number of loaded zone multipliers.
    #[must_use]
    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    /// Which publication this snapshot came from. `0` until published.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Iterates all definitions, for admin listings.
    pub fn definitions(&self) -> impl Iterator<Item = (&ItemId, &GatheringDefinition)> {
        self.definitions.iter()
    }
}

/// Process-wide owner of the current catalog snapshot.
///
/// Readers call [`CatalogHandle::snapshot`]; the loader calls
/// [`CatalogHandle::publish`] after a rebuild. The swap is the only write,
/// so readers hold the lock for the duration of one `Arc` clone.
#[derive(Debug)]
pub struct CatalogHandle {
    current: RwLock<Arc<Catalog>>,
    generation: AtomicU64,
}

impl CatalogHandle {
    /// Creates a handle seeded with an initial catalog (generation 1).
    #[must_use]
    pub fn new(initial: Catalog) -> Self {
        let mut seeded = initial;
        seeded.generation = 1;
        Self {
            current: RwLock::new(Arc::new(seeded)),
            generation: AtomicU64::new(1),
        }
    }

    /// Returns the current snapshot. Never blocks on a reload in progress;
    /// the returned `Arc` stays valid regardless of later publishes.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Catalog> {
        Arc::clone(&self.current.read())
    }

    /// Publishes a freshly-built catalog, stamping the next generation.
    /// Returns the stamped generation.
    pub fn publish(&self, catalog: Catalog) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        let mut stamped = catalog;
        stamped.generation = generation;
        *self.current.write() = Arc::new(stamped);
        generation
    }

    /// Generation of the most recent publication.
    #[must_use]
    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}

impl Default for CatalogHandle {
    fn default() -> Self {
        Self::new(Catalog::default())
    }
}
