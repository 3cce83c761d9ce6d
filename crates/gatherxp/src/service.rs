//! # Module Service
//!
//! The host-facing surface of the gathering module. The host engine hands
//! events to [`GatherEventSink`] and exposes its character object through
//! the [`Character`] trait; everything else is internal.
//!
//! ## The Golden Path: One Gather
//!
//! ```text
//! host ──> on_gather(character, item_id)
//!              │
//!              ├─ master switch off?          ──> silent no-op
//!              ├─ item not in catalog?        ──> silent no-op
//!              ├─ profession gated off?       ──> silent no-op
//!              │
//!              ▼
//!        calculate(def, skill, level, zone_scale)
//!              │
//!              ▼
//!        character.award_xp(xp)    (skipped when the level cap pays 0)
//! ```
//!
//! The hot path takes one snapshot clone and no other locks.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use gatherxp_core::{
    calc, Catalog, CatalogHandle, GatherResult, ItemId, Profession, ProfessionGate, ZoneId,
};

use crate::config::ModuleConfig;
use crate::loader;
use crate::store::{GatheringStore, TomlStore};

/// The host engine's view of a gathering character.
///
/// Implemented by the host; the module only reads and awards.
pub trait Character {
    /// Current character level.
    fn level(&self) -> u32;
    /// Zone the character is standing in.
    fn zone_id(&self) -> ZoneId;
    /// Current skill value in a profession (`0` if untrained).
    fn skill_value(&self, profession: Profession) -> u16;
    /// Grants experience. Only called with non-zero amounts.
    fn award_xp(&self, amount: u32);
}

/// Events the host engine feeds into the module.
pub trait GatherEventSink {
    /// A character looted a (potentially) gatherable item.
    fn on_gather(&self, character: &dyn Character, item_id: ItemId);
    /// The host asks the module to re-read its reference data.
    fn on_config_reload(&self);
}

/// The gathering experience module service.
///
/// Owns the backing store, the published catalog snapshot, and the
/// profession gate. One instance per world process.
pub struct GatheringExperience {
    store: Box<dyn GatheringStore>,
    catalog: CatalogHandle,
    gate: ProfessionGate,
    enabled: AtomicBool,
    /// Serializes reloads: queued, never concurrent. Readers do not touch
    /// this lock.
    reload_lock: Mutex<()>,
}

impl GatheringExperience {
    /// Builds the service over an already-opened store.
    ///
    /// Loads the catalog and gate fail-soft: a broken table comes up empty
    /// with a warning, never a refused boot.
    #[must_use]
    pub fn new(store: Box<dyn GatheringStore>, enabled: bool) -> Self {
        let catalog = CatalogHandle::new(loader::load_catalog(store.as_ref()));
        let gate = ProfessionGate::new();
        loader::load_gate(store.as_ref(), &gate);
        let snapshot = catalog.snapshot();
        tracing::info!(
            "Gathering experience module ready: {} definitions, {} zones, enabled={}",
            snapshot.definition_count(),
            snapshot.zone_count(),
            enabled
        );
        Self {
            store,
            catalog,
            gate,
            enabled: AtomicBool::new(enabled),
            reload_lock: Mutex::new(()),
        }
    }

    /// Builds the service from a module config, opening the TOML store
    /// under the configured data directory.
    pub fn from_config(config: &ModuleConfig) -> GatherResult<Self> {
        let store = TomlStore::open(&config.data_dir)?;
        Ok(Self::new(Box::new(store), config.enabled))
    }

    /// Current catalog snapshot. Valid for as long as the caller holds it,
    /// across any number of reloads.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Catalog> {
        self.catalog.snapshot()
    }

    /// The per-profession gate.
    #[must_use]
    pub fn gate(&self) -> &ProfessionGate {
        &self.gate
    }

    /// The backing store.
    #[must_use]
    pub fn store(&self) -> &dyn GatheringStore {
        self.store.as_ref()
    }

    /// Whether the master switch is on.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Flips the master switch.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
        tracing::info!("Gathering experience master switch: enabled={}", enabled);
    }

    /// Rebuilds the catalog from the store and publishes it, re-reading
    /// the gate flags alongside.
    ///
    /// Strict: a store failure leaves the prior snapshot serving and the
    /// generation unchanged. Concurrent calls queue; each performs its own
    /// full rebuild.
    pub fn reload(&self) -> GatherResult<u64> {
        let _guard = self.reload_lock.lock();
        let catalog = loader::try_load_catalog(self.store.as_ref())?;
        loader::load_gate(self.store.as_ref(), &self.gate);
        let generation = self.catalog.publish(catalog);
        tracing::info!("Gathering catalog published (generation {})", generation);
        Ok(generation)
    }

    /// Computes the award for one gather without granting it. `None` when
    /// the item is unknown or the gate blocks it; `Some(0)` at the level
    /// cap.
    #[must_use]
    pub fn preview(&self, character: &dyn Character, item_id: ItemId) -> Option<u32> {
        let snapshot = self.catalog.snapshot();
        let def = snapshot.lookup(item_id)?;
        if !self.gate.is_enabled(def.profession) {
            return None;
        }
        let skill = character.skill_value(def.profession);
        let scale = snapshot.zone_scale(character.zone_id());
        Some(calc::calculate(def, skill, character.level(), scale))
    }
}

impl GatherEventSink for GatheringExperience {
    fn on_gather(&self, character: &dyn Character, item_id: ItemId) {
        if !self.is_enabled() {
            return;
        }
        let Some(xp) = self.preview(character, item_id) else {
            return;
        };
        if xp == 0 {
            return;
        }
        tracing::debug!("Awarding {} gathering XP for item {}", xp, item_id);
        character.award_xp(xp);
    }

    fn on_config_reload(&self) {
        if let Err(err) = self.reload() {
            tracing::warn!("Reload failed, keeping previous catalog: {}", err);
        }
    }
}

// ============================================================================
// Test Double
// ============================================================================

/// Scriptable [`Character`] for tests.
#[derive(Debug)]
pub struct MockCharacter {
    /// Level reported to the module.
    pub level: u32,
    /// Zone reported to the module.
    pub zone_id: ZoneId,
    /// Skill values in storage-id order (mining, herbalism, skinning,
    /// fishing).
    pub skills: [u16; 4],
    awards: Mutex<Vec<u32>>,
}

impl MockCharacter {
    /// Creates a character with one flat skill value in every profession.
    #[must_use]
    pub fn new(level: u32, zone_id: ZoneId, skill: u16) -> Self {
        Self {
            level,
            zone_id,
            skills: [skill; 4],
            awards: Mutex::new(Vec::new()),
        }
    }

    /// Every award granted so far, in order.
    #[must_use]
    pub fn awards(&self) -> Vec<u32> {
        self.awards.lock().clone()
    }

    /// Sum of all awards granted so far.
    #[must_use]
    pub fn awarded_total(&self) -> u64 {
        self.awards.lock().iter().map(|&xp| u64::from(xp)).sum()
    }
}

impl Character for MockCharacter {
    fn level(&self) -> u32 {
        self.level
    }

    fn zone_id(&self) -> ZoneId {
        self.zone_id
    }

    fn skill_value(&self, profession: Profession) -> u16 {
        self.skills[profession.index()]
    }

    fn award_xp(&self, amount: u32) {
        self.awards.lock().push(amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{DefinitionRow, MemoryStore};

    fn service_with_one_ore() -> GatheringExperience {
        let store = MemoryStore::new();
        store
            .upsert_definition(&DefinitionRow {
                item_id: 2771,
                base_xp: 400,
                required_skill: 200,
                profession: 1,
                name: "Tin Ore".to_string(),
                rarity: None,
            })
            .unwrap();
        GatheringExperience::new(Box::new(store), true)
    }

    #[test]
    fn test_on_gather_awards_computed_xp() {
        let service = service_with_one_ore();
        let character = MockCharacter::new(60, 1, 225);
        service.on_gather(&character, 2771);
        // Moderate tier x1.0, 10 levels over the band: 400 * 0.7.
        assert_eq!(character.awards(), vec![280]);
    }

    #[test]
    fn test_unknown_item_is_silent() {
        let service = service_with_one_ore();
        let character = MockCharacter::new(60, 1, 225);
        service.on_gather(&character, 99999);
        assert!(character.awards().is_empty());
    }

    #[test]
    fn test_master_switch_silences_everything() {
        let service = service_with_one_ore();
        service.set_enabled(false);
        let character = MockCharacter::new(60, 1, 225);
        service.on_gather(&character, 2771);
        assert!(character.awards().is_empty());
        assert!(!service.is_enabled());
    }

    #[test]
    fn test_gated_profession_is_silent() {
        let service = service_with_one_ore();
        service.gate().set(Profession::Mining, false);
        let character = MockCharacter::new(60, 1, 225);
        service.on_gather(&character, 2771);
        assert!(character.awards().is_empty());
    }

    #[test]
    fn test_level_cap_never_calls_award() {
        let service = service_with_one_ore();
        let character = MockCharacter::new(80, 1, 225);
        service.on_gather(&character, 2771);
        assert!(character.awards().is_empty());
        // Preview still reports the zero, for admin inspection.
        assert_eq!(service.preview(&character, 2771), Some(0));
    }

    #[test]
    fn test_reload_never_reopens_a_persistently_closed_gate() {
        let store = Arc::new(MemoryStore::new());
        store
            .upsert_definition(&DefinitionRow {
                item_id: 41802,
                base_xp: 600,
                required_skill: 1,
                profession: 4,
                name: "Glacial Salmon".to_string(),
                rarity: None,
            })
            .unwrap();
        store.save_setting(Profession::Fishing, false).unwrap();
        let service = Arc::new(GatheringExperience::new(Box::new(Arc::clone(&store)), true));

        // Hammer reloads while a character fishes as fast as it can. The
        // stored flag says fishing is off, so not one gather may pay, no
        // matter where it lands relative to a reload.
        let reloader = {
            let service = Arc::clone(&service);
            std::thread::spawn(move || {
                for _ in 0..2_000 {
                    service.reload().unwrap();
                }
            })
        };
        let angler = MockCharacter::new(70, 1, 300);
        while !reloader.is_finished() {
            service.on_gather(&angler, 41802);
        }
        reloader.join().unwrap();
        service.on_gather(&angler, 41802);

        assert_eq!(
            angler.awarded_total(),
            0,
            "disabled fishing paid out: {:?}",
            angler.awards()
        );
    }

    #[test]
    fn test_reload_failure_keeps_serving_old_snapshot() {
        let store = Arc::new(MemoryStore::new());
        store
            .upsert_definition(&DefinitionRow {
                item_id: 765,
                base_xp: 50,
                required_skill: 1,
                profession: 2,
                name: "Silverleaf".to_string(),
                rarity: None,
            })
            .unwrap();
        let service = GatheringExperience::new(Box::new(Arc::clone(&store)), true);
        let generation_before = service.snapshot().generation();

        store.set_failing(true);
        assert!(service.reload().is_err());
        service.on_config_reload(); // the sink swallows it with a warning

        assert_eq!(service.snapshot().generation(), generation_before);
        assert!(service.snapshot().lookup(765).is_some());

        // Once the store recovers, the next reload goes through.
        store.set_failing(false);
        let generation = service.reload().unwrap();
        assert_eq!(generation, generation_before + 1);
    }
}
