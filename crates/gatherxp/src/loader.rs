//! # Loader
//!
//! Turns raw storage rows into a validated [`Catalog`] and gate state.
//!
//! Two strictness levels, matching the two call sites:
//!
//! - **Startup** ([`load_catalog`]): per-table fail soft. A broken table
//!   loads as empty with a warning; the module always comes up.
//! - **Reload** ([`try_load_catalog`]): strict. A store failure aborts the
//!   rebuild so the serving snapshot is never replaced by a gutted one.
//!
//! In both modes, individually invalid rows (zero base XP, unknown
//! profession id, non-positive multiplier) are skipped with a warning; one
//! bad row never poisons its table.

use std::collections::HashMap;

use gatherxp_core::{
    Catalog, GatherResult, GatheringDefinition, ItemId, Profession, ProfessionGate, RarityTier,
    ZoneId, ALL_PROFESSIONS,
};

use crate::store::{DefinitionRow, GatheringStore, ZoneRow};

fn definition_map(rows: Vec<DefinitionRow>) -> HashMap<ItemId, GatheringDefinition> {
    let mut map = HashMap::with_capacity(rows.len());
    for row in rows {
        if row.base_xp == 0 {
            tracing::warn!("Skipping definition for item {}: zero base XP", row.item_id);
            continue;
        }
        let Some(profession) = Profession::from_u8(row.profession) else {
            tracing::warn!(
                "Skipping definition for item {}: unknown profession id {}",
                row.item_id,
                row.profession
            );
            continue;
        };
        let rarity = row.rarity.map_or(RarityTier::Common, RarityTier::from_u8);
        if map
            .insert(
                row.item_id,
                GatheringDefinition {
                    base_xp: row.base_xp,
                    required_skill: row.required_skill,
                    profession,
                    name: row.name,
                    rarity,
                },
            )
            .is_some()
        {
            tracing::warn!("Duplicate definition row for item {}, last wins", row.item_id);
        }
    }
    map
}

fn zone_map(rows: Vec<ZoneRow>) -> HashMap<ZoneId, f32> {
    let mut map = HashMap::with_capacity(rows.len());
    for row in rows {
        if !(row.multiplier.is_finite() && row.multiplier > 0.0) {
            tracing::warn!(
                "Skipping zone {}: non-positive multiplier {}",
                row.zone_id,
                row.multiplier
            );
            continue;
        }
        map.insert(row.zone_id, row.multiplier);
    }
    map
}

/// Builds a catalog from the store, aborting on any table fetch failure.
///
/// Used by the reload path: the caller keeps serving the prior snapshot
/// when this fails.
pub fn try_load_catalog(store: &dyn GatheringStore) -> GatherResult<Catalog> {
    let definitions = definition_map(store.fetch_definitions()?);
    let zones = zone_map(store.fetch_zones()?);
    tracing::info!(
        "Gathering catalog rebuilt: {} definitions, {} zones",
        definitions.len(),
        zones.len()
    );
    Ok(Catalog::new(definitions, zones))
}

/// Builds a catalog from the store, degrading each broken table to empty.
///
/// Used at startup, where there is no prior snapshot to fall back on and
/// the host must boot regardless.
#[must_use]
pub fn load_catalog(store: &dyn GatheringStore) -> Catalog {
    let definitions = match store.fetch_definitions() {
        Ok(rows) => definition_map(rows),
        Err(err) => {
            tracing::warn!("Definitions table unavailable, loading empty: {}", err);
            HashMap::new()
        }
    };
    let zones = match store.fetch_zones() {
        Ok(rows) => zone_map(rows),
        Err(err) => {
            tracing::warn!("Zone table unavailable, loading empty: {}", err);
            HashMap::new()
        }
    };
    tracing::info!(
        "Gathering catalog loaded: {} definitions, {} zones",
        definitions.len(),
        zones.len()
    );
    Catalog::new(definitions, zones)
}

/// Reads persisted gate flags into `gate`.
///
/// Professions with no stored row reset to enabled; a failed fetch leaves
/// everything enabled with a warning.
///
/// Each profession's target state is resolved before any flag is touched,
/// then written with exactly one `set`. The gate is consulted on the live
/// gather path, so a transient all-enabled default must never be visible.
pub fn load_gate(store: &dyn GatheringStore, gate: &ProfessionGate) {
    let mut targets = [true; ALL_PROFESSIONS.len()];
    match store.fetch_settings() {
        Ok(rows) => {
            for row in rows {
                match Profession::from_u8(row.profession) {
                    Some(profession) => targets[profession.index()] = row.enabled,
                    None => {
                        tracing::warn!(
                            "Skipping setting with unknown profession id {}",
                            row.profession
                        );
                    }
                }
            }
        }
        Err(err) => {
            tracing::warn!("Settings table unavailable, all professions enabled: {}", err);
        }
    }
    for profession in ALL_PROFESSIONS {
        gate.set(profession, targets[profession.index()]);
    }
}
