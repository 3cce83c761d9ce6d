//! # Admin Mutation Interface
//!
//! The operator surface: every edit to the reference data goes through
//! here. The contract is the same for every mutation:
//!
//! 1. Validate the input fully, before storage is touched
//! 2. Apply the change to the store
//! 3. Reload, so the serving snapshot reflects the store
//!
//! A reload failure after a successful write is a warning, not an error:
//! the write is durable, the prior snapshot keeps serving, and the next
//! successful reload picks the change up. Listing operations read; they
//! never trigger a reload.

use gatherxp_core::{
    GatherError, GatherResult, GatheringDefinition, ItemId, Profession, RarityTier, ZoneId,
};

use crate::service::GatheringExperience;
use crate::store::{DefinitionRow, ZoneRow};

/// Snapshot of module state for the `status` listing.
#[derive(Clone, Debug)]
pub struct StatusReport {
    /// Module version, from the crate manifest.
    pub version: &'static str,
    /// Master switch state.
    pub enabled: bool,
    /// Generation of the serving catalog snapshot.
    pub generation: u64,
    /// Loaded definition count.
    pub definition_count: usize,
    /// Loaded zone multiplier count.
    pub zone_count: usize,
    /// Per-profession gate states, in storage-id order.
    pub professions: [(Profession, bool); 4],
}

fn definition_row(item_id: ItemId, def: &GatheringDefinition) -> DefinitionRow {
    DefinitionRow {
        item_id,
        base_xp: def.base_xp,
        required_skill: def.required_skill,
        profession: def.profession as u8,
        name: def.name.clone(),
        rarity: Some(def.rarity as u8),
    }
}

impl GatheringExperience {
    /// Module version string.
    #[must_use]
    pub fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    /// Current module state, for the status listing.
    #[must_use]
    pub fn status(&self) -> StatusReport {
        let snapshot = self.snapshot();
        StatusReport {
            version: self.version(),
            enabled: self.is_enabled(),
            generation: snapshot.generation(),
            definition_count: snapshot.definition_count(),
            zone_count: snapshot.zone_count(),
            professions: self.gate().states(),
        }
    }

    /// Adds a definition for an item that does not have one yet.
    pub fn add_definition(
        &self,
        item_id: ItemId,
        base_xp: u32,
        required_skill: u16,
        profession: Profession,
        name: &str,
        rarity: RarityTier,
    ) -> GatherResult<()> {
        if base_xp == 0 {
            return Err(GatherError::InvalidValue {
                field: "basexp",
                value: "0 (must be greater than 0)".to_string(),
            });
        }
        if self.snapshot().lookup(item_id).is_some() {
            return Err(GatherError::InvalidValue {
                field: "item",
                value: format!("{item_id} already has a definition, use modify"),
            });
        }
        let def = GatheringDefinition {
            base_xp,
            required_skill,
            profession,
            name: name.to_string(),
            rarity,
        };
        self.store().upsert_definition(&definition_row(item_id, &def))?;
        tracing::info!(
            "Added definition for item {}: {} XP, {}",
            item_id,
            base_xp,
            profession.name()
        );
        self.reload_after_write("add");
        Ok(())
    }

    /// Removes an item's definition.
    pub fn remove_definition(&self, item_id: ItemId) -> GatherResult<()> {
        if self.snapshot().lookup(item_id).is_none() {
            return Err(GatherError::ItemNotFound(item_id));
        }
        self.store().delete_definition(item_id)?;
        tracing::info!("Removed definition for item {}", item_id);
        self.reload_after_write("remove");
        Ok(())
    }

    /// Modifies one field of an existing definition.
    ///
    /// Fields: `basexp`, `reqskill`, `profession`, `rarity`, `name`. The
    /// value is parsed per field; nothing is written until it parses.
    pub fn modify_definition(&self, item_id: ItemId, field: &str, value: &str) -> GatherResult<()> {
        let snapshot = self.snapshot();
        let Some(current) = snapshot.lookup(item_id) else {
            return Err(GatherError::ItemNotFound(item_id));
        };
        let mut def = current.clone();
        match field.to_ascii_lowercase().as_str() {
            "basexp" => {
                def.base_xp = value
                    .parse::<u32>()
                    .ok()
                    .filter(|&xp| xp > 0)
                    .ok_or_else(|| GatherError::InvalidValue {
                        field: "basexp",
                        value: value.to_string(),
                    })?;
            }
            "reqskill" => {
                def.required_skill =
                    value.parse::<u16>().map_err(|_| GatherError::InvalidValue {
                        field: "reqskill",
                        value: value.to_string(),
                    })?;
            }
            "profession" => {
                def.profession = Profession::parse(value)
                    .ok_or_else(|| GatherError::InvalidProfession(value.to_string()))?;
            }
            "rarity" => {
                def.rarity = RarityTier::parse(value).ok_or_else(|| GatherError::InvalidValue {
                    field: "rarity",
                    value: value.to_string(),
                })?;
            }
            "name" => {
                def.name = value.to_string();
            }
            other => return Err(GatherError::InvalidField(other.to_string())),
        }
        self.store().upsert_definition(&definition_row(item_id, &def))?;
        tracing::info!("Modified item {}: {} = {}", item_id, field, value);
        self.reload_after_write("modify");
        Ok(())
    }

    /// Sets a zone's multiplier, adding the zone if it has no entry.
    ///
    /// When `name` is omitted an existing name is kept; a brand-new zone
    /// falls back to a placeholder.
    pub fn set_zone_multiplier(
        &self,
        zone_id: ZoneId,
        multiplier: f32,
        name: Option<&str>,
    ) -> GatherResult<()> {
        if !(multiplier.is_finite() && multiplier > 0.0) {
            return Err(GatherError::InvalidMultiplier(multiplier));
        }
        let name = match name {
            Some(name) => name.to_string(),
            None => self
                .store()
                .fetch_zones()?
                .into_iter()
                .find(|row| row.zone_id == zone_id)
                .map_or_else(|| format!("zone {zone_id}"), |row| row.name),
        };
        self.store().upsert_zone(&ZoneRow {
            zone_id,
            multiplier,
            name,
        })?;
        tracing::info!("Set zone {} multiplier to {}", zone_id, multiplier);
        self.reload_after_write("zone set");
        Ok(())
    }

    /// Removes a zone's multiplier; the zone reverts to the implicit 1.0.
    pub fn remove_zone(&self, zone_id: ZoneId) -> GatherResult<()> {
        if !self
            .store()
            .fetch_zones()?
            .iter()
            .any(|row| row.zone_id == zone_id)
        {
            return Err(GatherError::ZoneNotFound(zone_id));
        }
        self.store().delete_zone(zone_id)?;
        tracing::info!("Removed zone {} multiplier", zone_id);
        self.reload_after_write("zone remove");
        Ok(())
    }

    /// Flips a profession's gate and persists the new state. Returns the
    /// new state.
    ///
    /// The flip is live immediately; a failed persist is a warning and the
    /// runtime state stands until the next reload re-reads storage.
    pub fn toggle_profession(&self, profession: Profession) -> bool {
        let enabled = self.gate().toggle(profession);
        if let Err(err) = self.store().save_setting(profession, enabled) {
            tracing::warn!("{} gate toggled but not persisted: {}", profession.name(), err);
        }
        tracing::info!("{} gathering experience: enabled={}", profession.name(), enabled);
        enabled
    }

    /// All loaded definitions, sorted by item id, optionally filtered by
    /// profession. Reads the serving snapshot; never reloads.
    #[must_use]
    pub fn list_definitions(
        &self,
        profession: Option<Profession>,
    ) -> Vec<(ItemId, GatheringDefinition)> {
        let snapshot = self.snapshot();
        let mut rows: Vec<_> = snapshot
            .definitions()
            .filter(|(_, def)| profession.map_or(true, |p| def.profession == p))
            .map(|(&id, def)| (id, def.clone()))
            .collect();
        rows.sort_by_key(|&(id, _)| id);
        rows
    }

    /// All stored zone rows, sorted by zone id. Reads storage so the
    /// listing includes display names.
    pub fn list_zones(&self) -> GatherResult<Vec<ZoneRow>> {
        let mut rows = self.store().fetch_zones()?;
        rows.sort_by_key(|row| row.zone_id);
        Ok(rows)
    }

    fn reload_after_write(&self, action: &str) {
        if let Err(err) = self.reload() {
            tracing::warn!(
                "{} persisted but reload failed, previous snapshot keeps serving: {}",
                action,
                err
            );
        }
    }
}
