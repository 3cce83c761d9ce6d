//! # Backing Store
//!
//! The storage boundary for all gathering reference data. The
//! [`GatheringStore`] trait is the only thing the rest of the module knows
//! about persistence; the default backend is one TOML file per table under
//! a data directory.
//!
//! ## Tables
//!
//! | file               | rows                                              |
//! |--------------------|---------------------------------------------------|
//! | `definitions.toml` | `{item_id, base_xp, required_skill, profession, name, rarity?}` |
//! | `zones.toml`       | `{zone_id, multiplier, name}`                     |
//! | `settings.toml`    | `{profession, enabled}`                           |
//!
//! Rows carry raw storage encodings (`u8` profession/rarity ids); decoding
//! into domain types is the loader's job, so a bad row degrades to a
//! warning instead of failing the whole table parse.
//!
//! ## Crash Safety
//!
//! Every write goes to a temp file in the same directory and is renamed
//! over the table. A crash mid-write leaves the old table intact.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use gatherxp_core::{GatherError, GatherResult, ItemId, Profession, ZoneId};

/// One row of the definitions table, in storage encoding.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DefinitionRow {
    /// Item the definition applies to.
    pub item_id: ItemId,
    /// Base experience tuning value.
    pub base_xp: u32,
    /// Skill at which the material is appropriate.
    pub required_skill: u16,
    /// Profession storage id (`1..=4`).
    pub profession: u8,
    /// Display name.
    pub name: String,
    /// Rarity storage id (`0..=2`); absent means common.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rarity: Option<u8>,
}

/// One row of the zone multiplier table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZoneRow {
    /// Zone the multiplier applies to.
    pub zone_id: ZoneId,
    /// Reward multiplier, strictly positive.
    pub multiplier: f32,
    /// Display name.
    pub name: String,
}

/// One row of the settings table: a persisted profession gate flag.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SettingRow {
    /// Profession storage id (`1..=4`).
    pub profession: u8,
    /// Whether awards for the profession are enabled.
    pub enabled: bool,
}

/// Storage boundary for gathering reference data.
///
/// Fetches return whole tables; the catalog is always rebuilt wholesale,
/// never patched. Mutations are individually durable.
pub trait GatheringStore: Send + Sync {
    /// Reads the full definitions table.
    fn fetch_definitions(&self) -> GatherResult<Vec<DefinitionRow>>;
    /// Reads the full zone multiplier table.
    fn fetch_zones(&self) -> GatherResult<Vec<ZoneRow>>;
    /// Reads the full settings table.
    fn fetch_settings(&self) -> GatherResult<Vec<SettingRow>>;
    /// Inserts or replaces one definition row.
    fn upsert_definition(&self, row: &DefinitionRow) -> GatherResult<()>;
    /// Deletes a definition row; deleting an absent row is not an error.
    fn delete_definition(&self, item_id: ItemId) -> GatherResult<()>;
    /// Inserts or replaces one zone row.
    fn upsert_zone(&self, row: &ZoneRow) -> GatherResult<()>;
    /// Deletes a zone row; deleting an absent row is not an error.
    fn delete_zone(&self, zone_id: ZoneId) -> GatherResult<()>;
    /// Persists one profession gate flag.
    fn save_setting(&self, profession: Profession, enabled: bool) -> GatherResult<()>;
}

/// A shared store is a store; hosts and tests keep their own handle while
/// the service owns another.
impl<S: GatheringStore + ?Sized> GatheringStore for std::sync::Arc<S> {
    fn fetch_definitions(&self) -> GatherResult<Vec<DefinitionRow>> {
        (**self).fetch_definitions()
    }
    fn fetch_zones(&self) -> GatherResult<Vec<ZoneRow>> {
        (**self).fetch_zones()
    }
    fn fetch_settings(&self) -> GatherResult<Vec<SettingRow>> {
        (**self).fetch_settings()
    }
    fn upsert_definition(&self, row: &DefinitionRow) -> GatherResult<()> {
        (**self).upsert_definition(row)
    }
    fn delete_definition(&self, item_id: ItemId) -> GatherResult<()> {
        (**self).delete_definition(item_id)
    }
    fn upsert_zone(&self, row: &ZoneRow) -> GatherResult<()> {
        (**self).upsert_zone(row)
    }
    fn delete_zone(&self, zone_id: ZoneId) -> GatherResult<()> {
        (**self).delete_zone(zone_id)
    }
    fn save_setting(&self, profession: Profession, enabled: bool) -> GatherResult<()> {
        (**self).save_setting(profession, enabled)
    }
}

// ============================================================================
// TOML File Store
// ============================================================================

#[derive(Debug, Default, Serialize, Deserialize)]
struct DefinitionsFile {
    #[serde(default)]
    definitions: Vec<DefinitionRow>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ZonesFile {
    #[serde(default)]
    zones: Vec<ZoneRow>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    settings: Vec<SettingRow>,
}

/// TOML-file backing store, one file per table under a data directory.
///
/// Mutations hold a single store-wide mutex: admin edits are rare and a
/// read-modify-write on a whole table must not interleave.
#[derive(Debug)]
pub struct TomlStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

const DEFINITIONS_FILE: &str = "definitions.toml";
const ZONES_FILE: &str = "zones.toml";
const SETTINGS_FILE: &str = "settings.toml";

impl TomlStore {
    /// Opens a store rooted at `dir`, creating the directory if needed.
    ///
    /// Missing table files are not an error; they read as empty tables
    /// until the first write.
    pub fn open(dir: &Path) -> GatherResult<Self> {
        fs::create_dir_all(dir).map_err(|err| GatherError::Storage {
            reason: format!("cannot create {}: {err}", dir.display()),
        })?;
        Ok(Self {
            dir: dir.to_path_buf(),
            write_lock: Mutex::new(()),
        })
    }

    fn read_table<T: Default + for<'de> Deserialize<'de>>(&self, file: &str) -> GatherResult<T> {
        let path = self.dir.join(file);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            // An absent table is empty, not broken.
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(T::default()),
            Err(err) => {
                return Err(GatherError::Storage {
                    reason: format!("cannot read {}: {err}", path.display()),
                })
            }
        };
        toml::from_str(&text).map_err(|err| GatherError::Storage {
            reason: format!("cannot parse {}: {err}", path.display()),
        })
    }

    /// Writes a table via temp file + rename, so a crash mid-write never
    /// leaves a half-written table behind.
    fn write_table<T: Serialize>(&self, file: &str, table: &T) -> GatherResult<()> {
        let path = self.dir.join(file);
        let tmp = self.dir.join(format!("{file}.tmp"));
        let text = toml::to_string_pretty(table).map_err(|err| GatherError::Storage {
            reason: format!("cannot serialize {file}: {err}"),
        })?;
        let io_err = |err: std::io::Error| GatherError::Storage {
            reason: format!("cannot write {}: {err}", path.display()),
        };
        let mut out = fs::File::create(&tmp).map_err(io_err)?;
        out.write_all(text.as_bytes()).map_err(io_err)?;
        out.sync_all().map_err(io_err)?;
        drop(out);
        fs::rename(&tmp, &path).map_err(io_err)
    }
}

impl GatheringStore for TomlStore {
    fn fetch_definitions(&self) -> GatherResult<Vec<DefinitionRow>> {
        Ok(self.read_table::<DefinitionsFile>(DEFINITIONS_FILE)?.definitions)
    }

    fn fetch_zones(&self) -> GatherResult<Vec<ZoneRow>> {
        Ok(self.read_table::<ZonesFile>(ZONES_FILE)?.zones)
    }

    fn fetch_settings(&self) -> GatherResult<Vec<SettingRow>> {
        Ok(self.read_table::<SettingsFile>(SETTINGS_FILE)?.settings)
    }

    fn upsert_definition(&self, row: &DefinitionRow) -> GatherResult<()> {
        let _guard = self.write_lock.lock();
        let mut table = self.read_table::<DefinitionsFile>(DEFINITIONS_FILE)?;
        match table.definitions.iter_mut().find(|r| r.item_id == row.item_id) {
            Some(existing) => *existing = row.clone(),
            None => table.definitions.push(row.clone()),
        }
        self.write_table(DEFINITIONS_FILE, &table)
    }

    fn delete_definition(&self, item_id: ItemId) -> GatherResult<()> {
        let _guard = self.write_lock.lock();
        let mut table = self.read_table::<DefinitionsFile>(DEFINITIONS_FILE)?;
        table.definitions.retain(|r| r.item_id != item_id);
        self.write_table(DEFINITIONS_FILE, &table)
    }

    fn upsert_zone(&self, row: &ZoneRow) -> GatherResult<()> {
        let _guard = self.write_lock.lock();
        let mut table = self.read_table::<ZonesFile>(ZONES_FILE)?;
        match table.zones.iter_mut().find(|r| r.zone_id == row.zone_id) {
            Some(existing) => *existing = row.clone(),
            None => table.zones.push(row.clone()),
        }
        self.write_table(ZONES_FILE, &table)
    }

    fn delete_zone(&self, zone_id: ZoneId) -> GatherResult<()> {
        let _guard = self.write_lock.lock();
        let mut table = self.read_table::<ZonesFile>(ZONES_FILE)?;
        table.zones.retain(|r| r.zone_id != zone_id);
        self.write_table(ZONES_FILE, &table)
    }

    fn save_setting(&self, profession: Profession, enabled: bool) -> GatherResult<()> {
        let _guard = self.write_lock.lock();
        let mut table = self.read_table::<SettingsFile>(SETTINGS_FILE)?;
        let id = profession as u8;
        match table.settings.iter_mut().find(|r| r.profession == id) {
            Some(existing) => existing.enabled = enabled,
            None => table.settings.push(SettingRow {
                profession: id,
                enabled,
            }),
        }
        self.write_table(SETTINGS_FILE, &table)
    }
}

// ============================================================================
// In-Memory Store (test double)
// ============================================================================

#[derive(Debug, Default)]
struct MemoryTables {
    definitions: Vec<DefinitionRow>,
    zones: Vec<ZoneRow>,
    settings: Vec<SettingRow>,
}

/// In-memory store for tests and ephemeral setups.
///
/// Carries a failure switch so tests can exercise the degraded paths
/// without a real broken filesystem.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<MemoryTables>,
    failing: std::sync::atomic::AtomicBool,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// When set, every trait method fails with a storage error.
    pub fn set_failing(&self, failing: bool) {
        self.failing
            .store(failing, std::sync::atomic::Ordering::Release);
    }

    fn check(&self) -> GatherResult<()> {
        if self.failing.load(std::sync::atomic::Ordering::Acquire) {
            return Err(GatherError::Storage {
                reason: "simulated storage failure".to_string(),
            });
        }
        Ok(())
    }
}

impl GatheringStore for MemoryStore {
    fn fetch_definitions(&self) -> GatherResult<Vec<DefinitionRow>> {
        self.check()?;
        Ok(self.tables.lock().definitions.clone())
    }

    fn fetch_zones(&self) -> GatherResult<Vec<ZoneRow>> {
        self.check()?;
        Ok(self.tables.lock().zones.clone())
    }

    fn fetch_settings(&self) -> GatherResult<Vec<SettingRow>> {
        self.check()?;
        Ok(self.tables.lock().settings.clone())
    }

    fn upsert_definition(&self, row: &DefinitionRow) -> GatherResult<()> {
        self.check()?;
        let mut tables = self.tables.lock();
        match tables.definitions.iter_mut().find(|r| r.item_id == row.item_id) {
            Some(existing) => *existing = row.clone(),
            None => tables.definitions.push(row.clone()),
        }
        Ok(())
    }

    fn delete_definition(&self, item_id: ItemId) -> GatherResult<()> {
        self.check()?;
        self.tables.lock().definitions.retain(|r| r.item_id != item_id);
        Ok(())
    }

    fn upsert_zone(&self, row: &ZoneRow) -> GatherResult<()> {
        self.check()?;
        let mut tables = self.tables.lock();
        match tables.zones.iter_mut().find(|r| r.zone_id == row.zone_id) {
            Some(existing) => *existing = row.clone(),
            None => tables.zones.push(row.clone()),
        }
        Ok(())
    }

    fn delete_zone(&self, zone_id: ZoneId) -> GatherResult<()> {
        self.check()?;
        self.tables.lock().zones.retain(|r| r.zone_id != zone_id);
        Ok(())
    }

    fn save_setting(&self, profession: Profession, enabled: bool) -> GatherResult<()> {
        self.check()?;
        let mut tables = self.tables.lock();
        let id = profession as u8;
        match tables.settings.iter_mut().find(|r| r.profession == id) {
            Some(existing) => existing.enabled = enabled,
            None => tables.settings.push(SettingRow {
                profession: id,
                enabled,
            }),
        }
        Ok(())
    }
}
