//! # Command Adapter
//!
//! Maps operator command lines onto the admin interface, one verb per
//! operation, and renders human-readable replies. This is a thin textual
//! shim: all validation and mutation logic lives in [`crate::admin`];
//! malformed input is rejected here with a usage string before storage is
//! ever touched.

use gatherxp_core::{Profession, RarityTier};

use crate::service::GatheringExperience;

const HELP: &str = "\
Gathering experience commands:
  version                                          show module version
  status                                           show module state
  reload                                           re-read reference data
  list [profession]                                list definitions
  add <itemId> <baseXP> <reqSkill> <prof> <name> [rarity]
  remove <itemId>                                  delete a definition
  modify <itemId> <field> <value>                  fields: basexp reqskill profession rarity name
  zone add <zoneId> <multiplier> [name]            set a zone multiplier
  zone modify <zoneId> <multiplier>                change a zone multiplier
  zone remove <zoneId>                             drop a zone multiplier
  zone list                                        list zone multipliers
  toggle <profession>                              enable/disable a profession";

/// Splits a command line into tokens, honoring double-quoted strings so
/// multi-word names stay one argument.
fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ch if ch.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            ch => current.push(ch),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn parse_num<T: std::str::FromStr>(token: &str, what: &str) -> Result<T, String> {
    token
        .parse::<T>()
        .map_err(|_| format!("'{token}' is not a valid {what}"))
}

fn parse_profession(token: &str) -> Result<Profession, String> {
    Profession::parse(token)
        .ok_or_else(|| format!("'{token}' is not a profession (Mining, Herbalism, Skinning, Fishing)"))
}

/// Handles one operator command line and returns the reply text.
#[must_use]
pub fn handle_command(service: &GatheringExperience, line: &str) -> String {
    let tokens = tokenize(line);
    let args: Vec<&str> = tokens.iter().map(String::as_str).collect();
    match args.split_first() {
        None => HELP.to_string(),
        Some((&verb, rest)) => match verb.to_ascii_lowercase().as_str() {
            "help" => HELP.to_string(),
            "version" => format!("GatheringExperience v{}", service.version()),
            "status" => render_status(service),
            "reload" => match service.reload() {
                Ok(generation) => {
                    let snapshot = service.snapshot();
                    format!(
                        "reloaded: {} definitions, {} zones (generation {generation})",
                        snapshot.definition_count(),
                        snapshot.zone_count()
                    )
                }
                Err(err) => format!("reload failed, previous data still active: {err}"),
            },
            "add" => cmd_add(service, rest),
            "remove" => cmd_remove(service, rest),
            "modify" => cmd_modify(service, rest),
            "list" => cmd_list(service, rest),
            "zone" => cmd_zone(service, rest),
            "toggle" => cmd_toggle(service, rest),
            other => format!("unknown command '{other}', try 'help'"),
        },
    }
}

fn cmd_add(service: &GatheringExperience, args: &[&str]) -> String {
    let ([item, xp, skill, prof, name], rarity_arg): ([&str; 5], Option<&str>) = match args {
        &[a, b, c, d, e] => ([a, b, c, d, e], None),
        &[a, b, c, d, e, f] => ([a, b, c, d, e], Some(f)),
        _ => return "usage: add <itemId> <baseXP> <reqSkill> <profession> <name> [rarity]".to_string(),
    };
    let item_id = match parse_num(item, "item id") {
        Ok(id) => id,
        Err(err) => return err,
    };
    let base_xp = match parse_num(xp, "base XP") {
        Ok(xp) => xp,
        Err(err) => return err,
    };
    let required_skill = match parse_num(skill, "required skill") {
        Ok(skill) => skill,
        Err(err) => return err,
    };
    let profession = match parse_profession(prof) {
        Ok(profession) => profession,
        Err(err) => return err,
    };
    let rarity = match rarity_arg {
        None => RarityTier::Common,
        Some(token) => match RarityTier::parse(token) {
            Some(rarity) => rarity,
            None => return format!("'{token}' is not a rarity (common, uncommon, rare)"),
        },
    };
    match service.add_definition(item_id, base_xp, required_skill, profession, name, rarity) {
        Ok(()) => format!(
            "added item {item_id} ({name}): {} XP, skill {required_skill}, {}",
            base_xp,
            profession.name()
        ),
        Err(err) => err.to_string(),
    }
}

fn cmd_remove(service: &GatheringExperience, args: &[&str]) -> String {
    let [item] = args else {
        return "usage: remove <itemId>".to_string();
    };
    let item_id = match parse_num(item, "item id") {
        Ok(id) => id,
        Err(err) => return err,
    };
    match service.remove_definition(item_id) {
        Ok(()) => format!("removed gathering data for item {item_id}"),
        Err(err) => err.to_string(),
    }
}

fn cmd_modify(service: &GatheringExperience, args: &[&str]) -> String {
    let [item, field, value] = args else {
        return "usage: modify <itemId> <field> <value>  (fields: basexp reqskill profession rarity name)"
            .to_string();
    };
    let item_id = match parse_num(item, "item id") {
        Ok(id) => id,
        Err(err) => return err,
    };
    match service.modify_definition(item_id, field, value) {
        Ok(()) => format!("item {item_id}: {field} set to {value}"),
        Err(err) => err.to_string(),
    }
}

fn cmd_list(service: &GatheringExperience, args: &[&str]) -> String {
    let filter = match args {
        [] => None,
        [prof] => match parse_profession(prof) {
            Ok(profession) => Some(profession),
            Err(err) => return err,
        },
        _ => return "usage: list [profession]".to_string(),
    };
    let rows = service.list_definitions(filter);
    if rows.is_empty() {
        return "no gathering definitions loaded".to_string();
    }
    let mut out = format!("{} definition(s):", rows.len());
    for (item_id, def) in rows {
        out.push_str(&format!(
            "\n  {item_id}: {} ({}, base {} XP, skill {}, {})",
            def.name,
            def.profession.name(),
            def.base_xp,
            def.required_skill,
            def.rarity.name()
        ));
    }
    out
}

fn cmd_zone(service: &GatheringExperience, args: &[&str]) -> String {
    let usage = "usage: zone add <zoneId> <multiplier> [name] | zone modify <zoneId> <multiplier> | zone remove <zoneId> | zone list";
    match args {
        ["list"] => match service.list_zones() {
            Ok(rows) if rows.is_empty() => "no zone multipliers stored".to_string(),
            Ok(rows) => {
                let mut out = format!("{} zone multiplier(s):", rows.len());
                for row in rows {
                    out.push_str(&format!(
                        "\n  {}: x{:.2} ({})",
                        row.zone_id, row.multiplier, row.name
                    ));
                }
                out
            }
            Err(err) => err.to_string(),
        },
        ["add" | "modify", zone, mult] | ["add", zone, mult, _] => {
            let zone_id = match parse_num(zone, "zone id") {
                Ok(id) => id,
                Err(err) => return err,
            };
            let multiplier = match parse_num::<f32>(mult, "multiplier") {
                Ok(m) => m,
                Err(err) => return err,
            };
            let name = args.get(3).copied();
            match service.set_zone_multiplier(zone_id, multiplier, name) {
                Ok(()) => format!("zone {zone_id} multiplier set to {multiplier}"),
                Err(err) => err.to_string(),
            }
        }
        ["remove", zone] => {
            let zone_id = match parse_num(zone, "zone id") {
                Ok(id) => id,
                Err(err) => return err,
            };
            match service.remove_zone(zone_id) {
                Ok(()) => format!("zone {zone_id} multiplier removed (back to 1.0)"),
                Err(err) => err.to_string(),
            }
        }
        _ => usage.to_string(),
    }
}

fn cmd_toggle(service: &GatheringExperience, args: &[&str]) -> String {
    let [prof] = args else {
        return "usage: toggle <profession>".to_string();
    };
    match parse_profession(prof) {
        Ok(profession) => {
            let enabled = service.toggle_profession(profession);
            format!(
                "{} gathering experience is now {}",
                profession.name(),
                if enabled { "enabled" } else { "disabled" }
            )
        }
        Err(err) => err,
    }
}

fn render_status(service: &GatheringExperience) -> String {
    let status = service.status();
    let mut out = format!(
        "GatheringExperience v{} - {}\n{} definitions, {} zones (generation {})",
        status.version,
        if status.enabled { "enabled" } else { "DISABLED" },
        status.definition_count,
        status.zone_count,
        status.generation
    );
    for (profession, enabled) in status.professions {
        out.push_str(&format!(
            "\n  {}: {}",
            profession.name(),
            if enabled { "enabled" } else { "disabled" }
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{GatheringStore, MemoryStore};
    use std::sync::Arc;

    fn service() -> GatheringExperience {
        GatheringExperience::new(Box::new(MemoryStore::new()), true)
    }

    #[test]
    fn test_tokenize_honors_quotes() {
        assert_eq!(
            tokenize(r#"add 2770 50 1 mining "Copper Ore" uncommon"#),
            vec!["add", "2770", "50", "1", "mining", "Copper Ore", "uncommon"]
        );
        assert_eq!(tokenize("  status  "), vec!["status"]);
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_unknown_command_points_at_help() {
        let reply = handle_command(&service(), "frobnicate");
        assert!(reply.contains("unknown command"));
        assert!(handle_command(&service(), "help").contains("zone add"));
    }

    #[test]
    fn test_add_and_list_round_trip() {
        let service = service();
        let reply = handle_command(&service, r#"add 2770 50 1 mining "Copper Ore""#);
        assert!(reply.contains("2770"), "unexpected reply: {reply}");
        let listing = handle_command(&service, "list mining");
        assert!(listing.contains("Copper Ore"));
        assert!(listing.contains("Mining"));
    }

    #[test]
    fn test_malformed_input_never_touches_storage() {
        let store = Arc::new(MemoryStore::new());
        let service = GatheringExperience::new(Box::new(Arc::clone(&store)), true);

        assert!(handle_command(&service, "add").contains("usage"));
        assert!(handle_command(&service, "add one two three four five").contains("not a valid"));
        assert!(handle_command(&service, "zone add x y").contains("not a valid"));
        assert!(handle_command(&service, "remove notanumber").contains("not a valid"));

        assert!(store.fetch_definitions().unwrap().is_empty());
        assert!(store.fetch_zones().unwrap().is_empty());
    }

    #[test]
    fn test_toggle_reports_new_state() {
        let service = service();
        let reply = handle_command(&service, "toggle fishing");
        assert!(reply.contains("Fishing"));
        assert!(reply.contains("disabled"));
        let reply = handle_command(&service, "toggle fishing");
        assert!(reply.contains("enabled"));
    }

    #[test]
    fn test_zone_lifecycle_through_commands() {
        let service = service();
        let reply = handle_command(&service, r#"zone add 440 1.5 "Tanaris""#);
        assert!(reply.contains("440"));
        assert!(handle_command(&service, "zone list").contains("Tanaris"));
        assert!(handle_command(&service, "zone modify 440 2.0").contains("2"));
        assert!(handle_command(&service, "zone remove 440").contains("removed"));
        assert!(handle_command(&service, "zone remove 440").contains("not found"));
    }

    #[test]
    fn test_status_and_version() {
        let service = service();
        assert!(handle_command(&service, "version").starts_with("GatheringExperience v"));
        let status = handle_command(&service, "status");
        assert!(status.contains("Mining"));
        assert!(status.contains("0 definitions"));
    }
}
