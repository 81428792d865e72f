//! # Chemkin Module
//!
//! Extracts species label aliases from RMG-generated Chemkin files. RMG
//! truncates and mangles labels to fit Chemkin conventions but leaves the
//! original label in a trailing `!` comment inside the `SPECIES` block:
//!
//! ```text
//! SPECIES
//!     C2H5OH(1)    ! ethanol
//! END
//! ```
//!
//! The resulting alias map feeds the reconciliation engine when two inputs
//! use the Chemkin and the RMG naming scheme for the same mechanism.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// which naming scheme the returned map is keyed by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasKey {
    Rmg,
    Chemkin,
}

/// Read the `SPECIES` block of a Chemkin file and collect label pairs from
/// `!` comments. With `AliasKey::Rmg` the map goes RMG label -> Chemkin
/// label; with `AliasKey::Chemkin` the other way around.
pub fn get_species_aliases<P: AsRef<Path>>(
    chemkin_path: P,
    key: AliasKey,
) -> Result<HashMap<String, String>, std::io::Error> {
    let text = fs::read_to_string(chemkin_path)?;
    let mut aliases = HashMap::new();
    let mut read_mode = false;
    for line in text.lines() {
        let line = line.trim();
        if !read_mode && line.to_uppercase().starts_with("SPECIES") {
            read_mode = true;
        } else if read_mode && line.to_uppercase() == "END" {
            break;
        } else if read_mode {
            if let Some((chemkin_name, rmg_name)) = line.split_once('!') {
                let chemkin_name = chemkin_name.trim();
                let rmg_name = rmg_name.trim();
                if chemkin_name.split_whitespace().count() == 1
                    && rmg_name.split_whitespace().count() == 1
                {
                    aliases.insert(rmg_name.to_string(), chemkin_name.to_string());
                }
            }
        }
    }
    if key == AliasKey::Chemkin {
        aliases = aliases.into_iter().map(|(rmg, ck)| (ck, rmg)).collect();
    }
    Ok(aliases)
}
