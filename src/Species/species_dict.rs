//! # Species Dictionary Module
//!
//! Reads and writes RMG species dictionaries: blank-line separated blocks
//! of `label` followed by an adjacency list, the label/structure registry
//! emitted next to every Chemkin mechanism file. Loading yields plain
//! species records with the adjacency list as their descriptor.

use super::record::SpeciesRecord;
use log::warn;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Empty species dictionary: {0}")]
    Empty(String),
}

/// Load a species dictionary file into records, preserving file order.
pub fn load_species_dictionary<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<SpeciesRecord>, DictionaryError> {
    let text = fs::read_to_string(&path)?;
    let records = parse_species_dictionary(&text);
    if records.is_empty() {
        return Err(DictionaryError::Empty(
            path.as_ref().display().to_string(),
        ));
    }
    Ok(records)
}

/// Parse dictionary text: each block starts with a label line, the rest of
/// the block is the adjacency list (a `multiplicity` line stays part of it).
pub fn parse_species_dictionary(text: &str) -> Vec<SpeciesRecord> {
    let mut records = Vec::new();
    for block in text.split("\n\n") {
        let lines: Vec<&str> = block.lines().filter(|l| !l.trim().is_empty()).collect();
        if lines.is_empty() {
            continue;
        }
        let label = lines[0].trim();
        if lines.len() < 2 {
            warn!("species dictionary entry '{}' has no adjacency list", label);
            records.push(SpeciesRecord::new(label));
            continue;
        }
        let mut record = SpeciesRecord::new(label);
        record.adjlist = Some(lines[1..].join("\n"));
        records.push(record);
    }
    records
}

/// Write records that carry an adjacency list back out as a dictionary.
/// Records without one are skipped with a warning, matching what upstream
/// tooling does with partially resolved species.
pub fn save_species_dictionary<P: AsRef<Path>>(
    path: P,
    records: &[SpeciesRecord],
) -> Result<(), DictionaryError> {
    let mut blocks = Vec::new();
    for record in records {
        match &record.adjlist {
            Some(adjlist) => blocks.push(format!("{}\n{}", record.label, adjlist.trim_end())),
            None => warn!(
                "species '{}' has no adjacency list, omitted from dictionary",
                record.label
            ),
        }
    }
    fs::write(path, blocks.join("\n\n") + "\n")?;
    Ok(())
}
