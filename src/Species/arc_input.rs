//! # ARC Input Module
//!
//! Reads and writes ARC-style YAML species inputs: a mapping with a
//! `species:` list of records. Saving never clobbers an existing file;
//! like the original automation scripts, a numbered suffix is appended
//! until a free path is found.

use super::record::SpeciesRecord;
use crate::Utils::labels::needs_sanitizing;
use crate::Utils::paths::next_free_path;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArcInputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("No species section in {0}")]
    NoSpecies(String),
}

#[derive(Debug, Serialize, Deserialize)]
struct ArcSpeciesFile {
    #[serde(default)]
    species: Vec<SpeciesRecord>,
}

/// Read the `species:` section of an ARC input file.
pub fn read_species_input<P: AsRef<Path>>(path: P) -> Result<Vec<SpeciesRecord>, ArcInputError> {
    let file = File::open(&path)?;
    let mut parsed: ArcSpeciesFile = serde_yaml::from_reader(file)?;
    if parsed.species.is_empty() {
        return Err(ArcInputError::NoSpecies(
            path.as_ref().display().to_string(),
        ));
    }
    for record in &mut parsed.species {
        // reaction-string labels denote transition states even when the
        // flag was not written out
        if record.label.contains("<=>") {
            record.is_ts = true;
        } else if needs_sanitizing(&record.label) {
            warn!(
                "label '{}' contains characters downstream tools reject, consider sanitize_label",
                record.label
            );
        }
    }
    Ok(parsed.species)
}

/// Save records as an ARC species input. With `overwrite` unset an existing
/// file is preserved and `name_1.yml`, `name_2.yml`, ... is used instead;
/// the actually written path is returned.
pub fn save_species_input<P: AsRef<Path>>(
    path: P,
    records: &[SpeciesRecord],
    overwrite: bool,
) -> Result<PathBuf, ArcInputError> {
    let target = if overwrite {
        path.as_ref().to_path_buf()
    } else {
        next_free_path(path.as_ref())
    };
    let file = File::create(&target)?;
    serde_yaml::to_writer(
        file,
        &ArcSpeciesFile {
            species: records.to_vec(),
        },
    )?;
    info!("saved {} species to {}", records.len(), target.display());
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_read_species_section() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("input.yml");
        std::fs::write(
            &path,
            "project: test_model\nspecies:\n- label: ethanol\n  smiles: CCO\n- label: TS1\n  is_ts: true\n- label: A+B<=>C\n",
        )
        .unwrap();
        let records = read_species_input(&path).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].smiles.as_deref(), Some("CCO"));
        assert!(records[1].is_ts);
        // reaction-string label implies a transition state
        assert!(records[2].is_ts);
    }

    #[test]
    fn test_missing_species_section() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("input.yml");
        std::fs::write(&path, "project: test_model\n").unwrap();
        assert!(matches!(
            read_species_input(&path),
            Err(ArcInputError::NoSpecies(_))
        ));
    }

    #[test]
    fn test_save_never_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("input_merged.yml");
        let mut record = SpeciesRecord::new("A");
        record.smiles = Some("C".to_string());
        let first = save_species_input(&path, &[record.clone()], false).unwrap();
        assert_eq!(first, path);
        let second = save_species_input(&path, &[record.clone()], false).unwrap();
        assert_eq!(second, dir.path().join("input_merged_1.yml"));
        let third = save_species_input(&path, &[record], false).unwrap();
        assert_eq!(third, dir.path().join("input_merged_2.yml"));
        // round trip through the numbered file
        let back = read_species_input(&third).unwrap();
        assert_eq!(back[0].label, "A");
    }
}
