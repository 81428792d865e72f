//! # Species Record Module
//!
//! The data unit of the reconciliation engine: a label plus whatever
//! partial identity information the producing tool happened to emit — a
//! SMILES string, an adjacency list, 3D coordinates, or nothing at all.
//! Ad hoc fields from upstream YAML land in the `extra` bag unchanged and
//! are passed through by the engine.

use crate::Molecula::backend::Descriptor;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// One species entry of an input list. Labels are unique within their
/// source list but not across lists; transition states carry a
/// reaction-string label (`"A+B<=>C"`) instead of a structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesRecord {
    pub label: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_ts: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smiles: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjlist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xyz: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charge: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplicity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
    /// provenance and tool-specific fields, passed through untouched
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl SpeciesRecord {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            is_ts: false,
            smiles: None,
            adjlist: None,
            xyz: None,
            charge: None,
            multiplicity: None,
            directory: None,
            extra: HashMap::new(),
        }
    }

    pub fn has_descriptor(&self) -> bool {
        self.smiles.is_some() || self.adjlist.is_some() || self.xyz.is_some()
    }

    /// Descriptors in resolution order: adjacency list and SMILES are the
    /// cheap string paths, coordinates the expensive fallback.
    pub fn descriptors(&self) -> Vec<Descriptor> {
        let mut out = Vec::new();
        if let Some(adjlist) = &self.adjlist {
            out.push(Descriptor::AdjacencyList(adjlist.clone()));
        }
        if let Some(smiles) = &self.smiles {
            out.push(Descriptor::Smiles(smiles.clone()));
        }
        if let Some(xyz) = &self.xyz {
            out.push(Descriptor::Xyz(xyz.clone()));
        }
        out
    }

    /// reactant and product sides of a transition-state reaction label
    pub fn reaction_sides(&self) -> Option<(Vec<String>, Vec<String>)> {
        let (react, prod) = self.label.split_once("<=>")?;
        let split = |side: &str| -> Vec<String> {
            side.split('+').map(|s| s.trim().to_string()).collect()
        };
        Some((split(react), split(prod)))
    }

    /// Backfill absent fields from another record. Existing data always
    /// wins over incoming data, which keeps merging order-stable.
    pub fn enrich_from(&mut self, other: &SpeciesRecord) {
        if self.smiles.is_none() {
            self.smiles = other.smiles.clone();
        }
        if self.adjlist.is_none() {
            self.adjlist = other.adjlist.clone();
        }
        if self.xyz.is_none() {
            self.xyz = other.xyz.clone();
        }
        if self.charge.is_none() {
            self.charge = other.charge;
        }
        if self.multiplicity.is_none() {
            self.multiplicity = other.multiplicity;
        }
        if self.directory.is_none() {
            self.directory = other.directory.clone();
        }
        for (key, value) in &other.extra {
            self.extra
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_order() {
        let mut record = SpeciesRecord::new("C2H5OH");
        record.smiles = Some("CCO".to_string());
        record.adjlist = Some("1 C u0 p0 c0".to_string());
        let descriptors = record.descriptors();
        assert!(matches!(descriptors[0], Descriptor::AdjacencyList(_)));
        assert!(matches!(descriptors[1], Descriptor::Smiles(_)));
    }

    #[test]
    fn test_reaction_sides() {
        let mut ts = SpeciesRecord::new("CCO + [OH] <=> CC[O] + O");
        ts.is_ts = true;
        let (react, prod) = ts.reaction_sides().unwrap();
        assert_eq!(react, vec!["CCO", "[OH]"]);
        assert_eq!(prod, vec!["CC[O]", "O"]);
        assert!(SpeciesRecord::new("CCO").reaction_sides().is_none());
    }

    #[test]
    fn test_enrich_existing_wins() {
        let mut dst = SpeciesRecord::new("A");
        dst.smiles = Some("CCO".to_string());
        let mut src = SpeciesRecord::new("A");
        src.smiles = Some("OCC".to_string());
        src.multiplicity = Some(1);
        dst.enrich_from(&src);
        assert_eq!(dst.smiles.as_deref(), Some("CCO"));
        assert_eq!(dst.multiplicity, Some(1));
    }

    #[test]
    fn test_yaml_round_trip_with_extra_fields() {
        let yaml = "label: S1\nsmiles: CCO\nsource: flux_diagram\n";
        let record: SpeciesRecord = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(record.label, "S1");
        assert!(!record.is_ts);
        assert_eq!(record.extra["source"], serde_json::json!("flux_diagram"));
        let dumped = serde_yaml::to_string(&record).unwrap();
        let back: SpeciesRecord = serde_yaml::from_str(&dumped).unwrap();
        assert_eq!(record, back);
    }
}
