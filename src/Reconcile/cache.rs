//! # Species Graph Cache Module
//!
//! Label-keyed store of resolved molecular graphs, the memoization unit
//! that keeps repeated isomorphism checks affordable during a merge. The
//! insertion order of labels is part of the contract: the matcher scans
//! entries in insertion order and the first structural hit wins, which is
//! what makes merge results deterministic.
//!
//! Entries for records whose descriptors could not be resolved are kept as
//! explicit unresolved markers, so every non-transition-state label of the
//! accumulated output is represented here one way or the other.

use super::resolver;
use crate::Molecula::backend::GraphBackend;
use crate::Molecula::molecule::Molecule;
use crate::Species::record::SpeciesRecord;
use log::debug;
use std::collections::HashMap;

/// one cached species: its source record, the resolved graph (if any) and
/// the resonance forms used for matching when expansion is enabled
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub record: SpeciesRecord,
    pub primary: Option<Molecule>,
    pub resonance: Vec<Molecule>,
}

impl CacheEntry {
    pub fn resolved<B: GraphBackend>(
        record: SpeciesRecord,
        mol: Molecule,
        backend: &B,
        expand_resonance: bool,
    ) -> Self {
        let resonance = if expand_resonance {
            backend.expand_resonance(&mol)
        } else {
            Vec::new()
        };
        Self {
            record,
            primary: Some(mol),
            resonance,
        }
    }

    pub fn unresolved(record: SpeciesRecord) -> Self {
        Self {
            record,
            primary: None,
            resonance: Vec::new(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.primary.is_some()
    }

    /// isomorphism against the primary structure or, when resonance
    /// expansion is on, against any resonance form
    pub fn matches<B: GraphBackend>(&self, mol: &Molecule, backend: &B) -> bool {
        if !self.resonance.is_empty() {
            self.resonance.iter().any(|form| backend.is_isomorphic(form, mol))
        } else if let Some(primary) = &self.primary {
            backend.is_isomorphic(primary, mol)
        } else {
            false
        }
    }
}

/// insertion-ordered label -> graph store scoped to one combine operation
#[derive(Debug, Clone)]
pub struct SpeciesGraphCache {
    pub vec_of_labels: Vec<String>,
    pub map_of_entries: HashMap<String, CacheEntry>,
    pub expand_resonance: bool,
}

impl SpeciesGraphCache {
    pub fn new(expand_resonance: bool) -> Self {
        Self {
            vec_of_labels: Vec::new(),
            map_of_entries: HashMap::new(),
            expand_resonance,
        }
    }

    pub fn len(&self) -> usize {
        self.vec_of_labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vec_of_labels.is_empty()
    }

    pub fn has(&self, label: &str) -> bool {
        self.map_of_entries.contains_key(label)
    }

    pub fn get(&self, label: &str) -> Option<&CacheEntry> {
        self.map_of_entries.get(label)
    }

    pub fn put(&mut self, label: &str, entry: CacheEntry) {
        if !self.map_of_entries.contains_key(label) {
            self.vec_of_labels.push(label.to_string());
        }
        self.map_of_entries.insert(label.to_string(), entry);
    }

    /// entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &CacheEntry)> {
        self.vec_of_labels
            .iter()
            .map(|label| (label, &self.map_of_entries[label]))
    }

    /// Resolve every non-transition-state record of a list and insert the
    /// results. Resolution failures are expected for partial records; the
    /// failed entries stay in the cache as unresolved markers and their
    /// labels are returned so the caller can report them.
    pub fn build_from<B: GraphBackend>(
        &mut self,
        records: &[SpeciesRecord],
        backend: &B,
    ) -> Vec<String> {
        let mut failed = Vec::new();
        for record in records {
            if record.is_ts {
                continue;
            }
            match resolver::resolve(record, self, backend) {
                Ok(mol) => {
                    let entry =
                        CacheEntry::resolved(record.clone(), mol, backend, self.expand_resonance);
                    self.put(&record.label, entry);
                }
                Err(e) => {
                    debug!("cache build: {}", e);
                    self.put(&record.label, CacheEntry::unresolved(record.clone()));
                    failed.push(record.label.clone());
                }
            }
        }
        failed
    }
}
