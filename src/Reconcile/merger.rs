//! # Record Merger Module
//!
//! Folds one species list into the running accumulator. Per record:
//!
//! - transition states are reconciled by exact reaction-string label only;
//!   a repeated label is dropped and reported, never structurally compared
//! - everything else goes through the identity matcher; matches under the
//!   same label enrich the accumulated record (existing data wins),
//!   matches under a different label produce an alias map entry and the
//!   incoming body is discarded, novel records are appended
//!
//! The accumulator owns the cache for the whole combine run; the cache is
//! updated before the next record is examined, so later comparisons always
//! see every label the output already contains.

use super::cache::{CacheEntry, SpeciesGraphCache};
use super::matcher::{self, MatchResult};
use super::report::MergeReport;
use super::resolver;
use crate::Molecula::backend::GraphBackend;
use crate::Species::record::SpeciesRecord;
use log::{info, warn};
use std::collections::HashMap;

/// running merge state: ordered species list + graph cache + report
#[derive(Debug, Clone)]
pub struct Accumulator {
    pub vec_of_labels: Vec<String>,
    pub map_of_records: HashMap<String, SpeciesRecord>,
    pub cache: SpeciesGraphCache,
    pub report: MergeReport,
}

impl Accumulator {
    /// Seed the accumulator with the base list. Labels are unique within
    /// one list by contract; duplicates are dropped with a warning.
    pub fn from_base<B: GraphBackend>(
        records: &[SpeciesRecord],
        backend: &B,
        expand_resonance: bool,
    ) -> Self {
        let mut acc = Self {
            vec_of_labels: Vec::new(),
            map_of_records: HashMap::new(),
            cache: SpeciesGraphCache::new(expand_resonance),
            report: MergeReport::default(),
        };
        let mut unique: Vec<SpeciesRecord> = Vec::new();
        for record in records {
            if acc.map_of_records.contains_key(&record.label) {
                warn!("duplicate label '{}' within base list, dropped", record.label);
                continue;
            }
            acc.vec_of_labels.push(record.label.clone());
            acc.map_of_records
                .insert(record.label.clone(), record.clone());
            unique.push(record.clone());
        }
        let failed = acc.cache.build_from(&unique, backend);
        for label in failed {
            warn!("species '{}' kept without resolved structure", label);
            acc.report.unresolved.push(label);
        }
        acc
    }

    /// the accumulated species in output order
    pub fn records(&self) -> Vec<SpeciesRecord> {
        self.vec_of_labels
            .iter()
            .map(|label| self.map_of_records[label].clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.vec_of_labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vec_of_labels.is_empty()
    }

    fn push_record(&mut self, record: SpeciesRecord) {
        self.vec_of_labels.push(record.label.clone());
        self.map_of_records.insert(record.label.clone(), record);
    }

    /// first free `label_N` when a label is taken by a different structure
    fn free_label(&self, base: &str) -> String {
        let mut n = 1;
        loop {
            let candidate = format!("{}_{}", base, n);
            if !self.map_of_records.contains_key(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// Fold `new_records` into the accumulator, in stable input order.
pub fn merge<B: GraphBackend>(
    acc: &mut Accumulator,
    new_records: &[SpeciesRecord],
    backend: &B,
) {
    for record in new_records {
        if record.is_ts {
            merge_transition_state(acc, record);
            continue;
        }
        match matcher::match_species(record, &acc.cache, backend) {
            MatchResult::Matched { label, handle } if label == record.label => {
                // already represented; backfill what the new record adds
                let accumulated = acc.map_of_records.get_mut(&label).unwrap();
                accumulated.enrich_from(record);
                let accumulated = accumulated.clone();
                let needs_resolution = acc
                    .cache
                    .get(&label)
                    .map(|entry| !entry.is_resolved())
                    .unwrap_or(false);
                if needs_resolution {
                    // the incoming record may carry the descriptor the
                    // accumulated entry was missing
                    let resolved = match handle {
                        Some(mol) => Some(mol),
                        None => resolver::resolve(&accumulated, &acc.cache, backend).ok(),
                    };
                    if let Some(mol) = resolved {
                        let expand = acc.cache.expand_resonance;
                        acc.cache.put(
                            &label,
                            CacheEntry::resolved(accumulated.clone(), mol, backend, expand),
                        );
                        acc.report.unresolved.retain(|l| l != &label);
                    }
                } else {
                    // keep the cached source record in step with enrichment
                    if let Some(entry) = acc.cache.get(&label) {
                        let mut entry = entry.clone();
                        entry.record = accumulated;
                        acc.cache.put(&label, entry);
                    }
                }
            }
            MatchResult::Matched { label, .. } => {
                if acc.map_of_records.contains_key(&record.label) {
                    // the input label already names a different surviving
                    // species, so the pair is not a rewritable alias
                    warn!(
                        "species '{}' matches '{}' structurally but its label names another accumulated species, flagged for inspection",
                        record.label, label
                    );
                    acc.report
                        .shadowed_aliases
                        .push((record.label.clone(), label));
                } else {
                    info!(
                        "species '{}' is the same structure as '{}', body discarded",
                        record.label, label
                    );
                    acc.report.aliases.insert(record.label.clone(), label);
                }
            }
            MatchResult::Novel { handle } => {
                let mut record = record.clone();
                if acc.map_of_records.contains_key(&record.label) {
                    let fresh = acc.free_label(&record.label);
                    warn!(
                        "label '{}' already names a different structure, new species stored as '{}'",
                        record.label, fresh
                    );
                    acc.report
                        .renamed
                        .push((record.label.clone(), fresh.clone()));
                    record.label = fresh;
                }
                let expand = acc.cache.expand_resonance;
                match handle {
                    Some(mol) => {
                        acc.cache.put(
                            &record.label,
                            CacheEntry::resolved(record.clone(), mol, backend, expand),
                        );
                    }
                    None => {
                        warn!(
                            "species '{}' kept without resolved structure",
                            record.label
                        );
                        acc.cache
                            .put(&record.label, CacheEntry::unresolved(record.clone()));
                        acc.report.unresolved.push(record.label.clone());
                    }
                }
                acc.push_record(record);
            }
        }
    }
}

fn merge_transition_state(acc: &mut Accumulator, record: &SpeciesRecord) {
    if record.reaction_sides().is_none() {
        warn!(
            "transition state '{}' has no '<=>' reaction label",
            record.label
        );
    }
    match acc.map_of_records.get(&record.label) {
        Some(_) => {
            // reaction identity cannot be structurally disambiguated here;
            // keep the first record and flag the label
            warn!(
                "transition state label '{}' appears more than once, second occurrence dropped",
                record.label
            );
            acc.report.ts_label_conflicts.push(record.label.clone());
        }
        None => {
            acc.push_record(record.clone());
        }
    }
}

/// Backfill missing descriptor fields of `records` from resolved cache
/// entries: generated SMILES, adjacency list, multiplicity and net charge.
/// With `aliases`, labels are translated before the cache lookup. Existing
/// fields are never overwritten.
pub fn expand_records<B: GraphBackend>(
    records: &mut [SpeciesRecord],
    cache: &SpeciesGraphCache,
    aliases: Option<&HashMap<String, String>>,
    backend: &B,
) {
    for record in records.iter_mut() {
        if record.is_ts {
            continue;
        }
        let label = aliases
            .and_then(|a| a.get(&record.label))
            .unwrap_or(&record.label);
        let Some(entry) = cache.get(label) else {
            warn!("cannot find species '{}' in the cache", record.label);
            continue;
        };
        let Some(mol) = &entry.primary else {
            continue;
        };
        if record.smiles.is_none() {
            record.smiles = Some(backend.to_smiles(mol));
        }
        if record.adjlist.is_none() {
            record.adjlist = Some(backend.to_adjacency_list(mol));
        }
        if record.multiplicity.is_none() {
            record.multiplicity = Some(mol.multiplicity());
        }
        if record.charge.is_none() {
            record.charge = Some(mol.net_charge());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Molecula::backend::NativeBackend;

    fn record(label: &str, smiles: Option<&str>) -> SpeciesRecord {
        let mut r = SpeciesRecord::new(label);
        r.smiles = smiles.map(|s| s.to_string());
        r
    }

    #[test]
    fn test_backfill_on_label_match() {
        let backend = NativeBackend::new();
        let mut acc = Accumulator::from_base(&[record("X", None)], &backend, false);
        assert_eq!(acc.report.unresolved, vec!["X".to_string()]);
        merge(&mut acc, &[record("X", Some("C"))], &backend);
        assert_eq!(acc.len(), 1);
        let merged = &acc.records()[0];
        assert_eq!(merged.smiles.as_deref(), Some("C"));
        // the cache entry got upgraded and the label is no longer unresolved
        assert!(acc.cache.get("X").unwrap().is_resolved());
        assert!(acc.report.unresolved.is_empty());
    }

    #[test]
    fn test_alias_for_cross_label_match() {
        let backend = NativeBackend::new();
        let mut acc = Accumulator::from_base(&[record("A", Some("CCO"))], &backend, false);
        merge(&mut acc, &[record("ethanol", Some("OCC"))], &backend);
        assert_eq!(acc.len(), 1);
        assert_eq!(acc.report.aliases["ethanol"], "A");
    }

    #[test]
    fn test_label_collision_renames() {
        let backend = NativeBackend::new();
        let mut acc = Accumulator::from_base(&[record("S1", Some("CCO"))], &backend, false);
        merge(&mut acc, &[record("S1", Some("CCC"))], &backend);
        assert_eq!(acc.len(), 2);
        assert_eq!(
            acc.report.renamed,
            vec![("S1".to_string(), "S1_1".to_string())]
        );
        assert_eq!(acc.records()[1].label, "S1_1");
    }

    #[test]
    fn test_repeated_collisions_keep_rename_history() {
        let backend = NativeBackend::new();
        let mut acc = Accumulator::from_base(&[record("S1", Some("CCO"))], &backend, false);
        merge(&mut acc, &[record("S1", Some("CCC"))], &backend);
        merge(&mut acc, &[record("S1", Some("C=C"))], &backend);
        assert_eq!(acc.len(), 3);
        // both renames stay auditable, in merge order
        assert_eq!(
            acc.report.renamed,
            vec![
                ("S1".to_string(), "S1_1".to_string()),
                ("S1".to_string(), "S1_2".to_string()),
            ]
        );
    }

    #[test]
    fn test_occupied_label_matching_other_entry_is_not_an_alias() {
        let backend = NativeBackend::new();
        let mut acc = Accumulator::from_base(
            &[record("B", Some("C")), record("A", Some("CCO"))],
            &backend,
            false,
        );
        // incoming B is ethanol: its label names methane, its structure
        // matches A; rewriting B -> A downstream would be wrong
        merge(&mut acc, &[record("B", Some("OCC"))], &backend);
        assert_eq!(acc.len(), 2);
        assert!(acc.report.aliases.is_empty());
        assert_eq!(
            acc.report.shadowed_aliases,
            vec![("B".to_string(), "A".to_string())]
        );
        // the accumulated B keeps its own structure
        assert_eq!(acc.records()[0].smiles.as_deref(), Some("C"));
    }

    #[test]
    fn test_ts_label_conflict_reported() {
        let backend = NativeBackend::new();
        let mut ts = SpeciesRecord::new("A+B<=>C");
        ts.is_ts = true;
        let mut acc = Accumulator::from_base(&[ts.clone()], &backend, false);
        merge(&mut acc, &[ts.clone()], &backend);
        assert_eq!(acc.len(), 1);
        assert_eq!(acc.report.ts_label_conflicts, vec!["A+B<=>C".to_string()]);
    }

    #[test]
    fn test_expand_records_from_cache() {
        let backend = NativeBackend::new();
        let acc = Accumulator::from_base(
            &[record("methyl", Some("[CH3]"))],
            &backend,
            false,
        );
        let mut out = vec![record("methyl", Some("[CH3]"))];
        expand_records(&mut out, &acc.cache, None, &backend);
        assert!(out[0].adjlist.is_some());
        assert_eq!(out[0].multiplicity, Some(2));
        assert_eq!(out[0].charge, Some(0));
        // existing descriptor untouched
        assert_eq!(out[0].smiles.as_deref(), Some("[CH3]"));
    }
}
