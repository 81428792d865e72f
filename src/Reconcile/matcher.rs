//! # Identity Matcher Module
//!
//! Decides whether an incoming record denotes a species the cache already
//! knows, and under which label. The comparison is tiered, cheapest first,
//! short-circuiting on the first hit:
//!
//! 1. label hit + byte-equal SMILES
//! 2. label hit + byte-equal adjacency list
//! 3. label hit + isomorphism (resonance forms included when enabled)
//! 4. no label hit: isomorphism against every cached entry, insertion
//!    order, first hit wins
//!
//! Ahead of tier 1 there is a label-only rule: when either side has no
//! resolvable structure, a label hit is accepted as identity. Structural
//! failures anywhere are treated as "no match for this candidate" and the
//! scan continues; they never abort the merge.

use super::cache::SpeciesGraphCache;
use super::resolver;
use crate::Molecula::backend::GraphBackend;
use crate::Molecula::molecule::Molecule;
use crate::Species::record::SpeciesRecord;
use log::{debug, warn};

/// outcome of matching one record against the cache
#[derive(Debug)]
pub enum MatchResult {
    /// the record denotes the species already stored under `label`
    Matched {
        label: String,
        handle: Option<Molecule>,
    },
    /// a species the cache has not seen; `handle` is `None` when the
    /// record could not be resolved structurally
    Novel { handle: Option<Molecule> },
}

pub fn match_species<B: GraphBackend>(
    record: &SpeciesRecord,
    cache: &SpeciesGraphCache,
    backend: &B,
) -> MatchResult {
    if let Some(entry) = cache.get(&record.label) {
        // label-only rule: nothing to compare structurally on one side
        if !record.has_descriptor() || !entry.is_resolved() {
            return MatchResult::Matched {
                label: record.label.clone(),
                handle: entry.primary.clone(),
            };
        }
        // tier 1: identical SMILES text
        if let (Some(a), Some(b)) = (&record.smiles, &entry.record.smiles) {
            if a == b {
                return MatchResult::Matched {
                    label: record.label.clone(),
                    handle: entry.primary.clone(),
                };
            }
        }
        // tier 2: identical adjacency list text
        if let (Some(a), Some(b)) = (&record.adjlist, &entry.record.adjlist) {
            if a == b {
                return MatchResult::Matched {
                    label: record.label.clone(),
                    handle: entry.primary.clone(),
                };
            }
        }
        // tier 3: different encodings, same structure
        match resolver::resolve(record, cache, backend) {
            Ok(mol) => {
                if entry.matches(&mol, backend) {
                    return MatchResult::Matched {
                        label: record.label.clone(),
                        handle: Some(mol),
                    };
                }
                // same label, different structure; maybe another entry owns it
                for (other_label, other_entry) in cache.iter() {
                    if other_label == &record.label {
                        continue;
                    }
                    if other_entry.matches(&mol, backend) {
                        return MatchResult::Matched {
                            label: other_label.clone(),
                            handle: Some(mol),
                        };
                    }
                }
                MatchResult::Novel { handle: Some(mol) }
            }
            Err(e) => {
                warn!(
                    "species '{}' could not be resolved for comparison: {}",
                    record.label, e
                );
                MatchResult::Novel { handle: None }
            }
        }
    } else {
        // tier 4: unknown label, scan every cached structure
        match resolver::resolve(record, cache, backend) {
            Ok(mol) => {
                for (label, entry) in cache.iter() {
                    if entry.matches(&mol, backend) {
                        debug!(
                            "species '{}' matches cached '{}' structurally",
                            record.label, label
                        );
                        return MatchResult::Matched {
                            label: label.clone(),
                            handle: Some(mol),
                        };
                    }
                }
                MatchResult::Novel { handle: Some(mol) }
            }
            Err(e) => {
                debug!("species '{}' stays unresolved: {}", record.label, e);
                MatchResult::Novel { handle: None }
            }
        }
    }
}
