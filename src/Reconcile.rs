//! # Reconcile Module
//!
//! ## Aim
//! Identity reconciliation of chemical species lists: decide, for every
//! incoming record, whether it denotes a species the accumulated output
//! already contains, and merge lists accordingly. Matching is structural
//! (graph isomorphism over cached molecular graphs, optionally across
//! resonance forms) with cheap byte-equality tiers tried first.
//!
//! `combiner::combine` is the main entry point; `merger::expand_records`
//! backfills generated descriptors onto a combined list afterwards.

/// label-keyed store of resolved molecular graphs
pub mod cache;
/// fold one species list into the accumulator
pub mod merger;
/// tiered identity matching of one record against the cache
pub mod matcher;
/// descriptor -> molecular graph resolution with label fallback
pub mod resolver;
/// combine two or more species lists
pub mod combiner;
/// alias map, renames and unresolved labels of a merge run
pub mod report;

mod combine_tests;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("species '{0}' carries no descriptor resolvable to a molecular graph")]
    UnresolvableIdentity(String),
    #[error("need at least two species lists to combine, got {0}")]
    InsufficientInput(usize),
}
