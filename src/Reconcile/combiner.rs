//! # List Combiner Module
//!
//! Top-level entry for reconciling several species lists into one. The
//! first list seeds the accumulator and keeps its order; the remaining
//! lists are folded in left to right, so the relative order of the inputs
//! decides which label survives when two lists name the same structure
//! differently.

use super::merger::{self, Accumulator};
use super::ReconcileError;
use crate::Molecula::backend::GraphBackend;
use crate::Species::record::SpeciesRecord;
use log::info;

/// Reconcile two or more species lists. Returns the accumulator holding
/// the combined list, the graph cache and the merge report.
pub fn combine<B: GraphBackend>(
    species_lists: &[Vec<SpeciesRecord>],
    backend: &B,
    expand_resonance: bool,
) -> Result<Accumulator, ReconcileError> {
    if species_lists.len() < 2 {
        return Err(ReconcileError::InsufficientInput(species_lists.len()));
    }
    let mut acc = Accumulator::from_base(&species_lists[0], backend, expand_resonance);
    info!("base list: {} species", acc.len());
    for (i, list) in species_lists[1..].iter().enumerate() {
        merger::merge(&mut acc, list, backend);
        info!(
            "after list {}: {} species accumulated",
            i + 2,
            acc.len()
        );
    }
    Ok(acc)
}
