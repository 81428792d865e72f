//! # Structure Resolver Module
//!
//! Turns a species record into a molecular graph. Descriptors are tried in
//! order of cost and reliability: adjacency list, then SMILES, then 3D
//! coordinates (bond perception may fail or misassign, so its failure only
//! falls through); finally the label is looked up in the cache in case a
//! previous record already resolved this species. A pure function: caching
//! the result is the caller's job.

use super::ReconcileError;
use super::cache::SpeciesGraphCache;
use crate::Molecula::backend::GraphBackend;
use crate::Molecula::molecule::Molecule;
use crate::Species::record::SpeciesRecord;
use log::debug;

pub fn resolve<B: GraphBackend>(
    record: &SpeciesRecord,
    cache: &SpeciesGraphCache,
    backend: &B,
) -> Result<Molecule, ReconcileError> {
    for descriptor in record.descriptors() {
        match backend.parse_structure(&descriptor) {
            Ok(mol) => return Ok(mol),
            Err(e) => {
                debug!(
                    "descriptor of species '{}' failed to parse: {}",
                    record.label, e
                );
            }
        }
    }
    if let Some(entry) = cache.get(&record.label) {
        if let Some(primary) = &entry.primary {
            return Ok(primary.clone());
        }
    }
    Err(ReconcileError::UnresolvableIdentity(record.label.clone()))
}
