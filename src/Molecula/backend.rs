//! # Graph Backend Module
//!
//! The capability interface the reconciliation engine uses to talk to the
//! molecular-graph machinery. Keeping it behind a trait lets tests inject
//! an instrumented backend (counting isomorphism calls, forcing failures)
//! the same way the NIST parser injects its HTTP client.

use super::adjlist;
use super::molecule::{GraphError, Molecule};
use super::resonance;
use super::smiles;
use super::xyz;

/// one structure descriptor of a species record, in resolution order
#[derive(Debug, Clone, PartialEq)]
pub enum Descriptor {
    /// explicit atom/bond list (cheap, exact)
    AdjacencyList(String),
    /// SMILES string (cheap)
    Smiles(String),
    /// 3D coordinates (expensive, bond perception may misassign)
    Xyz(String),
}

/// Capability interface over the molecular-graph library. The engine never
/// constructs graphs itself; everything goes through these operations.
pub trait GraphBackend {
    fn parse_structure(&self, descriptor: &Descriptor) -> Result<Molecule, GraphError>;
    fn is_isomorphic(&self, a: &Molecule, b: &Molecule) -> bool;
    fn expand_resonance(&self, mol: &Molecule) -> Vec<Molecule>;
    fn to_canonical_string(&self, mol: &Molecule) -> String;
    fn to_smiles(&self, mol: &Molecule) -> String;
    fn to_adjacency_list(&self, mol: &Molecule) -> String;
}

/// Backend implemented by the in-crate graph toolkit.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeBackend;

impl NativeBackend {
    pub fn new() -> Self {
        Self
    }
}

impl GraphBackend for NativeBackend {
    fn parse_structure(&self, descriptor: &Descriptor) -> Result<Molecule, GraphError> {
        match descriptor {
            Descriptor::AdjacencyList(text) => adjlist::parse_adjacency_list(text),
            Descriptor::Smiles(text) => smiles::parse_smiles(text),
            Descriptor::Xyz(text) => xyz::mol_from_xyz(text),
        }
    }

    fn is_isomorphic(&self, a: &Molecule, b: &Molecule) -> bool {
        a.is_isomorphic_to(b)
    }

    fn expand_resonance(&self, mol: &Molecule) -> Vec<Molecule> {
        resonance::expand_resonance(mol)
    }

    fn to_canonical_string(&self, mol: &Molecule) -> String {
        mol.to_canonical_string()
    }

    fn to_smiles(&self, mol: &Molecule) -> String {
        smiles::to_smiles(mol)
    }

    fn to_adjacency_list(&self, mol: &Molecule) -> String {
        adjlist::to_adjacency_list(mol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_dispatch() {
        let backend = NativeBackend::new();
        let from_smiles = backend
            .parse_structure(&Descriptor::Smiles("CCO".to_string()))
            .unwrap();
        assert_eq!(from_smiles.formula(), "C2H6O");
        let adjlist_text = backend.to_adjacency_list(&from_smiles);
        let from_adjlist = backend
            .parse_structure(&Descriptor::AdjacencyList(adjlist_text))
            .unwrap();
        assert!(backend.is_isomorphic(&from_smiles, &from_adjlist));
    }

    #[test]
    fn test_parse_failure_surfaces() {
        let backend = NativeBackend::new();
        assert!(
            backend
                .parse_structure(&Descriptor::Smiles("C(".to_string()))
                .is_err()
        );
    }
}
