//! # Resonance Module
//!
//! Enumerates resonance structures of radicals by allyl-type shifts: for a
//! pattern `A•-B=C` the unpaired electron moves to `C` and the bonds swap,
//! giving `A=B-C•`. Closure is taken over repeated shifts, deduplicated by
//! canonical string, so the returned set contains every form reachable from
//! the input (the input itself first).
//!
//! This is the subset of resonance relevant to species deduplication in
//! combustion-style mechanisms, where the same radical is routinely drawn
//! with the unpaired electron on different atoms.

use super::molecule::{BondOrder, Molecule};
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use std::collections::HashSet;

/// upper bound on enumerated forms, guards against pathological inputs
const MAX_FORMS: usize = 20;

/// All distinct resonance forms reachable from `mol` by allyl radical
/// shifts. The first entry is always `mol` itself.
pub fn expand_resonance(mol: &Molecule) -> Vec<Molecule> {
    let mut forms: Vec<Molecule> = vec![mol.clone()];
    let mut seen: HashSet<String> = HashSet::new();
    seen.insert(mol.to_canonical_string());
    let mut frontier = 0;
    while frontier < forms.len() && forms.len() < MAX_FORMS {
        let next: Vec<Molecule> = allyl_shifts(&forms[frontier]);
        for candidate in next {
            if forms.len() >= MAX_FORMS {
                break;
            }
            if seen.insert(candidate.to_canonical_string()) {
                forms.push(candidate);
            }
        }
        frontier += 1;
    }
    forms
}

/// single applications of the allyl shift to every matching site
fn allyl_shifts(mol: &Molecule) -> Vec<Molecule> {
    let graph = &mol.graph;
    let mut out = Vec::new();
    for a in graph.node_indices() {
        if graph[a].radical_electrons == 0 {
            continue;
        }
        for eab in graph.edges(a) {
            if *eab.weight() != BondOrder::Single {
                continue;
            }
            let b = other_end(eab, a);
            for ebc in graph.edges(b) {
                if *ebc.weight() != BondOrder::Double {
                    continue;
                }
                let c = other_end(ebc, b);
                if c == a {
                    continue;
                }
                let mut shifted = mol.clone();
                let ab = shifted.graph.find_edge(a, b).unwrap();
                let bc = shifted.graph.find_edge(b, c).unwrap();
                shifted.graph[ab] = BondOrder::Double;
                shifted.graph[bc] = BondOrder::Single;
                shifted.graph[a].radical_electrons -= 1;
                shifted.graph[c].radical_electrons += 1;
                out.push(shifted);
            }
        }
    }
    out
}

fn other_end<E: EdgeRef<NodeId = NodeIndex<u32>>>(edge: E, this: NodeIndex<u32>) -> NodeIndex<u32> {
    if edge.source() == this {
        edge.target()
    } else {
        edge.source()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Molecula::smiles::parse_smiles;

    #[test]
    fn test_closed_shell_has_single_form() {
        let ethanol = parse_smiles("CCO").unwrap();
        let forms = expand_resonance(&ethanol);
        assert_eq!(forms.len(), 1);
    }

    #[test]
    fn test_allyl_radical_shift() {
        // 1-buten-3-yl and 2-buten-1-yl are resonance forms of each other
        let a = parse_smiles("C=C[CH]C").unwrap();
        let b = parse_smiles("[CH2]C=CC").unwrap();
        assert!(!a.is_isomorphic_to(&b));
        let forms_a = expand_resonance(&a);
        assert!(forms_a.len() >= 2);
        assert!(forms_a.iter().any(|f| f.is_isomorphic_to(&b)));
        // and symmetrically
        let forms_b = expand_resonance(&b);
        assert!(forms_b.iter().any(|f| f.is_isomorphic_to(&a)));
    }

    #[test]
    fn test_input_is_first_form() {
        let a = parse_smiles("C=C[CH]C").unwrap();
        let forms = expand_resonance(&a);
        assert!(forms[0].is_isomorphic_to(&a));
    }
}
