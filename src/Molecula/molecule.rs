//! # Molecular Graph Module
//!
//! ## Aim
//! Core molecular-graph representation used by the reconciliation engine.
//! A molecule is an undirected petgraph graph whose nodes carry element,
//! charge, radical electrons and implicit hydrogen count, and whose edges
//! carry bond orders.
//!
//! ## Main Data Structures and Logic
//! - `Atom`: element symbol + formal charge + radical electrons + implicit H
//! - `BondOrder` enum: single, double, triple, benzene (S/D/T/B codes)
//! - `Molecule`: wrapper around `Graph<Atom, BondOrder, Undirected>`
//! - Isomorphism via `petgraph::algo::is_isomorphic_matching` with full
//!   atom/bond attribute matching and a cheap formula prefilter
//! - Canonical atom ranking by iterative (Morgan-style) refinement with
//!   deterministic tie-breaking, used for the canonical string
//!
//! ## Key Methods
//! - `is_isomorphic_to()`: attribute-aware structural equality
//! - `to_canonical_string()`: deterministic encoding for cheap dedup
//! - `collapse_hydrogens()`: folds explicit H atoms into implicit counts so
//!   adjacency-list-, SMILES- and XYZ-derived graphs are comparable
//! - `formula()`: Hill-order molecular formula

use petgraph::Undirected;
use petgraph::algo::is_isomorphic_matching;
use petgraph::graph::{Graph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// error types for structure parsing and perception
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Unknown element symbol: {0}")]
    UnknownElement(String),
    #[error("SMILES parse error: {0}")]
    Smiles(String),
    #[error("Adjacency list parse error: {0}")]
    AdjList(String),
    #[error("XYZ parse error: {0}")]
    Xyz(String),
    #[error("Empty structure")]
    EmptyStructure,
}

// Define a struct to hold element data
pub struct ElementData {
    pub symbol: &'static str,
    /// default bonding valence (bonds + implicit H) of the neutral atom
    pub valence: i32,
    /// valence electrons, for lone pair bookkeeping in adjacency lists
    pub valence_electrons: i32,
    /// covalent radius in Angstrom, for bond perception from geometry
    pub covalent_radius: f64,
}

// Define a list of elements supported by the toolkit
pub const ELEMENTS: &[ElementData] = &[
    ElementData {
        symbol: "H",
        valence: 1,
        valence_electrons: 1,
        covalent_radius: 0.31,
    },
    ElementData {
        symbol: "He",
        valence: 0,
        valence_electrons: 2,
        covalent_radius: 0.28,
    },
    ElementData {
        symbol: "B",
        valence: 3,
        valence_electrons: 3,
        covalent_radius: 0.84,
    },
    ElementData {
        symbol: "C",
        valence: 4,
        valence_electrons: 4,
        covalent_radius: 0.76,
    },
    ElementData {
        symbol: "N",
        valence: 3,
        valence_electrons: 5,
        covalent_radius: 0.71,
    },
    ElementData {
        symbol: "O",
        valence: 2,
        valence_electrons: 6,
        covalent_radius: 0.66,
    },
    ElementData {
        symbol: "F",
        valence: 1,
        valence_electrons: 7,
        covalent_radius: 0.57,
    },
    ElementData {
        symbol: "Ne",
        valence: 0,
        valence_electrons: 8,
        covalent_radius: 0.58,
    },
    ElementData {
        symbol: "Si",
        valence: 4,
        valence_electrons: 4,
        covalent_radius: 1.11,
    },
    ElementData {
        symbol: "P",
        valence: 3,
        valence_electrons: 5,
        covalent_radius: 1.07,
    },
    ElementData {
        symbol: "S",
        valence: 2,
        valence_electrons: 6,
        covalent_radius: 1.05,
    },
    ElementData {
        symbol: "Cl",
        valence: 1,
        valence_electrons: 7,
        covalent_radius: 1.02,
    },
    ElementData {
        symbol: "Ar",
        valence: 0,
        valence_electrons: 8,
        covalent_radius: 1.06,
    },
    ElementData {
        symbol: "Br",
        valence: 1,
        valence_electrons: 7,
        covalent_radius: 1.20,
    },
    ElementData {
        symbol: "I",
        valence: 1,
        valence_electrons: 7,
        covalent_radius: 1.39,
    },
];

/// look up element data by symbol (case sensitive, e.g. "Cl" not "CL")
pub fn element_data(symbol: &str) -> Option<&'static ElementData> {
    ELEMENTS.iter().find(|e| e.symbol == symbol)
}

/// one heavy (or explicit) atom of the molecular graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Atom {
    pub element: &'static str,
    pub charge: i8,
    pub radical_electrons: u8,
    pub implicit_hydrogens: u8,
}

impl Atom {
    pub fn new(symbol: &str) -> Result<Self, GraphError> {
        let data = element_data(symbol)
            .ok_or_else(|| GraphError::UnknownElement(symbol.to_string()))?;
        Ok(Self {
            element: data.symbol,
            charge: 0,
            radical_electrons: 0,
            implicit_hydrogens: 0,
        })
    }

    pub fn data(&self) -> &'static ElementData {
        // element is always interned from ELEMENTS
        element_data(self.element).unwrap()
    }
}

/// bond order; codes follow the RMG adjacency list convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Benzene,
}

impl BondOrder {
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'S' => Some(Self::Single),
            'D' => Some(Self::Double),
            'T' => Some(Self::Triple),
            'B' => Some(Self::Benzene),
            _ => None,
        }
    }

    pub fn code(&self) -> char {
        match self {
            Self::Single => 'S',
            Self::Double => 'D',
            Self::Triple => 'T',
            Self::Benzene => 'B',
        }
    }

    pub fn order(&self) -> f64 {
        match self {
            Self::Single => 1.0,
            Self::Double => 2.0,
            Self::Triple => 3.0,
            Self::Benzene => 1.5,
        }
    }
}

pub type MolGraph = Graph<Atom, BondOrder, Undirected, u32>;

/// molecular graph handle passed around by the reconciliation engine
#[derive(Debug, Clone)]
pub struct Molecule {
    pub graph: MolGraph,
}

impl Molecule {
    pub fn new() -> Self {
        Self {
            graph: MolGraph::default(),
        }
    }

    pub fn from_graph(graph: MolGraph) -> Self {
        Self { graph }
    }

    pub fn atom_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn bond_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn net_charge(&self) -> i32 {
        self.graph
            .node_weights()
            .map(|a| a.charge as i32)
            .sum()
    }

    pub fn radical_count(&self) -> u32 {
        self.graph
            .node_weights()
            .map(|a| a.radical_electrons as u32)
            .sum()
    }

    /// spin multiplicity assuming all unpaired electrons aligned
    pub fn multiplicity(&self) -> u32 {
        self.radical_count() + 1
    }

    /// sum of bond orders around one atom (implicit hydrogens not included)
    pub fn bond_order_sum(&self, idx: NodeIndex<u32>) -> f64 {
        self.graph
            .edges(idx)
            .map(|e| e.weight().order())
            .sum()
    }

    /// Folds explicit terminal H atoms into the implicit hydrogen count of
    /// their neighbor. H atoms carrying charge or radical electrons, and H
    /// bonded to H (H2), are kept explicit.
    pub fn collapse_hydrogens(&mut self) {
        let mut folded: Vec<(NodeIndex<u32>, NodeIndex<u32>)> = Vec::new();
        for idx in self.graph.node_indices() {
            let atom = self.graph[idx];
            if atom.element != "H" || atom.charge != 0 || atom.radical_electrons != 0 {
                continue;
            }
            let neighbors: Vec<NodeIndex<u32>> = self.graph.neighbors(idx).collect();
            if neighbors.len() != 1 {
                continue;
            }
            let nb = neighbors[0];
            let edge = self.graph.find_edge(idx, nb).unwrap();
            if self.graph[edge] != BondOrder::Single || self.graph[nb].element == "H" {
                continue;
            }
            folded.push((idx, nb));
        }
        for &(_, nb) in &folded {
            self.graph[nb].implicit_hydrogens += 1;
        }
        // remove in descending index order so pending indices stay valid
        let mut to_remove: Vec<NodeIndex<u32>> = folded.into_iter().map(|(h, _)| h).collect();
        to_remove.sort();
        for idx in to_remove.into_iter().rev() {
            self.graph.remove_node(idx);
        }
    }

    /// Hill order molecular formula, implicit hydrogens included
    pub fn formula(&self) -> String {
        let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
        for atom in self.graph.node_weights() {
            *counts.entry(atom.element).or_insert(0) += 1;
            if atom.implicit_hydrogens > 0 {
                *counts.entry("H").or_insert(0) += atom.implicit_hydrogens as usize;
            }
        }
        let mut out = String::new();
        let mut push = |symbol: &str, n: usize| {
            out.push_str(symbol);
            if n > 1 {
                out.push_str(&n.to_string());
            }
        };
        if counts.contains_key("C") {
            let c = counts.remove("C").unwrap();
            push("C", c);
            if let Some(h) = counts.remove("H") {
                push("H", h);
            }
        }
        for (symbol, n) in counts {
            push(symbol, n);
        }
        out
    }

    /// Attribute-aware graph isomorphism. Elements, charges, radical
    /// electrons, implicit hydrogen counts and bond orders must all match.
    pub fn is_isomorphic_to(&self, other: &Molecule) -> bool {
        if self.graph.node_count() != other.graph.node_count()
            || self.graph.edge_count() != other.graph.edge_count()
            || self.formula() != other.formula()
        {
            return false;
        }
        is_isomorphic_matching(&self.graph, &other.graph, |a, b| a == b, |a, b| a == b)
    }

    /// Canonical atom ranks by iterative neighborhood refinement. Ranks are
    /// deterministic for a given graph; symmetry-equivalent atoms are
    /// separated by a node-index tie-break after refinement stabilizes.
    pub fn canonical_ranks(&self) -> Vec<usize> {
        let n = self.graph.node_count();
        if n == 0 {
            return Vec::new();
        }
        // initial invariant: element, charge, radicals, implicit H, degree, bond codes
        let initial: Vec<(String, i8, u8, u8, usize, Vec<char>)> = self
            .graph
            .node_indices()
            .map(|idx| {
                let a = self.graph[idx];
                let mut codes: Vec<char> =
                    self.graph.edges(idx).map(|e| e.weight().code()).collect();
                codes.sort();
                (
                    a.element.to_string(),
                    a.charge,
                    a.radical_electrons,
                    a.implicit_hydrogens,
                    self.graph.neighbors(idx).count(),
                    codes,
                )
            })
            .collect();
        let mut ranks = assign_ranks(&initial);
        ranks = self.refine_ranks(ranks);
        // tie-break: single out the lowest-index member of the lowest tied
        // class, then refine again, until every atom has a distinct rank
        loop {
            let distinct = {
                let mut r = ranks.clone();
                r.sort();
                r.dedup();
                r.len()
            };
            if distinct == n {
                break;
            }
            let mut chosen: Option<usize> = None;
            let mut best_rank = usize::MAX;
            for rank in &ranks {
                if ranks.iter().filter(|r| *r == rank).count() > 1 && *rank < best_rank {
                    best_rank = *rank;
                }
            }
            for (i, rank) in ranks.iter().enumerate() {
                if *rank == best_rank {
                    chosen = Some(i);
                    break;
                }
            }
            let chosen = chosen.unwrap();
            let keys: Vec<(usize, usize)> = ranks
                .iter()
                .enumerate()
                .map(|(i, r)| (*r * 2 + if i == chosen { 0 } else { 1 }, 0))
                .collect();
            ranks = assign_ranks(&keys);
            ranks = self.refine_ranks(ranks);
        }
        ranks
    }

    fn refine_ranks(&self, mut ranks: Vec<usize>) -> Vec<usize> {
        loop {
            let keys: Vec<(usize, Vec<(char, usize)>)> = self
                .graph
                .node_indices()
                .enumerate()
                .map(|(i, idx)| {
                    let mut nb: Vec<(char, usize)> = self
                        .graph
                        .edges(idx)
                        .map(|e| {
                            let other = if e.source() == idx {
                                e.target()
                            } else {
                                e.source()
                            };
                            (e.weight().code(), ranks[other.index()])
                        })
                        .collect();
                    nb.sort();
                    (ranks[i], nb)
                })
                .collect();
            let new_ranks = assign_ranks(&keys);
            let old_classes = class_count(&ranks);
            let new_classes = class_count(&new_ranks);
            ranks = new_ranks;
            if new_classes == old_classes {
                break;
            }
        }
        ranks
    }

    /// Deterministic string encoding of the graph, used for cheap dedup of
    /// resonance forms. Not a registry-grade canonical identifier.
    pub fn to_canonical_string(&self) -> String {
        let ranks = self.canonical_ranks();
        let mut order: Vec<usize> = (0..self.graph.node_count()).collect();
        order.sort_by_key(|i| ranks[*i]);
        let mut atoms = Vec::new();
        for i in order {
            let idx = NodeIndex::new(i);
            let a = self.graph[idx];
            atoms.push(format!(
                "{}c{}u{}h{}",
                a.element, a.charge, a.radical_electrons, a.implicit_hydrogens
            ));
        }
        let mut bonds: Vec<(usize, usize, char)> = self
            .graph
            .edge_indices()
            .map(|e| {
                let (a, b) = self.graph.edge_endpoints(e).unwrap();
                let (ra, rb) = (ranks[a.index()], ranks[b.index()]);
                let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
                (lo, hi, self.graph[e].code())
            })
            .collect();
        bonds.sort();
        let bond_str: Vec<String> = bonds
            .iter()
            .map(|(a, b, c)| format!("{}-{}{}", a, b, c))
            .collect();
        format!("{}|{}|{}", self.formula(), atoms.join(","), bond_str.join(","))
    }

    /// number of connected components
    pub fn component_count(&self) -> usize {
        petgraph::algo::connected_components(&self.graph)
    }
}

impl Default for Molecule {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Molecule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.formula())
    }
}

fn assign_ranks<K: Ord + Clone>(keys: &[K]) -> Vec<usize> {
    let mut sorted: Vec<K> = keys.to_vec();
    sorted.sort();
    sorted.dedup();
    let index: BTreeMap<K, usize> = sorted
        .into_iter()
        .enumerate()
        .map(|(i, k)| (k, i))
        .collect();
    keys.iter().map(|k| index[k]).collect()
}

fn class_count(ranks: &[usize]) -> usize {
    let mut r = ranks.to_vec();
    r.sort();
    r.dedup();
    r.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn methane() -> Molecule {
        let mut g = MolGraph::default();
        let mut c = Atom::new("C").unwrap();
        c.implicit_hydrogens = 4;
        g.add_node(c);
        Molecule::from_graph(g)
    }

    fn ethanol(flipped: bool) -> Molecule {
        // C-C-O with implicit hydrogens, optionally built in reverse order
        let mut g = MolGraph::default();
        let mut c1 = Atom::new("C").unwrap();
        c1.implicit_hydrogens = 3;
        let mut c2 = Atom::new("C").unwrap();
        c2.implicit_hydrogens = 2;
        let mut o = Atom::new("O").unwrap();
        o.implicit_hydrogens = 1;
        if flipped {
            let o = g.add_node(o);
            let c2 = g.add_node(c2);
            let c1 = g.add_node(c1);
            g.add_edge(o, c2, BondOrder::Single);
            g.add_edge(c2, c1, BondOrder::Single);
        } else {
            let c1 = g.add_node(c1);
            let c2 = g.add_node(c2);
            let o = g.add_node(o);
            g.add_edge(c1, c2, BondOrder::Single);
            g.add_edge(c2, o, BondOrder::Single);
        }
        Molecule::from_graph(g)
    }

    #[test]
    fn test_formula_hill_order() {
        assert_eq!(methane().formula(), "CH4");
        assert_eq!(ethanol(false).formula(), "C2H6O");
    }

    #[test]
    fn test_isomorphism_is_order_independent() {
        let a = ethanol(false);
        let b = ethanol(true);
        assert!(a.is_isomorphic_to(&b));
    }

    #[test]
    fn test_isomorphism_respects_radicals() {
        let a = methane();
        let mut g = MolGraph::default();
        let mut c = Atom::new("C").unwrap();
        c.implicit_hydrogens = 3;
        c.radical_electrons = 1;
        g.add_node(c);
        let methyl = Molecule::from_graph(g);
        assert!(!a.is_isomorphic_to(&methyl));
    }

    #[test]
    fn test_canonical_string_is_order_independent() {
        let a = ethanol(false);
        let b = ethanol(true);
        assert_eq!(a.to_canonical_string(), b.to_canonical_string());
    }

    #[test]
    fn test_collapse_hydrogens() {
        // explicit water: O with two H nodes
        let mut g = MolGraph::default();
        let o = g.add_node(Atom::new("O").unwrap());
        let h1 = g.add_node(Atom::new("H").unwrap());
        let h2 = g.add_node(Atom::new("H").unwrap());
        g.add_edge(o, h1, BondOrder::Single);
        g.add_edge(o, h2, BondOrder::Single);
        let mut water = Molecule::from_graph(g);
        water.collapse_hydrogens();
        assert_eq!(water.atom_count(), 1);
        assert_eq!(water.formula(), "H2O");
    }

    #[test]
    fn test_collapse_keeps_h2_explicit() {
        let mut g = MolGraph::default();
        let h1 = g.add_node(Atom::new("H").unwrap());
        let h2 = g.add_node(Atom::new("H").unwrap());
        g.add_edge(h1, h2, BondOrder::Single);
        let mut h2_mol = Molecule::from_graph(g);
        h2_mol.collapse_hydrogens();
        assert_eq!(h2_mol.atom_count(), 2);
    }
}
