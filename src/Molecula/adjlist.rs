//! # Adjacency List Module
//!
//! Parses and writes RMG-style adjacency lists, the explicit atom/bond-list
//! encoding used by species dictionaries:
//!
//! ```text
//! multiplicity 2
//! 1 C u1 p0 c0 {2,S} {3,S} {4,S}
//! 2 H u0 p0 c0 {1,S}
//! ...
//! ```
//!
//! Atom lines carry unpaired electrons (`u`), lone pairs (`p`), formal
//! charge (`c`) and a bond list with S/D/T/B orders. Explicit hydrogens are
//! collapsed into implicit counts after parsing so graphs from adjacency
//! lists compare cleanly against SMILES-derived ones.

use super::molecule::{Atom, BondOrder, GraphError, MolGraph, Molecule};
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

fn atom_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(?P<idx>\d+)\s+(?:\*\d*\s+)?(?P<el>[A-Z][a-z]?)\s+u(?P<u>\d+)(?:\s+p(?P<p>\d+))?(?:\s+c(?P<c>[+-]?\d+))?(?P<bonds>(?:\s+\{\d+,[SDTB]\})*)\s*$",
        )
        .unwrap()
    })
}

fn bond_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{(?P<to>\d+),(?P<ord>[SDTB])\}").unwrap())
}

/// Parse an RMG adjacency list. A leading `multiplicity N` line is accepted
/// (and checked against the unpaired-electron count only loosely, since RMG
/// itself allows inconsistent lists in the wild).
pub fn parse_adjacency_list(text: &str) -> Result<Molecule, GraphError> {
    let mut graph = MolGraph::default();
    let mut index_map: HashMap<u32, NodeIndex<u32>> = HashMap::new();
    let mut bonds: Vec<(u32, u32, BondOrder)> = Vec::new();

    let mut saw_atoms = false;
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("multiplicity") {
            continue;
        }
        let caps = atom_line_re()
            .captures(line)
            .ok_or_else(|| GraphError::AdjList(format!("bad atom line: '{}'", line)))?;
        saw_atoms = true;
        let idx: u32 = caps["idx"]
            .parse()
            .map_err(|_| GraphError::AdjList(format!("bad atom index in '{}'", line)))?;
        let mut atom = Atom::new(&caps["el"])?;
        atom.radical_electrons = caps["u"]
            .parse()
            .map_err(|_| GraphError::AdjList(format!("bad u value in '{}'", line)))?;
        if let Some(c) = caps.name("c") {
            let c = c.as_str().trim_start_matches('+');
            atom.charge = c
                .parse()
                .map_err(|_| GraphError::AdjList(format!("bad charge in '{}'", line)))?;
        }
        let node = graph.add_node(atom);
        if index_map.insert(idx, node).is_some() {
            return Err(GraphError::AdjList(format!("duplicate atom index {}", idx)));
        }
        for bc in bond_re().captures_iter(&caps["bonds"]) {
            let to: u32 = bc["to"].parse().unwrap();
            let order = BondOrder::from_code(bc["ord"].chars().next().unwrap()).unwrap();
            // record each bond once, from the lower index side
            if idx < to {
                bonds.push((idx, to, order));
            }
        }
    }
    if !saw_atoms {
        return Err(GraphError::EmptyStructure);
    }
    for (a, b, order) in bonds {
        let (na, nb) = match (index_map.get(&a), index_map.get(&b)) {
            (Some(na), Some(nb)) => (*na, *nb),
            _ => {
                return Err(GraphError::AdjList(format!(
                    "bond references missing atom {} or {}",
                    a, b
                )));
            }
        };
        graph.add_edge(na, nb, order);
    }
    let mut mol = Molecule::from_graph(graph);
    mol.collapse_hydrogens();
    Ok(mol)
}

/// Write an RMG adjacency list with explicit hydrogens, heavy atoms first.
pub fn to_adjacency_list(mol: &Molecule) -> String {
    let graph = &mol.graph;
    let n = graph.node_count();
    // stable numbering: graph order for existing atoms, hydrogens appended
    let mut lines: Vec<String> = Vec::new();
    if mol.multiplicity() > 1 {
        lines.push(format!("multiplicity {}", mol.multiplicity()));
    }
    let number_of = |i: usize| -> u32 { (i + 1) as u32 };
    let mut h_counter = n as u32;
    // (owner atom number, hydrogen number)
    let mut hydrogens: Vec<(u32, u32)> = Vec::new();
    for (i, idx) in graph.node_indices().enumerate() {
        let atom = graph[idx];
        let mut bond_tokens: Vec<(u32, char)> = graph
            .edges(idx)
            .map(|e| {
                let other = if e.source() == idx {
                    e.target()
                } else {
                    e.source()
                };
                (number_of(other.index()), e.weight().code())
            })
            .collect();
        for _ in 0..atom.implicit_hydrogens {
            h_counter += 1;
            bond_tokens.push((h_counter, 'S'));
            hydrogens.push((number_of(i), h_counter));
        }
        bond_tokens.sort();
        let bonds: Vec<String> = bond_tokens
            .iter()
            .map(|(to, code)| format!("{{{},{}}}", to, code))
            .collect();
        let bond_order_sum: f64 = graph.edges(idx).map(|e| e.weight().order()).sum::<f64>()
            + atom.implicit_hydrogens as f64;
        let lp = lone_pairs(&atom, bond_order_sum);
        lines.push(format!(
            "{} {} u{} p{} c{}{}{}",
            number_of(i),
            atom.element,
            atom.radical_electrons,
            lp,
            format_charge(atom.charge),
            if bonds.is_empty() { "" } else { " " },
            bonds.join(" ")
        ));
    }
    for (owner, h) in hydrogens {
        lines.push(format!("{} H u0 p0 c0 {{{},S}}", h, owner));
    }
    lines.join("\n")
}

fn format_charge(charge: i8) -> String {
    if charge > 0 {
        format!("+{}", charge)
    } else {
        charge.to_string()
    }
}

fn lone_pairs(atom: &Atom, bond_order_sum: f64) -> i32 {
    let ve = atom.data().valence_electrons;
    let electrons =
        ve - atom.charge as i32 - atom.radical_electrons as i32 - bond_order_sum.round() as i32;
    (electrons / 2).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Molecula::smiles::parse_smiles;

    const ETHANOL_ADJLIST: &str = "\
1 C u0 p0 c0 {2,S} {4,S} {5,S} {6,S}
2 C u0 p0 c0 {1,S} {3,S} {7,S} {8,S}
3 O u0 p2 c0 {2,S} {9,S}
4 H u0 p0 c0 {1,S}
5 H u0 p0 c0 {1,S}
6 H u0 p0 c0 {1,S}
7 H u0 p0 c0 {2,S}
8 H u0 p0 c0 {2,S}
9 H u0 p0 c0 {3,S}
";

    const METHYL_ADJLIST: &str = "\
multiplicity 2
1 C u1 p0 c0 {2,S} {3,S} {4,S}
2 H u0 p0 c0 {1,S}
3 H u0 p0 c0 {1,S}
4 H u0 p0 c0 {1,S}
";

    #[test]
    fn test_parse_ethanol() {
        let mol = parse_adjacency_list(ETHANOL_ADJLIST).unwrap();
        assert_eq!(mol.formula(), "C2H6O");
        assert_eq!(mol.atom_count(), 3); // hydrogens collapsed
        let from_smiles = parse_smiles("CCO").unwrap();
        assert!(mol.is_isomorphic_to(&from_smiles));
    }

    #[test]
    fn test_parse_methyl_radical() {
        let mol = parse_adjacency_list(METHYL_ADJLIST).unwrap();
        assert_eq!(mol.radical_count(), 1);
        assert_eq!(mol.multiplicity(), 2);
        assert!(mol.is_isomorphic_to(&parse_smiles("[CH3]").unwrap()));
    }

    #[test]
    fn test_round_trip() {
        let mol = parse_adjacency_list(ETHANOL_ADJLIST).unwrap();
        let text = to_adjacency_list(&mol);
        let back = parse_adjacency_list(&text).unwrap();
        assert!(mol.is_isomorphic_to(&back));
        let radical = parse_adjacency_list(METHYL_ADJLIST).unwrap();
        let text = to_adjacency_list(&radical);
        assert!(text.starts_with("multiplicity 2"));
        assert!(radical.is_isomorphic_to(&parse_adjacency_list(&text).unwrap()));
    }

    #[test]
    fn test_bad_lines_rejected() {
        assert!(parse_adjacency_list("1 C q0").is_err());
        assert!(parse_adjacency_list("").is_err());
        assert!(parse_adjacency_list("1 C u0 p0 c0 {2,S}").is_err());
    }
}
