//! # XYZ Module
//!
//! Converts 3D Cartesian coordinate blocks into molecular graphs by
//! covalent-radius bond perception. This is the expensive, least reliable
//! resolution path: geometry can misassign bonds, so callers must treat
//! failures here as recoverable.
//!
//! Accepted inputs are standard XYZ files (atom count line, comment line,
//! then `El x y z` lines) or bare coordinate blocks without the two header
//! lines, mirroring how upstream automation scripts pass geometries around.

use super::molecule::{Atom, BondOrder, GraphError, MolGraph, Molecule, element_data};
use nalgebra::Point3;

/// two atoms bond when closer than this factor times the radius sum
const BOND_TOLERANCE: f64 = 1.2;

/// Parse an XYZ block into element symbols and positions.
pub fn parse_xyz(text: &str) -> Result<Vec<(String, Point3<f64>)>, GraphError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(GraphError::EmptyStructure);
    }
    let mut lines: Vec<&str> = text.lines().collect();
    // header form: first line is the atom count, second a comment
    if lines[0]
        .trim()
        .chars()
        .next()
        .map(|c| c.is_ascii_digit())
        .unwrap_or(false)
    {
        let declared: usize = lines[0]
            .trim()
            .parse()
            .map_err(|_| GraphError::Xyz(format!("bad atom count line: '{}'", lines[0])))?;
        if lines.len() < 2 + declared {
            return Err(GraphError::Xyz(format!(
                "expected {} atoms, found {} lines",
                declared,
                lines.len().saturating_sub(2)
            )));
        }
        lines = lines[2..2 + declared].to_vec();
    }
    let mut atoms = Vec::new();
    for line in lines {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(GraphError::Xyz(format!("bad coordinate line: '{}'", line)));
        }
        let coords: Result<Vec<f64>, _> = parts[1..4].iter().map(|p| p.parse::<f64>()).collect();
        let coords =
            coords.map_err(|_| GraphError::Xyz(format!("bad coordinate line: '{}'", line)))?;
        atoms.push((
            parts[0].to_string(),
            Point3::new(coords[0], coords[1], coords[2]),
        ));
    }
    Ok(atoms)
}

/// Perceive connectivity from interatomic distances and build a molecular
/// graph. All perceived bonds are single; radical electrons are assigned
/// from the leftover bonding capacity of each heavy atom. Fails when an
/// element is unknown or the perceived graph is disconnected (a sign of a
/// bad geometry or a fragmented cluster).
pub fn mol_from_xyz(text: &str) -> Result<Molecule, GraphError> {
    let atoms = parse_xyz(text)?;
    let mut graph = MolGraph::default();
    let mut nodes = Vec::new();
    let mut radii = Vec::new();
    for (symbol, _) in &atoms {
        let data = element_data(symbol)
            .ok_or_else(|| GraphError::UnknownElement(symbol.clone()))?;
        radii.push(data.covalent_radius);
        nodes.push(graph.add_node(Atom::new(symbol)?));
    }
    for i in 0..atoms.len() {
        for j in (i + 1)..atoms.len() {
            let dist = (atoms[i].1 - atoms[j].1).norm();
            if dist <= BOND_TOLERANCE * (radii[i] + radii[j]) {
                graph.add_edge(nodes[i], nodes[j], BondOrder::Single);
            }
        }
    }
    let mut mol = Molecule::from_graph(graph);
    if mol.atom_count() > 1 && mol.component_count() > 1 {
        return Err(GraphError::Xyz(
            "perceived structure is disconnected".to_string(),
        ));
    }
    mol.collapse_hydrogens();
    // leftover capacity becomes unpaired electrons
    let indices: Vec<_> = mol.graph.node_indices().collect();
    for idx in indices {
        let bond_sum = mol.bond_order_sum(idx);
        let atom = &mut mol.graph[idx];
        let capacity = atom.data().valence;
        let leftover = capacity - bond_sum.ceil() as i32 - atom.implicit_hydrogens as i32;
        atom.radical_electrons = leftover.max(0) as u8;
    }
    Ok(mol)
}
