//! # SMILES Module
//!
//! ## Aim
//! Parse and generate a practical subset of SMILES: the organic subset
//! (B, C, N, O, P, S, F, Cl, Br, I), bracket atoms with explicit hydrogen
//! counts and formal charges, branches, ring closures (including `%nn`),
//! bond symbols `-`, `=`, `#`, `:`, dot-separated fragments and aromatic
//! lowercase atoms. Stereochemistry and isotopes are not supported; species
//! bookkeeping in reaction models does not need them.
//!
//! ## Notes
//! - Implicit hydrogens on organic-subset atoms are filled to the default
//!   valence; bracket atoms get exactly the hydrogens they declare, and
//!   leftover bonding capacity becomes radical electrons ([CH3] is a methyl
//!   radical, [CH2] a carbene).
//! - Aromatic bonds are stored as `BondOrder::Benzene`. No kekulization or
//!   aromaticity perception is performed, so a kekulized and an aromatic
//!   encoding of the same ring are distinct graphs.

use super::molecule::{Atom, BondOrder, GraphError, MolGraph, Molecule, element_data};
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

const ORGANIC_SUBSET: &[&str] = &["B", "C", "N", "O", "P", "S", "F", "Cl", "Br", "I"];

struct ParsedAtom {
    node: NodeIndex<u32>,
    aromatic: bool,
    bracket: bool,
}

/// Parse a SMILES string into a molecular graph. Explicit `[H]` atoms are
/// collapsed into implicit hydrogen counts afterwards.
pub fn parse_smiles(smiles: &str) -> Result<Molecule, GraphError> {
    let s = smiles.trim();
    if s.is_empty() {
        return Err(GraphError::EmptyStructure);
    }
    let mut graph = MolGraph::default();
    let mut atoms: Vec<ParsedAtom> = Vec::new();
    // index into `atoms` of the previous atom on the current chain
    let mut prev: Option<usize> = None;
    let mut branch_stack: Vec<Option<usize>> = Vec::new();
    let mut pending_bond: Option<BondOrder> = None;
    let mut ring_bonds: HashMap<u32, (usize, Option<BondOrder>)> = HashMap::new();

    let chars: Vec<char> = s.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            '(' => {
                branch_stack.push(prev);
                i += 1;
            }
            ')' => {
                prev = branch_stack
                    .pop()
                    .ok_or_else(|| GraphError::Smiles(format!("unbalanced ')' in '{}'", s)))?;
                i += 1;
            }
            '-' => {
                pending_bond = Some(BondOrder::Single);
                i += 1;
            }
            '=' => {
                pending_bond = Some(BondOrder::Double);
                i += 1;
            }
            '#' => {
                pending_bond = Some(BondOrder::Triple);
                i += 1;
            }
            ':' => {
                pending_bond = Some(BondOrder::Benzene);
                i += 1;
            }
            '.' => {
                prev = None;
                pending_bond = None;
                i += 1;
            }
            '/' | '\\' => {
                // stereo bonds degrade to single bonds
                pending_bond = Some(BondOrder::Single);
                i += 1;
            }
            '%' => {
                if i + 2 >= chars.len()
                    || !chars[i + 1].is_ascii_digit()
                    || !chars[i + 2].is_ascii_digit()
                {
                    return Err(GraphError::Smiles(format!("bad '%' ring closure in '{}'", s)));
                }
                let num = chars[i + 1].to_digit(10).unwrap() * 10 + chars[i + 2].to_digit(10).unwrap();
                close_ring(
                    &mut graph,
                    &mut ring_bonds,
                    &atoms,
                    prev,
                    num,
                    &mut pending_bond,
                    s,
                )?;
                i += 3;
            }
            d if d.is_ascii_digit() => {
                let num = d.to_digit(10).unwrap();
                close_ring(
                    &mut graph,
                    &mut ring_bonds,
                    &atoms,
                    prev,
                    num,
                    &mut pending_bond,
                    s,
                )?;
                i += 1;
            }
            '[' => {
                let end = chars[i..]
                    .iter()
                    .position(|&c| c == ']')
                    .ok_or_else(|| GraphError::Smiles(format!("unclosed '[' in '{}'", s)))?
                    + i;
                let body: String = chars[i + 1..end].iter().collect();
                let (atom, aromatic) = parse_bracket_atom(&body, s)?;
                let node = graph.add_node(atom);
                attach(
                    &mut graph,
                    &mut atoms,
                    &mut prev,
                    node,
                    aromatic,
                    true,
                    &mut pending_bond,
                );
                i = end + 1;
            }
            c if c.is_ascii_alphabetic() => {
                // organic subset, possibly two-letter (Cl, Br)
                let mut symbol = c.to_string();
                if (c == 'C' || c == 'B') && i + 1 < chars.len() {
                    let two: String = format!("{}{}", c, chars[i + 1]);
                    if two == "Cl" || two == "Br" {
                        symbol = two;
                        i += 1;
                    }
                }
                let aromatic = symbol.chars().next().unwrap().is_lowercase();
                let canonical_symbol = if aromatic {
                    let mut u = symbol.to_uppercase();
                    u.truncate(symbol.len());
                    u
                } else {
                    symbol.clone()
                };
                if !ORGANIC_SUBSET.contains(&canonical_symbol.as_str()) {
                    return Err(GraphError::Smiles(format!(
                        "atom '{}' outside organic subset in '{}'",
                        symbol, s
                    )));
                }
                let atom = Atom::new(&canonical_symbol)?;
                let node = graph.add_node(atom);
                attach(
                    &mut graph,
                    &mut atoms,
                    &mut prev,
                    node,
                    aromatic,
                    false,
                    &mut pending_bond,
                );
                i += 1;
            }
            other => {
                return Err(GraphError::Smiles(format!(
                    "unexpected character '{}' in '{}'",
                    other, s
                )));
            }
        }
    }
    if !branch_stack.is_empty() {
        return Err(GraphError::Smiles(format!("unbalanced '(' in '{}'", s)));
    }
    if !ring_bonds.is_empty() {
        return Err(GraphError::Smiles(format!("unclosed ring bond in '{}'", s)));
    }

    fill_hydrogens(&mut graph, &atoms);

    let mut mol = Molecule::from_graph(graph);
    mol.collapse_hydrogens();
    if mol.is_empty() {
        return Err(GraphError::EmptyStructure);
    }
    Ok(mol)
}

#[allow(clippy::too_many_arguments)]
fn attach(
    graph: &mut MolGraph,
    atoms: &mut Vec<ParsedAtom>,
    prev: &mut Option<usize>,
    node: NodeIndex<u32>,
    aromatic: bool,
    bracket: bool,
    pending_bond: &mut Option<BondOrder>,
) {
    if let Some(p) = *prev {
        let order = pending_bond.take().unwrap_or({
            if aromatic && atoms[p].aromatic {
                BondOrder::Benzene
            } else {
                BondOrder::Single
            }
        });
        graph.add_edge(atoms[p].node, node, order);
    } else {
        pending_bond.take();
    }
    atoms.push(ParsedAtom {
        node,
        aromatic,
        bracket,
    });
    *prev = Some(atoms.len() - 1);
}

fn close_ring(
    graph: &mut MolGraph,
    ring_bonds: &mut HashMap<u32, (usize, Option<BondOrder>)>,
    atoms: &[ParsedAtom],
    prev: Option<usize>,
    num: u32,
    pending_bond: &mut Option<BondOrder>,
    s: &str,
) -> Result<(), GraphError> {
    let here = prev.ok_or_else(|| {
        GraphError::Smiles(format!("ring closure digit before any atom in '{}'", s))
    })?;
    if let Some((there, opened_bond)) = ring_bonds.remove(&num) {
        let order = pending_bond
            .take()
            .or(opened_bond)
            .unwrap_or({
                if atoms[here].aromatic && atoms[there].aromatic {
                    BondOrder::Benzene
                } else {
                    BondOrder::Single
                }
            });
        graph.add_edge(atoms[there].node, atoms[here].node, order);
    } else {
        ring_bonds.insert(num, (here, pending_bond.take()));
    }
    Ok(())
}

/// bracket body without the square brackets, e.g. "CH3", "NH4+", "O-"
fn parse_bracket_atom(body: &str, smiles: &str) -> Result<(Atom, bool), GraphError> {
    let chars: Vec<char> = body.chars().collect();
    let mut i = 0;
    // skip isotope digits
    while i < chars.len() && chars[i].is_ascii_digit() {
        i += 1;
    }
    if i >= chars.len() {
        return Err(GraphError::Smiles(format!(
            "empty bracket atom in '{}'",
            smiles
        )));
    }
    let mut symbol = chars[i].to_string();
    i += 1;
    if i < chars.len() && chars[i].is_ascii_lowercase() && symbol.chars().all(|c| c.is_uppercase())
    {
        let two = format!("{}{}", symbol, chars[i]);
        if element_data(&two).is_some() {
            symbol = two;
            i += 1;
        }
    }
    let aromatic = symbol.chars().next().unwrap().is_lowercase();
    let canonical_symbol = if aromatic {
        symbol.to_uppercase()
    } else {
        symbol.clone()
    };
    let mut atom = Atom::new(&canonical_symbol)?;

    let mut explicit_h: u8 = 0;
    let mut charge: i8 = 0;
    while i < chars.len() {
        match chars[i] {
            '@' => i += 1, // stereo descriptors ignored
            'H' => {
                i += 1;
                let mut n = String::new();
                while i < chars.len() && chars[i].is_ascii_digit() {
                    n.push(chars[i]);
                    i += 1;
                }
                explicit_h = if n.is_empty() { 1 } else { n.parse().unwrap_or(1) };
            }
            '+' | '-' => {
                let sign: i8 = if chars[i] == '+' { 1 } else { -1 };
                i += 1;
                let mut n = String::new();
                while i < chars.len() && chars[i].is_ascii_digit() {
                    n.push(chars[i]);
                    i += 1;
                }
                let magnitude: i8 = if n.is_empty() {
                    // count repeated ++ / --
                    let mut m = 1;
                    while i < chars.len() && chars[i] == (if sign > 0 { '+' } else { '-' }) {
                        m += 1;
                        i += 1;
                    }
                    m
                } else {
                    n.parse().unwrap_or(1)
                };
                charge = sign * magnitude;
            }
            other => {
                return Err(GraphError::Smiles(format!(
                    "unexpected '{}' in bracket atom [{}] of '{}'",
                    other, body, smiles
                )));
            }
        }
    }
    atom.charge = charge;
    atom.implicit_hydrogens = explicit_h;
    Ok((atom, aromatic))
}

/// Approximate bonding capacity of an atom after formal charge. Cations of
/// electron-rich elements (N, O, S, P) gain a bond, anions lose one; for
/// carbon and boron any charge removes a bond.
fn bonding_capacity(atom: &Atom) -> i32 {
    let base = atom.data().valence;
    match atom.element {
        "N" | "O" | "S" | "P" => base + atom.charge as i32,
        "C" | "B" => base - (atom.charge as i32).abs(),
        _ => base,
    }
}

fn fill_hydrogens(graph: &mut MolGraph, atoms: &[ParsedAtom]) {
    for pa in atoms {
        let bond_sum: f64 = {
            let g: &MolGraph = graph;
            g.edges(pa.node).map(|e| *e.weight()).map(|b| b.order()).sum()
        };
        let used = bond_sum.ceil() as i32;
        let atom = &mut graph[pa.node];
        let capacity = bonding_capacity(atom);
        if pa.bracket {
            // hydrogens were explicit; leftover capacity is radicals
            let leftover = capacity - used - atom.implicit_hydrogens as i32;
            atom.radical_electrons = leftover.max(0) as u8;
        } else {
            let h = capacity - used;
            atom.implicit_hydrogens = h.max(0) as u8;
        }
    }
}

/// Generate a SMILES string. Atoms are emitted in canonical-rank order so
/// repeated calls on isomorphic node orderings of the same parse give the
/// same text; this is the writer used for descriptor backfill.
pub fn to_smiles(mol: &Molecule) -> String {
    if mol.is_empty() {
        return String::new();
    }
    let ranks = mol.canonical_ranks();
    let graph = &mol.graph;
    let n = graph.node_count();
    let mut visited = vec![false; n];
    let mut ring_counter: u32 = 0;
    // non-tree edges discovered during DFS get ring-closure digits
    let mut ring_digits: HashMap<(usize, usize), u32> = HashMap::new();
    let mut fragments = Vec::new();

    let mut roots: Vec<usize> = (0..n).collect();
    roots.sort_by_key(|i| ranks[*i]);
    for root in roots {
        if visited[root] {
            continue;
        }
        // first pass: mark tree edges and ring closures
        let mut tree_visited = vec![false; n];
        plan_rings(
            graph,
            &ranks,
            root,
            &mut tree_visited,
            &mut ring_digits,
            &mut ring_counter,
        );
        let mut out = String::new();
        write_atom_dfs(graph, &ranks, root, usize::MAX, &mut visited, &ring_digits, &mut out);
        fragments.push(out);
    }
    fragments.join(".")
}

fn ordered_neighbors(graph: &MolGraph, ranks: &[usize], at: usize, from: usize) -> Vec<usize> {
    let mut nb: Vec<usize> = graph
        .neighbors(NodeIndex::new(at))
        .map(|x| x.index())
        .filter(|&x| x != from)
        .collect();
    nb.sort_by_key(|x| ranks[*x]);
    nb
}

fn plan_rings(
    graph: &MolGraph,
    ranks: &[usize],
    at: usize,
    visited: &mut Vec<bool>,
    ring_digits: &mut HashMap<(usize, usize), u32>,
    counter: &mut u32,
) {
    visited[at] = true;
    let mut stack = vec![(at, usize::MAX)];
    // iterative DFS, parent tracked to skip the tree edge back
    while let Some((node, parent)) = stack.pop() {
        for nb in ordered_neighbors(graph, ranks, node, parent) {
            if visited[nb] {
                let key = (node.min(nb), node.max(nb));
                if !ring_digits.contains_key(&key) {
                    *counter += 1;
                    ring_digits.insert(key, *counter);
                }
            } else {
                visited[nb] = true;
                stack.push((nb, node));
            }
        }
    }
}

fn write_atom_dfs(
    graph: &MolGraph,
    ranks: &[usize],
    at: usize,
    from: usize,
    visited: &mut Vec<bool>,
    ring_digits: &HashMap<(usize, usize), u32>,
    out: &mut String,
) {
    visited[at] = true;
    out.push_str(&atom_token(&graph[NodeIndex::new(at)]));
    // ring closure digits attached to this atom
    let mut closures: Vec<(u32, usize)> = Vec::new();
    for nb in graph.neighbors(NodeIndex::new(at)) {
        let key = (at.min(nb.index()), at.max(nb.index()));
        if let Some(&digit) = ring_digits.get(&key) {
            closures.push((digit, nb.index()));
        }
    }
    closures.sort();
    for (digit, nb) in &closures {
        if visited[*nb] && *nb != from {
            // closing side carries the bond symbol
            let e = graph
                .find_edge(NodeIndex::new(at), NodeIndex::new(*nb))
                .unwrap();
            out.push_str(bond_symbol(graph[e]));
        }
        if *digit > 9 {
            out.push('%');
        }
        out.push_str(&digit.to_string());
    }
    let branches: Vec<usize> = ordered_neighbors(graph, ranks, at, from)
        .into_iter()
        .filter(|nb| {
            let key = (at.min(*nb), at.max(*nb));
            !ring_digits.contains_key(&key) && !visited[*nb]
        })
        .collect();
    for (k, nb) in branches.iter().enumerate() {
        let e = graph
            .find_edge(NodeIndex::new(at), NodeIndex::new(*nb))
            .unwrap();
        let last = k == branches.len() - 1;
        if !last {
            out.push('(');
        }
        out.push_str(bond_symbol(graph[e]));
        write_atom_dfs(graph, ranks, *nb, at, visited, ring_digits, out);
        if !last {
            out.push(')');
        }
    }
}

fn bond_symbol(order: BondOrder) -> &'static str {
    match order {
        BondOrder::Single => "",
        BondOrder::Double => "=",
        BondOrder::Triple => "#",
        BondOrder::Benzene => ":",
    }
}

fn atom_token(atom: &Atom) -> String {
    let plain = ORGANIC_SUBSET.contains(&atom.element)
        && atom.charge == 0
        && atom.radical_electrons == 0;
    if plain {
        atom.element.to_string()
    } else {
        let mut t = String::from("[");
        t.push_str(atom.element);
        match atom.implicit_hydrogens {
            0 => {}
            1 => t.push('H'),
            h => {
                t.push('H');
                t.push_str(&h.to_string());
            }
        }
        if atom.charge != 0 {
            if atom.charge > 0 {
                t.push('+');
            } else {
                t.push('-');
            }
            if atom.charge.abs() > 1 {
                t.push_str(&atom.charge.abs().to_string());
            }
        }
        t.push(']');
        t
    }
}
