/// Core molecular-graph representation: atoms, bonds, isomorphism,
/// canonical ranking, formulas. Everything else in this directory builds on
/// the `Molecule` type defined here.
pub mod molecule;
/// SMILES subset parser and canonical-order writer.
///
/// # Examples
/// ```
/// use SpcKit::Molecula::smiles::parse_smiles;
/// let a = parse_smiles("CCO").unwrap();
/// let b = parse_smiles("OCC").unwrap();
/// assert!(a.is_isomorphic_to(&b));
/// ```
pub mod smiles;
/// RMG-style adjacency list parser and writer (`1 C u0 p0 c0 {2,S}` lines).
pub mod adjlist;
/// XYZ coordinate block parser and covalent-radius bond perception.
pub mod xyz;
/// Resonance structure enumeration (allyl-type radical shifts).
pub mod resonance;
/// The `GraphBackend` capability trait consumed by the reconciliation
/// engine, plus the `NativeBackend` implementation over the modules above.
pub mod backend;
