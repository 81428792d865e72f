/// The species record type consumed by the reconciliation engine: a label
/// plus optional structure descriptors and a pass-through metadata bag.
pub mod record;
/// RMG species dictionary (label + adjacency list) file adapter.
pub mod species_dict;
/// ARC-style YAML species input read/save (save never overwrites).
pub mod arc_input;
/// Species label alias extraction from Chemkin `SPECIES` blocks.
pub mod chemkin;
