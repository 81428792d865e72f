//! # Merge Report Module
//!
//! Side artifacts of a merge run: the alias map for inputs that used a
//! different label for a known species, forced renames for genuine label
//! collisions, species left unresolved, and transition-state label
//! conflicts. Callers use the alias map to rewrite downstream references;
//! operators read the table to find records worth manual inspection.

use prettytable::{Cell, Row, Table};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MergeReport {
    /// discarded label -> surviving label (structure matched across labels;
    /// the discarded label names nothing else, so rewriting it is safe)
    pub aliases: HashMap<String, String>,
    /// (input label, matched label) pairs where the structure matched an
    /// existing species but the input label still names a *different*
    /// surviving species; not safe for blind rewriting, flagged for
    /// manual inspection instead
    pub shadowed_aliases: Vec<(String, String)>,
    /// (input label, assigned label) rename history, in merge order; a
    /// base label can appear more than once across lists
    pub renamed: Vec<(String, String)>,
    /// labels kept in the output without a resolved structure
    pub unresolved: Vec<String>,
    /// transition-state labels that appeared more than once
    pub ts_label_conflicts: Vec<String>,
}

impl MergeReport {
    pub fn is_clean(&self) -> bool {
        self.aliases.is_empty()
            && self.shadowed_aliases.is_empty()
            && self.renamed.is_empty()
            && self.unresolved.is_empty()
            && self.ts_label_conflicts.is_empty()
    }

    /// Render the report as a table on stdout, rows sorted for stable
    /// output across runs.
    pub fn pretty_print(&self) {
        if self.is_clean() {
            println!("Merge report: nothing to report, all records reconciled cleanly.");
            return;
        }
        let mut table = Table::new();
        table.add_row(Row::new(vec![
            Cell::new("kind"),
            Cell::new("label"),
            Cell::new("maps to"),
        ]));
        let mut aliases: Vec<(&String, &String)> = self.aliases.iter().collect();
        aliases.sort();
        for (from, to) in aliases {
            table.add_row(Row::new(vec![
                Cell::new("alias"),
                Cell::new(from),
                Cell::new(to),
            ]));
        }
        for (from, to) in &self.shadowed_aliases {
            table.add_row(Row::new(vec![
                Cell::new("shadowed alias"),
                Cell::new(from),
                Cell::new(to),
            ]));
        }
        // renames kept in merge order, already deterministic
        for (from, to) in &self.renamed {
            table.add_row(Row::new(vec![
                Cell::new("renamed"),
                Cell::new(from),
                Cell::new(to),
            ]));
        }
        for label in &self.unresolved {
            table.add_row(Row::new(vec![
                Cell::new("unresolved"),
                Cell::new(label),
                Cell::new("-"),
            ]));
        }
        for label in &self.ts_label_conflicts {
            table.add_row(Row::new(vec![
                Cell::new("ts conflict"),
                Cell::new(label),
                Cell::new("-"),
            ]));
        }
        table.printstd();
    }
}
