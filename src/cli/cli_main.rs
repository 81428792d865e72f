//! # CLI Module
//!
//! Command line front end of the species merge tool: two or more ARC-style
//! YAML species files in, one reconciled species file plus a merge report
//! out.

use crate::Molecula::backend::NativeBackend;
use crate::Reconcile::combiner::combine;
use crate::Reconcile::merger::expand_records;
use crate::Species::arc_input::{read_species_input, save_species_input};
use crate::Utils::paths::regularize_path;
use log::{error, info};
use std::path::PathBuf;

const DEFAULT_OUTPUT: &str = "input_merged.yml";

#[derive(Debug, PartialEq)]
pub struct MergeArgs {
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
    pub resonance: bool,
}

pub fn print_usage() {
    println!("Usage: SpcKit <input1.yml> <input2.yml> [more inputs...] [options]");
    println!();
    println!("Merge two or more ARC-style species input files into one,");
    println!("reconciling species that denote the same structure.");
    println!();
    println!("Options:");
    println!("  -o, --output <path>    output file (default ./{DEFAULT_OUTPUT})");
    println!("  -n, --non_resonance    match structures without resonance expansion");
    println!("  -h, --help             show this help");
}

/// Parse command line arguments (without the program name).
pub fn parse_args(args: &[String]) -> Result<MergeArgs, String> {
    let mut inputs = Vec::new();
    let mut output: Option<PathBuf> = None;
    let mut resonance = true;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-n" | "--non_resonance" => resonance = false,
            "-o" | "--output" => {
                i += 1;
                let value = args
                    .get(i)
                    .ok_or_else(|| "option -o/--output needs a path".to_string())?;
                output = Some(PathBuf::from(value));
            }
            "-h" | "--help" => return Err(String::new()),
            flag if flag.starts_with('-') => {
                return Err(format!("unknown option '{}'", flag));
            }
            input => inputs.push(PathBuf::from(input)),
        }
        i += 1;
    }
    if inputs.len() < 2 {
        return Err(format!(
            "need at least two input files, got {}",
            inputs.len()
        ));
    }
    Ok(MergeArgs {
        inputs,
        output: output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
        resonance,
    })
}

/// Run the merge tool. Returns the path the merged file was written to.
pub fn run_merge(args: &MergeArgs) -> Result<PathBuf, String> {
    let mut lists = Vec::new();
    for input in &args.inputs {
        let path = regularize_path(input);
        let records = read_species_input(&path)
            .map_err(|e| format!("cannot read '{}': {}", path.display(), e))?;
        info!("read {} species from {}", records.len(), path.display());
        lists.push(records);
    }
    let backend = NativeBackend::new();
    let acc = combine(&lists, &backend, args.resonance).map_err(|e| e.to_string())?;
    let mut merged = acc.records();
    expand_records(&mut merged, &acc.cache, None, &backend);
    acc.report.pretty_print();
    let output = regularize_path(&args.output);
    let written = save_species_input(&output, &merged, false)
        .map_err(|e| format!("cannot write '{}': {}", output.display(), e))?;
    info!(
        "merged {} input lists into {} species",
        args.inputs.len(),
        merged.len()
    );
    Ok(written)
}

/// entry called from `main`, argv handling + error reporting
pub fn cli_main() -> i32 {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    let args = match parse_args(&argv) {
        Ok(args) => args,
        Err(msg) => {
            if !msg.is_empty() {
                error!("{}", msg);
            }
            print_usage();
            return if msg.is_empty() { 0 } else { 2 };
        }
    };
    match run_merge(&args) {
        Ok(written) => {
            println!("Merged species written to {}", written.display());
            0
        }
        Err(msg) => {
            error!("{}", msg);
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args_defaults() {
        let args = parse_args(&strings(&["a.yml", "b.yml"])).unwrap();
        assert_eq!(args.inputs.len(), 2);
        assert_eq!(args.output, Path::new(DEFAULT_OUTPUT));
        assert!(args.resonance);
    }

    #[test]
    fn test_parse_args_flags() {
        let args =
            parse_args(&strings(&["a.yml", "-n", "b.yml", "c.yml", "-o", "out.yml"])).unwrap();
        assert_eq!(args.inputs.len(), 3);
        assert_eq!(args.output, Path::new("out.yml"));
        assert!(!args.resonance);
    }

    #[test]
    fn test_parse_args_rejects_single_input() {
        assert!(parse_args(&strings(&["a.yml"])).is_err());
        assert!(parse_args(&strings(&["a.yml", "--bogus", "b.yml"])).is_err());
    }

    #[test]
    fn test_run_merge_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.yml");
        let b = dir.path().join("b.yml");
        fs::write(&a, "species:\n- label: A\n  smiles: CCO\n").unwrap();
        fs::write(&b, "species:\n- label: ethanol\n  smiles: OCC\n").unwrap();
        let args = MergeArgs {
            inputs: vec![a, b],
            output: dir.path().join("merged.yml"),
            resonance: false,
        };
        let written = run_merge(&args).unwrap();
        let merged = read_species_input(&written).unwrap();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].label, "A");
        // descriptors generated by the backfill pass
        assert!(merged[0].adjlist.is_some());
        // a second run must not clobber the first output
        let written2 = run_merge(&args).unwrap();
        assert_ne!(written, written2);
    }
}
