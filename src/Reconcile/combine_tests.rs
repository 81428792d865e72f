/////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// TESTS
//////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use crate::Molecula::backend::NativeBackend;
    use crate::Reconcile::ReconcileError;
    use crate::Reconcile::combiner::combine;
    use crate::Reconcile::merger::expand_records;
    use crate::Species::record::SpeciesRecord;
    use std::collections::HashMap;

    fn record(label: &str, smiles: Option<&str>) -> SpeciesRecord {
        let mut r = SpeciesRecord::new(label);
        r.smiles = smiles.map(|s| s.to_string());
        r
    }

    #[test]
    fn test_insufficient_input() {
        let backend = NativeBackend::new();
        let lists = vec![vec![record("A", Some("C"))]];
        let err = combine(&lists, &backend, false).unwrap_err();
        assert!(matches!(err, ReconcileError::InsufficientInput(1)));
    }

    #[test]
    fn test_combine_with_itself_is_identity() {
        let backend = NativeBackend::new();
        let mut ts = SpeciesRecord::new("A+B<=>C");
        ts.is_ts = true;
        let base = vec![
            record("ethanol", Some("CCO")),
            record("methyl", Some("[CH3]")),
            ts,
        ];
        let acc = combine(&[base.clone(), base.clone()], &backend, false).unwrap();
        // the TS duplicate is flagged, everything else folds onto itself
        assert_eq!(acc.records()[..2], base[..2]);
        assert_eq!(acc.len(), 3);
        assert!(acc.report.aliases.is_empty());
        assert_eq!(acc.report.ts_label_conflicts, vec!["A+B<=>C".to_string()]);
    }

    #[test]
    fn test_alias_across_lists() {
        let backend = NativeBackend::new();
        let l1 = vec![record("A", Some("CCO"))];
        let l2 = vec![record("ethanol", Some("OCC"))];
        let acc = combine(&[l1, l2], &backend, false).unwrap();
        assert_eq!(acc.len(), 1);
        assert_eq!(acc.records()[0].label, "A");
        assert_eq!(acc.report.aliases["ethanol"], "A");
    }

    #[test]
    fn test_backfill_from_later_list() {
        let backend = NativeBackend::new();
        let l1 = vec![record("X", None)];
        let mut rich = record("X", Some("C"));
        rich.multiplicity = Some(1);
        let acc = combine(&[l1, vec![rich]], &backend, false).unwrap();
        assert_eq!(acc.len(), 1);
        let out = acc.records();
        assert_eq!(out[0].smiles.as_deref(), Some("C"));
        assert_eq!(out[0].multiplicity, Some(1));
        assert!(acc.report.unresolved.is_empty());
    }

    #[test]
    fn test_unparseable_record_survives() {
        let backend = NativeBackend::new();
        let l1 = vec![record("good", Some("CC"))];
        let l2 = vec![record("bad", Some("C(("))];
        let acc = combine(&[l1, l2], &backend, false).unwrap();
        assert_eq!(acc.len(), 2);
        assert_eq!(acc.report.unresolved, vec!["bad".to_string()]);
    }

    #[test]
    fn test_resonance_flag_controls_radical_matching() {
        let backend = NativeBackend::new();
        // two resonance structures of the 1-methylallyl radical
        let l1 = vec![record("butenyl", Some("C=C[CH]C"))];
        let l2 = vec![record("butenyl_b", Some("[CH2]C=CC"))];
        let with = combine(&[l1.clone(), l2.clone()], &backend, true).unwrap();
        assert_eq!(with.len(), 1);
        assert_eq!(with.report.aliases["butenyl_b"], "butenyl");
        let without = combine(&[l1, l2], &backend, false).unwrap();
        assert_eq!(without.len(), 2);
    }

    #[test]
    fn test_combine_is_deterministic() {
        let backend = NativeBackend::new();
        let l1 = vec![record("A", Some("CCO")), record("B", None)];
        let l2 = vec![
            record("ethanol", Some("OCC")),
            record("C1", Some("CC")),
            record("B", Some("C#C")),
        ];
        let first = combine(&[l1.clone(), l2.clone()], &backend, true).unwrap();
        let second = combine(&[l1, l2], &backend, true).unwrap();
        assert_eq!(first.records(), second.records());
        assert_eq!(first.report, second.report);
    }

    #[test]
    fn test_expand_after_combine_honors_aliases() {
        let backend = NativeBackend::new();
        let l1 = vec![record("A", Some("CCO"))];
        let l2 = vec![record("ethanol", Some("OCC"))];
        let acc = combine(&[l1, l2], &backend, false).unwrap();
        // the discarded input label still resolves through the alias map
        let mut downstream = vec![record("ethanol", None)];
        expand_records(&mut downstream, &acc.cache, Some(&acc.report.aliases), &backend);
        assert!(downstream[0].smiles.is_some());
        assert_eq!(downstream[0].charge, Some(0));

        let mut no_alias = vec![record("ethanol", None)];
        expand_records(&mut no_alias, &acc.cache, Some(&HashMap::new()), &backend);
        assert!(no_alias[0].smiles.is_none());
    }

    #[test]
    fn test_alias_map_keys_never_name_surviving_species() {
        let backend = NativeBackend::new();
        let l1 = vec![record("B", Some("C")), record("A", Some("CCO"))];
        let l2 = vec![record("B", Some("OCC"))];
        let acc = combine(&[l1, l2], &backend, false).unwrap();
        let labels: Vec<&str> = acc.vec_of_labels.iter().map(String::as_str).collect();
        assert_eq!(labels, ["B", "A"]);
        // B survives as its own species, so the structural match against A
        // must not land in the rewritable alias map
        for from in acc.report.aliases.keys() {
            assert!(!labels.contains(&from.as_str()));
        }
        assert_eq!(
            acc.report.shadowed_aliases,
            vec![("B".to_string(), "A".to_string())]
        );
    }

    #[test]
    fn test_three_lists_fold_left_to_right() {
        let backend = NativeBackend::new();
        let l1 = vec![record("A", Some("C"))];
        let l2 = vec![record("methane", Some("C")), record("B", Some("CC"))];
        let l3 = vec![record("CH4", Some("C")), record("ethane", Some("CC"))];
        let acc = combine(&[l1, l2, l3], &backend, false).unwrap();
        let labels: Vec<&str> = acc.vec_of_labels.iter().map(String::as_str).collect();
        assert_eq!(labels, ["A", "B"]);
        assert_eq!(acc.report.aliases["methane"], "A");
        assert_eq!(acc.report.aliases["CH4"], "A");
        assert_eq!(acc.report.aliases["ethane"], "B");
    }
}
