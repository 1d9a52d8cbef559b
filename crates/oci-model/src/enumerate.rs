//! Run-space enumeration.

use crate::RunId;
use oci_data::Catalog;

/// Expand the catalog into the total ordered set of run IDs.
///
/// Starts from the single empty partial ID and, for each parameter in sorted
/// order with domain size n, extends every partial ID with digits `0..n`.
/// The result length is the product of all domain sizes; an empty catalog
/// yields exactly the empty-string run. The order carries no meaning beyond
/// being deterministic and reproducible.
pub fn enumerate_runs(catalog: &Catalog) -> Vec<RunId> {
    let mut runs: Vec<RunId> = vec![String::new()];
    for (_, param) in catalog.iter() {
        let mut expanded = Vec::with_capacity(runs.len() * param.values.len());
        for partial in &runs {
            for digit in 0..param.values.len() {
                expanded.push(format!("{partial}{digit}"));
            }
        }
        runs = expanded;
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn catalog(json: &str) -> Catalog {
        Catalog::from_json_str(json).unwrap()
    }

    #[test]
    fn two_by_two_catalog() {
        let catalog = catalog(
            r#"{
                "flaring": { "type": "slider", "values": "0,1" },
                "gwp": { "type": "toggle", "values": "20,100" }
            }"#,
        );
        assert_eq!(enumerate_runs(&catalog), vec!["00", "01", "10", "11"]);
    }

    #[test]
    fn empty_catalog_yields_the_baseline_run() {
        assert_eq!(enumerate_runs(&catalog("{}")), vec![""]);
    }

    #[test]
    fn digit_order_follows_sorted_names() {
        // "a" has 3 values, "z" has 2: first digit must be a's.
        let catalog = catalog(
            r#"{
                "z": { "type": "toggle", "values": "0,1" },
                "a": { "type": "slider", "values": "0,5,9" }
            }"#,
        );
        let runs = enumerate_runs(&catalog);
        assert_eq!(runs.len(), 6);
        assert_eq!(runs[0], "00");
        assert_eq!(runs[5], "21");
    }

    proptest! {
        #[test]
        fn count_is_product_and_ids_are_unique(domains in proptest::collection::vec(1usize..=4, 0..5)) {
            let entries: Vec<String> = domains
                .iter()
                .enumerate()
                .map(|(i, n)| {
                    let values: Vec<String> = (0..*n).map(|v| v.to_string()).collect();
                    format!(
                        r#""p{i}": {{ "type": "slider", "values": "{}" }}"#,
                        values.join(",")
                    )
                })
                .collect();
            let catalog = Catalog::from_json_str(&format!("{{{}}}", entries.join(","))).unwrap();

            let runs = enumerate_runs(&catalog);
            let expected: usize = domains.iter().product();
            prop_assert_eq!(runs.len(), expected);

            let unique: HashSet<_> = runs.iter().collect();
            prop_assert_eq!(unique.len(), runs.len());

            for run in &runs {
                prop_assert_eq!(run.len(), domains.len());
            }
        }
    }
}
