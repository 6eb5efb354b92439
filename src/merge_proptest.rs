//! Property-based tests for manifest merging.
//!
//! These tests use proptest to generate random requirement mappings and
//! verify that precedence and pinning hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::merge::{is_local_package, overlay, overlay_all, pin_local_packages};
    use proptest::collection::btree_map;
    use proptest::prelude::*;
    use serde_json::{Map, Value};
    use std::collections::BTreeMap;

    fn requirements() -> impl Strategy<Value = BTreeMap<String, String>> {
        btree_map(
            "(magento|vendor)/(framework|module|lib|tool)(-[a-z]{1,4})?",
            "[0-9]\\.[0-9]\\.\\*",
            0..8,
        )
    }

    fn to_map(requirements: &BTreeMap<String, String>) -> Map<String, Value> {
        requirements
            .iter()
            .map(|(name, constraint)| (name.clone(), Value::String(constraint.clone())))
            .collect()
    }

    proptest! {
        /// Property: every key of the top mapping ends up with the top's value
        #[test]
        fn overlay_top_always_wins(base in requirements(), top in requirements()) {
            let mut merged = to_map(&base);
            overlay(&mut merged, &to_map(&top));
            for (name, constraint) in &top {
                prop_assert_eq!(&merged[name], &Value::String(constraint.clone()));
            }
        }

        /// Property: keys only in the base mapping are left untouched
        #[test]
        fn overlay_keeps_base_only_keys(base in requirements(), top in requirements()) {
            let mut merged = to_map(&base);
            overlay(&mut merged, &to_map(&top));
            for (name, constraint) in base.iter().filter(|(name, _)| !top.contains_key(*name)) {
                prop_assert_eq!(&merged[name], &Value::String(constraint.clone()));
            }
            prop_assert!(merged.len() <= base.len() + top.len());
        }

        /// Property: with several sources, the last one declaring a key wins
        #[test]
        fn overlay_all_last_source_wins(sources in proptest::collection::vec(requirements(), 1..5)) {
            let maps: Vec<Map<String, Value>> = sources.iter().map(to_map).collect();
            let mut merged = Map::new();
            overlay_all(&mut merged, &maps);

            for (name, value) in &merged {
                let last = sources
                    .iter()
                    .rev()
                    .find_map(|source| source.get(name))
                    .cloned();
                prop_assert_eq!(Some(value.clone()), last.map(Value::String));
            }
        }

        /// Property: after pinning, local packages are `*` and others unchanged
        #[test]
        fn pinning_only_touches_local_packages(requirements in requirements()) {
            let mut require = to_map(&requirements);
            pin_local_packages(&mut require);
            for (name, constraint) in &requirements {
                if is_local_package(name) {
                    prop_assert_eq!(&require[name], "*");
                } else {
                    prop_assert_eq!(&require[name], &Value::String(constraint.clone()));
                }
            }
        }
    }
}
