#![allow(dead_code)]

use imagetxt::dataset::{Dataset, Item, LabelCatalog, LabelId, Subset};
use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Identifiers without whitespace, quotes, or dots: the unquoted wire form.
pub fn plain_id_strategy() -> BoxedStrategy<String> {
    proptest::string::string_regex("[a-z0-9_]{1,12}")
        .expect("valid plain id regex")
        .boxed()
}

/// Identifiers with interior spaces: the quoted wire form.
pub fn spacey_id_strategy() -> BoxedStrategy<String> {
    proptest::string::string_regex("[a-z0-9_]{1,6}( [a-z0-9_]{1,6}){1,2}")
        .expect("valid spacey id regex")
        .boxed()
}

pub fn item_id_strategy() -> BoxedStrategy<String> {
    prop_oneof![plain_id_strategy(), spacey_id_strategy()].boxed()
}

pub fn label_name_strategy() -> BoxedStrategy<String> {
    proptest::string::string_regex("[a-z0-9_]{1,12}")
        .expect("valid label name regex")
        .boxed()
}

/// Label id lists drawn from a catalog of `label_count`, duplicates allowed.
pub fn labels_strategy(label_count: usize, max_len: usize) -> BoxedStrategy<Vec<usize>> {
    proptest::collection::vec(0..label_count, 0..=max_len).boxed()
}

/// A one-subset dataset with unique item ids (mixed quoted/unquoted forms)
/// and duplicate-bearing label lists.
pub fn arb_dataset(max_labels: usize, max_items: usize) -> BoxedStrategy<Dataset> {
    assert!(max_labels > 0, "max_labels must be > 0");
    assert!(max_items > 0, "max_items must be > 0");

    (1usize..=max_labels)
        .prop_flat_map(move |label_count| {
            (
                proptest::collection::vec(label_name_strategy(), label_count..=label_count),
                proptest::collection::btree_set(item_id_strategy(), 1..=max_items),
            )
                .prop_flat_map(move |(names, ids)| {
                    let ids: Vec<String> = ids.into_iter().collect();
                    let item_count = ids.len();
                    proptest::collection::vec(
                        labels_strategy(label_count, 6),
                        item_count..=item_count,
                    )
                    .prop_map(move |label_lists| {
                        build_dataset(names.clone(), ids.clone(), label_lists)
                    })
                })
        })
        .boxed()
}

fn build_dataset(names: Vec<String>, ids: Vec<String>, label_lists: Vec<Vec<usize>>) -> Dataset {
    let mut subset = Subset::new("train");
    for (id, labels) in ids.into_iter().zip(label_lists) {
        subset.insert(Item::new(id).with_labels(labels.into_iter().map(LabelId::new)));
    }

    let mut dataset = Dataset::new(LabelCatalog::from_names(names));
    dataset.subsets.push(subset);
    dataset
}
