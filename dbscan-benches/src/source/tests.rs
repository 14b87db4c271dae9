//! Tests for the synthetic dataset generators.

use std::sync::Arc;

use dbscan_core::{DbscanBuilder, Euclidean, IndexStrategy, Levenshtein, Metric};
use rstest::rstest;

use super::*;

fn blob_config() -> GaussianBlobConfig {
    GaussianBlobConfig {
        point_count: 60,
        dimensions: 3,
        cluster_count: 3,
        separation: 20.0,
        spread: 0.3,
        seed: 7,
    }
}

fn text_config() -> SyntheticTextConfig {
    SyntheticTextConfig {
        item_count: 40,
        template_count: 4,
        min_length: 4,
        max_length: 10,
        max_edits_per_item: 2,
        alphabet: "abcdefghijklmnopqrstuvwxyz".into(),
        seed: 11,
    }
}

#[rstest]
fn gaussian_blobs_are_seeded() {
    let config = blob_config();
    let first = gaussian_blobs(&config).expect("config is valid");
    let second = gaussian_blobs(&config).expect("config is valid");
    assert_eq!(first.as_slice(), second.as_slice());
    assert_eq!(first.len(), 60);
    assert_eq!(first.dimension(), Some(3));
}

#[rstest]
fn gaussian_blobs_are_recovered_by_dbscan() {
    let config = blob_config();
    let dataset = gaussian_blobs(&config).expect("config is valid");
    let result = DbscanBuilder::new()
        .with_radius(2.0)
        .with_min_neighbours(4)
        .build(Arc::new(dataset), Euclidean)
        .expect("configuration must be valid")
        .run()
        .expect("run must succeed");
    assert_eq!(result.cluster_count(), 3);
    let firsts = result.labels().iter().take(3).cycle();
    for (index, (label, expected)) in result.labels().iter().zip(firsts).enumerate() {
        assert!(label.cluster().is_some(), "point {index} is noise");
        assert_eq!(label, expected, "point {index} left its blob");
    }
}

#[rstest]
#[case::zero_points(GaussianBlobConfig { point_count: 0, ..blob_config() })]
#[case::zero_dimensions(GaussianBlobConfig { dimensions: 0, ..blob_config() })]
#[case::zero_clusters(GaussianBlobConfig { cluster_count: 0, ..blob_config() })]
#[case::too_many_clusters(GaussianBlobConfig { cluster_count: 61, ..blob_config() })]
#[case::bad_separation(GaussianBlobConfig { separation: f32::NAN, ..blob_config() })]
#[case::negative_spread(GaussianBlobConfig { spread: -1.0, ..blob_config() })]
fn gaussian_blobs_reject_invalid_config(#[case] config: GaussianBlobConfig) {
    assert!(gaussian_blobs(&config).is_err());
}

#[rstest]
fn synthetic_text_respects_length_bounds() {
    let config = text_config();
    let corpus = synthetic_text(&config).expect("config is valid");
    assert_eq!(corpus.len(), 40);
    for word in corpus.as_slice() {
        let length = word.chars().count();
        assert!((4..=10).contains(&length), "`{word}` has length {length}");
    }
}

#[rstest]
fn synthetic_text_stays_near_templates() {
    let config = text_config();
    let corpus = synthetic_text(&config).expect("config is valid");
    let items = corpus.as_slice();
    // Items sharing a template differ by at most the edits applied to each
    // plus any length clamping, so every item has a close sibling.
    for (word, sibling) in items.iter().skip(4).zip(items) {
        assert!(Levenshtein.distance(word, sibling) <= 12.0);
    }
}

#[rstest]
fn synthetic_text_clusters_with_either_index(
    #[values(IndexStrategy::BallTree, IndexStrategy::LinearScan)] strategy: IndexStrategy,
) {
    let corpus = synthetic_text(&text_config()).expect("config is valid");
    let result = DbscanBuilder::new()
        .with_radius(3.5)
        .with_min_neighbours(3)
        .with_index_strategy(strategy)
        .build(Arc::new(corpus), Levenshtein)
        .expect("configuration must be valid")
        .run()
        .expect("run must succeed");
    assert_eq!(result.labels().len(), 40);
}

#[rstest]
#[case::zero_items(SyntheticTextConfig { item_count: 0, ..text_config() })]
#[case::zero_length(SyntheticTextConfig { min_length: 0, ..text_config() })]
#[case::inverted_range(SyntheticTextConfig { min_length: 12, ..text_config() })]
#[case::empty_alphabet(SyntheticTextConfig { alphabet: String::new(), ..text_config() })]
fn synthetic_text_rejects_invalid_config(#[case] config: SyntheticTextConfig) {
    assert!(synthetic_text(&config).is_err());
}
