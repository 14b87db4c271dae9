//! Tests for the `Dbscan` clustering API.

mod common;

use std::sync::Arc;

use common::{cluster, line};
use dbscan_core::{
    BallTree, ClusterId, Dataset, DatasetId, DbscanBuilder, DbscanError, DbscanErrorCode,
    Euclidean, IndexStrategy, Levenshtein, LinearScan, Neighbour, PointLabel, QueryError,
    QueryErrorCode, RangeQueryProvider,
};
use dbscan_test_support::{
    fixtures::{dense_blobs_with_outlier, jittered_blobs, two_blobs_with_outlier},
    tracing::RecordingLayer,
};
use rstest::{fixture, rstest};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

#[fixture]
fn blobs() -> Arc<Dataset<Vec<f32>>> {
    Dataset::shared("blobs", two_blobs_with_outlier())
}

#[rstest]
fn builder_defaults() {
    let builder = DbscanBuilder::<Vec<f32>>::new();
    assert_eq!(builder.radius(), 0.5);
    assert_eq!(builder.min_neighbours(), 5);
    assert_eq!(builder.leaf_size(), 32);
    assert_eq!(builder.index_strategy(), IndexStrategy::BallTree);
}

#[rstest]
#[case::zero(0.0)]
#[case::negative(-2.0)]
#[case::nan(f32::NAN)]
#[case::infinite(f32::INFINITY)]
fn builder_rejects_invalid_radius(#[case] radius: f32, blobs: Arc<Dataset<Vec<f32>>>) {
    let err = DbscanBuilder::new()
        .with_radius(radius)
        .build(blobs, Euclidean)
        .expect_err("builder must reject the radius");
    assert!(matches!(err, DbscanError::InvalidRadius { .. }));
    assert_eq!(err.code(), DbscanErrorCode::InvalidRadius);
    assert_eq!(err.code().as_str(), "DBSCAN_INVALID_RADIUS");
}

#[rstest]
#[case::ball_tree(IndexStrategy::BallTree)]
#[case::linear(IndexStrategy::LinearScan)]
fn two_blobs_and_an_outlier(#[case] strategy: IndexStrategy, blobs: Arc<Dataset<Vec<f32>>>) {
    let result = cluster(&blobs, 2.0, 4, strategy);

    assert_eq!(result.cluster_count(), 2);
    assert_eq!(result.noise(), [10]);
    assert_eq!(
        result.clusters(),
        vec![vec![0, 1, 2, 3, 4], vec![5, 6, 7, 8, 9]]
    );
    let first = Some(ClusterId::new(0));
    assert!(result.assignments()[..5].iter().all(|id| *id == first));
}

#[rstest]
#[case::ball_tree(IndexStrategy::BallTree)]
#[case::linear(IndexStrategy::LinearScan)]
fn forty_blob_points_and_a_midway_outlier(#[case] strategy: IndexStrategy) {
    let dataset = Dataset::shared("dense", dense_blobs_with_outlier());
    let mut dbscan = DbscanBuilder::new()
        .with_radius(2.0)
        .with_min_neighbours(4)
        .with_index_strategy(strategy)
        .build(dataset, Euclidean)
        .expect("configuration must be valid");
    let result = dbscan.run().expect("run must succeed");

    assert_eq!(result.cluster_count(), 2);
    assert!(dbscan.is_noise(40));
    assert!(!dbscan.is_assigned(40));
    for blob in [0..20, 20..40] {
        let first = dbscan.cluster_id_of(blob.start);
        assert!(first.is_some());
        assert!(blob.clone().all(|id| dbscan.cluster_id_of(id) == first));
    }
    assert_ne!(dbscan.cluster_id_of(0), dbscan.cluster_id_of(20));
}

#[rstest]
#[case::ball_tree(IndexStrategy::BallTree)]
#[case::linear(IndexStrategy::LinearScan)]
fn jittered_blobs_become_one_cluster_each(#[case] strategy: IndexStrategy) {
    // Jitter spans at most sqrt(12) within a blob; centres sit 20 apart.
    let dataset = Dataset::shared("jittered", jittered_blobs(3, 12, 3, 20.0, 11));
    let result = cluster(&dataset, 4.0, 3, strategy);

    assert_eq!(result.cluster_count(), 3);
    assert_eq!(result.noise_count(), 0);
    let expected: Vec<Vec<usize>> = (0..3)
        .map(|blob| (blob * 12..(blob + 1) * 12).collect())
        .collect();
    assert_eq!(result.clusters(), expected);
}

#[rstest]
#[case::ball_tree(IndexStrategy::BallTree)]
#[case::linear(IndexStrategy::LinearScan)]
fn single_neighbour_with_huge_radius_forms_one_cluster(
    #[case] strategy: IndexStrategy,
    blobs: Arc<Dataset<Vec<f32>>>,
) {
    let result = cluster(&blobs, 100.0, 1, strategy);
    assert_eq!(result.cluster_count(), 1);
    assert_eq!(result.noise_count(), 0);
    assert!(
        result
            .assignments()
            .iter()
            .all(|id| *id == Some(ClusterId::new(0)))
    );
}

#[rstest]
#[case::ball_tree(IndexStrategy::BallTree)]
#[case::linear(IndexStrategy::LinearScan)]
fn radius_below_every_pairwise_distance_yields_only_noise(
    #[case] strategy: IndexStrategy,
    blobs: Arc<Dataset<Vec<f32>>>,
) {
    let result = cluster(&blobs, 0.4, 2, strategy);
    assert_eq!(result.cluster_count(), 0);
    assert_eq!(result.noise_count(), blobs.len());
}

#[rstest]
#[case::exactly_radius_apart(1.0, 0)]
#[case::just_inside(1.001, 1)]
fn neighbours_exactly_radius_apart_do_not_count(#[case] radius: f32, #[case] clusters: usize) {
    let dataset = line("pair", &[0.0, 1.0]);
    for strategy in [IndexStrategy::BallTree, IndexStrategy::LinearScan] {
        let result = cluster(&dataset, radius, 2, strategy);
        assert_eq!(result.cluster_count(), clusters, "{strategy:?}");
    }
}

#[rstest]
fn cluster_id_of_collapses_noise_and_unvisited_points(blobs: Arc<Dataset<Vec<f32>>>) {
    let mut dbscan = DbscanBuilder::new()
        .with_radius(2.0)
        .with_min_neighbours(4)
        .build(Arc::clone(&blobs), Euclidean)
        .expect("configuration must be valid");
    assert_eq!(dbscan.cluster_id_of(10), None);
    assert!(!dbscan.is_assigned(10));

    dbscan.run().expect("run must succeed");
    assert_eq!(dbscan.cluster_id_of(10), None);
    assert!(dbscan.is_noise(10));
    assert!(!dbscan.is_assigned(10));
    assert!(dbscan.is_assigned(0));
    assert_eq!(dbscan.label_of(10), Some(PointLabel::Noise));
    assert_eq!(dbscan.cluster_id_of(blobs.len()), None);
    assert!(!dbscan.is_noise(blobs.len()));
}

#[rstest]
#[case::ball_tree(IndexStrategy::BallTree)]
#[case::linear(IndexStrategy::LinearScan)]
fn noise_reclaimed_by_a_later_seed_joins_its_cluster(#[case] strategy: IndexStrategy) {
    // Point 0 is scanned first and marked noise, then claimed by the seed at 4.
    let dataset = line("reclaim", &[0.0, 100.0, 100.5, 101.0, 0.9, 1.5]);
    let mut dbscan = DbscanBuilder::new()
        .with_radius(1.0)
        .with_min_neighbours(3)
        .with_index_strategy(strategy)
        .build(dataset, Euclidean)
        .expect("configuration must be valid");
    let result = dbscan.run().expect("run must succeed");

    let first = Some(ClusterId::new(0));
    let second = Some(ClusterId::new(1));
    assert_eq!(
        result.assignments(),
        vec![second, first, first, first, second, second]
    );
    assert!(dbscan.is_assigned(0));
    assert!(!dbscan.is_noise(0));
    assert_eq!(dbscan.label_of(0), Some(PointLabel::Member(ClusterId::new(1))));
}

#[rstest]
fn rerunning_reproduces_the_same_labels(blobs: Arc<Dataset<Vec<f32>>>) {
    let mut dbscan = DbscanBuilder::new()
        .with_radius(2.0)
        .with_min_neighbours(4)
        .build(blobs, Euclidean)
        .expect("configuration must be valid");
    let first = dbscan.run().expect("first run");

    dbscan.set_radius(100.0).expect("radius is valid");
    dbscan.set_min_neighbours(1);
    let widened = dbscan.run().expect("widened run");
    assert_eq!(widened.cluster_count(), 1);

    dbscan.set_radius(2.0).expect("radius is valid");
    dbscan.set_min_neighbours(4);
    let again = dbscan.run().expect("repeated run");
    assert_eq!(again, first);
    assert_eq!(dbscan.result(), first);
}

#[rstest]
#[case::ball_tree(IndexStrategy::BallTree)]
#[case::linear(IndexStrategy::LinearScan)]
fn empty_dataset_completes_without_clusters(#[case] strategy: IndexStrategy) {
    let dataset = Dataset::shared("empty", Vec::<Vec<f32>>::new());
    let result = cluster(&dataset, 1.0, 3, strategy);
    assert_eq!(result.cluster_count(), 0);
    assert!(result.labels().is_empty());
}

#[rstest]
fn closures_cluster_non_vector_points() {
    let dataset = Dataset::shared("integers", vec![1_i32, 2, 3, 40, 41, 42, 100]);
    let mut dbscan = DbscanBuilder::new()
        .with_radius(1.5)
        .with_min_neighbours(2)
        .build(dataset, |a: &i32, b: &i32| a.abs_diff(*b) as f32)
        .expect("configuration must be valid");
    let result = dbscan.run().expect("run must succeed");
    assert_eq!(result.clusters(), vec![vec![0, 1, 2], vec![3, 4, 5]]);
    assert_eq!(result.noise(), [6]);
}

#[rstest]
fn words_cluster_by_edit_distance() {
    let words: Vec<String> = ["cat", "bat", "zebra", "hat", "zebras", "mat", "quixotic"]
        .into_iter()
        .map(str::to_owned)
        .collect();
    let mut dbscan = DbscanBuilder::new()
        .with_radius(1.5)
        .with_min_neighbours(2)
        .build(Dataset::shared("words", words), Levenshtein)
        .expect("configuration must be valid");
    let result = dbscan.run().expect("run must succeed");
    assert_eq!(result.clusters(), vec![vec![0, 1, 3, 5], vec![2, 4]]);
    assert_eq!(result.noise(), [6]);
}

#[rstest]
fn run_records_tracing(blobs: Arc<Dataset<Vec<f32>>>) {
    let mut dbscan = DbscanBuilder::new()
        .with_radius(2.0)
        .with_min_neighbours(4)
        .build(blobs, Euclidean)
        .expect("configuration must be valid");
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());

    tracing::subscriber::with_default(subscriber, || dbscan.run()).expect("run must succeed");

    let run = layer.span("dbscan.run").expect("dbscan.run span must exist");
    assert_eq!(run.field("data_source"), Some("blobs"));
    assert_eq!(run.field("points"), Some("11"));
    assert_eq!(run.field("radius"), Some("2"));
    assert_eq!(run.field("min_neighbours"), Some("4"));

    let prepare = layer
        .span("dbscan.prepare_provider")
        .expect("dbscan.prepare_provider span must exist");
    assert_eq!(prepare.field("provider"), Some("ball_tree"));
    let build = layer
        .span("ball_tree.build")
        .expect("ball_tree.build span must exist");
    assert_eq!(build.field("points"), Some("11"));
    assert_eq!(build.field("leaf_size"), Some("32"));

    let completed = layer.events_with(Level::INFO, "clustering completed");
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].field("clusters"), Some("2"));
    assert_eq!(completed[0].field("noise"), Some("1"));
    assert_eq!(layer.events_with(Level::DEBUG, "cluster discovered").len(), 2);
}

#[rstest]
fn provider_for_another_dataset_is_rebuilt_with_a_warning(blobs: Arc<Dataset<Vec<f32>>>) {
    let other = line("other", &[0.0, 1.0]);
    let mut stale = BallTree::<Vec<f32>, _>::new(Euclidean);
    stale.attach(Arc::clone(&other));
    stale.build().expect("build must succeed");

    let mut dbscan = DbscanBuilder::new()
        .with_radius(2.0)
        .with_min_neighbours(4)
        .with_provider(Box::new(stale))
        .build(Arc::clone(&blobs), Euclidean)
        .expect("configuration must be valid");
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());

    let (first, second) = tracing::subscriber::with_default(subscriber, || {
        (dbscan.run(), dbscan.run())
    });
    assert_eq!(first.expect("first run").cluster_count(), 2);
    assert_eq!(second.expect("second run").cluster_count(), 2);

    let warnings = layer.events_with(
        Level::WARN,
        "provider was built for a different dataset; rebuilding",
    );
    assert_eq!(warnings.len(), 1, "only the first run rebuilds");
    let expected = blobs.id().get().to_string();
    assert_eq!(warnings[0].field("expected"), Some(expected.as_str()));
    assert_eq!(layer.span_count("ball_tree.build"), 1);
}

#[rstest]
fn unattached_provider_is_attached_silently(blobs: Arc<Dataset<Vec<f32>>>) {
    let mut dbscan = DbscanBuilder::new()
        .with_radius(2.0)
        .with_min_neighbours(4)
        .with_provider(Box::new(LinearScan::<Vec<f32>, _>::new(Euclidean)))
        .build(blobs, Euclidean)
        .expect("configuration must be valid");
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());

    tracing::subscriber::with_default(subscriber, || dbscan.run()).expect("run must succeed");
    assert!(layer.events().iter().all(|event| event.level != Level::WARN));
}

/// Provider that builds fine but fails every query.
struct BrokenProvider {
    dataset: Option<DatasetId>,
}

impl RangeQueryProvider<Vec<f32>> for BrokenProvider {
    fn name(&self) -> &str {
        "broken"
    }

    fn dataset_id(&self) -> Option<DatasetId> {
        self.dataset
    }

    fn attach(&mut self, dataset: Arc<Dataset<Vec<f32>>>) {
        self.dataset = Some(dataset.id());
    }

    fn clear(&mut self) {}

    fn is_built(&self) -> bool {
        true
    }

    fn build(&mut self) -> Result<(), QueryError> {
        Ok(())
    }

    fn range_query(&self, _center: &Vec<f32>, _radius: f32) -> Result<Vec<Neighbour>, QueryError> {
        Err(QueryError::NotBuilt)
    }

    fn knn_query(&self, _center: &Vec<f32>, _k: usize) -> Result<Vec<Neighbour>, QueryError> {
        Err(QueryError::NotBuilt)
    }
}

#[rstest]
fn provider_failures_surface_as_query_errors(blobs: Arc<Dataset<Vec<f32>>>) {
    let mut dbscan = DbscanBuilder::new()
        .with_provider(Box::new(BrokenProvider { dataset: None }))
        .build(blobs, Euclidean)
        .expect("configuration must be valid");
    let err = dbscan.run().expect_err("run must fail");
    assert_eq!(err, DbscanError::Query(QueryError::NotBuilt));
    assert_eq!(err.code().as_str(), "DBSCAN_QUERY_FAILURE");
    assert_eq!(err.query_code(), Some(QueryErrorCode::NotBuilt));
    assert_eq!(dbscan.provider_name(), Some("broken"));
}
