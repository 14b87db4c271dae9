//! Fixtures shared by the `dbscan-core` integration tests.

#![expect(dead_code, reason = "each test binary uses a different subset")]

use std::sync::Arc;

use dbscan_core::{ClusteringResult, Dataset, DbscanBuilder, Euclidean, IndexStrategy};
use dbscan_test_support::ci::property_test_profile::ProptestRunProfile;
use proptest::{prelude::*, test_runner::Config as ProptestConfig};
use test_strategy::Arbitrary;

/// Proptest configuration honouring `PROGTEST_CASES` and `DBSCAN_PBT_FORK`.
pub fn proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// Points on a line, one dimension each.
pub fn line(name: &str, xs: &[f32]) -> Arc<Dataset<Vec<f32>>> {
    Dataset::shared(name, xs.iter().map(|&x| vec![x]).collect())
}

/// Runs Euclidean DBSCAN with the given index strategy.
pub fn cluster(
    dataset: &Arc<Dataset<Vec<f32>>>,
    radius: f32,
    min_neighbours: usize,
    strategy: IndexStrategy,
) -> ClusteringResult {
    DbscanBuilder::new()
        .with_radius(radius)
        .with_min_neighbours(min_neighbours)
        .with_index_strategy(strategy)
        .build(Arc::clone(dataset), Euclidean)
        .expect("configuration must be valid")
        .run()
        .expect("run must succeed")
}

/// Shape of a generated point cloud.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Arbitrary)]
pub enum Layout {
    /// Points spread uniformly over a square.
    #[weight(3)]
    Uniform,
    /// Points gathered around a few centres.
    #[weight(3)]
    Blobs,
    /// Points on an integer lattice, producing many exact boundary distances.
    #[weight(2)]
    Lattice,
    /// Few distinct positions, each repeated.
    #[weight(1)]
    Duplicates,
}

/// Generated dataset plus the parameters to cluster it with.
#[derive(Clone, Debug)]
pub struct Scenario {
    pub layout: Layout,
    pub points: Vec<Vec<f32>>,
    pub radius: f32,
    pub min_neighbours: usize,
}

impl Scenario {
    pub fn dataset(&self) -> Arc<Dataset<Vec<f32>>> {
        Dataset::shared(format!("{:?}", self.layout), self.points.clone())
    }
}

fn coordinate() -> impl Strategy<Value = f32> {
    (-400_i16..400).prop_map(|value| f32::from(value) / 20.0)
}

fn points_for(layout: Layout) -> BoxedStrategy<Vec<Vec<f32>>> {
    match layout {
        Layout::Uniform => prop::collection::vec(prop::collection::vec(coordinate(), 2), 0..80)
            .boxed(),
        Layout::Blobs => (
            prop::collection::vec(prop::collection::vec(coordinate(), 2), 1..4),
            prop::collection::vec(
                (any::<prop::sample::Index>(), prop::collection::vec(-1.0_f32..1.0, 2)),
                1..80,
            ),
        )
            .prop_map(|(centres, members)| {
                members
                    .into_iter()
                    .map(|(index, offset)| {
                        let centre = index.get(&centres);
                        centre.iter().zip(offset).map(|(c, o)| c + o).collect()
                    })
                    .collect()
            })
            .boxed(),
        Layout::Lattice => prop::collection::vec(prop::collection::vec(-6_i8..6, 2), 0..80)
            .prop_map(|rows| {
                rows.into_iter()
                    .map(|row| row.into_iter().map(f32::from).collect())
                    .collect()
            })
            .boxed(),
        Layout::Duplicates => (
            prop::collection::vec(prop::collection::vec(coordinate(), 2), 1..5),
            prop::collection::vec(any::<prop::sample::Index>(), 1..60),
        )
            .prop_map(|(distinct, picks)| {
                picks
                    .into_iter()
                    .map(|index| index.get(&distinct).clone())
                    .collect()
            })
            .boxed(),
    }
}

/// Strategy producing clustering scenarios across every [`Layout`].
pub fn scenario() -> impl Strategy<Value = Scenario> {
    any::<Layout>().prop_flat_map(|layout| {
        (
            points_for(layout),
            prop_oneof![Just(1.0_f32), Just(1.5), Just(2.0), 0.1_f32..4.0],
            0_usize..7,
        )
            .prop_map(move |(points, radius, min_neighbours)| Scenario {
                layout,
                points,
                radius,
                min_neighbours,
            })
    })
}
