//! Gaussian blob generator for dense vector benchmarks.

use std::f32::consts::PI;

use dbscan_core::Dataset;
use rand::{Rng, SeedableRng, rngs::SmallRng};

use super::SyntheticError;

/// Configuration for Gaussian blob synthetic data.
#[derive(Clone, Debug)]
pub struct GaussianBlobConfig {
    /// Number of points to generate.
    pub point_count: usize,
    /// Dimensionality of each vector.
    pub dimensions: usize,
    /// Number of blobs.
    pub cluster_count: usize,
    /// Radius of the circle the blob centres sit on.
    pub separation: f32,
    /// Standard deviation of every blob along every axis.
    pub spread: f32,
    /// RNG seed for reproducibility.
    pub seed: u64,
}

/// Generates isotropic Gaussian blobs.
///
/// Points are dealt to blobs round-robin, so point `i` belongs to blob
/// `i % cluster_count`. Centres are spaced evenly on a circle in the first two
/// axes; any further axes get a small random offset.
///
/// # Errors
/// Returns [`SyntheticError`] when the configuration is invalid.
#[expect(
    clippy::float_arithmetic,
    reason = "Gaussian data generation requires floating-point arithmetic"
)]
pub fn gaussian_blobs(config: &GaussianBlobConfig) -> Result<Dataset<Vec<f32>>, SyntheticError> {
    validate(config)?;

    let centroids = centroids(config, &mut SmallRng::seed_from_u64(config.seed));
    let mut rng = SmallRng::seed_from_u64(config.seed ^ 0xA5A5_A5A5_A5A5_A5A5_u64);
    let mut points = Vec::with_capacity(config.point_count);
    for centroid in centroids.iter().cycle().take(config.point_count) {
        let point = centroid
            .iter()
            .map(|value| Ok(*value + standard_normal_sample(&mut rng)? * config.spread))
            .collect::<Result<Vec<f32>, SyntheticError>>()?;
        points.push(point);
    }
    Ok(Dataset::new("synthetic-gaussian-blobs", points))
}

fn validate(config: &GaussianBlobConfig) -> Result<(), SyntheticError> {
    if config.point_count == 0 {
        return Err(SyntheticError::ZeroPoints);
    }
    if config.dimensions == 0 {
        return Err(SyntheticError::ZeroDimensions);
    }
    if config.cluster_count == 0 {
        return Err(SyntheticError::ZeroClusters);
    }
    if config.cluster_count > config.point_count {
        return Err(SyntheticError::ClusterCountExceedsPointCount {
            cluster_count: config.cluster_count,
            point_count: config.point_count,
        });
    }
    if !config.separation.is_finite() || config.separation <= 0.0 {
        return Err(SyntheticError::InvalidFloatParameter {
            parameter: "separation",
        });
    }
    if !config.spread.is_finite() || config.spread < 0.0 {
        return Err(SyntheticError::InvalidFloatParameter {
            parameter: "spread",
        });
    }
    Ok(())
}

#[expect(
    clippy::cast_precision_loss,
    reason = "centroid placement uses index-derived floating-point angles"
)]
#[expect(
    clippy::float_arithmetic,
    reason = "centroid placement uses trigonometric expressions"
)]
fn centroids(config: &GaussianBlobConfig, rng: &mut SmallRng) -> Vec<Vec<f32>> {
    (0..config.cluster_count)
        .map(|cluster_index| {
            let angle = (cluster_index as f32 / config.cluster_count as f32) * (2.0 * PI);
            let mut centroid = vec![0.0_f32; config.dimensions];
            if let Some(value) = centroid.get_mut(0) {
                *value = config.separation * angle.cos();
            }
            if let Some(value) = centroid.get_mut(1) {
                *value = config.separation * angle.sin();
            }
            for value in centroid.iter_mut().skip(2) {
                *value = rng.gen_range((-0.2 * config.separation)..(0.2 * config.separation));
            }
            centroid
        })
        .collect()
}

/// Box-Muller sample from the standard normal distribution.
#[expect(
    clippy::float_arithmetic,
    reason = "Box-Muller transform requires floating-point arithmetic"
)]
fn standard_normal_sample(rng: &mut SmallRng) -> Result<f32, SyntheticError> {
    let u1 = rng.gen_range(0.0_f32..1.0_f32).max(f32::EPSILON);
    let u2 = rng.gen_range(0.0_f32..1.0_f32);
    let sample = (-2.0_f32 * u1.ln()).sqrt() * (2.0_f32 * PI * u2).cos();
    if sample.is_finite() {
        Ok(sample)
    } else {
        Err(SyntheticError::InvalidFloatParameter {
            parameter: "standard_normal_sample",
        })
    }
}
