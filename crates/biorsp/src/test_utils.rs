//! Synthetic point sets for unit tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::TAU;

/// Points at the given angles on a circle of `radius` around `center`.
pub(crate) fn points_at_angles(angles: &[f64], radius: f64, center: [f64; 2]) -> Vec<[f64; 2]> {
    angles
        .iter()
        .map(|&a| [center[0] + radius * a.cos(), center[1] + radius * a.sin()])
        .collect()
}

/// `n` points evenly spaced in angle, starting at angle 0.
pub(crate) fn uniform_ring(n: usize, radius: f64, center: [f64; 2]) -> Vec<[f64; 2]> {
    let angles: Vec<f64> = (0..n).map(|i| i as f64 * TAU / n as f64).collect();
    points_at_angles(&angles, radius, center)
}

/// `n` points drawn uniformly from the square `[-half, half]²`.
pub(crate) fn random_cloud(n: usize, half: f64, seed: u64) -> Vec<[f64; 2]> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| [rng.gen_range(-half..half), rng.gen_range(-half..half)])
        .collect()
}
