//! Reference dataset for drift comparison
//!
//! Regenerated from scratch on every report from per-species summary
//! statistics of the iris training data, using a fixed-seed RNG so repeated
//! drift checks always compare against the same distribution.

use ndarray::{Array1, Array2};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use crate::features::{FEATURE_MAX, FEATURE_MIN, FEATURE_NAMES};

/// Fixed seed; changing it changes every future report's baseline
pub const REFERENCE_SEED: u64 = 42;

/// Rows generated per species
const ROWS_PER_SPECIES: usize = 50;

/// Per-species feature means and standard deviations (sepal length/width,
/// petal length/width), taken from the iris training data.
const SPECIES_STATS: [([f64; 4], [f64; 4]); 3] = [
    ([5.006, 3.428, 1.462, 0.246], [0.352, 0.379, 0.174, 0.105]),
    ([5.936, 2.770, 4.260, 1.326], [0.516, 0.314, 0.470, 0.198]),
    ([6.588, 2.974, 5.552, 2.026], [0.636, 0.322, 0.555, 0.275]),
];

/// Reference sample with true species labels
#[derive(Debug, Clone)]
pub struct ReferenceDataset {
    /// Feature matrix, one column per entry of `FEATURE_NAMES`
    pub features: Array2<f64>,
    /// True species labels
    pub labels: Array1<i64>,
}

impl ReferenceDataset {
    /// Regenerate the canonical reference sample
    pub fn generate() -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(REFERENCE_SEED);
        let n_rows = ROWS_PER_SPECIES * SPECIES_STATS.len();

        let mut data = Vec::with_capacity(n_rows * FEATURE_NAMES.len());
        let mut labels = Vec::with_capacity(n_rows);

        for (species, (means, stds)) in SPECIES_STATS.iter().enumerate() {
            for _ in 0..ROWS_PER_SPECIES {
                for (mean, std) in means.iter().zip(stds.iter()) {
                    let value = match Normal::new(*mean, *std) {
                        Ok(dist) => dist.sample(&mut rng),
                        Err(_) => *mean,
                    };
                    // Keep samples inside the feature domain
                    data.push(value.clamp(FEATURE_MIN + 0.1, FEATURE_MAX - 0.1));
                }
                labels.push(species as i64);
            }
        }

        let features = Array2::from_shape_vec((n_rows, FEATURE_NAMES.len()), data)
            .expect("row-major reference data matches its declared shape");

        Self {
            features,
            labels: Array1::from_vec(labels),
        }
    }

    pub fn len(&self) -> usize {
        self.features.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
