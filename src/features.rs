//! Feature vector type for iris measurements
//!
//! The four measurements arrive in a fixed order and each must lie in the
//! open interval (0, 10). The vector doubles as cache-key material, so the
//! canonical encoding has to be injective over the whole domain.

use serde::{Deserialize, Serialize};

use crate::error::{IrisError, Result};

/// Lower and upper bound for every measurement (exclusive on both ends)
pub const FEATURE_MIN: f64 = 0.0;
pub const FEATURE_MAX: f64 = 10.0;

/// Column names, in canonical order, shared by the window log and the
/// drift reference dataset.
pub const FEATURE_NAMES: [&str; 4] = [
    "sepal_length",
    "sepal_width",
    "petal_length",
    "petal_width",
];

/// Validated iris measurement vector, immutable once constructed
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector {
    sepal_length: f64,
    sepal_width: f64,
    petal_length: f64,
    petal_width: f64,
}

/// Wire shape of a feature vector, with the defaults the original API
/// advertised. Validation happens in the `TryFrom` conversion.
#[derive(Debug, Clone, Deserialize)]
pub struct RawFeatures {
    #[serde(default = "default_sepal_length")]
    pub sepal_length: f64,
    #[serde(default = "default_sepal_width")]
    pub sepal_width: f64,
    #[serde(default = "default_petal_length")]
    pub petal_length: f64,
    #[serde(default = "default_petal_width")]
    pub petal_width: f64,
}

fn default_sepal_length() -> f64 {
    1.1
}

fn default_sepal_width() -> f64 {
    3.1
}

fn default_petal_length() -> f64 {
    2.1
}

fn default_petal_width() -> f64 {
    4.1
}

impl FeatureVector {
    /// Construct a vector, validating each field against the open bounds
    pub fn new(
        sepal_length: f64,
        sepal_width: f64,
        petal_length: f64,
        petal_width: f64,
    ) -> Result<Self> {
        let values = [sepal_length, sepal_width, petal_length, petal_width];
        for (name, value) in FEATURE_NAMES.iter().zip(values.iter()) {
            if !value.is_finite() || *value <= FEATURE_MIN || *value >= FEATURE_MAX {
                return Err(IrisError::Validation(format!(
                    "{} must be in range ({}, {}), got {}",
                    name, FEATURE_MIN, FEATURE_MAX, value
                )));
            }
        }

        Ok(Self {
            sepal_length,
            sepal_width,
            petal_length,
            petal_width,
        })
    }

    /// Fields in canonical order, for model input and window logging
    pub fn as_array(&self) -> [f64; 4] {
        [
            self.sepal_length,
            self.sepal_width,
            self.petal_length,
            self.petal_width,
        ]
    }

    /// Canonical key encoding: bit patterns in field order. Injective over
    /// the validated domain (no NaN, single zero representation).
    pub fn key_bits(&self) -> [u64; 4] {
        self.as_array().map(f64::to_bits)
    }
}

impl TryFrom<RawFeatures> for FeatureVector {
    type Error = IrisError;

    fn try_from(raw: RawFeatures) -> Result<Self> {
        Self::new(
            raw.sepal_length,
            raw.sepal_width,
            raw.petal_length,
            raw.petal_width,
        )
    }
}
