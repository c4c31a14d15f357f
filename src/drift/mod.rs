//! Drift monitoring
//!
//! Compares the reference feature distribution against the sliding-window
//! sample of recently served predictions and emits a report artifact.

mod reference;
mod reporter;
mod stats;

pub use reference::{ReferenceDataset, REFERENCE_SEED};
pub use reporter::{ColumnDrift, DriftReport, DriftReporter, MonitoringOutcome};
pub use stats::{DriftResult, KolmogorovSmirnovTest, PopulationStabilityIndex};

use ndarray::Array1;

use crate::error::Result;

/// Two-sample drift detector over a single column
pub trait DriftDetector: Send + Sync {
    /// Compare the reference column against the current column
    fn detect(&self, reference: &Array1<f64>, current: &Array1<f64>) -> Result<DriftResult>;
}
