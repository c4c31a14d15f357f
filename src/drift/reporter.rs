//! Drift report assembly
//!
//! Builds two tabular datasets with identical column schema (the four
//! feature columns plus `species`), hands each column pair to the
//! statistical tests, and persists the resulting artifact to a well-known
//! path, overwriting the previous report.

use std::path::{Path, PathBuf};

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::drift::reference::ReferenceDataset;
use crate::drift::stats::{DriftResult, KolmogorovSmirnovTest, PopulationStabilityIndex};
use crate::drift::DriftDetector;
use crate::error::{IrisError, Result};
use crate::features::FEATURE_NAMES;
use crate::window::{WindowEntry, WindowLog};

/// Outcome of a monitoring trigger
#[derive(Debug)]
pub enum MonitoringOutcome {
    /// Nothing has been logged yet; no comparison was attempted
    NoData,
    /// Report generated and persisted
    Generated {
        path: PathBuf,
        report: DriftReport,
    },
}

/// Drift verdict for one column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDrift {
    pub name: String,
    /// Both tests must agree before a column is flagged
    pub drift_detected: bool,
    pub ks: DriftResult,
    pub psi: DriftResult,
}

/// Persisted report artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriftReport {
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub reference_size: usize,
    pub current_size: usize,
    pub window_size: usize,
    pub columns: Vec<ColumnDrift>,
    pub n_drifted: usize,
    pub overall_drift: bool,
}

/// On-demand drift reporter over the sliding-window sample
#[derive(Debug)]
pub struct DriftReporter {
    window_size: usize,
    report_path: PathBuf,
    ks: KolmogorovSmirnovTest,
    psi: PopulationStabilityIndex,
}

impl DriftReporter {
    pub fn new(window_size: usize, report_path: impl Into<PathBuf>) -> Self {
        Self {
            window_size,
            report_path: report_path.into(),
            ks: KolmogorovSmirnovTest::default(),
            psi: PopulationStabilityIndex::default(),
        }
    }

    pub fn report_path(&self) -> &Path {
        &self.report_path
    }

    /// Generate a report from the log's current window sample.
    ///
    /// An empty log is a distinct outcome, not an error: the tests are never
    /// invoked and nothing is written.
    pub fn generate(&self, window: &WindowLog) -> Result<MonitoringOutcome> {
        if window.is_empty() {
            return Ok(MonitoringOutcome::NoData);
        }

        let sample = window.sample(self.window_size);
        let (current_features, current_labels) = assemble_current(&sample);
        let reference = ReferenceDataset::generate();

        let mut columns = Vec::with_capacity(FEATURE_NAMES.len() + 1);
        for (idx, name) in FEATURE_NAMES.iter().enumerate() {
            let ref_col = reference.features.column(idx).to_owned();
            let cur_col = current_features.column(idx).to_owned();
            columns.push(self.compare_column(name, &ref_col, &cur_col)?);
        }

        // The species column of the current sample holds model predictions,
        // while the reference holds true labels.
        let ref_labels: Array1<f64> = reference.labels.mapv(|l| l as f64);
        let cur_labels: Array1<f64> = current_labels.mapv(|l| l as f64);
        columns.push(self.compare_column("species", &ref_labels, &cur_labels)?);

        let n_drifted = columns.iter().filter(|c| c.drift_detected).count();
        let report = DriftReport {
            generated_at: chrono::Utc::now(),
            reference_size: reference.len(),
            current_size: sample.len(),
            window_size: self.window_size,
            n_drifted,
            overall_drift: n_drifted > 0,
            columns,
        };

        self.persist(&report)?;
        info!(
            path = %self.report_path.display(),
            current_size = report.current_size,
            n_drifted = report.n_drifted,
            "Drift report generated"
        );

        Ok(MonitoringOutcome::Generated {
            path: self.report_path.clone(),
            report,
        })
    }

    fn compare_column(
        &self,
        name: &str,
        reference: &Array1<f64>,
        current: &Array1<f64>,
    ) -> Result<ColumnDrift> {
        let ks = self
            .ks
            .detect(reference, current)
            .map_err(|e| IrisError::ReportGeneration(format!("KS test on {}: {}", name, e)))?;
        let psi = self
            .psi
            .detect(reference, current)
            .map_err(|e| IrisError::ReportGeneration(format!("PSI on {}: {}", name, e)))?;

        Ok(ColumnDrift {
            name: name.to_string(),
            drift_detected: ks.drift_detected && psi.drift_detected,
            ks,
            psi,
        })
    }

    fn persist(&self, report: &DriftReport) -> Result<()> {
        let json = serde_json::to_vec_pretty(report)
            .map_err(|e| IrisError::ReportGeneration(e.to_string()))?;
        std::fs::write(&self.report_path, json).map_err(|e| {
            IrisError::ReportGeneration(format!(
                "writing {}: {}",
                self.report_path.display(),
                e
            ))
        })
    }
}

/// Split window entries into a feature matrix and a predicted-label column,
/// in the same column order as the reference.
fn assemble_current(sample: &[WindowEntry]) -> (Array2<f64>, Array1<i64>) {
    let mut data = Vec::with_capacity(sample.len() * FEATURE_NAMES.len());
    let mut labels = Vec::with_capacity(sample.len());
    for entry in sample {
        data.extend_from_slice(&entry.features.as_array());
        labels.push(entry.prediction);
    }

    let features = Array2::from_shape_vec((sample.len(), FEATURE_NAMES.len()), data)
        .expect("row-major window data matches its declared shape");
    (features, Array1::from_vec(labels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureVector;

    fn reporter(dir: &tempfile::TempDir, window_size: usize) -> DriftReporter {
        DriftReporter::new(window_size, dir.path().join("drift_report.json"))
    }

    fn log_from_reference(n: usize) -> WindowLog {
        // Entries drawn directly from the reference sample, round-robin
        // across the species blocks so the sample stays balanced and no
        // drift is present by construction
        let reference = ReferenceDataset::generate();
        let log = WindowLog::new();
        for i in 0..n {
            let idx = (i % 3) * 50 + i / 3;
            let row = reference.features.row(idx);
            log.append(WindowEntry {
                features: FeatureVector::new(row[0], row[1], row[2], row[3]).unwrap(),
                prediction: reference.labels[idx],
            });
        }
        log
    }

    #[test]
    fn test_empty_log_is_no_data() {
        let dir = tempfile::tempdir().unwrap();
        let reporter = reporter(&dir, 45);

        let outcome = reporter.generate(&WindowLog::new()).unwrap();
        assert!(matches!(outcome, MonitoringOutcome::NoData));
        assert!(!reporter.report_path().exists());
    }

    #[test]
    fn test_report_written_and_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let reporter = reporter(&dir, 45);
        let log = log_from_reference(10);

        let outcome = reporter.generate(&log).unwrap();
        let MonitoringOutcome::Generated { path, report } = outcome else {
            panic!("expected a generated report");
        };
        assert!(path.exists());
        assert_eq!(report.current_size, 10);
        assert_eq!(report.reference_size, 150);
        assert_eq!(report.columns.len(), 5);

        // Second generation overwrites the same artifact path
        let outcome = reporter.generate(&log).unwrap();
        assert!(matches!(outcome, MonitoringOutcome::Generated { .. }));

        let persisted: DriftReport =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(persisted.current_size, 10);
    }

    #[test]
    fn test_no_drift_on_reference_like_sample() {
        let dir = tempfile::tempdir().unwrap();
        let reporter = reporter(&dir, 45);
        let log = log_from_reference(45);

        let MonitoringOutcome::Generated { report, .. } =
            reporter.generate(&log).unwrap()
        else {
            panic!("expected a generated report");
        };
        assert!(!report.overall_drift);
        assert_eq!(report.n_drifted, 0);
    }

    #[test]
    fn test_drift_on_shifted_sample() {
        let dir = tempfile::tempdir().unwrap();
        let reporter = reporter(&dir, 45);

        // Every measurement pinned near the top of the domain
        let log = WindowLog::new();
        for _ in 0..45 {
            log.append(WindowEntry {
                features: FeatureVector::new(9.8, 9.8, 9.8, 9.8).unwrap(),
                prediction: 2,
            });
        }

        let MonitoringOutcome::Generated { report, .. } =
            reporter.generate(&log).unwrap()
        else {
            panic!("expected a generated report");
        };
        assert!(report.overall_drift);
        assert!(report.n_drifted >= 4);
    }

    #[test]
    fn test_sample_limited_to_window_size() {
        let dir = tempfile::tempdir().unwrap();
        let reporter = reporter(&dir, 3);
        let log = log_from_reference(10);

        let MonitoringOutcome::Generated { report, .. } =
            reporter.generate(&log).unwrap()
        else {
            panic!("expected a generated report");
        };
        assert_eq!(report.current_size, 3);
    }

    #[test]
    fn test_unwritable_path_is_report_error() {
        let reporter = DriftReporter::new(45, "/nonexistent-dir/report.json");
        let log = log_from_reference(5);

        let err = reporter.generate(&log).unwrap_err();
        assert!(matches!(err, IrisError::ReportGeneration(_)));
    }
}
