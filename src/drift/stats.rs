//! Statistical drift tests
//!
//! Two-sample tests over single columns: a Kolmogorov-Smirnov test and the
//! Population Stability Index. Both tolerate current samples smaller than
//! the reference; only empty input is rejected.

use std::cmp::Ordering;

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::drift::DriftDetector;
use crate::error::{IrisError, Result};

/// Outcome of a single two-sample test
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriftResult {
    pub drift_detected: bool,
    /// Test statistic (KS distance or PSI value)
    pub score: f64,
    pub threshold: f64,
}

impl DriftResult {
    fn new(score: f64, threshold: f64) -> Self {
        Self {
            drift_detected: score > threshold,
            score,
            threshold,
        }
    }
}

fn sorted(values: &Array1<f64>) -> Vec<f64> {
    let mut v: Vec<f64> = values.iter().copied().collect();
    v.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    v
}

/// Two-sample Kolmogorov-Smirnov test
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KolmogorovSmirnovTest {
    alpha: f64,
}

impl KolmogorovSmirnovTest {
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha: alpha.clamp(0.001, 0.5),
        }
    }

    /// Approximate two-sample critical value for the configured alpha
    fn critical_value(&self, n1: usize, n2: usize) -> f64 {
        let c_alpha = match self.alpha {
            a if a <= 0.01 => 1.63,
            a if a <= 0.05 => 1.36,
            a if a <= 0.10 => 1.22,
            _ => 1.07,
        };
        c_alpha * ((n1 + n2) as f64 / (n1 * n2) as f64).sqrt()
    }

    fn ecdf(sorted_data: &[f64], x: f64) -> f64 {
        let count = sorted_data.iter().filter(|&&v| v <= x).count();
        count as f64 / sorted_data.len() as f64
    }
}

impl Default for KolmogorovSmirnovTest {
    fn default() -> Self {
        Self::new(0.05)
    }
}

impl DriftDetector for KolmogorovSmirnovTest {
    fn detect(&self, reference: &Array1<f64>, current: &Array1<f64>) -> Result<DriftResult> {
        if reference.is_empty() || current.is_empty() {
            return Err(IrisError::Validation(
                "Empty column passed to KS test".to_string(),
            ));
        }

        let ref_sorted = sorted(reference);
        let cur_sorted = sorted(current);

        // Maximum ECDF distance over the pooled support
        let mut pooled: Vec<f64> = ref_sorted.iter().chain(cur_sorted.iter()).copied().collect();
        pooled.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        pooled.dedup();

        let statistic = pooled
            .iter()
            .map(|&x| (Self::ecdf(&ref_sorted, x) - Self::ecdf(&cur_sorted, x)).abs())
            .fold(0.0, f64::max);

        let threshold = self.critical_value(reference.len(), current.len());
        Ok(DriftResult::new(statistic, threshold))
    }
}

/// Population Stability Index over reference-derived quantile bins
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationStabilityIndex {
    n_bins: usize,
    threshold: f64,
}

impl PopulationStabilityIndex {
    pub fn new(n_bins: usize) -> Self {
        Self {
            n_bins: n_bins.max(5),
            // The conventional "significant shift" cutoff
            threshold: 0.2,
        }
    }

    fn bin_edges(&self, reference: &[f64]) -> Vec<f64> {
        let mut sorted = reference.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

        let mut edges = Vec::with_capacity(self.n_bins + 1);
        edges.push(f64::NEG_INFINITY);
        for i in 1..self.n_bins {
            let idx = (i * sorted.len()) / self.n_bins;
            edges.push(sorted[idx]);
        }
        edges.push(f64::INFINITY);
        edges
    }

    fn proportions(&self, data: &[f64], edges: &[f64]) -> Vec<f64> {
        let n = data.len() as f64;
        let mut counts = vec![0usize; self.n_bins];
        for &value in data {
            for i in 0..self.n_bins {
                if value > edges[i] && value <= edges[i + 1] {
                    counts[i] += 1;
                    break;
                }
            }
        }
        // Floor at a small epsilon so the log term stays finite
        counts
            .iter()
            .map(|&c| (c as f64 / n).max(0.0001))
            .collect()
    }
}

impl Default for PopulationStabilityIndex {
    fn default() -> Self {
        Self::new(10)
    }
}

impl DriftDetector for PopulationStabilityIndex {
    fn detect(&self, reference: &Array1<f64>, current: &Array1<f64>) -> Result<DriftResult> {
        if reference.is_empty() || current.is_empty() {
            return Err(IrisError::Validation(
                "Empty column passed to PSI".to_string(),
            ));
        }

        let ref_vec: Vec<f64> = reference.iter().copied().collect();
        let cur_vec: Vec<f64> = current.iter().copied().collect();

        let edges = self.bin_edges(&ref_vec);
        let ref_props = self.proportions(&ref_vec, &edges);
        let cur_props = self.proportions(&cur_vec, &edges);

        let psi: f64 = ref_props
            .iter()
            .zip(cur_props.iter())
            .map(|(&p_ref, &p_cur)| (p_cur - p_ref) * (p_cur / p_ref).ln())
            .sum();

        Ok(DriftResult::new(psi, self.threshold))
    }
}
