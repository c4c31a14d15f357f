//! Loaded predictor parameter sets
//!
//! Predictors are deserialized from JSON parameter files and evaluated as
//! pure functions of the input features. Two families are supported,
//! mirroring the two models the serving API exposes: multinomial logistic
//! regression and a small random forest.

use serde::{Deserialize, Serialize};

use crate::features::FeatureVector;

/// A binary decision tree over the four feature columns
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum DecisionTree {
    Leaf {
        class: i64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<DecisionTree>,
        right: Box<DecisionTree>,
    },
}

impl DecisionTree {
    fn predict(&self, x: &[f64; 4]) -> i64 {
        match self {
            DecisionTree::Leaf { class } => *class,
            DecisionTree::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                // Out-of-range feature indices fall through to the left child
                let value = x.get(*feature).copied().unwrap_or(f64::NEG_INFINITY);
                if value < *threshold {
                    left.predict(x)
                } else {
                    right.predict(x)
                }
            }
        }
    }
}

/// Predictor parameters, tagged by model family
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LoadedModel {
    Logistic {
        /// One weight row per class, in feature order
        coefficients: Vec<[f64; 4]>,
        intercepts: Vec<f64>,
        classes: Vec<i64>,
    },
    RandomForest {
        trees: Vec<DecisionTree>,
        classes: Vec<i64>,
    },
}

impl LoadedModel {
    /// Predict a class label. Pure function of (parameters, features).
    pub fn predict(&self, features: &FeatureVector) -> i64 {
        let x = features.as_array();
        match self {
            LoadedModel::Logistic {
                coefficients,
                intercepts,
                classes,
            } => {
                let mut best = (0usize, f64::NEG_INFINITY);
                for (i, (w, b)) in coefficients.iter().zip(intercepts.iter()).enumerate() {
                    let score: f64 = w.iter().zip(x.iter()).map(|(wi, xi)| wi * xi).sum::<f64>() + b;
                    if score > best.1 {
                        best = (i, score);
                    }
                }
                classes.get(best.0).copied().unwrap_or(0)
            }
            LoadedModel::RandomForest { trees, classes } => {
                let mut votes = vec![0usize; classes.len().max(1)];
                for tree in trees {
                    let label = tree.predict(&x);
                    if let Some(idx) = classes.iter().position(|&c| c == label) {
                        votes[idx] += 1;
                    }
                }
                let winner = votes
                    .iter()
                    .enumerate()
                    .max_by_key(|(_, &v)| v)
                    .map(|(i, _)| i)
                    .unwrap_or(0);
                classes.get(winner).copied().unwrap_or(0)
            }
        }
    }

    /// Demo logistic parameters, roughly the fit the original course lab
    /// produced on the iris training split.
    pub fn demo_logistic() -> Self {
        LoadedModel::Logistic {
            coefficients: vec![
                [-0.42, 0.97, -2.52, -1.08],
                [0.53, -0.32, -0.21, -0.94],
                [-0.11, -0.65, 2.73, 2.02],
            ],
            intercepts: vec![9.85, 2.22, -12.07],
            classes: vec![0, 1, 2],
        }
    }

    /// Demo forest: three shallow trees over the petal measurements
    pub fn demo_forest() -> Self {
        fn leaf(class: i64) -> Box<DecisionTree> {
            Box::new(DecisionTree::Leaf { class })
        }
        fn split(feature: usize, threshold: f64, left: Box<DecisionTree>, right: Box<DecisionTree>) -> Box<DecisionTree> {
            Box::new(DecisionTree::Split {
                feature,
                threshold,
                left,
                right,
            })
        }

        LoadedModel::RandomForest {
            trees: vec![
                *split(2, 2.45, leaf(0), split(3, 1.75, leaf(1), leaf(2))),
                *split(3, 0.8, leaf(0), split(2, 4.95, leaf(1), leaf(2))),
                *split(2, 2.6, leaf(0), split(3, 1.65, leaf(1), leaf(2))),
            ],
            classes: vec![0, 1, 2],
        }
    }
}
