//! Model registry
//!
//! Owns the loaded predictors for the process lifetime. Slots are filled
//! once at startup from configured paths and released at shutdown.

mod model;

pub use model::{DecisionTree, LoadedModel};

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{IrisError, Result};
use crate::features::FeatureVector;

/// Closed set of servable model identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelName {
    LogisticModel,
    RfModel,
}

impl ModelName {
    /// All identifiers the API can ever accept
    pub fn all() -> [ModelName; 2] {
        [ModelName::LogisticModel, ModelName::RfModel]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelName::LogisticModel => "logistic_model",
            ModelName::RfModel => "rf_model",
        }
    }
}

impl fmt::Display for ModelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelName {
    type Err = IrisError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "logistic_model" => Ok(ModelName::LogisticModel),
            "rf_model" => Ok(ModelName::RfModel),
            other => Err(IrisError::ModelNotFound(other.to_string())),
        }
    }
}

/// Registry of loaded predictors, keyed by model name
#[derive(Debug)]
pub struct ModelRegistry {
    models: RwLock<HashMap<ModelName, LoadedModel>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self {
            models: RwLock::new(HashMap::new()),
        }
    }

    /// Load a predictor into a slot from a JSON parameter file.
    ///
    /// An unreadable or corrupt file is an error for this slot; callers
    /// decide whether that is fatal. Absent paths are handled upstream by
    /// simply not calling `load`.
    pub fn load(&self, name: ModelName, path: &Path) -> Result<()> {
        let data = std::fs::read_to_string(path).map_err(|e| IrisError::ModelLoad {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let model: LoadedModel =
            serde_json::from_str(&data).map_err(|e| IrisError::ModelLoad {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        info!(model = %name, path = %path.display(), "Loaded model");
        self.models.write().insert(name, model);
        Ok(())
    }

    /// Install an already-built predictor (used by tests and fixtures)
    pub fn insert(&self, name: ModelName, model: LoadedModel) {
        self.models.write().insert(name, model);
    }

    /// Names with a loaded predictor behind them
    pub fn names(&self) -> Vec<ModelName> {
        let models = self.models.read();
        ModelName::all()
            .into_iter()
            .filter(|n| models.contains_key(n))
            .collect()
    }

    /// Predict a class label. Fails with `ModelNotFound` when the slot for
    /// `name` was never filled.
    pub fn predict(&self, name: ModelName, features: &FeatureVector) -> Result<i64> {
        let models = self.models.read();
        let model = models
            .get(&name)
            .ok_or_else(|| IrisError::ModelNotFound(name.to_string()))?;
        Ok(model.predict(features))
    }

    /// Release all handles. Called once at shutdown.
    pub fn clear(&self) {
        self.models.write().clear();
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}
