//! Application state management

use std::sync::Arc;

use tracing::info;

use crate::background::TaskQueue;
use crate::cache::{CacheStatus, PredictionCache};
use crate::config::AppConfig;
use crate::drift::DriftReporter;
use crate::error::Result;
use crate::features::FeatureVector;
use crate::registry::{ModelName, ModelRegistry};
use crate::window::{WindowEntry, WindowLog};

/// Process-wide state shared across handlers.
///
/// Constructed once at startup, torn down once at shutdown; handlers only
/// ever see it behind an `Arc`, so tests get a fresh state per case instead
/// of sharing module-level globals.
#[derive(Debug)]
pub struct AppState {
    pub config: AppConfig,
    pub registry: ModelRegistry,
    pub cache: PredictionCache,
    pub window: Arc<WindowLog>,
    pub tasks: TaskQueue<WindowEntry>,
    pub reporter: DriftReporter,
}

impl AppState {
    /// Wire up the serving core and fill the model slots.
    ///
    /// An unset model path leaves its slot empty; an unreadable or corrupt
    /// file fails startup. Must run inside a tokio runtime (the background
    /// worker is spawned here).
    pub fn new(config: AppConfig) -> Result<Self> {
        let registry = ModelRegistry::new();
        if let Some(ref path) = config.logistic_model {
            registry.load(ModelName::LogisticModel, path)?;
        }
        if let Some(ref path) = config.rf_model {
            registry.load(ModelName::RfModel, path)?;
        }

        let window = Arc::new(WindowLog::new());
        let worker_window = Arc::clone(&window);
        let tasks = TaskQueue::spawn(move |entry: WindowEntry| {
            worker_window.append(entry);
            Ok(())
        });

        let reporter = DriftReporter::new(config.window_size, config.report_path.clone());

        Ok(Self {
            cache: PredictionCache::new(config.cache_ttl),
            registry,
            window,
            tasks,
            reporter,
            config,
        })
    }

    /// Serve a prediction through the cache; registry dispatch is the
    /// compute step on a miss.
    pub fn predict(
        &self,
        model: ModelName,
        features: &FeatureVector,
    ) -> Result<(i64, CacheStatus)> {
        self.cache
            .get_or_compute(model, features, || self.registry.predict(model, features))
    }

    /// Drain in-flight background work, then release the model handles.
    pub async fn shutdown(&self) {
        self.tasks.shutdown().await;
        self.registry.clear();
        info!(
            logged = self.window.len(),
            "Serving state torn down"
        );
    }
}
