//! Application configuration
//!
//! Every knob the serving core depends on (TTL, window size, model paths,
//! report path) is injectable here; `from_env` only fills the struct from
//! the environment, so tests construct it directly with short TTLs and
//! temp paths.

use std::path::PathBuf;
use std::time::Duration;

/// Serving configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Prediction-cache entry lifetime
    pub cache_ttl: Duration,
    /// Number of recent log entries fed to drift reporting
    pub window_size: usize,
    /// Parameter file for the logistic model; absence leaves the slot empty
    pub logistic_model: Option<PathBuf>,
    /// Parameter file for the random-forest model; absence leaves the slot empty
    pub rf_model: Option<PathBuf>,
    /// Where the drift report artifact is written (overwritten per report)
    pub report_path: PathBuf,
    /// Optional API key; when set, predict routes require an X-API-Key header
    pub api_key: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cache_ttl: Duration::from_secs(30),
            window_size: 45,
            logistic_model: None,
            rf_model: None,
            report_path: PathBuf::from("drift_report.json"),
            api_key: None,
        }
    }
}

impl AppConfig {
    /// Build the configuration from environment variables, falling back to
    /// the defaults above. `.env` loading is the caller's concern.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("API_HOST").unwrap_or(defaults.host),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            cache_ttl: std::env::var("CACHE_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.cache_ttl),
            window_size: std::env::var("DATA_WINDOW_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.window_size),
            logistic_model: env_path("LOGISTIC_MODEL"),
            rf_model: env_path("RF_MODEL"),
            report_path: env_path("REPORT_PATH").unwrap_or(defaults.report_path),
            api_key: load_secret("API_KEY"),
        }
    }
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Resolve a secret: environment first, then a mounted file at
/// `/run/secrets/<lowercased name>`.
pub fn load_secret(name: &str) -> Option<String> {
    if let Ok(value) = std::env::var(name) {
        if !value.is_empty() {
            return Some(value);
        }
    }
    let path = PathBuf::from("/run/secrets").join(name.to_lowercase());
    std::fs::read_to_string(path)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
