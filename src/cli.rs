//! Command-line interface

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::error::Result;
use crate::registry::LoadedModel;

#[derive(Parser)]
#[command(name = "iris-serve")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Iris model serving with prediction caching and drift monitoring")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the prediction server
    Serve {
        /// Bind host (overrides API_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Bind port (overrides API_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Write demo model parameter files for local serving
    InitModels {
        /// Directory for the generated files
        #[arg(short, long, default_value = "models")]
        dir: PathBuf,
    },
}

pub async fn cmd_serve(host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let mut config = AppConfig::from_env();
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }
    crate::server::run_server(config).await
}

/// Write the two demo predictor files the serving path consumes. These
/// stand in for separately trained model artifacts.
pub fn cmd_init_models(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)?;

    let targets = [
        ("logistic_model.json", LoadedModel::demo_logistic()),
        ("rf_model.json", LoadedModel::demo_forest()),
    ];
    for (file_name, model) in targets {
        let path = dir.join(file_name);
        std::fs::write(&path, serde_json::to_vec_pretty(&model)?)?;
        println!("wrote {}", path.display());
    }

    println!("export LOGISTIC_MODEL={}", dir.join("logistic_model.json").display());
    println!("export RF_MODEL={}", dir.join("rf_model.json").display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_models_writes_loadable_files() {
        let dir = tempfile::tempdir().unwrap();
        cmd_init_models(dir.path()).unwrap();

        for file_name in ["logistic_model.json", "rf_model.json"] {
            let data = std::fs::read_to_string(dir.path().join(file_name)).unwrap();
            let model: LoadedModel = serde_json::from_str(&data).unwrap();
            let fv = crate::features::FeatureVector::new(5.1, 3.5, 1.4, 0.2).unwrap();
            assert_eq!(model.predict(&fv), 0);
        }
    }
}
