//! iris-serve - Main entry point

use clap::Parser;
use iris_serve::cli::{cmd_init_models, cmd_serve, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Local development picks model paths and secrets up from .env
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "iris_serve=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port } => {
            cmd_serve(host, port).await?;
        }
        Commands::InitModels { dir } => {
            cmd_init_models(&dir)?;
        }
    }

    Ok(())
}
