//! Attrition Core - Command Line Entry Point

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use attrition_core::api::commands;
use attrition_core::constants;
use attrition_core::logic::explain::BackgroundSource;
use attrition_core::logic::PipelineConfig;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Artifact directory (overrides ATTRITION_ARTIFACT_DIR)
    #[arg(long, global = true)]
    artifacts: Option<PathBuf>,
    /// Background source for explanations: schema, noise or file
    #[arg(long, global = true)]
    background: Option<BackgroundSource>,
    /// Skip local explanations
    #[arg(long, global = true)]
    no_explain: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assess one employee profile
    Assess {
        /// Quick profile id (high-performer, average, fresh-graduate, at-risk)
        #[arg(long, conflicts_with = "profile")]
        preset: Option<String>,
        /// JSON file with a flat object of field -> label or number
        #[arg(long)]
        profile: Option<PathBuf>,
    },
    /// Global feature importance (top 15)
    Importance,
    /// Input field definitions
    Schema,
    /// Available quick profiles
    Presets,
    /// Model and pipeline status
    Info,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    log::info!("Starting {} v{}", constants::APP_NAME, constants::APP_VERSION);

    let mut config = PipelineConfig::from_env();
    if let Some(dir) = cli.artifacts {
        config.artifact_dir = dir;
    }
    if let Some(background) = cli.background {
        config.background = background;
    }
    if cli.no_explain {
        config.explain_enabled = false;
    }

    // Schema and presets never need the model
    match &cli.command {
        Commands::Schema => return print_json(&commands::get_feature_schema().map_err(|e| anyhow!(e))?),
        Commands::Presets => return print_json(&commands::list_presets().map_err(|e| anyhow!(e))?),
        _ => {}
    }

    let info = commands::init(config).map_err(|e| anyhow!(e))?;
    for warning in &info.warnings {
        log::warn!("{}", warning);
    }

    match cli.command {
        Commands::Assess { preset, profile } => {
            let report = match (preset, profile) {
                (Some(preset), _) => commands::assess_preset(&preset),
                (None, Some(path)) => {
                    let json = std::fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read profile {}", path.display()))?;
                    commands::assess_profile_json(&json)
                }
                (None, None) => return Err(anyhow!("Either --preset or --profile is required")),
            }
            .map_err(|e| anyhow!(e))?;
            print_json(&report)
        }
        Commands::Importance => print_json(&commands::get_global_importance().map_err(|e| anyhow!(e))?),
        Commands::Info => print_json(&commands::get_app_info().map_err(|e| anyhow!(e))?),
        Commands::Schema | Commands::Presets => Ok(()),
    }
}
