//! # world_composer - merge static and dynamic SDF worlds
//!
//! Usage:
//!   world_composer batch                              # seeds 1..=200, default dirs
//!   world_composer batch --count 50 --fail-fast       # stop on first bad pair
//!   world_composer batch --config composer.toml       # settings from TOML
//!   world_composer merge static.world dynamic.world unified.world

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use world_composer::{
    compose_files, BatchRunner, ComposerConfig, ErrorPolicy, MergeConfig, ModelPolicy,
};

#[derive(Parser)]
#[command(name = "world_composer")]
#[command(about = "Merge static and dynamic SDF worlds into unified worlds")]
#[command(version)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge every numbered static/dynamic pair
    Batch {
        /// Configuration file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory with static_seed_NNNN files
        #[arg(long)]
        static_dir: Option<PathBuf>,

        /// Directory with dynamic_seed_NNNN files
        #[arg(long)]
        dynamic_dir: Option<PathBuf>,

        /// Directory for unified_seed_NNNN files
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Number of seeds to process
        #[arg(short = 'n', long)]
        count: Option<u32>,

        /// First seed index
        #[arg(long)]
        first_index: Option<u32>,

        /// File extension of inputs and outputs
        #[arg(long)]
        extension: Option<String>,

        /// Stop at the first failing pair
        #[arg(long)]
        fail_fast: bool,

        #[command(flatten)]
        merge: MergeArgs,
    },

    /// Merge a single static/dynamic pair
    Merge {
        /// Static world file
        static_world: PathBuf,
        /// Dynamic world file
        dynamic_world: PathBuf,
        /// Output world file
        output: PathBuf,

        /// Configuration file (TOML); only the [merge] table is used
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[command(flatten)]
        merge: MergeArgs,
    },
}

#[derive(clap::Args)]
struct MergeArgs {
    /// Which dynamic models to transplant
    #[arg(long, value_enum)]
    model_policy: Option<ModelPolicy>,

    /// Keep dynamic poses as they are
    #[arg(long)]
    no_placement: bool,

    /// Clearance between static and dynamic clusters
    #[arg(long)]
    gap: Option<f64>,
}

impl MergeArgs {
    fn apply(&self, mut merge: MergeConfig) -> MergeConfig {
        if let Some(policy) = self.model_policy {
            merge = merge.with_model_policy(policy);
        }
        if self.no_placement {
            merge = merge.with_placement(false);
        }
        if let Some(gap) = self.gap {
            merge = merge.with_gap(gap);
        }
        merge
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<ComposerConfig> {
    match path {
        Some(path) => ComposerConfig::from_toml_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(ComposerConfig::default()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Commands::Batch {
            config,
            static_dir,
            dynamic_dir,
            output_dir,
            count,
            first_index,
            extension,
            fail_fast,
            merge,
        } => {
            let mut config = load_config(config.as_ref())?;
            if let Some(dir) = static_dir {
                config.static_dir = dir;
            }
            if let Some(dir) = dynamic_dir {
                config.dynamic_dir = dir;
            }
            if let Some(dir) = output_dir {
                config.output_dir = dir;
            }
            if let Some(count) = count {
                config = config.with_count(count);
            }
            if let Some(first_index) = first_index {
                config = config.with_first_index(first_index);
            }
            if let Some(extension) = extension {
                config.extension = extension;
            }
            if fail_fast {
                config = config.with_error_policy(ErrorPolicy::FailFast);
            }
            config.merge = merge.apply(config.merge);

            info!(
                "Composing {} seeds from index {} ({} + {} into {})",
                config.count,
                config.first_index,
                config.static_dir.display(),
                config.dynamic_dir.display(),
                config.output_dir.display()
            );

            let report = BatchRunner::new(config)
                .run()
                .context("Batch composition aborted")?;
            println!("Done. {}", report.summary_line());
        }
        Commands::Merge {
            static_world,
            dynamic_world,
            output,
            config,
            merge,
        } => {
            let merge_config = merge.apply(load_config(config.as_ref())?.merge);
            let summary = compose_files(&static_world, &dynamic_world, &output, &merge_config)
                .with_context(|| {
                    format!(
                        "Failed to merge {} with {}",
                        static_world.display(),
                        dynamic_world.display()
                    )
                })?;
            for (from, to) in &summary.renamed {
                info!("Renamed '{}' -> '{}'", from, to);
            }
            println!(
                "Wrote {} ({} entities appended)",
                output.display(),
                summary.appended
            );
        }
    }

    Ok(())
}
