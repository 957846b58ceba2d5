//! canopy daemon — CLI entry point for the compensation engine.
//!
//! The daily distribution is a batch job: cron invokes
//! `canopy-daemon distribute run` once per day and the process exits when
//! the run record is written.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use canopy_engine::{DistributionJob, EngineConfig, TracingNotifier};
use canopy_store::RunLogStore;
use canopy_store_lmdb::LmdbStores;
use canopy_types::Timestamp;
use canopy_utils::format_duration;

#[derive(Parser)]
#[command(name = "canopy-daemon", about = "canopy compensation engine daemon")]
struct Cli {
    /// Data directory for LMDB storage.
    #[arg(long, default_value = "./canopy_data", env = "CANOPY_DATA_DIR")]
    data_dir: PathBuf,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, default_value = "info", env = "CANOPY_LOG_LEVEL")]
    log_level: String,

    /// Path to a TOML configuration file. If provided, file settings are
    /// used as the base; CLI flags and env vars override them.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Subcommand.
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Daily distribution job.
    #[command(name = "distribute")]
    Distribute {
        #[command(subcommand)]
        action: DistributeAction,
    },
    /// Show recent distribution run records.
    #[command(name = "runs")]
    Runs {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

#[derive(clap::Subcommand)]
enum DistributeAction {
    /// Run one distribution pass and exit.
    Run,
}

fn main() -> anyhow::Result<()> {
    canopy_utils::init_tracing();

    let cli = Cli::parse();

    let file_config: Option<EngineConfig> = if let Some(ref config_path) = cli.config {
        match EngineConfig::from_toml_file(config_path) {
            Ok(cfg) => {
                tracing::info!("Loaded config from {}", config_path.display());
                Some(cfg)
            }
            Err(e) => {
                tracing::warn!("Failed to load config file: {e}, using CLI defaults");
                None
            }
        }
    } else {
        None
    };

    let config = if let Some(file_cfg) = file_config {
        EngineConfig {
            data_dir: cli.data_dir,
            log_level: cli.log_level,
            ..file_cfg
        }
    } else {
        EngineConfig {
            data_dir: cli.data_dir,
            log_level: cli.log_level,
            ..Default::default()
        }
    };

    let stores = Arc::new(LmdbStores::open(&config.data_dir)?);

    match cli.command {
        Command::Distribute {
            action: DistributeAction::Run,
        } => {
            tracing::info!(
                job = %config.job_name,
                data_dir = %config.data_dir.display(),
                "starting distribution run"
            );
            let job = DistributionJob::new(
                stores.clone(),
                stores.clone(),
                stores.clone(),
                stores.clone(),
                stores.clone(),
                stores.clone(),
                Arc::new(TracingNotifier),
            );
            let record = job.run(&config, Timestamp::now())?;
            println!(
                "{}: {} — {} (yield {}, commissions {}, took {})",
                record.job,
                record.status,
                record.message,
                record.total_yield,
                record.total_commissions,
                format_duration(record.duration_ms),
            );
            for error in &record.errors {
                eprintln!("  stake error: {}", error);
            }
        }
        Command::Runs { limit } => {
            for record in stores.recent_runs(limit)? {
                println!(
                    "{} [{}] {} — processed {}, expired {}, yield {}, commissions {}, {}",
                    record.started_at,
                    record.status,
                    record.job,
                    record.stakes_processed,
                    record.stakes_expired,
                    record.total_yield,
                    record.total_commissions,
                    format_duration(record.duration_ms),
                );
            }
        }
    }

    Ok(())
}
