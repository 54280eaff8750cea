//! status-hook: applies resource status reports to persisted records.
//!
//! Invoked by the cluster watcher whenever a notebook or training job changes
//! state. Each invocation handles exactly one report.
//!
//! ## Subcommands
//!
//! - `apply`: Reconcile one status report, reads JSON from stdin
//! - `show`: Print the stored record for a resource

mod apply;
mod error;
mod logging;
mod show;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use status_core::{load_config, Db, StatusConfig};

use crate::error::HookError;

#[derive(Parser)]
#[command(name = "status-hook")]
#[command(about = "Resource status synchronizer")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.status-sync/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// SQLite database, overrides the configured path
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a status report (reads JSON from stdin)
    Apply,

    /// Print the stored record for a resource
    Show {
        /// Resource type tag (Notebook, TFJob, PyTorchJob, XGBoost)
        #[arg(long = "type", value_name = "TYPE")]
        resource_type: String,

        /// Resource identifier
        #[arg(long, value_name = "ID")]
        id: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            let _logging_guard = logging::init(None);
            tracing::error!(code = err.code(), error = %err, "Failed to load config");
            std::process::exit(1);
        }
    };
    let _logging_guard = logging::init(config.log_dir.as_deref());

    if let Err(err) = run(cli.command, cli.db, &config) {
        tracing::error!(
            code = err.code(),
            status = err.http_status(),
            error = %err,
            "status-hook failed"
        );
        std::process::exit(1);
    }
}

fn run(
    command: Commands,
    db_override: Option<PathBuf>,
    config: &StatusConfig,
) -> Result<(), HookError> {
    let db_path = match db_override {
        Some(path) => path,
        None => config.resolved_database_path()?,
    };
    let db = Db::new(db_path)?;

    match command {
        Commands::Apply => {
            let updated = apply::run(Arc::new(db))?;
            println!("{}", updated);
        }
        Commands::Show { resource_type, id } => {
            println!("{}", show::run(&db, &resource_type, &id)?);
        }
    }

    Ok(())
}
