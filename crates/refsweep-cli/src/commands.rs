use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use refsweep_core::{AppConfig, RunConfig};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "refsweep")]
#[command(about = "Offline maintenance for a reference-manager library", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Detect duplicate PDF attachments; delete exact duplicates with --apply
    DedupePdfs(TaskArgs),
    /// Detect legacy XML placeholder child notes; delete them with --apply
    CleanNotes(TaskArgs),
    /// Print the effective configuration
    PrintConfig,
}

#[derive(Debug, Args)]
pub struct TaskArgs {
    /// Path to the library database file
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Path to the attachment storage directory
    /// (defaults to `storage` beside the database)
    #[arg(long)]
    pub storage: Option<PathBuf>,

    /// Directory for evidence logs
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Actually delete candidates instead of the default dry-run
    #[arg(long)]
    pub apply: bool,
}

impl TaskArgs {
    /// Merge CLI flags over file-config defaults into one RunConfig.
    /// Flags win; the storage root falls back to the conventional
    /// `storage` directory next to the database file.
    pub fn into_run_config(self, file_cfg: &AppConfig) -> anyhow::Result<RunConfig> {
        let db_path = self
            .db
            .or_else(|| file_cfg.db_path.clone())
            .context("no database path; pass --db or set db_path in Config.toml")?;
        let storage_path = self
            .storage
            .or_else(|| file_cfg.storage_path.clone())
            .or_else(|| db_path.parent().map(|dir| dir.join("storage")))
            .context("no storage path; pass --storage or set storage_path in Config.toml")?;
        let log_dir = self
            .log_dir
            .or_else(|| file_cfg.log_dir.clone())
            .unwrap_or_else(|| PathBuf::from("logs"));

        Ok(RunConfig {
            db_path,
            storage_path,
            log_dir,
            apply: self.apply,
        })
    }
}
