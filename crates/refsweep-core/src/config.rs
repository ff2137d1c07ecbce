use config::{Config, ConfigError, File as ConfigFile};
use serde::Deserialize;
use std::path::PathBuf;

/// Defaults loaded from an optional `Config.toml` in the working
/// directory. Every field can be overridden by a CLI flag.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    pub db_path: Option<PathBuf>,
    pub storage_path: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
}

pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name("Config").required(false))
        .build()?;
    builder.try_deserialize::<AppConfig>()
}

/// Fully resolved settings for one maintenance run. Built once by the
/// caller and passed by reference to every component; there is no
/// process-wide configuration state.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// The library database file.
    pub db_path: PathBuf,
    /// Root of the per-attachment storage tree.
    pub storage_path: PathBuf,
    /// Where evidence CSVs and the run summary land.
    pub log_dir: PathBuf,
    /// False means dry-run: classify and log, delete nothing.
    pub apply: bool,
}
