use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Report error: {0}")]
    Report(#[from] csv::Error),

    /// Any failure inside a deletion transaction. The whole batch was
    /// rolled back; nothing was removed.
    #[error("deletion transaction failed: {source}")]
    DeleteTransaction {
        #[source]
        source: rusqlite::Error,
    },
}
