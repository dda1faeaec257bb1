use datarecon_core::ReconError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Error: configuration file not found: '{path}'")]
    FileNotFound { path: String },
    #[error("Configuration row for '{table}' has an empty '{field}' field")]
    EmptyField { table: String, field: String },
    #[error("Failed to read configuration: {0}")]
    Csv(#[from] csv::Error),
    // Column mapping rows are validated by the core at construction time
    #[error("Invalid column mapping: {0}")]
    Mapping(#[from] ReconError),
}
