use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReconError {
    /// Configuration filtered down to zero enabled table pairs
    #[error("No enabled table pairs found in the run configuration")]
    NoEnabledPairs,

    /// No column mapping entry for the given table
    #[error("No column mapping found for table '{0}'")]
    MappingNotFound(String),

    /// Source and target column lists of a mapping differ in length
    #[error("Mismatch in the number of source and target columns for table '{table}': {source_count} source vs {target_count} target")]
    ColumnCountMismatch {
        table: String,
        source_count: usize,
        target_count: usize,
    },

    /// A column name appears twice on one side of a mapping
    #[error("Column '{column}' is mapped twice for table '{table}'")]
    DuplicateMappedColumn { table: String, column: String },

    /// A snapshot file is absent; the enclosing task is skipped, not failed
    #[error("Snapshot file not found: {0}")]
    MissingInput(String),

    /// A key column is absent from a table; aborts the enclosing task
    #[error("Key column '{column}' not found in table '{table}'")]
    MissingKeyColumn { column: String, table: String },

    /// A mapped column is absent from the loaded snapshot
    #[error("Column '{column}' not found in table '{table}'")]
    ColumnNotFound { column: String, table: String },

    /// Unexpected failure mid-scan; caught by the task, partial results kept
    #[error("Comparison error for table '{table}': {message}")]
    Comparison { table: String, message: String },

    /// The Arrow CSV reader produced an error
    #[error("Arrow computation error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Report or log serialization error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// File reading or IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
