pub mod checks;
pub mod errors;
pub mod keys;
pub mod loader;
pub mod mapping;
pub mod orchestrator;
pub mod report;
pub mod results;
pub mod table;
pub mod values;

pub use errors::ReconError;
pub use mapping::{ColumnMapping, MappingSet};
pub use orchestrator::{
    Orchestrator, ReconciliationTask, RunOptions, RunSummary, TablePair, DEFAULT_CHUNK_SIZE,
};
pub use results::{Check, CheckStatus, ExecutionRecord, TaskResults};
pub use table::Table;
pub use values::Value;
