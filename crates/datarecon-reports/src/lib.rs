pub mod formatters;
pub mod notification;
pub mod utils;

use datarecon_core::{ExecutionRecord, RunSummary};
pub use formatters::{json::JsonFormatter, stdout::StdOutFormatter};
pub use notification::Notification;

pub trait Reporter {
    fn on_start(&self);
    fn on_dispatch(&self, total: usize);
    fn on_record(&mut self, record: &ExecutionRecord);
    fn on_complete(&mut self, summary: &RunSummary, elapsed_secs: f64, memory_mb: Option<f64>);
}
