use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::Error;

use datarecon_core::{CheckStatus, ExecutionRecord, RunSummary};

use crate::Reporter;

#[derive(Serialize, Deserialize)]
pub struct JsonFormatter {
    version: String,
    timestamp: String,
    records: Vec<RecordFormatter>,
    summary: Option<SummaryFormatter>,
}

#[derive(Serialize, Deserialize)]
struct RecordFormatter {
    execution_id: u64,
    check_id: u32,
    check: String,
    table: String,
    passed: bool,
    details: String,
}

#[derive(Serialize, Deserialize)]
struct SummaryFormatter {
    passed: usize,
    failed: usize,
    tasks_total: usize,
    tasks_skipped: usize,
    elapsed_secs: f64,
    memory_mb: Option<f64>,
}

impl JsonFormatter {
    pub fn new(version: String) -> Self {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        Self {
            version,
            timestamp,
            records: Vec::new(),
            summary: None,
        }
    }

    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Reporter for JsonFormatter {
    fn on_start(&self) {}

    fn on_dispatch(&self, _total: usize) {}

    fn on_record(&mut self, record: &ExecutionRecord) {
        self.records.push(RecordFormatter {
            execution_id: record.execution_id,
            check_id: record.check_id,
            check: record.check_name.clone(),
            table: record.table_name.clone(),
            passed: record.status == CheckStatus::Passed,
            details: record.details.clone(),
        });
    }

    fn on_complete(&mut self, summary: &RunSummary, elapsed_secs: f64, memory_mb: Option<f64>) {
        self.summary = Some(SummaryFormatter {
            passed: summary.passed(),
            failed: summary.failed(),
            tasks_total: summary.tasks_total,
            tasks_skipped: summary.tasks_skipped,
            elapsed_secs,
            memory_mb,
        });
    }
}
