use datarecon_core::{CheckStatus, ExecutionRecord, RunSummary};

use crate::Reporter;

pub struct StdOutFormatter {
    intro: String,
    intro_len: usize,
}

impl StdOutFormatter {
    pub fn new(version: String) -> Self {
        let s = format!("DataRecon v{} - Reconciliation Report", version);
        let n = s.len();
        Self {
            intro: s,
            intro_len: n,
        }
    }

    pub fn print_dispatch(&self, total: usize) {
        println!("Reconciling {} table pair(s)...", total);
    }

    pub fn print_record(&self, record: &ExecutionRecord) {
        let status = match record.status {
            CheckStatus::Passed => "PASSED",
            CheckStatus::Failed => "FAILED",
        };
        let dots = ".".repeat(40_usize.saturating_sub(record.check_name.len()) + 3);
        println!(
            "  [{}] {} - {} {} {}",
            record.execution_id, record.table_name, record.check_name, dots, status
        );
        if record.status == CheckStatus::Failed {
            println!("      {}", record.details);
        }
    }

    pub fn print_summary(&self, summary: &RunSummary, elapsed_secs: f64, memory_mb: Option<f64>) {
        println!("\n===================================");
        println!(
            "Result: {} failed, {} passed ({} task(s), {} skipped)",
            summary.failed(),
            summary.passed(),
            summary.tasks_total,
            summary.tasks_skipped
        );
        println!("Time taken: {:.2} seconds", elapsed_secs);
        if let Some(mb) = memory_mb {
            println!("Memory used: {:.2} MB", mb);
        }
    }
}

impl Reporter for StdOutFormatter {
    fn on_start(&self) {
        let i = "=".repeat(self.intro_len);

        println!("{}", self.intro);
        println!("{}", i);
    }

    fn on_dispatch(&self, total: usize) {
        self.print_dispatch(total);
    }

    fn on_record(&mut self, record: &ExecutionRecord) {
        self.print_record(record);
    }

    fn on_complete(&mut self, summary: &RunSummary, elapsed_secs: f64, memory_mb: Option<f64>) {
        self.print_summary(summary, elapsed_secs, memory_mb);
    }
}
