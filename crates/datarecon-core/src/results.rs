use std::fmt;

use chrono::Local;

/// Fixed check identifiers. The ids are part of the persisted log format and
/// never change between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    RowCount = 1,
    MismatchScan = 2,
    Duplicates = 3,
    MissingRows = 4,
}

impl Check {
    pub fn id(self) -> u32 {
        self as u32
    }

    pub fn description(self) -> &'static str {
        match self {
            Check::RowCount => "Row Count Comparison",
            Check::MismatchScan => "Data Comparison (Sorted Chunks)",
            Check::Duplicates => "Duplicate Data",
            Check::MissingRows => "Missing Rows in Target",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Passed,
    Failed,
}

impl CheckStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CheckStatus::Passed => "Passed",
            CheckStatus::Failed => "Failed",
        }
    }

    /// Outstanding-failure marker persisted with every record.
    pub fn active_flag(self) -> &'static str {
        match self {
            CheckStatus::Passed => "N",
            CheckStatus::Failed => "Y",
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the persisted execution log. Immutable once created.
#[derive(Debug, Clone)]
pub struct ExecutionRecord {
    pub execution_id: u64,
    pub check_id: u32,
    pub check_name: String,
    pub table_name: String,
    pub status: CheckStatus,
    pub details: String,
    pub created_at: String,
}

impl ExecutionRecord {
    pub fn active_flag(&self) -> &'static str {
        self.status.active_flag()
    }
}

/// Collects one task's check outcomes, in the order the checks run.
#[derive(Debug)]
pub struct TaskResults {
    execution_id: u64,
    table_name: String,
    records: Vec<ExecutionRecord>,
}

impl TaskResults {
    pub fn new(execution_id: u64, table_name: String) -> Self {
        Self {
            execution_id,
            table_name,
            records: Vec::new(),
        }
    }

    pub fn push(&mut self, check: Check, status: CheckStatus, details: String) {
        self.records.push(ExecutionRecord {
            execution_id: self.execution_id,
            check_id: check.id(),
            check_name: check.description().to_string(),
            table_name: self.table_name.clone(),
            status,
            details,
            created_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        });
    }

    pub fn execution_id(&self) -> u64 {
        self.execution_id
    }

    pub fn records(&self) -> &[ExecutionRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ExecutionRecord> {
        self.records
    }
}
