//! Persisted artifacts: duplicate/missing/mismatch report files and the
//! append-only execution log.
//!
//! Report file names carry the table id (and, for mismatch files, the
//! execution id) so that concurrently running tasks never write to the same
//! path.

use std::fs;
use std::path::{Path, PathBuf};

use crate::checks::mismatch::MismatchRecord;
use crate::errors::ReconError;
use crate::results::ExecutionRecord;

/// Column header of the execution log.
pub const LOG_HEADER: [&str; 8] = [
    "TEST_EXECUTION_ID",
    "TEST_CASE_ID",
    "TEST_CASE_DESCRIPTION",
    "TABLE_NAME",
    "EXECUTION_STATUS",
    "EXECUTION_DETAILS",
    "ACTIVE_FLAG",
    "CREATED_DATE",
];

const DUPLICATES_DIR: &str = "Duplicates";
const MISSING_DIR: &str = "Missing_Rows";

/// Write the offending keys of a duplicate check, one entry per distinct key.
/// Overwrites the previous run's file for the same table.
pub fn write_duplicate_report(
    output_dir: &Path,
    target_table: &str,
    keys: &[String],
) -> Result<PathBuf, ReconError> {
    let dir = output_dir.join(DUPLICATES_DIR);
    fs::create_dir_all(&dir)?;
    let path = dir.join(format!("{}_duplicates.csv", target_table));

    let mut writer = csv::Writer::from_path(&path)?;
    writer.write_record(["Duplicate_Row_IDs"])?;
    for key in keys {
        writer.write_record([key.as_str()])?;
    }
    writer.flush()?;
    Ok(path)
}

/// Write the full source rows missing from the target, with the table's
/// column header. Overwrites the previous run's file for the same table.
pub fn write_missing_report(
    output_dir: &Path,
    source_table: &str,
    columns: &[String],
    rows: &[&[crate::values::Value]],
) -> Result<PathBuf, ReconError> {
    let dir = output_dir.join(MISSING_DIR);
    fs::create_dir_all(&dir)?;
    let path = dir.join(format!("{}_missing_in_target.csv", source_table));

    let mut writer = csv::Writer::from_path(&path)?;
    writer.write_record(columns)?;
    for row in rows {
        writer.write_record(row.iter().map(|value| value.to_string()))?;
    }
    writer.flush()?;
    Ok(path)
}

/// Write all mismatch records of one task to a file scoped by table id and
/// execution id.
pub fn write_mismatch_report(
    output_dir: &Path,
    source_table: &str,
    execution_id: u64,
    records: &[MismatchRecord],
) -> Result<PathBuf, ReconError> {
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(format!("{}_runid_{}.csv", source_table, execution_id));

    let mut writer = csv::Writer::from_path(&path)?;
    writer.write_record(["Table", "Mismatch", "Details"])?;
    for record in records {
        writer.write_record([
            record.table.as_str(),
            record.mismatch.as_str(),
            record.details.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(path)
}

/// The consolidated execution log. Workers never touch it: the orchestrator
/// reads the max id before dispatch and appends all records once after join.
#[derive(Debug, Clone)]
pub struct ExecutionLog {
    path: PathBuf,
}

impl ExecutionLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Highest execution id recorded so far; 0 for a missing or empty log.
    pub fn max_execution_id(&self) -> Result<u64, ReconError> {
        if !self.path.exists() {
            return Ok(0);
        }

        let mut reader = csv::Reader::from_path(&self.path)?;
        let id_index = reader
            .headers()?
            .iter()
            .position(|header| header == LOG_HEADER[0]);
        let Some(id_index) = id_index else {
            return Ok(0);
        };

        let mut max_id = 0u64;
        for record in reader.records() {
            let record = record?;
            if let Some(id) = record.get(id_index).and_then(|v| v.parse::<u64>().ok()) {
                max_id = max_id.max(id);
            }
        }
        Ok(max_id)
    }

    /// Append records in one batch, writing the header only when the log is
    /// new or empty.
    pub fn append(&self, records: &[ExecutionRecord]) -> Result<(), ReconError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let needs_header = match fs::metadata(&self.path) {
            Ok(metadata) => metadata.len() == 0,
            Err(_) => true,
        };

        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if needs_header {
            writer.write_record(LOG_HEADER)?;
        }
        for record in records {
            writer.write_record([
                record.execution_id.to_string(),
                record.check_id.to_string(),
                record.check_name.clone(),
                record.table_name.clone(),
                record.status.as_str().to_string(),
                record.details.clone(),
                record.active_flag().to_string(),
                record.created_at.clone(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }
}
