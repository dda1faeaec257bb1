//! The parallel scheduler: one reconciliation task per enabled table pair,
//! fanned out over the rayon pool and merged into a single batch append to
//! the execution log.
//!
//! Execution ids are assigned sequentially, in configuration order, before
//! any worker starts; workers share only read-only inputs and write report
//! files scoped by table name and execution id, so tasks never contend.

use std::path::{Path, PathBuf};
use std::time::Instant;

use log::{info, warn};
use rayon::prelude::*;

use crate::checks::mismatch::ChunkedMismatchScanner;
use crate::checks::{duplicates, missing, row_count};
use crate::errors::ReconError;
use crate::keys;
use crate::loader;
use crate::mapping::MappingSet;
use crate::report::ExecutionLog;
use crate::results::{ExecutionRecord, TaskResults};

/// Default mismatch-scan chunk size, in rows.
pub const DEFAULT_CHUNK_SIZE: usize = 500_000;

/// One enabled source/target pair, as read from the run configuration.
#[derive(Debug, Clone)]
pub struct TablePair {
    pub source_table: String,
    pub target_table: String,
    pub key_columns: Vec<String>,
}

/// One pair's full unit of work, carrying everything a worker needs by
/// value. Built and id-stamped before dispatch, immutable afterwards.
#[derive(Debug, Clone)]
pub struct ReconciliationTask {
    pub execution_id: u64,
    pub source_table: String,
    pub target_table: String,
    pub key_columns: Vec<String>,
    pub source_path: PathBuf,
    pub target_path: PathBuf,
    pub chunk_size: usize,
}

/// File-system layout of one run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub source_folder: PathBuf,
    pub target_folder: PathBuf,
    pub output_folder: PathBuf,
    pub log_path: PathBuf,
    pub chunk_size: usize,
}

impl RunOptions {
    pub fn new(
        source_folder: PathBuf,
        target_folder: PathBuf,
        output_folder: PathBuf,
        log_path: PathBuf,
    ) -> Self {
        Self {
            source_folder,
            target_folder,
            output_folder,
            log_path,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Chunk size 0 would make the scanner's chunking panic, so it is
    /// clamped to 1.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }
}

/// Aggregated outcome of one run, after the log append.
#[derive(Debug)]
pub struct RunSummary {
    pub records: Vec<ExecutionRecord>,
    pub tasks_total: usize,
    pub tasks_skipped: usize,
}

impl RunSummary {
    pub fn passed(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.status == crate::results::CheckStatus::Passed)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.records.len() - self.passed()
    }
}

pub struct Orchestrator {
    options: RunOptions,
    mappings: MappingSet,
}

impl Orchestrator {
    pub fn new(options: RunOptions, mappings: MappingSet) -> Self {
        Self { options, mappings }
    }

    /// Run every enabled pair and append all records to the execution log in
    /// one batch.
    ///
    /// Fails only on configuration-level problems discovered before dispatch
    /// (no enabled pairs, unreadable log) or on the final log write; errors
    /// local to one pair are logged inside the pair's task.
    pub fn run(&self, pairs: &[TablePair]) -> Result<RunSummary, ReconError> {
        if pairs.is_empty() {
            return Err(ReconError::NoEnabledPairs);
        }

        let log = ExecutionLog::new(self.options.log_path.clone());
        let next_id = log.max_execution_id()? + 1;
        let tasks = self.build_tasks(pairs, next_id);
        info!(
            "Dispatching {} reconciliation tasks (execution ids {}..={})",
            tasks.len(),
            next_id,
            next_id + tasks.len() as u64 - 1
        );

        let per_task: Vec<Vec<ExecutionRecord>> = tasks
            .par_iter()
            .map(|task| run_task(task, &self.mappings, &self.options.output_folder))
            .collect();

        let tasks_skipped = per_task.iter().filter(|records| records.is_empty()).count();
        let records: Vec<ExecutionRecord> = per_task.into_iter().flatten().collect();

        if !records.is_empty() {
            log.append(&records)?;
        }
        info!(
            "Completed {} tasks, {} skipped, {} records appended to {}",
            tasks.len(),
            tasks_skipped,
            records.len(),
            log.path().display()
        );

        Ok(RunSummary {
            records,
            tasks_total: tasks.len(),
            tasks_skipped,
        })
    }

    /// Stamp execution ids in configuration order. This pass is strictly
    /// sequential and finishes before any worker starts.
    fn build_tasks(&self, pairs: &[TablePair], next_id: u64) -> Vec<ReconciliationTask> {
        pairs
            .iter()
            .enumerate()
            .map(|(index, pair)| ReconciliationTask {
                execution_id: next_id + index as u64,
                source_table: pair.source_table.clone(),
                target_table: pair.target_table.clone(),
                key_columns: pair.key_columns.clone(),
                source_path: self
                    .options
                    .source_folder
                    .join(format!("{}.csv", pair.source_table)),
                target_path: self
                    .options
                    .target_folder
                    .join(format!("{}.csv", pair.target_table)),
                chunk_size: self.options.chunk_size,
            })
            .collect()
    }
}

/// Run one task to completion. Never propagates: a missing snapshot skips
/// the task, any other failure is logged and whatever records accumulated
/// before it are returned.
fn run_task(
    task: &ReconciliationTask,
    mappings: &MappingSet,
    output_dir: &Path,
) -> Vec<ExecutionRecord> {
    let started = Instant::now();
    let mut results = TaskResults::new(task.execution_id, task.target_table.clone());

    match reconcile_pair(task, mappings, output_dir, &mut results) {
        Ok(()) => {
            info!(
                "Reconciled '{}' against '{}' in {:.2}s",
                task.source_table,
                task.target_table,
                started.elapsed().as_secs_f64()
            );
        }
        Err(ReconError::MissingInput(path)) => {
            warn!(
                "Snapshot file {} does not exist. Skipping pair '{}' / '{}'.",
                path, task.source_table, task.target_table
            );
        }
        Err(err) => {
            warn!(
                "Reconciliation of '{}' against '{}' stopped early: {}",
                task.source_table, task.target_table, err
            );
        }
    }
    results.into_records()
}

/// The full check sequence for one pair: row count (1), duplicates (3),
/// missing rows (4), mismatch scan (2).
fn reconcile_pair(
    task: &ReconciliationTask,
    mappings: &MappingSet,
    output_dir: &Path,
    results: &mut TaskResults,
) -> Result<(), ReconError> {
    let source = loader::load_snapshot(&task.source_path, &task.source_table)?;
    let target = loader::load_snapshot(&task.target_path, &task.target_table)?;

    // Mapping resolution failures abort the task before any record exists.
    let mapping = mappings.get(&task.source_table)?;
    let mut source = loader::align_source(source, mapping)?;
    let mut target = loader::align_target(target, mapping)?;

    row_count::compare_row_counts(results, &source, &target);

    // From here on the row-count record survives any failure.
    let mut alignment = keys::align(&source, &target, &task.key_columns)?;
    duplicates::detect_and_dedup(results, &mut source, &mut target, &mut alignment, output_dir)?;
    missing::detect_missing_rows(results, &source, &alignment, output_dir)?;

    let scanner = ChunkedMismatchScanner::new(&task.key_columns, task.chunk_size, output_dir);
    scanner
        .scan(results, source, target, alignment)
        .map_err(|err| ReconError::Comparison {
            table: task.target_table.clone(),
            message: err.to_string(),
        })
}
