//! Snapshot loading.
//!
//! Each side of a table pair is a CSV file loaded fully into memory. The
//! header line yields an all-Utf8 Arrow schema; large files are split into
//! newline-aligned byte ranges parsed in parallel, small files are parsed in
//! a single pass. The resulting batches are folded into a row-oriented
//! [`Table`], detecting per column whether every non-empty cell parses as a
//! number.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, StringArray};
use arrow::csv::ReaderBuilder as CsvReaderBuilder;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use rayon::prelude::*;

use crate::errors::ReconError;
use crate::mapping::ColumnMapping;
use crate::table::Table;
use crate::values::Value;

/// Rows per Arrow batch.
const BATCH_SIZE: usize = 64 * 1024;
/// Files below this size are parsed on a single thread.
const PARALLEL_THRESHOLD: u64 = 8 * 1024 * 1024;
const MIN_CHUNK_SIZE: u64 = 1024 * 1024;
const MAX_CHUNK_SIZE: u64 = 100 * 1024 * 1024;
const CHUNKS_PER_THREAD: u64 = 4;

/// Load one snapshot into memory.
///
/// An absent file yields [`ReconError::MissingInput`], which the orchestrator
/// treats as "skip this task", not as a task failure.
pub fn load_snapshot(path: &Path, table_name: &str) -> Result<Table, ReconError> {
    if !path.exists() {
        return Err(ReconError::MissingInput(path.display().to_string()));
    }

    let file_size = File::open(path)?.metadata()?.len();
    let header = read_header_line(path)?;
    let schema = Arc::new(utf8_schema(&header));

    let batches = if file_size >= PARALLEL_THRESHOLD {
        let chunk_size = chunk_size_for(file_size, header.len() as u64);
        read_chunked(path, &schema, &header, file_size, chunk_size)?
    } else {
        read_whole(path, &schema)?
    };

    Ok(batches_to_table(table_name, &schema, &batches))
}

/// Restrict the source side to the mapping's source columns, in mapping
/// order.
pub fn align_source(table: Table, mapping: &ColumnMapping) -> Result<Table, ReconError> {
    table.select(&mapping.source_columns())
}

/// Restrict the target side to the mapping's target columns and rename them
/// to the source names, so both sides share one column set.
pub fn align_target(table: Table, mapping: &ColumnMapping) -> Result<Table, ReconError> {
    Ok(table
        .select(&mapping.target_columns())?
        .renamed(mapping.source_columns()))
}

/// First line of the file, newline included.
fn read_header_line(path: &Path) -> Result<String, ReconError> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut header = String::new();
    reader.read_line(&mut header)?;
    if header.trim().is_empty() {
        return Err(
            io::Error::new(io::ErrorKind::InvalidData, "CSV file has no header line").into(),
        );
    }
    Ok(header)
}

/// Every snapshot column is read as nullable Utf8; typing happens after load.
fn utf8_schema(header: &str) -> Schema {
    let fields: Vec<Field> = header
        .trim_end()
        .split(',')
        .map(|column| Field::new(column.trim(), DataType::Utf8, true))
        .collect();
    Schema::new(fields)
}

fn chunk_size_for(file_size: u64, header_len: u64) -> u64 {
    let data_size = file_size.saturating_sub(header_len);
    let desired_chunks = (rayon::current_num_threads() as u64 * CHUNKS_PER_THREAD).max(1);
    (data_size / desired_chunks).clamp(MIN_CHUNK_SIZE, MAX_CHUNK_SIZE)
}

/// Single-pass parse of the whole file.
fn read_whole(path: &Path, schema: &Arc<Schema>) -> Result<Vec<RecordBatch>, ReconError> {
    let reader = CsvReaderBuilder::new(schema.clone())
        .with_header(true)
        .with_batch_size(BATCH_SIZE)
        .build(File::open(path)?)?;

    let mut batches = Vec::new();
    for batch in reader {
        batches.push(batch?);
    }
    Ok(batches)
}

/// Parallel parse: newline-aligned byte ranges, one rayon job per range.
fn read_chunked(
    path: &Path,
    schema: &Arc<Schema>,
    header: &str,
    file_size: u64,
    chunk_size: u64,
) -> Result<Vec<RecordBatch>, ReconError> {
    let ranges = chunk_ranges(path, header.len() as u64, file_size, chunk_size)?;

    let parsed: Result<Vec<Vec<RecordBatch>>, ReconError> = ranges
        .into_par_iter()
        .map(|(start, end)| parse_range(path, schema, header, start, end))
        .collect();

    Ok(parsed?.into_iter().flatten().collect())
}

/// Split `[header_len, file_size)` into ranges ending on newline boundaries.
fn chunk_ranges(
    path: &Path,
    header_len: u64,
    file_size: u64,
    chunk_size: u64,
) -> Result<Vec<(u64, u64)>, ReconError> {
    let mut file = File::open(path)?;
    let mut ranges = Vec::new();
    let mut current = header_len;

    while current < file_size {
        let target_end = (current + chunk_size).min(file_size);
        let actual_end = if target_end >= file_size {
            file_size
        } else {
            next_newline(&mut file, target_end)?
        };
        ranges.push((current, actual_end));
        current = actual_end;
    }
    Ok(ranges)
}

fn next_newline(file: &mut File, pos: u64) -> Result<u64, ReconError> {
    file.seek(SeekFrom::Start(pos))?;
    let mut reader = BufReader::new(file.try_clone()?);
    let mut buffer = Vec::new();
    reader.read_until(b'\n', &mut buffer)?;
    Ok(pos + buffer.len() as u64)
}

/// Parse one byte range, re-prefixing the header so the Arrow reader sees a
/// complete CSV document.
fn parse_range(
    path: &Path,
    schema: &Arc<Schema>,
    header: &str,
    start: u64,
    end: u64,
) -> Result<Vec<RecordBatch>, ReconError> {
    let mut file = File::open(path)?;
    file.seek(SeekFrom::Start(start))?;

    let mut buffer = Vec::with_capacity((end - start) as usize + header.len());
    buffer.extend_from_slice(header.as_bytes());
    file.take(end - start).read_to_end(&mut buffer)?;

    let reader = CsvReaderBuilder::new(schema.clone())
        .with_header(true)
        .with_batch_size(BATCH_SIZE)
        .build(io::Cursor::new(buffer))?;

    let mut batches = Vec::new();
    for batch in reader {
        batches.push(batch?);
    }
    Ok(batches)
}

/// Fold Utf8 batches into a row-oriented table.
///
/// A column is numeric when every non-empty cell parses as f64, mirroring
/// the dtype detection the snapshots were produced under. Empty cells load
/// as [`Value::Null`] in either case.
fn batches_to_table(name: &str, schema: &Schema, batches: &[RecordBatch]) -> Table {
    let columns: Vec<String> = schema.fields().iter().map(|f| f.name().to_string()).collect();
    let total_rows: usize = batches.iter().map(|b| b.num_rows()).sum();

    let mut numeric = vec![true; columns.len()];
    for batch in batches {
        for (index, flag) in numeric.iter_mut().enumerate() {
            if !*flag {
                continue;
            }
            let array = string_column(batch, index);
            for i in 0..array.len() {
                if array.is_null(i) {
                    continue;
                }
                let cell = array.value(i);
                if !cell.is_empty() && cell.trim().parse::<f64>().is_err() {
                    *flag = false;
                    break;
                }
            }
        }
    }

    let mut rows: Vec<Vec<Value>> = Vec::with_capacity(total_rows);
    for batch in batches {
        let arrays: Vec<&StringArray> = (0..batch.num_columns())
            .map(|index| string_column(batch, index))
            .collect();
        for i in 0..batch.num_rows() {
            let row = arrays
                .iter()
                .zip(&numeric)
                .map(|(array, &is_numeric)| {
                    if array.is_null(i) {
                        return Value::Null;
                    }
                    let cell = array.value(i);
                    if cell.is_empty() {
                        Value::Null
                    } else if is_numeric {
                        Value::Number(cell.trim().parse().unwrap_or(f64::NAN))
                    } else {
                        Value::Str(cell.to_string())
                    }
                })
                .collect();
            rows.push(row);
        }
    }

    Table::new(name.to_string(), columns, rows)
}

fn string_column(batch: &RecordBatch, index: usize) -> &StringArray {
    // Safety: the schema declares every column Utf8
    batch
        .column(index)
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap()
}
