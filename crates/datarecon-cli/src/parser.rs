//! Readers for the two control files: the pair configuration and the
//! column mapping. Both are plain CSVs with fixed headers.

use std::path::Path;

use serde::Deserialize;

use datarecon_core::{ColumnMapping, MappingSet, TablePair};

use crate::errors::ConfigError;

#[derive(Debug, Deserialize)]
struct PairRow {
    #[serde(rename = "Source Tablename")]
    source_table: String,
    #[serde(rename = "Target Tablename")]
    target_table: String,
    #[serde(rename = "Sort_Columns")]
    sort_columns: String,
    #[serde(rename = "Enable")]
    enable: String,
}

#[derive(Debug, Deserialize)]
struct MappingRow {
    #[serde(rename = "Table_Name")]
    table_name: String,
    #[serde(rename = "Source_Columns")]
    source_columns: String,
    #[serde(rename = "Target_Columns")]
    target_columns: String,
}

fn split_columns(field: &str) -> Vec<String> {
    field
        .split(',')
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect()
}

/// Read the pair configuration, keeping only rows with `Enable` set to `Y`.
/// Disabled rows are silently dropped; an all-disabled file yields an empty
/// list, which the orchestrator rejects.
pub fn load_pairs(path: &Path) -> Result<Vec<TablePair>, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let mut reader = csv::Reader::from_path(path)?;
    let mut pairs = Vec::new();
    for row in reader.deserialize() {
        let row: PairRow = row?;
        if !row.enable.trim().eq_ignore_ascii_case("y") {
            continue;
        }
        let key_columns = split_columns(&row.sort_columns);
        if key_columns.is_empty() {
            return Err(ConfigError::EmptyField {
                table: row.source_table,
                field: "Sort_Columns".to_string(),
            });
        }
        pairs.push(TablePair {
            source_table: row.source_table,
            target_table: row.target_table,
            key_columns,
        });
    }
    Ok(pairs)
}

/// Read the column mapping file into a [`MappingSet`], one entry per table.
pub fn load_mappings(path: &Path) -> Result<MappingSet, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let mut reader = csv::Reader::from_path(path)?;
    let mut mappings = MappingSet::default();
    for row in reader.deserialize() {
        let row: MappingRow = row?;
        let mapping = ColumnMapping::new(
            row.table_name,
            split_columns(&row.target_columns),
            split_columns(&row.source_columns),
        )?;
        mappings.insert(mapping);
    }
    Ok(mappings)
}
