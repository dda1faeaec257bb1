//! Key derivation and key-set alignment between the two sides of a pair.
//!
//! A row's key is the value of the single key column, or the values of the
//! composite key columns joined with [`KEY_SEPARATOR`] in column order. Key
//! equality is exact string equality after stringification; no case,
//! whitespace or numeric-format normalization is applied.

use std::collections::{HashMap, HashSet};

use xxhash_rust::xxh3::Xxh3Builder;

use crate::errors::ReconError;
use crate::table::Table;
use crate::values::Value;

/// Separator between composite key parts.
pub const KEY_SEPARATOR: &str = "_";

/// Distinct-key set, hashed with xxh3.
pub type KeySet = HashSet<String, Xxh3Builder>;

/// Derive one key per row, parallel to the table's row order.
///
/// Fails if any key column is absent from the table; that error aborts the
/// enclosing task.
pub fn build_keys(table: &Table, key_columns: &[String]) -> Result<Vec<String>, ReconError> {
    let indexes: Vec<usize> = key_columns
        .iter()
        .map(|column| {
            table
                .column_index(column)
                .ok_or_else(|| ReconError::MissingKeyColumn {
                    column: column.clone(),
                    table: table.name().to_string(),
                })
        })
        .collect::<Result<_, _>>()?;

    let keys = table
        .rows()
        .iter()
        .map(|row| {
            if let [single] = indexes.as_slice() {
                row[*single].to_string()
            } else {
                indexes
                    .iter()
                    .map(|&i| row[i].to_string())
                    .collect::<Vec<_>>()
                    .join(KEY_SEPARATOR)
            }
        })
        .collect();
    Ok(keys)
}

/// Key-set view of a source/target table pair, computed before dedup.
///
/// Dedup keeps one row per key, so the distinct sets below are valid both
/// before and after it.
#[derive(Debug)]
pub struct KeyAlignment {
    pub source_keys: Vec<String>,
    pub target_keys: Vec<String>,
    /// Distinct source keys occurring more than once, in first-seen order.
    pub source_duplicates: Vec<String>,
    /// Distinct target keys occurring more than once, in first-seen order.
    pub target_duplicates: Vec<String>,
    /// Distinct keys present in the source only.
    pub source_only: KeySet,
    /// Distinct keys present on both sides.
    pub common: KeySet,
}

/// Compute per-row keys and the key-set operations for one pair.
pub fn align(
    source: &Table,
    target: &Table,
    key_columns: &[String],
) -> Result<KeyAlignment, ReconError> {
    let source_keys = build_keys(source, key_columns)?;
    let target_keys = build_keys(target, key_columns)?;

    let source_duplicates = duplicate_keys(&source_keys);
    let target_duplicates = duplicate_keys(&target_keys);

    let source_set: KeySet = source_keys.iter().cloned().collect();
    let target_set: KeySet = target_keys.iter().cloned().collect();

    let source_only = source_set.difference(&target_set).cloned().collect();
    let common = source_set.intersection(&target_set).cloned().collect();

    Ok(KeyAlignment {
        source_keys,
        target_keys,
        source_duplicates,
        target_duplicates,
        source_only,
        common,
    })
}

/// Distinct keys appearing more than once, in first-seen order.
fn duplicate_keys(keys: &[String]) -> Vec<String> {
    let mut counts: HashMap<&str, usize, Xxh3Builder> =
        HashMap::with_capacity_and_hasher(keys.len(), Xxh3Builder::new());
    for key in keys {
        *counts.entry(key).or_insert(0) += 1;
    }

    let mut seen: HashSet<&str, Xxh3Builder> = HashSet::with_hasher(Xxh3Builder::new());
    keys.iter()
        .filter(|key| counts[key.as_str()] > 1 && seen.insert(key.as_str()))
        .cloned()
        .collect()
}

/// Drop all but the first occurrence of every key, in original load order.
/// The keys vector stays parallel to the surviving rows.
pub fn dedup_keep_first(table: &mut Table, keys: &mut Vec<String>) {
    let mut seen: KeySet = HashSet::with_capacity_and_hasher(keys.len(), Xxh3Builder::new());
    let keep: Vec<bool> = keys.iter().map(|key| seen.insert(key.clone())).collect();

    table.filter_rows(&keep);
    let mut index = 0;
    keys.retain(|_| {
        let kept = keep[index];
        index += 1;
        kept
    });
}

/// Keep only the rows whose key belongs to `wanted`, preserving order.
pub fn retain_keys(table: &mut Table, keys: &mut Vec<String>, wanted: &KeySet) {
    let keep: Vec<bool> = keys.iter().map(|key| wanted.contains(key)).collect();
    table.filter_rows(&keep);
    let mut index = 0;
    keys.retain(|_| {
        let kept = keep[index];
        index += 1;
        kept
    });
}

/// Stable ascending sort by the key columns, multi-column lexicographic,
/// rows re-indexed from 0. The keys vector is permuted alongside the rows.
pub fn sort_by_key_columns(
    table: &mut Table,
    keys: &mut Vec<String>,
    key_columns: &[String],
) -> Result<(), ReconError> {
    let indexes = table.column_indexes(key_columns)?;

    let rows = table.take_rows();
    let mut paired: Vec<(String, Vec<Value>)> =
        std::mem::take(keys).into_iter().zip(rows).collect();
    paired.sort_by(|a, b| {
        indexes
            .iter()
            .map(|&i| a.1[i].cmp(&b.1[i]))
            .find(|ord| ord.is_ne())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let (sorted_keys, sorted_rows): (Vec<String>, Vec<Vec<Value>>) = paired.into_iter().unzip();
    *keys = sorted_keys;
    table.replace_rows(sorted_rows);
    Ok(())
}
