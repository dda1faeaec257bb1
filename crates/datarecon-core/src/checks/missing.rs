use std::path::Path;

use crate::errors::ReconError;
use crate::keys::KeyAlignment;
use crate::report;
use crate::results::{Check, CheckStatus, TaskResults};
use crate::table::Table;

/// Report source rows whose key has no counterpart in the target.
///
/// Runs on the deduplicated source, so each missing key contributes exactly
/// one row to the report. Nothing is recorded and no file is written when
/// the difference is empty.
pub fn detect_missing_rows(
    results: &mut TaskResults,
    source: &Table,
    alignment: &KeyAlignment,
    output_dir: &Path,
) -> Result<(), ReconError> {
    if alignment.source_only.is_empty() {
        return Ok(());
    }

    let missing_rows: Vec<&[crate::values::Value]> = alignment
        .source_keys
        .iter()
        .zip(source.rows())
        .filter(|(key, _)| alignment.source_only.contains(key.as_str()))
        .map(|(_, row)| row.as_slice())
        .collect();

    let path =
        report::write_missing_report(output_dir, source.name(), source.columns(), &missing_rows)?;
    let details = format!(
        "{} rows missing in target. Details saved in {}.",
        missing_rows.len(),
        path.display()
    );
    results.push(Check::MissingRows, CheckStatus::Failed, details);
    Ok(())
}
