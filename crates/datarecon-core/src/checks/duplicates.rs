use std::path::Path;

use log::debug;

use crate::errors::ReconError;
use crate::keys::{self, KeyAlignment};
use crate::report;
use crate::results::{Check, CheckStatus, TaskResults};
use crate::table::Table;

/// Detect duplicate keys in the target, then deduplicate both sides
/// keep-first so later checks see at most one row per key.
///
/// On find: the distinct offending keys go to the per-table report file and a
/// Failed record is emitted. The clean path records nothing, matching the
/// historical log format consumers expect.
pub fn detect_and_dedup(
    results: &mut TaskResults,
    source: &mut Table,
    target: &mut Table,
    alignment: &mut KeyAlignment,
    output_dir: &Path,
) -> Result<(), ReconError> {
    if !alignment.target_duplicates.is_empty() {
        let path =
            report::write_duplicate_report(output_dir, target.name(), &alignment.target_duplicates)?;
        let details = format!(
            "{} duplicate keys found. Details saved in {}.",
            alignment.target_duplicates.len(),
            path.display()
        );
        results.push(Check::Duplicates, CheckStatus::Failed, details);
    }
    if !alignment.source_duplicates.is_empty() {
        debug!(
            "Source table '{}' carries {} duplicate keys; keeping first occurrences",
            source.name(),
            alignment.source_duplicates.len()
        );
    }

    keys::dedup_keep_first(source, &mut alignment.source_keys);
    keys::dedup_keep_first(target, &mut alignment.target_keys);
    Ok(())
}
