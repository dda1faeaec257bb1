use crate::results::{Check, CheckStatus, TaskResults};
use crate::table::Table;

/// Compare raw row counts, before any dedup or key intersection.
///
/// Always records an outcome; both counts go into the details either way.
pub fn compare_row_counts(results: &mut TaskResults, source: &Table, target: &Table) {
    let source_count = source.num_rows();
    let target_count = target.num_rows();

    let details = format!(
        "Source ({}) Row Count: {}, Target ({}) Row Count: {}",
        source.name(),
        source_count,
        target.name(),
        target_count
    );
    let status = if source_count == target_count {
        CheckStatus::Passed
    } else {
        CheckStatus::Failed
    };
    results.push(Check::RowCount, status, details);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::Value;

    fn table(name: &str, n: usize) -> Table {
        Table::new(
            name.to_string(),
            vec!["id".to_string()],
            (0..n).map(|i| vec![Value::Number(i as f64)]).collect(),
        )
    }

    #[test]
    fn test_equal_counts_pass() {
        let mut results = TaskResults::new(1, "t".to_string());
        compare_row_counts(&mut results, &table("s", 3), &table("t", 3));

        let records = results.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, CheckStatus::Passed);
        assert_eq!(
            records[0].details,
            "Source (s) Row Count: 3, Target (t) Row Count: 3"
        );
    }

    #[test]
    fn test_unequal_counts_fail_regardless_of_content() {
        let mut results = TaskResults::new(1, "t".to_string());
        compare_row_counts(&mut results, &table("s", 3), &table("t", 2));

        let records = results.records();
        assert_eq!(records[0].status, CheckStatus::Failed);
        assert!(records[0].details.contains("Row Count: 3"));
        assert!(records[0].details.contains("Row Count: 2"));
    }
}
