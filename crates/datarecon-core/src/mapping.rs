use std::collections::HashMap;

use crate::errors::ReconError;

/// Ordered target-column -> source-column pairs for exactly one table.
///
/// Both sides have the same cardinality and no column name appears twice on
/// either side; construction enforces the invariant.
#[derive(Debug, Clone)]
pub struct ColumnMapping {
    table: String,
    pairs: Vec<(String, String)>,
}

impl ColumnMapping {
    pub fn new(
        table: String,
        target_columns: Vec<String>,
        source_columns: Vec<String>,
    ) -> Result<Self, ReconError> {
        if target_columns.len() != source_columns.len() {
            return Err(ReconError::ColumnCountMismatch {
                table,
                source_count: source_columns.len(),
                target_count: target_columns.len(),
            });
        }
        for side in [&target_columns, &source_columns] {
            for (i, column) in side.iter().enumerate() {
                if side[..i].contains(column) {
                    return Err(ReconError::DuplicateMappedColumn {
                        table: table.clone(),
                        column: column.clone(),
                    });
                }
            }
        }

        let pairs = target_columns.into_iter().zip(source_columns).collect();
        Ok(Self { table, pairs })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Source column names, in mapping order.
    pub fn source_columns(&self) -> Vec<String> {
        self.pairs.iter().map(|(_, s)| s.clone()).collect()
    }

    /// Target column names, in mapping order.
    pub fn target_columns(&self) -> Vec<String> {
        self.pairs.iter().map(|(t, _)| t.clone()).collect()
    }
}

/// Per-table mapping lookup, shared read-only across all tasks of a run.
#[derive(Debug, Clone, Default)]
pub struct MappingSet {
    by_table: HashMap<String, ColumnMapping>,
}

impl MappingSet {
    pub fn insert(&mut self, mapping: ColumnMapping) {
        self.by_table.insert(mapping.table().to_string(), mapping);
    }

    /// Resolve the mapping for a table, or signal a per-task configuration
    /// error if none exists.
    pub fn get(&self, table: &str) -> Result<&ColumnMapping, ReconError> {
        self.by_table
            .get(table)
            .ok_or_else(|| ReconError::MappingNotFound(table.to_string()))
    }

    pub fn len(&self) -> usize {
        self.by_table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_table.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_mapping_preserves_order() {
        let mapping = ColumnMapping::new(
            "orders".to_string(),
            columns(&["tgt_id", "tgt_name"]),
            columns(&["id", "name"]),
        )
        .unwrap();

        assert_eq!(mapping.source_columns(), columns(&["id", "name"]));
        assert_eq!(mapping.target_columns(), columns(&["tgt_id", "tgt_name"]));
        assert_eq!(mapping.len(), 2);
    }

    #[test]
    fn test_unequal_cardinality_rejected() {
        let err = ColumnMapping::new(
            "orders".to_string(),
            columns(&["a", "b"]),
            columns(&["a"]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ReconError::ColumnCountMismatch {
                source_count: 1,
                target_count: 2,
                ..
            }
        ));
        assert_eq!(
            err.to_string(),
            "Mismatch in the number of source and target columns for table 'orders': \
             1 source vs 2 target"
        );
    }

    #[test]
    fn test_double_mapped_column_rejected() {
        let err = ColumnMapping::new(
            "orders".to_string(),
            columns(&["a", "a"]),
            columns(&["x", "y"]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ReconError::DuplicateMappedColumn { ref column, .. } if column == "a"
        ));
    }

    #[test]
    fn test_lookup_unknown_table() {
        let set = MappingSet::default();
        let err = set.get("nowhere").unwrap_err();
        assert!(matches!(err, ReconError::MappingNotFound(ref t) if t == "nowhere"));
    }
}
