use crate::errors::ReconError;
use crate::values::Value;

/// An in-memory, row-oriented snapshot of one side of a table pair.
///
/// Column names are unique within the table and every row holds exactly one
/// value per column, in column order. A pair's two tables are aligned to the
/// same column set by the loader before any check runs.
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(name: String, columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            name,
            columns,
            rows,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> &[Value] {
        &self.rows[index]
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Resolve every named column to its index, failing on the first one
    /// absent from this table.
    pub fn column_indexes(&self, columns: &[String]) -> Result<Vec<usize>, ReconError> {
        columns
            .iter()
            .map(|column| {
                self.column_index(column)
                    .ok_or_else(|| ReconError::ColumnNotFound {
                        column: column.clone(),
                        table: self.name.clone(),
                    })
            })
            .collect()
    }

    /// Restrict the table to the named columns, in the given order.
    pub fn select(self, columns: &[String]) -> Result<Table, ReconError> {
        let indexes = self.column_indexes(columns)?;
        let rows = self
            .rows
            .into_iter()
            .map(|row| indexes.iter().map(|&i| row[i].clone()).collect())
            .collect();
        Ok(Table {
            name: self.name,
            columns: columns.to_vec(),
            rows,
        })
    }

    /// Replace the column names, keeping row data untouched. Used to align
    /// the target side onto the source side's naming.
    pub fn renamed(mut self, columns: Vec<String>) -> Table {
        debug_assert_eq!(columns.len(), self.columns.len());
        self.columns = columns;
        self
    }

    /// Keep only the rows at the given positions, preserving their order.
    pub(crate) fn filter_rows(&mut self, keep: &[bool]) {
        debug_assert_eq!(keep.len(), self.rows.len());
        let mut index = 0;
        self.rows.retain(|_| {
            let kept = keep[index];
            index += 1;
            kept
        });
    }

    pub(crate) fn take_rows(&mut self) -> Vec<Vec<Value>> {
        std::mem::take(&mut self.rows)
    }

    pub(crate) fn replace_rows(&mut self, rows: Vec<Vec<Value>>) {
        self.rows = rows;
    }
}
