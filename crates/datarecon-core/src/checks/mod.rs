//! The four reconciliation checks, in the order a task runs them:
//! row count (1), duplicates (3), missing rows (4), mismatch scan (2).

pub mod duplicates;
pub mod mismatch;
pub mod missing;
pub mod row_count;
