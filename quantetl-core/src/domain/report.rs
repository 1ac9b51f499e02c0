//! Quality report entries produced by the validator.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Audit entry for one validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityReportEntry {
    /// When the validation ran.
    pub timestamp: NaiveDateTime,
    pub initial_rows: usize,
    pub final_rows: usize,
    pub removed_rows: usize,
    /// One message per rule that fired, in rule order.
    pub issues: Vec<String>,
}

impl QualityReportEntry {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}
