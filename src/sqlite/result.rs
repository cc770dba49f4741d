use std::collections::HashMap;

use super::Value;

/// One result row, column name to value.
///
/// Column order is not kept; look values up by column name.
pub type Row = HashMap<String, Value>;

/// Outcome of a statement that prepared successfully.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    /// Every row the statement produced; empty for most writes.
    Rows(Vec<Row>),
    /// The driver reported that execution did not succeed.
    NoResult,
}

impl QueryResult {
    pub fn rows(&self) -> Option<&[Row]> {
        match self {
            QueryResult::Rows(rows) => Some(rows),
            QueryResult::NoResult => None,
        }
    }

    pub fn into_rows(self) -> Option<Vec<Row>> {
        match self {
            QueryResult::Rows(rows) => Some(rows),
            QueryResult::NoResult => None,
        }
    }

    pub fn is_no_result(&self) -> bool {
        matches!(self, QueryResult::NoResult)
    }
}
