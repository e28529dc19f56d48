//! Core data types for the query-answering pipeline.

use serde::{Deserialize, Serialize};

/// A catalog record for one standard.
///
/// Created by the external preparation job; read-only to the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Standard reference code (unique)
    pub id: String,

    /// Title in the primary language
    pub title_en: String,

    /// Title in the secondary language
    pub title_fr: Option<String>,

    /// Abstract/scope text
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,

    /// Publication date as recorded in the catalog
    #[serde(rename = "publicationDate")]
    pub publication_date: Option<String>,

    /// Edition number
    pub edition: Option<i64>,

    /// Classification code
    #[serde(rename = "icsCode")]
    pub ics_code: Option<String>,

    /// Owning committee reference
    #[serde(rename = "ownerCommittee")]
    pub owner_committee: Option<String>,

    /// Concatenated text used for embedding
    pub full_text: Option<String>,

    /// Lifecycle status
    pub status: Option<String>,

    /// Publication year
    pub year: Option<i64>,
}

/// An ordered result table over named columns.
///
/// Cell values are rendered to display strings at query time; the chart
/// selector and synthesizer only ever look at column names and row shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultTable {
    /// Column names, in SELECT order
    pub columns: Vec<String>,

    /// Rows, each cell aligned with `columns`
    pub rows: Vec<Vec<String>>,
}

impl ResultTable {
    /// Create a table from columns and rows.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// True when the table carries no usable data.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() || self.rows.is_empty()
    }
}

/// Outcome of executing a generated SQL statement.
///
/// Execution failures are values, not errors: the pipeline continues to
/// synthesis with the error text standing in for results.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SqlOutcome {
    /// The statement ran and produced a (possibly empty) table
    Table(ResultTable),

    /// The statement failed; the text describes why
    Failed(String),
}

impl SqlOutcome {
    /// The result table, if execution succeeded.
    pub fn table(&self) -> Option<&ResultTable> {
        match self {
            SqlOutcome::Table(table) => Some(table),
            SqlOutcome::Failed(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_table_empty() {
        assert!(ResultTable::default().is_empty());

        let no_rows = ResultTable::new(vec!["year".to_string()], vec![]);
        assert!(no_rows.is_empty());

        let populated = ResultTable::new(
            vec!["year".to_string()],
            vec![vec!["2020".to_string()]],
        );
        assert!(!populated.is_empty());
        assert_eq!(populated.row_count(), 1);
    }

    #[test]
    fn test_sql_outcome_serializes_untagged() {
        let failed = SqlOutcome::Failed("Error executing query: syntax error".to_string());
        let json = serde_json::to_value(&failed).unwrap();
        assert!(json.is_string());

        let table = SqlOutcome::Table(ResultTable::new(
            vec!["count".to_string()],
            vec![vec!["3".to_string()]],
        ));
        let json = serde_json::to_value(&table).unwrap();
        assert!(json.is_object());
    }

    #[test]
    fn test_sql_outcome_table_accessor() {
        let failed = SqlOutcome::Failed("boom".to_string());
        assert!(failed.table().is_none());

        let table = SqlOutcome::Table(ResultTable::default());
        assert!(table.table().is_some());
    }
}
