//! Catalog store access.
//!
//! The catalog is a read-only SQLite database with two tables the pipeline
//! cares about (`standards`, `committees`) plus the `embeddings` table the
//! retrieval index is loaded from. Connections are opened read-only and
//! per call; concurrent requests never contend on a shared handle.

use crate::types::{Document, ResultTable, SqlOutcome};
use normqa_core::{AppError, AppResult};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};

/// Handle to the catalog database.
///
/// Holds only the path; each operation opens and releases its own
/// connection.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    db_path: PathBuf,
}

impl CatalogStore {
    /// Create a store handle for the given database path.
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    /// Path to the underlying database file.
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Open a read-only connection.
    fn open(&self) -> AppResult<Connection> {
        Connection::open_with_flags(
            &self.db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| {
            AppError::Store(format!(
                "Failed to open catalog database {:?}: {}",
                self.db_path, e
            ))
        })
    }

    /// Resolve full Document records for a set of identifiers.
    ///
    /// The lookup is set-membership; rows come back in no guaranteed order
    /// relative to any similarity rank. Callers needing rank order must
    /// re-sort by their original identifier sequence.
    pub fn documents_by_ids(&self, ids: &[String]) -> AppResult<Vec<Document>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.open()?;

        let placeholders = vec!["?"; ids.len()].join(",");
        let sql = format!(
            "SELECT id, title_en, title_fr, abstract, publicationDate, edition, \
             icsCode, ownerCommittee, full_text, status, year \
             FROM standards WHERE id IN ({})",
            placeholders
        );

        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| AppError::Store(format!("Failed to prepare document lookup: {}", e)))?;

        let documents = stmt
            .query_map(rusqlite::params_from_iter(ids.iter()), |row| {
                Ok(Document {
                    id: row.get(0)?,
                    title_en: row.get(1)?,
                    title_fr: row.get(2)?,
                    abstract_text: row.get(3)?,
                    publication_date: row.get(4)?,
                    edition: row.get(5)?,
                    ics_code: row.get(6)?,
                    owner_committee: row.get(7)?,
                    full_text: row.get(8)?,
                    status: row.get(9)?,
                    year: row.get(10)?,
                })
            })
            .map_err(|e| AppError::Store(format!("Failed to query documents: {}", e)))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| AppError::Store(format!("Failed to read document row: {}", e)))?;

        tracing::debug!(
            "Resolved {} of {} requested documents",
            documents.len(),
            ids.len()
        );

        Ok(documents)
    }

    /// Execute a generated SQL statement against the catalog.
    ///
    /// Any execution failure (malformed SQL, missing column, syntax error)
    /// is converted into `SqlOutcome::Failed`, never propagated: the
    /// pipeline continues to synthesis with the error text standing in for
    /// results.
    pub fn execute(&self, sql: &str) -> SqlOutcome {
        match self.run_select(sql) {
            Ok(table) => SqlOutcome::Table(table),
            Err(e) => {
                tracing::warn!("Generated SQL failed: {}", e);
                SqlOutcome::Failed(format!("Error executing query: {}", e))
            }
        }
    }

    fn run_select(&self, sql: &str) -> AppResult<ResultTable> {
        let conn = self.open()?;

        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| AppError::Store(e.to_string()))?;

        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();
        let column_count = columns.len();

        let mut rows = stmt
            .query([])
            .map_err(|e| AppError::Store(e.to_string()))?;

        let mut table_rows = Vec::new();
        while let Some(row) = rows.next().map_err(|e| AppError::Store(e.to_string()))? {
            let mut cells = Vec::with_capacity(column_count);
            for i in 0..column_count {
                let value = row
                    .get_ref(i)
                    .map_err(|e| AppError::Store(e.to_string()))?;
                cells.push(render_value(value));
            }
            table_rows.push(cells);
        }

        Ok(ResultTable::new(columns, table_rows))
    }

    /// Number of standards in the catalog, for diagnostics.
    pub fn standards_count(&self) -> AppResult<u32> {
        let conn = self.open()?;
        conn.query_row("SELECT COUNT(*) FROM standards", [], |row| {
            row.get::<_, i64>(0).map(|v| v as u32)
        })
        .map_err(|e| AppError::Store(format!("Failed to count standards: {}", e)))
    }
}

/// Render a SQLite value to its display string.
fn render_value(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(r) => r.to_string(),
        ValueRef::Text(t) => String::from_utf8_lossy(t).to_string(),
        ValueRef::Blob(_) => "<blob>".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::seed_catalog;
    use tempfile::NamedTempFile;

    #[test]
    fn test_documents_by_ids() {
        let file = NamedTempFile::new().unwrap();
        seed_catalog(file.path());
        let store = CatalogStore::new(file.path());

        let docs = store
            .documents_by_ids(&["9001".to_string(), "27001".to_string()])
            .unwrap();
        assert_eq!(docs.len(), 2);
        assert!(docs.iter().any(|d| d.id == "9001"));
        assert!(docs.iter().any(|d| d.id == "27001"));

        let doc = docs.iter().find(|d| d.id == "9001").unwrap();
        assert_eq!(doc.title_en, "Quality management systems");
        assert_eq!(doc.year, Some(2015));
    }

    #[test]
    fn test_documents_by_ids_empty_input() {
        let file = NamedTempFile::new().unwrap();
        seed_catalog(file.path());
        let store = CatalogStore::new(file.path());

        assert!(store.documents_by_ids(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_execute_select() {
        let file = NamedTempFile::new().unwrap();
        seed_catalog(file.path());
        let store = CatalogStore::new(file.path());

        let outcome =
            store.execute("SELECT year, COUNT(*) AS count FROM standards GROUP BY year ORDER BY year");
        let table = outcome.table().expect("expected a table");
        assert_eq!(table.columns, vec!["year", "count"]);
        assert_eq!(table.rows, vec![
            vec!["2015".to_string(), "2".to_string()],
            vec!["2022".to_string(), "1".to_string()],
        ]);
    }

    #[test]
    fn test_execute_failure_is_a_value() {
        let file = NamedTempFile::new().unwrap();
        seed_catalog(file.path());
        let store = CatalogStore::new(file.path());

        match store.execute("SELEC broken") {
            SqlOutcome::Failed(text) => assert!(text.starts_with("Error executing query:")),
            SqlOutcome::Table(_) => panic!("expected failure"),
        }
    }

    #[test]
    fn test_execute_rejects_writes() {
        let file = NamedTempFile::new().unwrap();
        seed_catalog(file.path());
        let store = CatalogStore::new(file.path());

        // Read-only connection: writes fail and become error text
        match store.execute("DELETE FROM standards") {
            SqlOutcome::Failed(_) => {}
            SqlOutcome::Table(_) => panic!("write should not succeed"),
        }

        assert_eq!(store.standards_count().unwrap(), 3);
    }

    #[test]
    fn test_null_renders_empty() {
        let file = NamedTempFile::new().unwrap();
        seed_catalog(file.path());
        let store = CatalogStore::new(file.path());

        let outcome = store.execute("SELECT title_fr FROM standards WHERE id = '14001'");
        let table = outcome.table().unwrap();
        assert_eq!(table.rows[0][0], "");
    }
}
