//! In-memory retrieval index.
//!
//! The index is a fixed-size ordered sequence of unit-normalized embedding
//! vectors, index-aligned with a parallel sequence of document identifiers.
//! It is loaded once from the catalog database's `embeddings` table at
//! startup and never mutated afterwards, so it is safe to share across any
//! number of concurrent readers. A missing or empty table degrades to an
//! empty index; retrieval then returns empty results instead of failing.

use normqa_core::{AppError, AppResult};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;

/// Immutable retrieval index: id-aligned matrix of embedding vectors.
#[derive(Debug, Clone)]
pub struct RetrievalIndex {
    ids: Vec<String>,
    vectors: Vec<Vec<f32>>,
    dimensions: usize,
}

impl RetrievalIndex {
    /// Create an empty index.
    pub fn empty() -> Self {
        Self {
            ids: Vec::new(),
            vectors: Vec::new(),
            dimensions: 0,
        }
    }

    /// Build an index from parallel id and vector sequences.
    ///
    /// Invariant: the sequences are equal length and every vector shares
    /// one dimensionality.
    pub fn from_parts(ids: Vec<String>, vectors: Vec<Vec<f32>>) -> AppResult<Self> {
        if ids.len() != vectors.len() {
            return Err(AppError::Store(format!(
                "Index id/vector count mismatch: {} ids, {} vectors",
                ids.len(),
                vectors.len()
            )));
        }

        let dimensions = vectors.first().map(|v| v.len()).unwrap_or(0);
        if vectors.iter().any(|v| v.len() != dimensions) {
            return Err(AppError::Store(
                "Index vectors have inconsistent dimensions".to_string(),
            ));
        }

        Ok(Self {
            ids,
            vectors,
            dimensions,
        })
    }

    /// Load the index from the `embeddings` table of the catalog database.
    ///
    /// Any failure (missing file, missing table, malformed blob) degrades
    /// to an empty index with a warning; retrieval is never fatal at load
    /// time.
    pub fn load(db_path: &Path) -> Self {
        match Self::try_load(db_path) {
            Ok(index) => {
                tracing::info!(
                    "Loaded retrieval index: {} vectors x {} dimensions",
                    index.len(),
                    index.dimensions()
                );
                index
            }
            Err(e) => {
                tracing::warn!("Retrieval index unavailable, degrading to empty: {}", e);
                Self::empty()
            }
        }
    }

    fn try_load(db_path: &Path) -> AppResult<Self> {
        let conn = Connection::open_with_flags(
            db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| AppError::Store(format!("Failed to open {:?}: {}", db_path, e)))?;

        let mut stmt = conn
            .prepare("SELECT id, vector FROM embeddings ORDER BY rowid")
            .map_err(|e| AppError::Store(format!("Failed to read embeddings table: {}", e)))?;

        let entries = stmt
            .query_map([], |row| {
                let id: String = row.get(0)?;
                let blob: Vec<u8> = row.get(1)?;
                Ok((id, blob))
            })
            .map_err(|e| AppError::Store(format!("Failed to query embeddings: {}", e)))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| AppError::Store(format!("Failed to read embedding row: {}", e)))?;

        let mut ids = Vec::with_capacity(entries.len());
        let mut vectors = Vec::with_capacity(entries.len());
        for (id, blob) in entries {
            let vector = bytes_to_embedding(&blob)?;
            ids.push(id);
            vectors.push(vector);
        }

        Self::from_parts(ids, vectors)
    }

    /// Number of indexed documents.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True when no vectors are loaded.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Dimensionality of the indexed vectors (0 when empty).
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Document identifiers, in index order.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Iterate over (identifier, vector) pairs in index order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &[f32])> {
        self.ids
            .iter()
            .map(String::as_str)
            .zip(self.vectors.iter().map(Vec::as_slice))
    }
}

/// Convert an embedding vector to little-endian bytes for storage.
///
/// Shared with the external preparation job, which writes the
/// `embeddings` table in this format.
pub fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(embedding.len() * 4);
    for &value in embedding {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

/// Convert stored bytes back to an embedding vector.
pub fn bytes_to_embedding(bytes: &[u8]) -> AppResult<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        return Err(AppError::Store(
            "Invalid embedding bytes length".to_string(),
        ));
    }

    let mut embedding = Vec::with_capacity(bytes.len() / 4);
    for chunk in bytes.chunks_exact(4) {
        let value = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        embedding.push(value);
    }

    Ok(embedding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{seed_catalog, seed_embeddings};
    use tempfile::NamedTempFile;

    #[test]
    fn test_bytes_roundtrip() {
        let vector = vec![0.5, -1.25, 3.0];
        let bytes = embedding_to_bytes(&vector);
        assert_eq!(bytes.len(), 12);
        assert_eq!(bytes_to_embedding(&bytes).unwrap(), vector);
    }

    #[test]
    fn test_bytes_invalid_length() {
        assert!(bytes_to_embedding(&[1, 2, 3]).is_err());
    }

    #[test]
    fn test_load_from_catalog() {
        let file = NamedTempFile::new().unwrap();
        seed_catalog(file.path());
        seed_embeddings(
            file.path(),
            &[
                ("9001", vec![1.0, 0.0, 0.0]),
                ("14001", vec![0.0, 1.0, 0.0]),
            ],
        );

        let index = RetrievalIndex::load(file.path());
        assert_eq!(index.len(), 2);
        assert_eq!(index.dimensions(), 3);
        assert_eq!(index.ids(), &["9001".to_string(), "14001".to_string()]);
    }

    #[test]
    fn test_missing_database_degrades_to_empty() {
        let index = RetrievalIndex::load(Path::new("/nonexistent/standards.db"));
        assert!(index.is_empty());
        assert_eq!(index.dimensions(), 0);
    }

    #[test]
    fn test_missing_table_degrades_to_empty() {
        let file = NamedTempFile::new().unwrap();
        seed_catalog(file.path()); // no embeddings table

        let index = RetrievalIndex::load(file.path());
        assert!(index.is_empty());
    }

    #[test]
    fn test_from_parts_mismatch() {
        let result = RetrievalIndex::from_parts(
            vec!["a".to_string()],
            vec![vec![1.0], vec![2.0]],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_from_parts_inconsistent_dimensions() {
        let result = RetrievalIndex::from_parts(
            vec!["a".to_string(), "b".to_string()],
            vec![vec![1.0, 0.0], vec![2.0]],
        );
        assert!(result.is_err());
    }
}
