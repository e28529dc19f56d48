//! Query-answering pipeline for the standards catalog.
//!
//! This crate implements the orchestration that turns a natural-language
//! question into one narrative answer by combining three retrieval
//! strategies:
//! - semantic document search over a pre-built embedding index,
//! - generated-SQL statistical lookup against the catalog store,
//! - chart synthesis from the SQL result table.
//!
//! Every stage before the final synthesis absorbs its own failures into a
//! degraded-but-valid request state: an unreachable index yields no
//! documents, a broken generated statement yields error text in place of a
//! table, and an unbuildable chart is simply absent. The pipeline always
//! continues to synthesis.
//!
//! The catalog store and embedding artifacts are produced by an external
//! preparation job; this crate only ever reads them.

pub mod chart;
pub mod embeddings;
pub mod index;
pub mod orchestrator;
pub mod retriever;
pub mod sanitize;
pub mod sql;
pub mod store;
pub mod synthesize;
pub mod types;

#[cfg(test)]
pub(crate) mod testutil;

// Re-export main types
pub use chart::{ChartKind, ChartSpec};
pub use index::RetrievalIndex;
pub use orchestrator::{AskResponse, Orchestrator};
pub use retriever::SemanticRetriever;
pub use sql::SqlTranslator;
pub use store::CatalogStore;
pub use synthesize::Synthesizer;
pub use types::{Document, ResultTable, SqlOutcome};
