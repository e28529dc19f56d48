//! Semantic retrieval over the catalog.
//!
//! Embeds the question with the same model that built the retrieval index,
//! ranks every indexed document by dot product (valid as cosine similarity
//! because both sides are unit-normalized), resolves the top-k documents
//! from the catalog store, and asks the completion service for a short
//! narrative over their metadata.

use crate::embeddings::EmbeddingProvider;
use crate::index::RetrievalIndex;
use crate::sanitize::strip_reasoning;
use crate::store::CatalogStore;
use crate::types::Document;
use normqa_core::{AppError, AppResult};
use normqa_llm::{LlmClient, LlmRequest};
use std::sync::Arc;

/// Marker used when retrieval produces nothing to narrate.
pub const NO_DOCUMENTS_TEXT: &str = "No documents found.";

/// Output of the retrieval stage.
#[derive(Debug, Clone)]
pub struct Retrieval {
    /// Ranked document identifiers, best first
    pub document_ids: Vec<String>,

    /// Resolved documents, re-sorted into rank order
    pub documents: Vec<Document>,

    /// Narrative over the retrieved metadata, fed into synthesis
    pub narrative: String,
}

impl Retrieval {
    fn empty() -> Self {
        Self {
            document_ids: Vec::new(),
            documents: Vec::new(),
            narrative: NO_DOCUMENTS_TEXT.to_string(),
        }
    }
}

/// Semantic retriever over an immutable index.
pub struct SemanticRetriever {
    index: Arc<RetrievalIndex>,
    embedder: Arc<dyn EmbeddingProvider>,
    store: CatalogStore,
    llm: Arc<dyn LlmClient>,
    model: String,
}

impl SemanticRetriever {
    /// Create a retriever over an already-loaded index.
    ///
    /// The index is handed in explicitly; it is never a hidden global and
    /// is rebuilt only by reloading it and constructing a new retriever.
    pub fn new(
        index: Arc<RetrievalIndex>,
        embedder: Arc<dyn EmbeddingProvider>,
        store: CatalogStore,
        llm: Arc<dyn LlmClient>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            index,
            embedder,
            store,
            llm,
            model: model.into(),
        }
    }

    /// Rank catalog entries by similarity to the query.
    ///
    /// Returns at most `top_k` identifiers ordered by descending
    /// similarity. Ties break by ascending identifier so ranking is fully
    /// deterministic. An empty index yields an empty result, never an
    /// error.
    pub async fn search(&self, query: &str, top_k: usize) -> AppResult<Vec<String>> {
        if self.index.is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }

        let query_vector = self.embedder.embed(query).await?;

        if query_vector.len() != self.index.dimensions() {
            return Err(AppError::Model(format!(
                "Query embedding has {} dimensions, index expects {}",
                query_vector.len(),
                self.index.dimensions()
            )));
        }

        let mut scored: Vec<(&str, f32)> = self
            .index
            .entries()
            .map(|(id, vector)| (id, dot(&query_vector, vector)))
            .collect();

        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(b.0))
        });
        scored.truncate(top_k);

        tracing::debug!(
            "Ranked {} candidates, best score {:.3}",
            scored.len(),
            scored.first().map(|(_, s)| *s).unwrap_or(0.0)
        );

        Ok(scored.into_iter().map(|(id, _)| id.to_string()).collect())
    }

    /// Format document metadata into context blocks for the prompt.
    pub fn format_context(documents: &[Document]) -> String {
        documents
            .iter()
            .map(|d| {
                format!(
                    "Ref: ISO {}\nTitle: {}\nAbstract: {}",
                    d.id,
                    d.title_en,
                    d.abstract_text.as_deref().unwrap_or("")
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Run the full retrieval stage: search, resolve, narrate.
    pub async fn process(&self, query: &str, top_k: usize) -> AppResult<Retrieval> {
        let document_ids = self.search(query, top_k).await?;

        if document_ids.is_empty() {
            tracing::info!("Retrieval found no documents");
            return Ok(Retrieval::empty());
        }

        let unordered = self.store.documents_by_ids(&document_ids)?;
        let documents = sort_by_rank(unordered, &document_ids);

        let context = Self::format_context(&documents);
        let narrative = match self.narrate(query, &context).await {
            Ok(text) => text,
            Err(e) => {
                // Degrade to the raw context; the stage stays useful
                tracing::warn!("Retrieval narrative failed, using raw context: {}", e);
                context
            }
        };

        tracing::info!("Retrieved {} documents", documents.len());

        Ok(Retrieval {
            document_ids,
            documents,
            narrative,
        })
    }

    /// Generate the retrieval narrative via the completion service.
    async fn narrate(&self, query: &str, context: &str) -> AppResult<String> {
        let system = normqa_prompt::retrieval_prompt(query, context)?;
        let request = LlmRequest::new(query, &self.model).with_system(system);

        let response = self.llm.complete(&request).await?;

        Ok(strip_reasoning(&response.content).trim().to_string())
    }
}

/// Re-sort resolved documents into the ranked identifier order.
///
/// The store's set-membership lookup returns rows in no guaranteed order.
fn sort_by_rank(mut documents: Vec<Document>, ranked_ids: &[String]) -> Vec<Document> {
    let rank = |id: &str| {
        ranked_ids
            .iter()
            .position(|r| r == id)
            .unwrap_or(usize::MAX)
    };
    documents.sort_by_key(|d| rank(&d.id));
    documents
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::providers::mock::MockProvider;
    use crate::testutil::{seed_catalog, seed_embeddings, FailingLlm, ScriptedLlm};
    use tempfile::NamedTempFile;

    /// Embedder that returns a fixed vector regardless of input.
    #[derive(Debug)]
    struct FixedEmbedder(Vec<f32>);

    #[async_trait::async_trait]
    impl EmbeddingProvider for FixedEmbedder {
        fn provider_name(&self) -> &str {
            "fixed"
        }
        fn model_name(&self) -> &str {
            "fixed"
        }
        fn dimensions(&self) -> usize {
            self.0.len()
        }
        async fn embed(&self, _text: &str) -> AppResult<Vec<f32>> {
            Ok(self.0.clone())
        }
    }

    fn retriever_with(
        index: RetrievalIndex,
        embedder: Arc<dyn EmbeddingProvider>,
        store: CatalogStore,
        llm: Arc<dyn LlmClient>,
    ) -> SemanticRetriever {
        SemanticRetriever::new(Arc::new(index), embedder, store, llm, "test-model")
    }

    #[tokio::test]
    async fn test_search_orders_by_similarity() {
        let file = NamedTempFile::new().unwrap();
        seed_catalog(file.path());
        seed_embeddings(
            file.path(),
            &[
                ("9001", vec![1.0, 0.0, 0.0]),
                ("14001", vec![0.0, 1.0, 0.0]),
                ("27001", vec![0.6, 0.8, 0.0]),
            ],
        );

        let index = RetrievalIndex::load(file.path());
        let retriever = retriever_with(
            index,
            Arc::new(FixedEmbedder(vec![1.0, 0.0, 0.0])),
            CatalogStore::new(file.path()),
            Arc::new(ScriptedLlm::new(vec![])),
        );

        let ids = retriever.search("query", 3).await.unwrap();
        assert_eq!(ids, vec!["9001", "27001", "14001"]);
    }

    #[tokio::test]
    async fn test_search_respects_top_k() {
        let file = NamedTempFile::new().unwrap();
        seed_catalog(file.path());
        seed_embeddings(
            file.path(),
            &[
                ("9001", vec![1.0, 0.0]),
                ("14001", vec![0.9, 0.1]),
                ("27001", vec![0.8, 0.2]),
            ],
        );

        let index = RetrievalIndex::load(file.path());
        let retriever = retriever_with(
            index,
            Arc::new(FixedEmbedder(vec![1.0, 0.0])),
            CatalogStore::new(file.path()),
            Arc::new(ScriptedLlm::new(vec![])),
        );

        let ids = retriever.search("query", 2).await.unwrap();
        assert_eq!(ids.len(), 2);
    }

    #[tokio::test]
    async fn test_search_ties_break_by_identifier() {
        let file = NamedTempFile::new().unwrap();
        seed_catalog(file.path());
        // Identical vectors: identical scores
        seed_embeddings(
            file.path(),
            &[
                ("14001", vec![1.0, 0.0]),
                ("9001", vec![1.0, 0.0]),
                ("27001", vec![1.0, 0.0]),
            ],
        );

        let index = RetrievalIndex::load(file.path());
        let retriever = retriever_with(
            index,
            Arc::new(FixedEmbedder(vec![1.0, 0.0])),
            CatalogStore::new(file.path()),
            Arc::new(ScriptedLlm::new(vec![])),
        );

        let ids = retriever.search("query", 3).await.unwrap();
        assert_eq!(ids, vec!["14001", "27001", "9001"]);
    }

    #[tokio::test]
    async fn test_search_empty_index() {
        let file = NamedTempFile::new().unwrap();
        seed_catalog(file.path());

        let retriever = retriever_with(
            RetrievalIndex::empty(),
            Arc::new(MockProvider::new(16)),
            CatalogStore::new(file.path()),
            Arc::new(ScriptedLlm::new(vec![])),
        );

        let ids = retriever.search("query", 5).await.unwrap();
        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn test_search_dimension_mismatch() {
        let file = NamedTempFile::new().unwrap();
        seed_catalog(file.path());
        seed_embeddings(file.path(), &[("9001", vec![1.0, 0.0, 0.0])]);

        let index = RetrievalIndex::load(file.path());
        let retriever = retriever_with(
            index,
            Arc::new(FixedEmbedder(vec![1.0, 0.0])), // wrong dimensionality
            CatalogStore::new(file.path()),
            Arc::new(ScriptedLlm::new(vec![])),
        );

        assert!(retriever.search("query", 5).await.is_err());
    }

    #[tokio::test]
    async fn test_process_resolves_in_rank_order() {
        let file = NamedTempFile::new().unwrap();
        seed_catalog(file.path());
        seed_embeddings(
            file.path(),
            &[
                ("9001", vec![0.0, 1.0]),
                ("27001", vec![1.0, 0.0]),
            ],
        );

        let index = RetrievalIndex::load(file.path());
        let retriever = retriever_with(
            index,
            Arc::new(FixedEmbedder(vec![1.0, 0.0])),
            CatalogStore::new(file.path()),
            Arc::new(ScriptedLlm::new(vec!["These standards are relevant."])),
        );

        let retrieval = retriever.process("security", 2).await.unwrap();
        assert_eq!(retrieval.document_ids, vec!["27001", "9001"]);
        assert_eq!(retrieval.documents[0].id, "27001");
        assert_eq!(retrieval.documents[1].id, "9001");
        assert_eq!(retrieval.narrative, "These standards are relevant.");
    }

    #[tokio::test]
    async fn test_process_degrades_narrative_on_model_failure() {
        let file = NamedTempFile::new().unwrap();
        seed_catalog(file.path());
        seed_embeddings(file.path(), &[("9001", vec![1.0, 0.0])]);

        let index = RetrievalIndex::load(file.path());
        let retriever = retriever_with(
            index,
            Arc::new(FixedEmbedder(vec![1.0, 0.0])),
            CatalogStore::new(file.path()),
            Arc::new(FailingLlm),
        );

        let retrieval = retriever.process("quality", 1).await.unwrap();
        assert_eq!(retrieval.documents.len(), 1);
        // Falls back to the raw formatted context
        assert!(retrieval.narrative.contains("Ref: ISO 9001"));
    }

    #[test]
    fn test_format_context() {
        let docs = vec![Document {
            id: "9001".to_string(),
            title_en: "Quality management systems".to_string(),
            title_fr: None,
            abstract_text: Some("Requirements".to_string()),
            publication_date: None,
            edition: None,
            ics_code: None,
            owner_committee: None,
            full_text: None,
            status: None,
            year: Some(2015),
        }];

        let context = SemanticRetriever::format_context(&docs);
        assert!(context.contains("Ref: ISO 9001"));
        assert!(context.contains("Title: Quality management systems"));
        assert!(context.contains("Abstract: Requirements"));
    }
}
