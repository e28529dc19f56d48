//! Embedding provider trait and factory.

use normqa_core::{AppError, AppResult};
use std::sync::Arc;

/// Trait for embedding providers.
///
/// Implementations must return unit-normalized vectors so that dot
/// products against the retrieval index are valid cosine similarities.
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync + std::fmt::Debug {
    /// Get provider name (e.g., "mock", "ollama")
    fn provider_name(&self) -> &str;

    /// Get model identifier
    fn model_name(&self) -> &str;

    /// Get embedding dimensions
    fn dimensions(&self) -> usize;

    /// Generate a unit-normalized embedding for a single text.
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>>;
}

/// Scale a vector to unit length in place. Zero vectors are left as-is.
pub fn normalize(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for v in vector.iter_mut() {
            *v /= norm;
        }
    }
}

/// Create an embedding provider by name.
///
/// # Arguments
/// * `provider` - Provider identifier ("ollama", "mock")
/// * `model` - Model identifier
/// * `dimensions` - Expected dimensionality, verified against responses
pub fn create_provider(
    provider: &str,
    model: &str,
    dimensions: usize,
) -> AppResult<Arc<dyn EmbeddingProvider>> {
    match provider {
        "mock" => {
            let provider = super::providers::mock::MockProvider::new(dimensions);
            Ok(Arc::new(provider))
        }

        "ollama" => {
            let provider =
                super::providers::ollama::OllamaProvider::new(model.to_string(), dimensions);
            Ok(Arc::new(provider))
        }

        _ => Err(AppError::Config(format!(
            "Unknown embedding provider: '{}'. Supported providers: mock, ollama",
            provider
        ))),
    }
}
