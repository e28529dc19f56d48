//! Embedding service boundary.
//!
//! Given a text, a provider returns a fixed-dimensionality vector
//! normalized to unit length. The dimensionality and normalization must
//! match the persisted retrieval index, which was built by the external
//! preparation job with the same model.

pub mod provider;
pub mod providers;

pub use provider::{create_provider, normalize, EmbeddingProvider};
