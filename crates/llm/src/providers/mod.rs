//! LLM provider implementations.

pub mod ollama;
pub mod openai;

pub use ollama::OllamaClient;
pub use openai::OpenAiClient;

/// Maximum retry attempts for failed completion requests.
pub(crate) const MAX_RETRIES: u32 = 3;

/// Initial backoff duration in milliseconds.
pub(crate) const INITIAL_BACKOFF_MS: u64 = 200;

/// Per-request timeout in seconds.
pub(crate) const REQUEST_TIMEOUT_SECS: u64 = 120;
