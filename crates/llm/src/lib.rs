//! LLM integration crate for normqa.
//!
//! This crate provides a provider-agnostic abstraction for the completion
//! service boundary: a role-tagged system/user message pair plus a model
//! identifier goes in, a single text completion comes out. The response is
//! untrusted text; sanitization is the caller's responsibility.
//!
//! # Providers
//! - **Ollama**: Local LLM runtime (default)
//! - **OpenAI-compatible**: hosted chat-completions endpoints (OpenAI, Groq)
//!
//! # Example
//! ```no_run
//! use normqa_llm::{LlmClient, LlmRequest, providers::OllamaClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OllamaClient::new();
//! let request = LlmRequest::new("Hello, world!", "llama3.2");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::create_client;
pub use providers::{OllamaClient, OpenAiClient};
