//! Prompt system for normqa.
//!
//! This crate holds the three fixed prompt templates the pipeline uses
//! (retrieval context, SQL generation, final synthesis) and typed render
//! helpers built on Handlebars.

pub mod builder;
pub mod templates;

pub use builder::{retrieval_prompt, sql_prompt, synthesis_prompt};
