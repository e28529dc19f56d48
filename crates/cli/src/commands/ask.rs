//! Ask command handler.
//!
//! Wires the full pipeline together and answers one question.

use clap::Args;
use normqa_core::{config::AppConfig, AppError, AppResult};
use normqa_llm::create_client;
use normqa_pipeline::embeddings::create_provider;
use normqa_pipeline::{
    CatalogStore, Orchestrator, RetrievalIndex, SemanticRetriever, SqlOutcome, SqlTranslator,
    Synthesizer,
};
use std::sync::Arc;

/// Answer a question about the catalog
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to answer
    pub question: String,

    /// Number of documents to retrieve (overrides config)
    #[arg(long)]
    pub top_k: Option<usize>,

    /// Output the full response as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        config.validate()?;

        if !config.db_path.exists() {
            return Err(AppError::Config(format!(
                "Catalog database not found at {:?} (set NORMQA_DB or --db)",
                config.db_path
            )));
        }

        let store = CatalogStore::new(&config.db_path);
        let index = Arc::new(RetrievalIndex::load(&config.db_path));
        let embedder = create_provider(
            &config.embedding_provider,
            &config.embedding_model,
            config.embedding_dimensions,
        )?;
        let llm = create_client(
            &config.provider,
            config.endpoint.as_deref(),
            config.api_key.as_deref(),
        )?;

        let retriever = SemanticRetriever::new(
            index,
            embedder,
            store.clone(),
            llm.clone(),
            config.model.clone(),
        );
        let translator = SqlTranslator::new(llm.clone(), config.model.clone(), store);
        let synthesizer = Synthesizer::new(llm, config.model.clone());

        let top_k = self.top_k.unwrap_or(config.top_k);
        let orchestrator = Orchestrator::new(retriever, translator, synthesizer, top_k);

        let response = orchestrator.answer(&self.question).await;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&response)?);
            return Ok(());
        }

        println!("{}", response.answer);

        if !response.source_documents.is_empty() {
            println!("\nSources:");
            for doc in &response.source_documents {
                println!("  ISO {} - {}", doc.id, doc.title_en);
            }
        }

        if config.verbose {
            if !response.sql.is_empty() {
                println!("\nSQL: {}", response.sql);
            }
            if let SqlOutcome::Failed(error) = &response.result {
                println!("Query failed: {}", error);
            }
            if let Some(chart) = &response.chart {
                println!("Chart: {} ({})", chart.title, chart.kind);
            }
        }

        Ok(())
    }
}
