//! Stats command handler.
//!
//! Displays catalog and retrieval index statistics.

use clap::Args;
use normqa_core::{config::AppConfig, AppError, AppResult};
use normqa_pipeline::{CatalogStore, RetrievalIndex};

/// Show catalog and retrieval index statistics
#[derive(Args, Debug)]
pub struct StatsCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl StatsCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing stats command");

        if !config.db_path.exists() {
            return Err(AppError::Config(format!(
                "Catalog database not found at {:?} (set NORMQA_DB or --db)",
                config.db_path
            )));
        }

        let store = CatalogStore::new(&config.db_path);
        let standards = store.standards_count()?;

        let index = RetrievalIndex::load(&config.db_path);

        if self.json {
            let stats = serde_json::json!({
                "db_path": config.db_path,
                "standards": standards,
                "index": {
                    "vectors": index.len(),
                    "dimensions": index.dimensions(),
                },
            });
            println!("{}", serde_json::to_string_pretty(&stats)?);
            return Ok(());
        }

        println!("Catalog: {:?}", config.db_path);
        println!("  Standards:     {}", standards);
        println!("  Index vectors: {}", index.len());
        if index.is_empty() {
            println!("  (no retrieval index; semantic search is disabled)");
        } else {
            println!("  Dimensions:    {}", index.dimensions());
        }

        Ok(())
    }
}
