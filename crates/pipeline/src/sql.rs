//! Natural language to SQL translation and execution.
//!
//! The completion service is asked for a single SQL statement against the
//! hard-declared two-table schema; no introspection, no parameterization.
//! Raw model output goes through the sanitize pipeline before execution.

use crate::sanitize::sanitize_sql;
use crate::store::CatalogStore;
use crate::types::SqlOutcome;
use normqa_core::AppResult;
use normqa_llm::{LlmClient, LlmRequest};
use std::sync::Arc;

/// Output of the SQL stage.
#[derive(Debug, Clone)]
pub struct SqlStage {
    /// The sanitized statement that was executed
    pub sql: String,

    /// Result table, or error text when execution failed
    pub outcome: SqlOutcome,
}

/// Translator from natural-language questions to executed SQL.
pub struct SqlTranslator {
    llm: Arc<dyn LlmClient>,
    model: String,
    store: CatalogStore,
}

impl SqlTranslator {
    /// Create a translator over the given completion client and store.
    pub fn new(llm: Arc<dyn LlmClient>, model: impl Into<String>, store: CatalogStore) -> Self {
        Self {
            llm,
            model: model.into(),
            store,
        }
    }

    /// Ask the completion service for SQL and sanitize the raw output.
    pub async fn translate(&self, query: &str) -> AppResult<String> {
        let system = normqa_prompt::sql_prompt(query)?;
        let request = LlmRequest::new(query, &self.model).with_system(system);

        let response = self.llm.complete(&request).await?;
        let sql = sanitize_sql(&response.content);

        tracing::info!("Generated SQL: {}", sql);

        Ok(sql)
    }

    /// Execute a sanitized statement against the catalog.
    ///
    /// Execution failures become `SqlOutcome::Failed`, never errors.
    pub fn execute(&self, sql: &str) -> SqlOutcome {
        self.store.execute(sql)
    }

    /// Run the full SQL stage: translate, then execute.
    pub async fn process(&self, query: &str) -> AppResult<SqlStage> {
        let sql = self.translate(query).await?;
        let outcome = self.execute(&sql);

        Ok(SqlStage { sql, outcome })
    }
}
