//! End-to-end question pipeline.
//!
//! Runs retrieval, SQL, chart, and synthesis in order, carrying every
//! stage's output forward. The pipeline never aborts on a stage failure:
//! each stage degrades to a well-known fallback and the answer is composed
//! from whatever survived.

use crate::chart::{self, ChartSpec};
use crate::retriever::{Retrieval, SemanticRetriever, NO_DOCUMENTS_TEXT};
use crate::sql::{SqlStage, SqlTranslator};
use crate::synthesize::Synthesizer;
use crate::types::{Document, SqlOutcome};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Accumulated stage outputs for one question.
struct QueryContext {
    retrieval: Retrieval,
    sql: SqlStage,
    chart: Option<ChartSpec>,
}

/// Final pipeline output for one question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    /// Narrative answer
    pub answer: String,

    /// Documents the answer draws on, best match first
    pub source_documents: Vec<Document>,

    /// The executed SQL statement, empty when generation failed
    pub sql: String,

    /// Tabular result or execution error text
    pub result: SqlOutcome,

    /// Chart specification, when one could be built
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<ChartSpec>,
}

/// Pipeline orchestrator.
pub struct Orchestrator {
    retriever: SemanticRetriever,
    translator: SqlTranslator,
    synthesizer: Synthesizer,
    top_k: usize,
}

impl Orchestrator {
    pub fn new(
        retriever: SemanticRetriever,
        translator: SqlTranslator,
        synthesizer: Synthesizer,
        top_k: usize,
    ) -> Self {
        Self {
            retriever,
            translator,
            synthesizer,
            top_k,
        }
    }

    /// Answer a question.
    ///
    /// Infallible by construction: every stage failure is absorbed into a
    /// degraded but well-formed response.
    pub async fn answer(&self, question: &str) -> AskResponse {
        let ctx = self.run_stages(question).await;

        let chart_kind = ctx.chart.as_ref().map(|c| c.kind);
        let answer = match self
            .synthesizer
            .synthesize(question, &ctx.retrieval.narrative, &ctx.sql.outcome, chart_kind)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                warn!("Synthesis failed, returning degraded answer: {}", e);
                format!(
                    "{}\n\n(Answer synthesis is unavailable: {})",
                    ctx.retrieval.narrative, e
                )
            }
        };

        info!("Pipeline complete");

        AskResponse {
            answer,
            source_documents: ctx.retrieval.documents,
            sql: ctx.sql.sql,
            result: ctx.sql.outcome,
            chart: ctx.chart,
        }
    }

    async fn run_stages(&self, question: &str) -> QueryContext {
        info!(stage = "retrieval", "Searching catalog");
        let retrieval = match self.retriever.process(question, self.top_k).await {
            Ok(retrieval) => retrieval,
            Err(e) => {
                warn!("Retrieval failed: {}", e);
                Retrieval {
                    document_ids: Vec::new(),
                    documents: Vec::new(),
                    narrative: NO_DOCUMENTS_TEXT.to_string(),
                }
            }
        };

        info!(stage = "sql", "Generating statistics query");
        let sql = match self.translator.process(question).await {
            Ok(stage) => stage,
            Err(e) => {
                warn!("SQL generation failed: {}", e);
                SqlStage {
                    sql: String::new(),
                    outcome: SqlOutcome::Failed(format!("Error generating query: {}", e)),
                }
            }
        };

        info!(stage = "chart", "Selecting visualization");
        let chart = build_chart(&sql);

        QueryContext {
            retrieval,
            sql,
            chart,
        }
    }
}

/// Build a chart from the SQL stage output, if the data supports one.
fn build_chart(sql: &SqlStage) -> Option<ChartSpec> {
    let table = sql.outcome.table()?;
    if table.is_empty() {
        return None;
    }

    let kind = chart::classify(&sql.sql, table);
    let spec = chart::build(table, kind, "");

    match &spec {
        Some(spec) => info!("Built {} chart", spec.kind),
        None => info!("No chart could be built for archetype {}", kind),
    }

    spec
}
