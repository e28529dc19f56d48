//! Final answer synthesis.
//!
//! All stage outputs are projected into text and handed to the completion
//! service for a single narrative answer. The projections carry fixed
//! marker phrases the prompt relies on: an empty SQL result becomes
//! "No statistical data found.", and a built chart becomes a one-line
//! past-tense notice so the model describes it instead of disclaiming it.

use crate::chart::ChartKind;
use crate::sanitize::strip_reasoning;
use crate::types::SqlOutcome;
use normqa_core::AppResult;
use normqa_llm::{LlmClient, LlmRequest};
use std::sync::Arc;

/// Marker text for an empty SQL result.
pub const NO_DATA_TEXT: &str = "No statistical data found.";

/// Marker text for an absent chart.
pub const NO_CHART_TEXT: &str = "No visualization generated.";

/// Final-stage answer synthesizer.
pub struct Synthesizer {
    llm: Arc<dyn LlmClient>,
    model: String,
}

impl Synthesizer {
    pub fn new(llm: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
        }
    }

    /// Compose the final narrative answer from all stage outputs.
    pub async fn synthesize(
        &self,
        query: &str,
        retrieval_text: &str,
        outcome: &SqlOutcome,
        chart_kind: Option<ChartKind>,
    ) -> AppResult<String> {
        let sql_text = format_table(outcome);
        let chart_text = describe_chart(chart_kind);

        let system = normqa_prompt::synthesis_prompt(query, retrieval_text, &sql_text, &chart_text)?;
        let request = LlmRequest::new(query, &self.model).with_system(system);

        let response = self.llm.complete(&request).await?;
        Ok(strip_reasoning(&response.content).trim().to_string())
    }
}

/// Project a SQL outcome into prompt text.
///
/// Tables render as a markdown pipe table; empty results and execution
/// failures render as their marker/error text so the model can speak to
/// them directly.
pub fn format_table(outcome: &SqlOutcome) -> String {
    match outcome {
        SqlOutcome::Failed(error) => error.clone(),
        SqlOutcome::Table(table) => {
            if table.is_empty() {
                return NO_DATA_TEXT.to_string();
            }

            let mut lines = Vec::with_capacity(table.rows.len() + 2);
            lines.push(format!("| {} |", escape_cells(&table.columns).join(" | ")));
            lines.push(format!(
                "| {} |",
                vec!["---"; table.columns.len()].join(" | ")
            ));
            for row in &table.rows {
                lines.push(format!("| {} |", escape_cells(row).join(" | ")));
            }
            lines.join("\n")
        }
    }
}

/// One-line description of the chart outcome for the prompt.
pub fn describe_chart(kind: Option<ChartKind>) -> String {
    match kind {
        Some(kind) => format!("An interactive {} chart was generated.", kind),
        None => NO_CHART_TEXT.to_string(),
    }
}

fn escape_cells(cells: &[String]) -> Vec<String> {
    cells.iter().map(|c| c.replace('|', "\\|")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{FailingLlm, ScriptedLlm};
    use crate::types::ResultTable;

    fn sample_table() -> SqlOutcome {
        SqlOutcome::Table(ResultTable::new(
            vec!["year".to_string(), "count".to_string()],
            vec![
                vec!["2015".to_string(), "2".to_string()],
                vec!["2022".to_string(), "1".to_string()],
            ],
        ))
    }

    #[test]
    fn test_format_table_markdown() {
        let text = format_table(&sample_table());
        assert_eq!(
            text,
            "| year | count |\n| --- | --- |\n| 2015 | 2 |\n| 2022 | 1 |"
        );
    }

    #[test]
    fn test_format_table_escapes_pipes() {
        let outcome = SqlOutcome::Table(ResultTable::new(
            vec!["title".to_string()],
            vec![vec!["a|b".to_string()]],
        ));
        assert!(format_table(&outcome).contains("a\\|b"));
    }

    #[test]
    fn test_format_table_empty_marker() {
        let outcome = SqlOutcome::Table(ResultTable::default());
        assert_eq!(format_table(&outcome), "No statistical data found.");
    }

    #[test]
    fn test_format_table_failure_passes_error_text() {
        let outcome = SqlOutcome::Failed("Error executing query: no such column".to_string());
        assert_eq!(
            format_table(&outcome),
            "Error executing query: no such column"
        );
    }

    #[test]
    fn test_describe_chart() {
        assert_eq!(
            describe_chart(Some(ChartKind::Timeline)),
            "An interactive timeline chart was generated."
        );
        assert_eq!(
            describe_chart(Some(ChartKind::Pie)),
            "An interactive pie chart was generated."
        );
        assert_eq!(describe_chart(None), "No visualization generated.");
    }

    #[tokio::test]
    async fn test_synthesize_strips_reasoning() {
        let llm = Arc::new(ScriptedLlm::new(vec![
            "<think>drafting</think>Two standards were published in 2015.",
        ]));
        let synthesizer = Synthesizer::new(llm, "test-model");

        let answer = synthesizer
            .synthesize(
                "how many per year?",
                "Found ISO 9001 and ISO 14001.",
                &sample_table(),
                Some(ChartKind::Timeline),
            )
            .await
            .unwrap();

        assert_eq!(answer, "Two standards were published in 2015.");
    }

    #[tokio::test]
    async fn test_synthesize_propagates_model_failure() {
        let synthesizer = Synthesizer::new(Arc::new(FailingLlm), "test-model");
        let result = synthesizer
            .synthesize("q", "context", &sample_table(), None)
            .await;
        assert!(result.is_err());
    }
}
