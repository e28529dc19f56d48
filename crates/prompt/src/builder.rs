//! Prompt builder for rendering templates.

use crate::templates;
use handlebars::Handlebars;
use normqa_core::{AppError, AppResult};
use std::collections::HashMap;

/// Render a Handlebars template with variables.
fn render_template(template: &str, variables: &HashMap<String, String>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Disable HTML escaping for plain text
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    let rendered = handlebars
        .render("prompt", &variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))?;

    Ok(rendered)
}

/// Build the retrieval narrative system prompt.
///
/// # Arguments
/// * `query` - The raw user question
/// * `context` - Formatted metadata blocks for the retrieved documents
pub fn retrieval_prompt(query: &str, context: &str) -> AppResult<String> {
    tracing::debug!("Building retrieval prompt");

    let mut variables = HashMap::new();
    variables.insert("query".to_string(), query.to_string());
    variables.insert("context".to_string(), context.to_string());

    render_template(templates::RETRIEVAL_TEMPLATE, &variables)
}

/// Build the SQL generation system prompt.
pub fn sql_prompt(query: &str) -> AppResult<String> {
    tracing::debug!("Building SQL prompt");

    let mut variables = HashMap::new();
    variables.insert("query".to_string(), query.to_string());

    render_template(templates::SQL_TEMPLATE, &variables)
}

/// Build the final synthesis system prompt.
///
/// # Arguments
/// * `query` - The raw user question
/// * `retrieval_results` - Narrative from the retrieval stage
/// * `sql_results` - Tabular text or error text from the SQL stage
/// * `chart_description` - One-line description of the chart outcome
pub fn synthesis_prompt(
    query: &str,
    retrieval_results: &str,
    sql_results: &str,
    chart_description: &str,
) -> AppResult<String> {
    tracing::debug!("Building synthesis prompt");

    let mut variables = HashMap::new();
    variables.insert("query".to_string(), query.to_string());
    variables.insert(
        "retrieval_results".to_string(),
        retrieval_results.to_string(),
    );
    variables.insert("sql_results".to_string(), sql_results.to_string());
    variables.insert(
        "chart_description".to_string(),
        chart_description.to_string(),
    );

    render_template(templates::SYNTHESIS_TEMPLATE, &variables)
}
