//! Shared test fixtures: a seeded catalog database and a scripted LLM.

use crate::index::embedding_to_bytes;
use normqa_core::AppResult;
use normqa_llm::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;

/// Create the catalog schema and a handful of standards at `path`.
pub(crate) fn seed_catalog(path: &Path) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(
        r#"
        CREATE TABLE standards (
            id TEXT PRIMARY KEY,
            title_en TEXT NOT NULL,
            title_fr TEXT,
            abstract TEXT,
            publicationDate TEXT,
            edition INTEGER,
            icsCode TEXT,
            ownerCommittee TEXT,
            full_text TEXT,
            status TEXT,
            year INTEGER
        );
        CREATE TABLE committees (
            id TEXT PRIMARY KEY,
            reference TEXT,
            title_en TEXT
        );
        INSERT INTO standards VALUES
            ('9001', 'Quality management systems', 'Systemes de management de la qualite',
             'Requirements for a quality management system', '2015-09-15', 5,
             '03.100.70', 'TC 176', 'Quality management systems Requirements',
             'Published', 2015),
            ('14001', 'Environmental management systems', NULL,
             'Requirements with guidance for use', '2015-09-15', 3,
             '13.020.10', 'TC 207', 'Environmental management systems',
             'Published', 2015),
            ('27001', 'Information security management', NULL,
             'Information security requirements', '2022-10-25', 3,
             '35.030', 'JTC 1', 'Information security management',
             'Published', 2022);
        "#,
    )
    .unwrap();
}

/// Add an `embeddings` table with the given id/vector pairs.
pub(crate) fn seed_embeddings(path: &Path, entries: &[(&str, Vec<f32>)]) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS embeddings (id TEXT PRIMARY KEY, vector BLOB NOT NULL);",
    )
    .unwrap();

    for (id, vector) in entries {
        conn.execute(
            "INSERT OR REPLACE INTO embeddings (id, vector) VALUES (?1, ?2)",
            params![id, embedding_to_bytes(vector)],
        )
        .unwrap();
    }
}

/// An LLM client that replays a fixed sequence of completions.
pub(crate) struct ScriptedLlm {
    responses: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    /// Responses are returned in the given order, one per `complete` call.
    pub(crate) fn new(responses: Vec<&str>) -> Self {
        let mut responses: Vec<String> = responses.into_iter().map(String::from).collect();
        responses.reverse();
        Self {
            responses: Mutex::new(responses),
        }
    }
}

#[async_trait::async_trait]
impl LlmClient for ScriptedLlm {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        let content = self
            .responses
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| "out of scripted responses".to_string());

        Ok(LlmResponse {
            content,
            model: request.model.clone(),
            usage: LlmUsage::default(),
        })
    }
}

/// An LLM client that always fails, for degraded-path tests.
pub(crate) struct FailingLlm;

#[async_trait::async_trait]
impl LlmClient for FailingLlm {
    fn provider_name(&self) -> &str {
        "failing"
    }

    async fn complete(&self, _request: &LlmRequest) -> AppResult<LlmResponse> {
        Err(normqa_core::AppError::Model(
            "service unreachable".to_string(),
        ))
    }
}
