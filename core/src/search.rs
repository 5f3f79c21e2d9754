use crate::config::base_url;
use crate::error::CollaboratorError;
use crate::http::{build_client, post_json};
use crate::query::{RetrievalClause, SearchBody};
use crate::SearchResult;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const SERVICE: &str = "elasticsearch";
/// Number of hits requested per query.
pub const RESULT_LIMIT: usize = 5;

#[async_trait]
pub trait DocumentIndex: Send + Sync {
    /// Run the clauses as one `should` query; results in engine rank order.
    async fn search(&self, clauses: &[RetrievalClause]) -> Result<Vec<SearchResult>, CollaboratorError>;
}

#[derive(Deserialize)]
struct SearchResponse {
    hits: HitList,
}

#[derive(Deserialize)]
struct HitList {
    hits: Vec<Hit>,
}

#[derive(Deserialize)]
struct Hit {
    #[serde(rename = "_score")]
    score: f32,
    #[serde(rename = "_source")]
    source: PageSource,
}

#[derive(Deserialize)]
struct PageSource {
    title: String,
    content: String,
    url: String,
}

#[derive(Debug, Clone)]
pub struct ElasticsearchClient {
    client: Client,
    endpoint: String,
}

impl ElasticsearchClient {
    pub fn new(base: &str, index: &str, timeout: Duration) -> reqwest::Result<Self> {
        Ok(Self { client: build_client(timeout)?, endpoint: format!("{}/{}/_search", base_url(base), index) })
    }
}

#[async_trait]
impl DocumentIndex for ElasticsearchClient {
    async fn search(&self, clauses: &[RetrievalClause]) -> Result<Vec<SearchResult>, CollaboratorError> {
        let body = SearchBody::new(clauses, RESULT_LIMIT);
        let resp: SearchResponse = post_json(&self.client, SERVICE, &self.endpoint, &body).await?;
        let results: Vec<SearchResult> = resp
            .hits
            .hits
            .into_iter()
            .take(RESULT_LIMIT)
            .map(|h| SearchResult { title: h.source.title, content: h.source.content, url: h.source.url, score: h.score })
            .collect();
        tracing::debug!(hits = results.len(), "index search complete");
        Ok(results)
    }
}
