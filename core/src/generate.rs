use crate::config::base_url;
use crate::error::CollaboratorError;
use crate::http::{build_client, post_json};
use crate::SearchResult;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const SERVICE: &str = "ollama";

const INSTRUCTION: &str = "以下のコンテキスト情報に基づいて質問に答えてください。\n\
コンテキストに情報がない場合は「わかりません」と答えてください。";

#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    async fn generate(&self, query: &str, results: &[SearchResult]) -> Result<String, CollaboratorError>;
}

/// Grounding prompt: instruction, retrieved context in rank order, question.
pub fn grounding_prompt(query: &str, results: &[SearchResult]) -> String {
    let context = results
        .iter()
        .map(|r| format!("Title: {}\nContent: {}", r.title, r.content))
        .collect::<Vec<_>>()
        .join("\n\n");
    format!("{INSTRUCTION}\n\nContext:\n{context}\n\nQuestion:\n{query}\n\nAnswer:")
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage; 1],
    stream: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: String,
}

/// Single-turn, non-streaming client for Ollama's `/api/chat`.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
    endpoint: String,
    model: String,
}

impl OllamaClient {
    pub fn new(base: &str, model: &str, timeout: Duration) -> reqwest::Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            endpoint: format!("{}/api/chat", base_url(base)),
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl AnswerGenerator for OllamaClient {
    async fn generate(&self, query: &str, results: &[SearchResult]) -> Result<String, CollaboratorError> {
        let req = ChatRequest {
            model: &self.model,
            messages: [ChatMessage { role: "user".into(), content: grounding_prompt(query, results) }],
            stream: false,
        };
        let resp: ChatResponse = post_json(&self.client, SERVICE, &self.endpoint, &req).await?;
        Ok(resp.message.content)
    }
}
