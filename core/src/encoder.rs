use crate::config::base_url;
use crate::error::CollaboratorError;
use crate::http::{build_client, post_json};
use crate::SparseVector;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const SERVICE: &str = "encoder";

#[async_trait]
pub trait QueryEncoder: Send + Sync {
    async fn encode(&self, text: &str) -> Result<SparseVector, CollaboratorError>;
}

#[derive(Serialize)]
struct EncodeRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct EncodeResponse {
    vectors: SparseVector,
}

/// Client for the SPLADE encoder's `/encode` endpoint.
#[derive(Debug, Clone)]
pub struct EncoderClient {
    client: Client,
    endpoint: String,
}

impl EncoderClient {
    pub fn new(base: &str, timeout: Duration) -> reqwest::Result<Self> {
        Ok(Self { client: build_client(timeout)?, endpoint: format!("{}/encode", base_url(base)) })
    }
}

#[async_trait]
impl QueryEncoder for EncoderClient {
    async fn encode(&self, text: &str) -> Result<SparseVector, CollaboratorError> {
        let resp: EncodeResponse = post_json(&self.client, SERVICE, &self.endpoint, &EncodeRequest { text }).await?;
        validate(&resp.vectors)?;
        tracing::debug!(tokens = resp.vectors.len(), "query encoded");
        Ok(resp.vectors)
    }
}

fn validate(vector: &SparseVector) -> Result<(), CollaboratorError> {
    match vector.0.iter().find(|(_, w)| !w.is_finite() || **w < 0.0) {
        Some((token, weight)) => Err(CollaboratorError::Malformed {
            service: SERVICE,
            reason: format!("token {token:?} has invalid weight {weight}"),
        }),
        None => Ok(()),
    }
}
