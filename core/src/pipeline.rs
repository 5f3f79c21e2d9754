use crate::config::PipelineConfig;
use crate::encoder::{EncoderClient, QueryEncoder};
use crate::error::PipelineError;
use crate::generate::{AnswerGenerator, OllamaClient};
use crate::query;
use crate::search::{DocumentIndex, ElasticsearchClient};
use crate::{Generation, QueryRequest, QueryResponse};
use anyhow::Result;
use std::sync::Arc;

/// Validate -> encode -> retrieve -> generate for a single query.
///
/// Holds only the shared collaborator clients, so one instance serves any
/// number of concurrent requests.
#[derive(Clone)]
pub struct QueryPipeline {
    encoder: Arc<dyn QueryEncoder>,
    index: Arc<dyn DocumentIndex>,
    generator: Arc<dyn AnswerGenerator>,
}

impl QueryPipeline {
    pub fn new(encoder: Arc<dyn QueryEncoder>, index: Arc<dyn DocumentIndex>, generator: Arc<dyn AnswerGenerator>) -> Self {
        Self { encoder, index, generator }
    }

    /// Build HTTP clients for the encoder, Elasticsearch and Ollama.
    pub fn from_config(cfg: &PipelineConfig) -> Result<Self> {
        let encoder = EncoderClient::new(&cfg.encoder_url, cfg.request_timeout)?;
        let index = ElasticsearchClient::new(&cfg.elasticsearch_url, &cfg.index_name, cfg.request_timeout)?;
        let generator = OllamaClient::new(&cfg.ollama_url, &cfg.model, cfg.request_timeout)?;
        tracing::info!(
            encoder = %cfg.encoder_url,
            elasticsearch = %cfg.elasticsearch_url,
            index = %cfg.index_name,
            ollama = %cfg.ollama_url,
            model = %cfg.model,
            "query pipeline configured"
        );
        Ok(Self::new(Arc::new(encoder), Arc::new(index), Arc::new(generator)))
    }

    pub async fn handle(&self, request: &QueryRequest) -> Result<QueryResponse, PipelineError> {
        let text = request.query.as_str();
        if text.trim().is_empty() {
            return Err(PipelineError::EmptyQuery);
        }

        let vector = self.encoder.encode(text).await.map_err(PipelineError::Encode)?;

        let clauses = query::build(text, &vector);
        tracing::debug!(clauses = clauses.len(), vector_tokens = vector.len(), "built hybrid query");
        let results = self.index.search(&clauses).await.map_err(PipelineError::Retrieve)?;

        let generation = match self.generator.generate(text, &results).await {
            Ok(answer) => Generation::Answered(answer),
            Err(e) => {
                tracing::warn!(error = %e, "answer generation failed, returning results only");
                Generation::Unavailable
            }
        };
        Ok(QueryResponse::assemble(generation, results))
    }
}
