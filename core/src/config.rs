use std::time::Duration;

pub const DEFAULT_ELASTICSEARCH_URL: &str = "http://localhost:9200";
pub const DEFAULT_ENCODER_URL: &str = "http://localhost:8001";
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_INDEX_NAME: &str = "cosense-pages";
pub const DEFAULT_MODEL: &str = "gemma3";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Connection settings for the three collaborators.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub elasticsearch_url: String,
    pub encoder_url: String,
    pub ollama_url: String,
    pub index_name: String,
    pub model: String,
    /// Applied to each collaborator call on its own.
    pub request_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            elasticsearch_url: DEFAULT_ELASTICSEARCH_URL.to_string(),
            encoder_url: DEFAULT_ENCODER_URL.to_string(),
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            index_name: DEFAULT_INDEX_NAME.to_string(),
            model: DEFAULT_MODEL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

pub(crate) fn base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
