use thiserror::Error;

/// Failure talking to one of the external services (encoder, index, LLM).
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("{service} request failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} returned status {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("{service} returned a malformed response: {reason}")]
    Malformed {
        service: &'static str,
        reason: String,
    },
}

impl CollaboratorError {
    pub fn service(&self) -> &'static str {
        match self {
            Self::Transport { service, .. } | Self::Status { service, .. } | Self::Malformed { service, .. } => service,
        }
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Query cannot be empty")]
    EmptyQuery,

    #[error("query encoding failed: {0}")]
    Encode(#[source] CollaboratorError),

    #[error("retrieval failed: {0}")]
    Retrieve(#[source] CollaboratorError),
}

impl PipelineError {
    /// True for errors caused by the caller's input rather than a collaborator.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::EmptyQuery)
    }
}
