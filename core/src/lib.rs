pub mod config;
pub mod encoder;
pub mod error;
pub mod generate;
mod http;
pub mod pipeline;
pub mod query;
pub mod search;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub use config::PipelineConfig;
pub use error::{CollaboratorError, PipelineError};
pub use pipeline::QueryPipeline;
pub use query::RetrievalClause;

/// Answer returned when the generation backend could not produce one.
pub const APOLOGY: &str = "Sorry, I couldn't generate an answer due to an error with the LLM.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

/// Token -> weight mapping produced by the sparse encoder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SparseVector(pub HashMap<String, f32>);

impl SparseVector {
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
    pub fn len(&self) -> usize { self.0.len() }

    /// Entries ordered by weight, highest first; ties ordered by token.
    pub fn ranked(&self) -> Vec<(&str, f32)> {
        let mut entries: Vec<(&str, f32)> = self.0.iter().map(|(t, w)| (t.as_str(), *w)).collect();
        entries.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(b.0))
        });
        entries
    }
}

impl<S: Into<String>> FromIterator<(S, f32)> for SparseVector {
    fn from_iter<I: IntoIterator<Item = (S, f32)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(t, w)| (t.into(), w)).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub content: String,
    pub url: String,
    pub score: f32,
}

/// Outcome of the generation stage.
#[derive(Debug, Clone, PartialEq)]
pub enum Generation {
    Answered(String),
    Unavailable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
    pub results: Vec<SearchResult>,
}

impl QueryResponse {
    pub fn assemble(generation: Generation, results: Vec<SearchResult>) -> Self {
        let answer = match generation {
            Generation::Answered(text) => text,
            Generation::Unavailable => APOLOGY.to_string(),
        };
        Self { answer, results }
    }
}
