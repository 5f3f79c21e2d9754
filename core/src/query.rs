//! Hybrid query construction: one lexical `match` on the body text plus
//! `rank_feature` clauses expanded from the sparse query vector.

use crate::SparseVector;
use serde::Serialize;

/// Upper bound on rank-feature clauses per query (the lexical clause is extra).
pub const MAX_RANK_FEATURES: usize = 50;
/// Document field searched by the lexical clause.
pub const CONTENT_FIELD: &str = "content";
/// Prefix of the `rank_features` field holding per-token weights.
pub const VECTOR_FIELD: &str = "vectors";

/// One `should` clause, serialized in Elasticsearch query DSL.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RetrievalClause {
    #[serde(rename = "match")]
    Lexical { content: String },
    #[serde(rename = "rank_feature")]
    RankFeature { field: String, boost: f32 },
}

impl RetrievalClause {
    pub fn lexical(text: &str) -> Self {
        Self::Lexical { content: text.to_string() }
    }

    pub fn rank_feature(token: &str, boost: f32) -> Self {
        Self::RankFeature { field: format!("{VECTOR_FIELD}.{token}"), boost }
    }

    pub fn is_rank_feature(&self) -> bool {
        matches!(self, Self::RankFeature { .. })
    }

    /// Token a rank-feature clause scores on.
    pub fn token(&self) -> Option<&str> {
        match self {
            Self::RankFeature { field, .. } => field.strip_prefix(VECTOR_FIELD).and_then(|f| f.strip_prefix('.')),
            Self::Lexical { .. } => None,
        }
    }
}

/// Lexical clause first, then up to [`MAX_RANK_FEATURES`] rank-feature clauses
/// taken in descending weight order.
pub fn build(query_text: &str, vector: &SparseVector) -> Vec<RetrievalClause> {
    let mut clauses = Vec::with_capacity(1 + vector.len().min(MAX_RANK_FEATURES));
    clauses.push(RetrievalClause::lexical(query_text));
    clauses.extend(
        vector
            .ranked()
            .into_iter()
            .take(MAX_RANK_FEATURES)
            .map(|(token, weight)| RetrievalClause::rank_feature(token, weight)),
    );
    clauses
}

#[derive(Debug, Serialize)]
pub struct BoolQuery<'a> {
    pub should: &'a [RetrievalClause],
}

#[derive(Debug, Serialize)]
pub struct QueryDsl<'a> {
    #[serde(rename = "bool")]
    pub bool_query: BoolQuery<'a>,
}

/// Body of a `_search` request.
#[derive(Debug, Serialize)]
pub struct SearchBody<'a> {
    pub query: QueryDsl<'a>,
    pub size: usize,
}

impl<'a> SearchBody<'a> {
    pub fn new(clauses: &'a [RetrievalClause], size: usize) -> Self {
        Self { query: QueryDsl { bool_query: BoolQuery { should: clauses } }, size }
    }
}
