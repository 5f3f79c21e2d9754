use async_trait::async_trait;
use parking_lot::Mutex;
use rag_core::encoder::QueryEncoder;
use rag_core::generate::AnswerGenerator;
use rag_core::query::MAX_RANK_FEATURES;
use rag_core::search::DocumentIndex;
use rag_core::{
    CollaboratorError, PipelineError, QueryPipeline, QueryRequest, RetrievalClause, SearchResult, SparseVector, APOLOGY,
};
use std::sync::Arc;

#[derive(Default)]
struct FakeEncoder {
    vector: SparseVector,
    fail: bool,
    calls: Mutex<Vec<String>>,
}

#[async_trait]
impl QueryEncoder for FakeEncoder {
    async fn encode(&self, text: &str) -> Result<SparseVector, CollaboratorError> {
        self.calls.lock().push(text.to_string());
        if self.fail {
            return Err(CollaboratorError::Status { service: "encoder", status: 503, body: "loading".into() });
        }
        Ok(self.vector.clone())
    }
}

#[derive(Default)]
struct FakeIndex {
    results: Vec<SearchResult>,
    fail: bool,
    requests: Mutex<Vec<Vec<RetrievalClause>>>,
}

#[async_trait]
impl DocumentIndex for FakeIndex {
    async fn search(&self, clauses: &[RetrievalClause]) -> Result<Vec<SearchResult>, CollaboratorError> {
        self.requests.lock().push(clauses.to_vec());
        if self.fail {
            return Err(CollaboratorError::Malformed { service: "elasticsearch", reason: "missing hits".into() });
        }
        Ok(self.results.clone())
    }
}

#[derive(Default)]
struct FakeGenerator {
    answer: Option<String>,
    calls: Mutex<usize>,
}

#[async_trait]
impl AnswerGenerator for FakeGenerator {
    async fn generate(&self, _query: &str, _results: &[SearchResult]) -> Result<String, CollaboratorError> {
        *self.calls.lock() += 1;
        self.answer
            .clone()
            .ok_or(CollaboratorError::Status { service: "ollama", status: 500, body: "model not found".into() })
    }
}

fn hit(title: &str, score: f32) -> SearchResult {
    SearchResult { title: title.into(), content: format!("{title} body"), url: format!("https://scrapbox.io/p/{title}"), score }
}

fn request(q: &str) -> QueryRequest {
    QueryRequest { query: q.to_string() }
}

struct Harness {
    encoder: Arc<FakeEncoder>,
    index: Arc<FakeIndex>,
    generator: Arc<FakeGenerator>,
}

impl Harness {
    fn new(encoder: FakeEncoder, index: FakeIndex, generator: FakeGenerator) -> Self {
        Self { encoder: Arc::new(encoder), index: Arc::new(index), generator: Arc::new(generator) }
    }

    fn pipeline(&self) -> QueryPipeline {
        QueryPipeline::new(self.encoder.clone(), self.index.clone(), self.generator.clone())
    }

    fn collaborator_calls(&self) -> usize {
        self.encoder.calls.lock().len() + self.index.requests.lock().len() + *self.generator.calls.lock()
    }
}

#[tokio::test]
async fn blank_queries_are_rejected_without_calls() {
    let h = Harness::new(FakeEncoder::default(), FakeIndex::default(), FakeGenerator::default());
    for q in ["", "  ", "\t\n", "\u{3000}"] {
        let err = h.pipeline().handle(&request(q)).await.unwrap_err();
        assert!(matches!(err, PipelineError::EmptyQuery), "query {q:?}");
        assert!(err.is_client_error());
    }
    assert_eq!(h.collaborator_calls(), 0);
}

#[tokio::test]
async fn encoder_failure_is_terminal() {
    let h = Harness::new(
        FakeEncoder { fail: true, ..Default::default() },
        FakeIndex { results: vec![hit("a", 1.0)], ..Default::default() },
        FakeGenerator { answer: Some("x".into()), ..Default::default() },
    );
    let err = h.pipeline().handle(&request("ramen")).await.unwrap_err();
    assert!(matches!(err, PipelineError::Encode(_)));
    assert!(!err.is_client_error());
    assert!(h.index.requests.lock().is_empty());
    assert_eq!(*h.generator.calls.lock(), 0);
}

#[tokio::test]
async fn retrieval_failure_is_terminal() {
    let h = Harness::new(
        FakeEncoder::default(),
        FakeIndex { fail: true, ..Default::default() },
        FakeGenerator { answer: Some("x".into()), ..Default::default() },
    );
    let err = h.pipeline().handle(&request("ramen")).await.unwrap_err();
    assert!(matches!(err, PipelineError::Retrieve(_)));
    assert!(err.to_string().contains("missing hits"));
    assert_eq!(*h.generator.calls.lock(), 0);
}

#[tokio::test]
async fn generation_failure_degrades_to_apology() {
    let h = Harness::new(
        FakeEncoder::default(),
        FakeIndex { results: vec![hit("a", 3.0), hit("b", 1.0)], ..Default::default() },
        FakeGenerator::default(),
    );
    let resp = h.pipeline().handle(&request("ramen")).await.unwrap();
    assert_eq!(resp.answer, APOLOGY);
    assert_eq!(resp.results.len(), 2);
    assert_eq!(resp.results[0].title, "a");
}

#[tokio::test]
async fn empty_vector_sends_only_lexical_clause() {
    let h = Harness::new(
        FakeEncoder::default(),
        FakeIndex { results: vec![hit("天気", 2.0)], ..Default::default() },
        FakeGenerator { answer: Some("わかりません".into()), ..Default::default() },
    );
    let resp = h.pipeline().handle(&request("東京の天気")).await.unwrap();
    assert_eq!(resp.answer, "わかりません");
    let sent = h.index.requests.lock();
    assert_eq!(sent.as_slice(), &[vec![RetrievalClause::lexical("東京の天気")]]);
    assert_eq!(h.encoder.calls.lock().as_slice(), &["東京の天気".to_string()]);
}

#[tokio::test]
async fn dense_vectors_are_capped() {
    let vector: SparseVector = (0..300).map(|i| (format!("t{i}"), 0.01 * i as f32)).collect();
    let h = Harness::new(
        FakeEncoder { vector, ..Default::default() },
        FakeIndex::default(),
        FakeGenerator { answer: Some("ok".into()), ..Default::default() },
    );
    h.pipeline().handle(&request("many tokens")).await.unwrap();
    let sent = h.index.requests.lock();
    let clauses = &sent[0];
    assert_eq!(clauses[0], RetrievalClause::lexical("many tokens"));
    assert_eq!(clauses.iter().filter(|c| c.is_rank_feature()).count(), MAX_RANK_FEATURES);
}
