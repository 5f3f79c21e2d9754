use anyhow::Result;
use axum::Router;
use clap::Parser;
use rag_core::config::{DEFAULT_ELASTICSEARCH_URL, DEFAULT_ENCODER_URL, DEFAULT_INDEX_NAME, DEFAULT_MODEL, DEFAULT_OLLAMA_URL, DEFAULT_TIMEOUT_SECS};
use rag_core::{PipelineConfig, QueryPipeline};
use server::build_app;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "server")]
#[command(about = "Answer questions over the wiki index with hybrid retrieval and an LLM")]
struct Args {
    /// Elasticsearch base URL
    #[arg(long, env = "ELASTICSEARCH_URL", default_value = DEFAULT_ELASTICSEARCH_URL)]
    elasticsearch_url: String,
    /// Sparse encoder base URL
    #[arg(long, env = "ENCODER_URL", default_value = DEFAULT_ENCODER_URL)]
    encoder_url: String,
    /// Ollama base URL
    #[arg(long, env = "OLLAMA_URL", default_value = DEFAULT_OLLAMA_URL)]
    ollama_url: String,
    /// Index holding the wiki pages
    #[arg(long, env = "INDEX_NAME", default_value = DEFAULT_INDEX_NAME)]
    index_name: String,
    /// Chat model used for answers
    #[arg(long, env = "OLLAMA_MODEL", default_value = DEFAULT_MODEL)]
    model: String,
    /// Timeout for each encoder, search and chat call
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8000)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let cfg = PipelineConfig {
        elasticsearch_url: args.elasticsearch_url,
        encoder_url: args.encoder_url,
        ollama_url: args.ollama_url,
        index_name: args.index_name,
        model: args.model,
        request_timeout: Duration::from_secs(args.timeout_secs),
    };
    let app: Router = build_app(QueryPipeline::from_config(&cfg)?);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
