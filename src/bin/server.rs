//! Assistant server binary
//!
//! Run with: cargo run --bin retail-rag-server [config.toml]

use std::path::PathBuf;

use retail_rag::{config::AppConfig, server::ChatServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "retail_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path: Option<PathBuf> = std::env::args().nth(1).map(PathBuf::from);
    let config = AppConfig::load(config_path.as_deref())?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Chat model: {}", config.llm.chat_model);
    tracing::info!("  - Embedding model: {}", config.llm.embed_model);
    tracing::info!("  - Namespace: {}", config.retrieval.namespace);
    tracing::info!("  - Top-K: {}", config.retrieval.top_k);
    tracing::info!("  - Cache enabled: {}", config.cache.enabled);

    let server = ChatServer::new(config)?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  POST /chat - ask the assistant");
    println!("  POST /user - register a name and phone");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
