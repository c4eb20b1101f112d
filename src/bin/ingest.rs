//! Offline catalog ingestion job
//!
//! Parses product CSVs, renders and chunks each record, embeds the chunks,
//! and upserts them into the vector index namespace the chat service reads.
//!
//! Run with: cargo run --bin retail-rag-ingest -- --data-dir ./catalog

use std::path::PathBuf;

use clap::Parser;
use uuid::Uuid;

use retail_rag::config::AppConfig;
use retail_rag::ingestion::{load_catalog, LineSplitter};
use retail_rag::providers::embedding::EmbeddingProvider;
use retail_rag::providers::openai::OpenAiClient;
use retail_rag::providers::pinecone::PineconeIndex;
use retail_rag::providers::vector_index::VectorIndexProvider;
use retail_rag::types::document::UpsertItem;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "retail-rag-ingest", about = "Populate the vector index from a product catalog")]
struct Args {
    /// Directory containing catalog CSV files
    #[arg(long)]
    data_dir: PathBuf,

    /// Optional TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the target namespace
    #[arg(long)]
    namespace: Option<String>,

    /// Embedding batch size
    #[arg(long, default_value_t = 64)]
    batch_size: usize,

    /// Parse and chunk only; skip embedding and upsert
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "retail_rag=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = AppConfig::load(args.config.as_deref())?;
    let namespace = args
        .namespace
        .unwrap_or_else(|| config.retrieval.namespace.clone());

    let records = load_catalog(&args.data_dir)?;
    let splitter = LineSplitter::new(
        config.chunking.separator.clone(),
        config.chunking.max_chunk_size,
    );

    let chunks: Vec<_> = records
        .iter()
        .flat_map(|record| record.to_chunks(&splitter))
        .collect();
    tracing::info!(records = records.len(), chunks = chunks.len(), "Catalog chunked");

    if args.dry_run {
        println!(
            "Dry run: {} records -> {} chunks (namespace {})",
            records.len(),
            chunks.len(),
            namespace
        );
        return Ok(());
    }

    config.validate()?;
    let embedder = OpenAiClient::new(&config.llm)?;
    let index = PineconeIndex::new(&config.index)?;

    let mut upserted = 0usize;
    for batch in chunks.chunks(args.batch_size) {
        let texts: Vec<String> = batch.iter().map(|c| c.content.clone()).collect();
        let embeddings = embedder.embed_batch(&texts).await?;

        let items: Vec<UpsertItem> = batch
            .iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| UpsertItem {
                id: Uuid::new_v4().to_string(),
                embedding,
                chunk: chunk.clone(),
            })
            .collect();

        index.upsert(&items, &namespace).await?;
        upserted += items.len();
        tracing::info!(upserted, total = chunks.len(), "Batch upserted");
    }

    println!(
        "Ingestion complete: {} chunks upserted into namespace {}",
        upserted, namespace
    );
    Ok(())
}
