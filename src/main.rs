//! EduBot - Main CLI Entry Point

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use edubot::bootstrap::{self, RagStatus};
use edubot::cli::{Args, Commands};
use edubot::config::Config;
use edubot::server::{self, AppState};
use edubot::tutor::AskRequest;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(args.verbosity().log_filter())),
        )
        .with_target(false)
        .init();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(folder) = &args.rag_folder {
        config.rag.folder = folder.clone();
    }

    match args.command() {
        Commands::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            run_server(&config, &bind).await
        }
        Commands::Index => run_index(&config).await,
        Commands::Ask {
            question,
            no_rag,
            web,
            image,
        } => {
            let request = AskRequest {
                question,
                image,
                use_rag: !no_rag,
                use_web: web,
            };
            run_ask(&config, request).await
        }
        Commands::Config => {
            let shown = toml::to_string_pretty(&config.redacted())
                .context("Failed to serialize config")?;
            println!("{}", shown);
            Ok(())
        }
    }
}

/// Load the embedding model off the async runtime
async fn probe(config: &Config) -> Result<RagStatus> {
    let config = config.clone();
    tokio::task::spawn_blocking(move || bootstrap::probe_embedder(&config))
        .await
        .context("Embedding model probe panicked")
}

/// Probe the embedder and build the index; `None` when retrieval is off
async fn prepare_index(config: &Config) -> Result<Option<Arc<edubot::rag::RetrievalIndex>>> {
    let status = probe(config).await?;

    match status {
        RagStatus::Enabled(embedder) => {
            let index = Arc::new(bootstrap::build_index(config, embedder)?);
            bootstrap::initial_rebuild(Arc::clone(&index)).await;
            Ok(Some(index))
        }
        RagStatus::Disabled | RagStatus::Unavailable(_) => Ok(None),
    }
}

async fn run_server(config: &Config, bind: &str) -> Result<()> {
    info!("Starting up server...");
    let index = prepare_index(config).await?;
    let tutor = Arc::new(bootstrap::build_tutor(config, index)?);

    server::serve(bind, AppState::new(tutor)).await?;
    Ok(())
}

async fn run_index(config: &Config) -> Result<()> {
    let status = probe(config).await?;

    let embedder = match status {
        RagStatus::Enabled(embedder) => embedder,
        RagStatus::Disabled => bail!("Retrieval is disabled in the configuration"),
        RagStatus::Unavailable(reason) => bail!("Embedding model unavailable: {}", reason),
    };

    let index = Arc::new(bootstrap::build_index(config, embedder)?);
    let report = tokio::task::spawn_blocking(move || index.rebuild())
        .await
        .context("Index task panicked")??;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

async fn run_ask(config: &Config, request: AskRequest) -> Result<()> {
    let index = if request.use_rag {
        prepare_index(config).await?
    } else {
        None
    };
    let tutor = bootstrap::build_tutor(config, index)?;

    let response = tutor.ask(request).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
