//! # picstash binary
//!
//! Assembles the adapters behind the domain ports and serves the HTTP
//! surface.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use api_adapters::AppState;
use auth_adapters::HashedTokenIdentity;
use services::IngestionPipeline;
use storage_adapters::{
    InMemoryMetadataStore, OpenAiVisionTagger, S3Config, S3ObjectStore, VisionConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = configs::Settings::load().context("failed to load configuration")?;
    let http = reqwest::Client::new();

    let object_store = Arc::new(S3ObjectStore::new(
        http.clone(),
        S3Config {
            access_key_id: settings.storage.access_key_id,
            secret_access_key: settings.storage.secret_access_key,
            region: settings.storage.region,
            bucket: settings.storage.bucket,
        },
    ));
    let meta = Arc::new(InMemoryMetadataStore::new());
    let tagger = Arc::new(OpenAiVisionTagger::new(
        http,
        VisionConfig {
            api_key: settings.tagger.api_key,
            model: settings.tagger.model,
            endpoint: settings.tagger.endpoint,
        },
    ));
    let identity = Arc::new(HashedTokenIdentity::new(&settings.auth.identity_salt));

    let state = AppState {
        pipeline: IngestionPipeline::new(object_store, meta.clone(), tagger),
        meta,
        identity,
    };

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "picstash listening");

    axum::serve(listener, api_adapters::router(state))
        .await
        .context("server error")?;
    Ok(())
}
