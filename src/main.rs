use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

mod browser;
mod config;
mod error;
mod models;
mod parsers;
mod scrapers;
mod storage;

use crate::browser::ChromiumRenderer;
use crate::config::Config;
use crate::scrapers::GabraryScraper;
use crate::storage::{CatalogStore, JsonFileStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gabrary_spoilers=info".parse()?),
        )
        .init();

    info!("Starting spoiler scrape");

    let config = Arc::new(Config::load()?);

    let renderer = ChromiumRenderer::new(config.browser.clone());
    let scraper = GabraryScraper::new(config.clone());
    let records = scraper
        .scrape(&renderer)
        .await
        .with_context(|| format!("Failed to scrape {}", config.site.url))?;

    let store = JsonFileStore::new(&config.output.path, config.output.shape);
    store
        .write(&records)
        .await
        .context("Failed to save card catalog")?;

    info!(
        "Data successfully scraped and saved to {} ({} cards)",
        store.path().display(),
        records.len()
    );

    if config.output.echo {
        let written = store.read_raw().await?;
        println!("{}", written);
    }

    Ok(())
}
