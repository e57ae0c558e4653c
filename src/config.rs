use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::parsers::IdentifierStrategy;
use crate::storage::OutputShape;

const CONFIG_FILE_STEM: &str = "spoilers";
const ENV_PREFIX: &str = "SPOILERS";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    pub edition: EditionConfig,
    pub browser: BrowserConfig,
    pub output: OutputConfig,
    pub extraction: ExtractionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub url: String,
    pub base_url: String,
    pub name: String,
}

/// Set descriptor stamped onto every record of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditionConfig {
    pub set_name: String,
    pub set_prefix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    pub headless: bool,
    pub render_wait_secs: u64,
    pub navigation_timeout_secs: u64,
    #[serde(default)]
    pub chrome_executable: Option<PathBuf>,
}

impl BrowserConfig {
    pub fn render_wait(&self) -> Duration {
        Duration::from_secs(self.render_wait_secs)
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: PathBuf,
    pub shape: OutputShape,
    pub identifier: IdentifierStrategy,
    pub echo: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    pub missing_field_policy: MissingFieldPolicy,
}

/// What to do with a card row that lacks its name or image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingFieldPolicy {
    Skip,
    Abort,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::from_sources(CONFIG_FILE_STEM, ENV_PREFIX)
    }

    fn from_sources(file_stem: &str, env_prefix: &str) -> Result<Self> {
        let layered = ::config::Config::builder()
            .set_default("site.url", "https://gabrary.net/sets/Spoilers/All")?
            .set_default("site.base_url", "https://gabrary.net")?
            .set_default("site.name", "Gabrary")?
            .set_default("edition.set_name", "Spoilers")?
            .set_default("edition.set_prefix", "SPOILERS")?
            .set_default("browser.headless", true)?
            .set_default("browser.render_wait_secs", 10)?
            .set_default("browser.navigation_timeout_secs", 30)?
            .set_default("output.path", "sets/spoiler_cards.json")?
            .set_default("output.shape", "wrapped")?
            .set_default("output.identifier", "opaque")?
            .set_default("output.echo", false)?
            .set_default("extraction.missing_field_policy", "skip")?
            .add_source(::config::File::with_name(file_stem).required(false))
            .add_source(
                ::config::Environment::with_prefix(env_prefix)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .context("Failed to assemble configuration")?;

        let config: Config = layered
            .try_deserialize()
            .context("Invalid configuration")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for (key, value) in [("site.url", &self.site.url), ("site.base_url", &self.site.base_url)] {
            let parsed = Url::parse(value).with_context(|| format!("{key} is not a valid URL: {value}"))?;
            if !parsed.has_host() {
                bail!("{key} must be an absolute URL with a host: {value}");
            }
        }
        Ok(())
    }
}
