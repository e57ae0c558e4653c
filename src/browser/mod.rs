//! Browser-backed page rendering.
//!
//! The spoiler listing only fills in its card rows after client-side
//! scripts run, so pages are fetched through a real browser rather than a
//! plain HTTP GET.

mod chromium;

pub use chromium::ChromiumRenderer;

use async_trait::async_trait;

use crate::error::ScrapeError;

#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Load `url`, give scripts time to populate `ready_selector`, and
    /// return the rendered document HTML.
    async fn render(&self, url: &str, ready_selector: &str) -> Result<String, ScrapeError>;
}
