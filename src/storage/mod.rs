use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ScrapeError;
use crate::models::CardRecord;

mod json;
pub use json::JsonFileStore;

/// Top-level layout of the written catalog. Consumers depend on one or the
/// other, so the two are not interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputShape {
    /// `[ {record}, ... ]`
    Bare,
    /// `{ "data": [ {record}, ... ] }`
    Wrapped,
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Replace the stored catalog with `records`.
    async fn write(&self, records: &[CardRecord]) -> Result<(), ScrapeError>;
    async fn read(&self) -> Result<Vec<CardRecord>, ScrapeError>;
    async fn read_raw(&self) -> Result<String, ScrapeError>;
}
