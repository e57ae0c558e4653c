use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::ser::{PrettyFormatter, Serializer};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{CatalogStore, OutputShape};
use crate::error::ScrapeError;
use crate::models::CardRecord;

/// The catalog file as written to disk, in either layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CatalogDocument {
    Bare(Vec<CardRecord>),
    Wrapped { data: Vec<CardRecord> },
}

impl CatalogDocument {
    pub fn new(shape: OutputShape, records: Vec<CardRecord>) -> Self {
        match shape {
            OutputShape::Bare => CatalogDocument::Bare(records),
            OutputShape::Wrapped => CatalogDocument::Wrapped { data: records },
        }
    }

    pub fn into_records(self) -> Vec<CardRecord> {
        match self {
            CatalogDocument::Bare(records) => records,
            CatalogDocument::Wrapped { data } => data,
        }
    }

    /// Four-space indented JSON.
    pub fn to_pretty_json(&self) -> Result<Vec<u8>, ScrapeError> {
        let mut buf = Vec::new();
        let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        self.serialize(&mut serializer)?;
        Ok(buf)
    }
}

/// Writes the catalog as a single JSON file, replacing it on every run.
pub struct JsonFileStore {
    path: PathBuf,
    shape: OutputShape,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>, shape: OutputShape) -> Self {
        Self {
            path: path.into(),
            shape,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> ScrapeError {
        ScrapeError::Serialization {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl CatalogStore for JsonFileStore {
    async fn write(&self, records: &[CardRecord]) -> Result<(), ScrapeError> {
        let document = CatalogDocument::new(self.shape, records.to_vec());
        let bytes = document.to_pretty_json()?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }

        // Write beside the target and swap it in so a failed run never
        // leaves a truncated catalog behind.
        let temp = self.temp_path();
        if let Err(e) = tokio::fs::write(&temp, &bytes).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(self.io_error(e));
        }
        if let Err(e) = tokio::fs::rename(&temp, &self.path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(self.io_error(e));
        }

        debug!("Wrote {} bytes to {}", bytes.len(), self.path.display());
        info!("Saved {} cards to {}", records.len(), self.path.display());
        Ok(())
    }

    async fn read(&self) -> Result<Vec<CardRecord>, ScrapeError> {
        let content = self.read_raw().await?;
        let document: CatalogDocument =
            serde_json::from_str(&content).map_err(|source| ScrapeError::Decode {
                path: self.path.clone(),
                source,
            })?;
        Ok(document.into_records())
    }

    async fn read_raw(&self) -> Result<String, ScrapeError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| self.io_error(e))
    }
}
