use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("failed to launch browser: {0}")]
    BrowserLaunch(String),

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("card row {index} is missing its {field}")]
    MissingField { index: usize, field: CardField },

    #[error("failed to write catalog to {}: {source}", path.display())]
    Serialization {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode catalog: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to decode catalog at {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Sub-node of a card row that extraction depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardField {
    Name,
    Image,
    ImageSource,
}

impl fmt::Display for CardField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardField::Name => write!(f, "name text"),
            CardField::Image => write!(f, "image"),
            CardField::ImageSource => write!(f, "image src attribute"),
        }
    }
}
