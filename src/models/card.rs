use serde::{Deserialize, Serialize};
use std::fmt;

// NewType pattern for type safety
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub String);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetInfo {
    pub name: String,
    pub prefix: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edition {
    pub set: SetInfo,
}

impl Edition {
    pub fn new(name: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            set: SetInfo {
                name: name.into(),
                prefix: prefix.into(),
            },
        }
    }
}

/// One entry of the simulator catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRecord {
    pub uuid: CardId,
    pub name: String,
    pub image_url: String,
    pub editions: Vec<Edition>,
}

/// A card row as found in the rendered page, before any transformation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCardElement {
    pub name: String,
    pub image_path: String,
}
