use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;
use uuid::Uuid;

use crate::models::CardId;

static NON_WORD_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^\p{L}\p{N}_]+")
        .expect("Invalid non-word regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierStrategy {
    /// Fresh random 128-bit token per record.
    Opaque,
    /// Name with everything but letters, digits and underscores stripped.
    Derived,
}

/// Strip everything but letters, digits and underscores.
pub fn derive_identifier(name: &str) -> String {
    NON_WORD_REGEX.replace_all(name, "").into_owned()
}

/// UUID v4 as 32 lowercase hex digits.
pub fn opaque_identifier() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Hands out record identifiers for one run.
///
/// Derived identifiers that come out empty or repeat one already issued
/// are replaced by an opaque token.
#[derive(Debug)]
pub struct IdentifierAssigner {
    strategy: IdentifierStrategy,
    issued: HashSet<String>,
}

impl IdentifierAssigner {
    pub fn new(strategy: IdentifierStrategy) -> Self {
        Self {
            strategy,
            issued: HashSet::new(),
        }
    }

    pub fn assign(&mut self, name: &str) -> CardId {
        let id = match self.strategy {
            IdentifierStrategy::Opaque => opaque_identifier(),
            IdentifierStrategy::Derived => {
                let derived = derive_identifier(name);
                if derived.is_empty() {
                    warn!("Name {:?} has no identifier characters, using opaque id", name);
                    opaque_identifier()
                } else if self.issued.contains(&derived) {
                    warn!("Derived id {:?} for {:?} already used, using opaque id", derived, name);
                    opaque_identifier()
                } else {
                    derived
                }
            }
        };

        self.issued.insert(id.clone());
        CardId(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_strips_punctuation_and_spaces() {
        assert_eq!(derive_identifier("Storm, Caller!"), "StormCaller");
        assert_eq!(derive_identifier("A-1"), "A1");
        assert_eq!(derive_identifier("snake_case ok"), "snake_caseok");
        assert_eq!(derive_identifier("?!"), "");
    }

    #[test]
    fn derived_keeps_unicode_letters() {
        assert_eq!(derive_identifier("Élan Vital"), "ÉlanVital");
    }

    #[test]
    fn derived_strips_connector_punctuation_and_marks() {
        assert_eq!(derive_identifier("a\u{203F}b"), "ab");
        assert_eq!(derive_identifier("Cafe\u{301} Noir"), "CafeNoir");
        assert_eq!(derive_identifier("x\u{2014}y\u{00B7}z"), "xyz");
    }

    #[test]
    fn opaque_is_hex_token() {
        let id = opaque_identifier();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_ne!(id, opaque_identifier());
    }

    #[test]
    fn derived_assigner_uses_stripped_name() {
        let mut assigner = IdentifierAssigner::new(IdentifierStrategy::Derived);
        assert_eq!(assigner.assign("Goblin2"), CardId("Goblin2".to_string()));
    }

    #[test]
    fn derived_collision_falls_back_to_opaque() {
        let mut assigner = IdentifierAssigner::new(IdentifierStrategy::Derived);
        let first = assigner.assign("A-1");
        let second = assigner.assign("A1");

        assert_eq!(first.0, "A1");
        assert_ne!(second, first);
        assert_eq!(second.0.len(), 32);
    }

    #[test]
    fn derived_empty_falls_back_to_opaque() {
        let mut assigner = IdentifierAssigner::new(IdentifierStrategy::Derived);
        let id = assigner.assign("!!!");
        assert_eq!(id.0.len(), 32);
    }

    #[test]
    fn opaque_assigner_ignores_name() {
        let mut assigner = IdentifierAssigner::new(IdentifierStrategy::Opaque);
        let a = assigner.assign("Goblin");
        let b = assigner.assign("Goblin");
        assert_ne!(a, b);
    }
}
