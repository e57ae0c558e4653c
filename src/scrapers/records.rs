use crate::models::{CardRecord, Edition, RawCardElement};
use crate::parsers::{absolute_image_url, IdentifierAssigner, IdentifierStrategy, NameDisambiguator};

/// Turns extracted card rows into catalog records, in document order.
///
/// Holds the per-run name tally and issued identifiers, so one builder
/// corresponds to exactly one run.
pub struct CardRecordBuilder {
    base_url: String,
    edition: Edition,
    names: NameDisambiguator,
    ids: IdentifierAssigner,
}

impl CardRecordBuilder {
    pub fn new(base_url: impl Into<String>, edition: Edition, strategy: IdentifierStrategy) -> Self {
        Self {
            base_url: base_url.into(),
            edition,
            names: NameDisambiguator::new(),
            ids: IdentifierAssigner::new(strategy),
        }
    }

    pub fn build(&mut self, element: RawCardElement) -> CardRecord {
        let name = self.names.disambiguate(&element.name);
        let uuid = self.ids.assign(&name);

        CardRecord {
            uuid,
            image_url: absolute_image_url(&self.base_url, &element.image_path),
            name,
            editions: vec![self.edition.clone()],
        }
    }

    pub fn build_all(&mut self, elements: Vec<RawCardElement>) -> Vec<CardRecord> {
        elements.into_iter().map(|element| self.build(element)).collect()
    }
}
