mod gabrary;
mod records;

pub use gabrary::GabraryScraper;
pub use records::CardRecordBuilder;
