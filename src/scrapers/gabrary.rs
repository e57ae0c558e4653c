use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

use crate::browser::PageRenderer;
use crate::config::{Config, MissingFieldPolicy};
use crate::error::{CardField, ScrapeError};
use crate::models::{CardRecord, Edition, RawCardElement};
use crate::parsers::element_text;
use crate::scrapers::CardRecordBuilder;

/// Present once the listing's scripts have rendered the card grid.
pub const READY_SELECTOR: &str = "div.text-row";

static ROW_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(READY_SELECTOR).expect("Invalid card row selector")
});

static NAME_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("p.centerText").expect("Invalid card name selector")
});

static IMAGE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("img").expect("Invalid card image selector")
});

pub struct GabraryScraper {
    config: Arc<Config>,
}

impl GabraryScraper {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    /// Render the listing and build one record per card row.
    ///
    /// The rendered page source is logged at debug level; run with
    /// `RUST_LOG=gabrary_spoilers=debug` to see it.
    pub async fn scrape(&self, renderer: &dyn PageRenderer) -> Result<Vec<CardRecord>, ScrapeError> {
        let site = &self.config.site;
        info!("Scraping {}...", site.name);

        let html = renderer.render(&site.url, READY_SELECTOR).await?;
        debug!("Rendered page source:\n{}", html);

        let elements = collect_card_elements(
            extract_card_elements(&html),
            self.config.extraction.missing_field_policy,
        )?;
        info!("Found {} card rows on {}", elements.len(), site.name);

        let edition = Edition::new(&self.config.edition.set_name, &self.config.edition.set_prefix);
        let mut builder = CardRecordBuilder::new(&site.base_url, edition, self.config.output.identifier);
        Ok(builder.build_all(elements))
    }
}

/// Pull name and image path out of every card row, in document order.
pub fn extract_card_elements(html: &str) -> Vec<Result<RawCardElement, ScrapeError>> {
    let document = Html::parse_document(html);

    document
        .select(&ROW_SELECTOR)
        .enumerate()
        .map(|(index, row)| extract_row(index, row))
        .collect()
}

fn extract_row(index: usize, row: ElementRef<'_>) -> Result<RawCardElement, ScrapeError> {
    trace!("Card row {}: {}", index, row.html());
    let missing = |field| ScrapeError::MissingField { index, field };

    let name = row
        .select(&NAME_SELECTOR)
        .next()
        .map(|p| element_text(&p))
        .ok_or_else(|| missing(CardField::Name))?;

    let image = row
        .select(&IMAGE_SELECTOR)
        .next()
        .ok_or_else(|| missing(CardField::Image))?;

    let image_path = image
        .value()
        .attr("src")
        .ok_or_else(|| missing(CardField::ImageSource))?;

    Ok(RawCardElement {
        name,
        image_path: image_path.to_string(),
    })
}

/// Apply the malformed-row policy: drop and log, or fail the run.
pub fn collect_card_elements(
    results: Vec<Result<RawCardElement, ScrapeError>>,
    policy: MissingFieldPolicy,
) -> Result<Vec<RawCardElement>, ScrapeError> {
    let mut elements = Vec::with_capacity(results.len());

    for result in results {
        match result {
            Ok(element) => elements.push(element),
            Err(e) => match policy {
                MissingFieldPolicy::Skip => warn!("Skipping malformed card row: {}", e),
                MissingFieldPolicy::Abort => return Err(e),
            },
        }
    }

    Ok(elements)
}
