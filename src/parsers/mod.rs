pub mod identifier;
pub mod names;

pub use identifier::*;
pub use names::*;

use scraper::ElementRef;

/// Text content of an element with surrounding whitespace removed.
pub fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Join a page-relative path onto the site root.
///
/// The path is appended verbatim; a `src` that is already an absolute URL
/// is returned unchanged.
pub fn absolute_image_url(base_url: &str, path: &str) -> String {
    if url::Url::parse(path).map(|u| u.has_host()).unwrap_or(false) {
        path.to_string()
    } else {
        format!("{}{}", base_url, path)
    }
}
