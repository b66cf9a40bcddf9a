//! Static scanning of HTML for the images, stylesheets and scripts a page
//! references. Nothing is executed or rendered.
mod attrs;
mod scanner;

#[cfg(test)]
mod tests;

pub use scanner::{ResourceRef, ResourceScanner, scan_resources};

/// Whether a response with this `Content-Type` should be scanned. A missing
/// header is treated as HTML.
#[must_use]
pub fn is_html(content_type: Option<&str>) -> bool {
    content_type.is_none_or(|value| value.to_ascii_lowercase().contains("html"))
}
