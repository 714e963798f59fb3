use scraper::{ElementRef, Html, Selector};
use tapreply_core::{CoreError, ExtractionError};

/// A parsed snapshot of a page plus the URL it was loaded from.
///
/// All queries are read-only. Text is the concatenation of every descendant
/// text node, trimmed, which is what a browser reports as `textContent`.
pub struct PageDocument {
    url: String,
    html: Html,
}

impl PageDocument {
    pub fn parse(url: impl Into<String>, html: &str) -> Self {
        Self {
            url: url.into(),
            html: Html::parse_document(html),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Trimmed text of every element matching `selector`, in document order.
    pub fn texts(&self, selector: &str) -> Result<Vec<String>, CoreError> {
        let selector = parse_selector(selector)?;
        Ok(self.html.select(&selector).map(element_text).collect())
    }

    /// Trimmed text of the first element matching `selector`. `None` when
    /// nothing matches or the first match is empty.
    pub fn first_text(&self, selector: &str) -> Result<Option<String>, CoreError> {
        let selector = parse_selector(selector)?;
        Ok(self
            .html
            .select(&selector)
            .next()
            .map(element_text)
            .filter(|text| !text.is_empty()))
    }

    pub fn exists(&self, selector: &str) -> Result<bool, CoreError> {
        let selector = parse_selector(selector)?;
        Ok(self.html.select(&selector).next().is_some())
    }

    /// Text of the first `child` inside the first `parent`.
    pub fn nested_text(&self, parent: &str, child: &str) -> Result<Option<String>, CoreError> {
        let parent = parse_selector(parent)?;
        let child = parse_selector(child)?;
        Ok(self
            .html
            .select(&parent)
            .next()
            .and_then(|element| element.select(&child).next())
            .map(element_text)
            .filter(|text| !text.is_empty()))
    }
}

fn parse_selector(selector: &str) -> Result<Selector, CoreError> {
    Selector::parse(selector).map_err(|e| {
        CoreError::Extraction(ExtractionError::InvalidSelector {
            selector: selector.to_string(),
            reason: e.to_string(),
        })
    })
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
