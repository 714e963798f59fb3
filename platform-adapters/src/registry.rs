use crate::document::PageDocument;
use crate::extractor::ContentExtractor;
use crate::reddit::RedditAdapter;
use crate::twitter::TwitterAdapter;
use tapreply_core::{CoreError, ExtractedContent, Metadata, Platform};
use tracing::{debug, info};

/// Hostname fragments checked in order against the raw URL; first hit wins.
const PLATFORM_TABLE: &[(&str, Platform)] = &[
    ("twitter.com", Platform::Twitter),
    ("x.com", Platform::Twitter),
    ("reddit.com", Platform::Reddit),
];

/// One adapter per supported platform.
#[derive(Debug, Clone, Copy)]
pub enum PlatformAdapter {
    Twitter(TwitterAdapter),
    Reddit(RedditAdapter),
}

impl ContentExtractor for PlatformAdapter {
    fn platform(&self) -> Platform {
        match self {
            PlatformAdapter::Twitter(adapter) => adapter.platform(),
            PlatformAdapter::Reddit(adapter) => adapter.platform(),
        }
    }

    fn extract_content(&self, page: &PageDocument) -> Result<Option<String>, CoreError> {
        match self {
            PlatformAdapter::Twitter(adapter) => adapter.extract_content(page),
            PlatformAdapter::Reddit(adapter) => adapter.extract_content(page),
        }
    }

    fn extract_metadata(&self, page: &PageDocument) -> Metadata {
        match self {
            PlatformAdapter::Twitter(adapter) => adapter.extract_metadata(page),
            PlatformAdapter::Reddit(adapter) => adapter.extract_metadata(page),
        }
    }
}

pub struct AdapterRegistry;

impl AdapterRegistry {
    /// Platform for `url` by plain substring match, `Unsupported` when no
    /// fragment matches.
    pub fn detect(url: &str) -> Platform {
        PLATFORM_TABLE
            .iter()
            .find(|(fragment, _)| url.contains(fragment))
            .map(|(_, platform)| *platform)
            .unwrap_or(Platform::Unsupported)
    }

    pub fn resolve(url: &str) -> Option<PlatformAdapter> {
        match Self::detect(url) {
            Platform::Twitter => Some(PlatformAdapter::Twitter(TwitterAdapter::new())),
            Platform::Reddit => Some(PlatformAdapter::Reddit(RedditAdapter::new())),
            Platform::Unsupported => {
                debug!("No adapter for {}", url);
                None
            }
        }
    }

    /// Resolves the adapter for `page` and runs it. Unsupported pages yield an
    /// empty result tagged `Unsupported`.
    pub fn extract(page: &PageDocument) -> Result<ExtractedContent, CoreError> {
        match Self::resolve(page.url()) {
            Some(adapter) => {
                let content = adapter.extract_content_data(page)?;
                info!(
                    "Extracted {} content (found text: {})",
                    content.platform,
                    content.has_text()
                );
                Ok(content)
            }
            None => Ok(ExtractedContent::unsupported()),
        }
    }
}

/// Parses `html` as the page at `url` and extracts its post.
pub fn extract_page(url: &str, html: &str) -> Result<ExtractedContent, CoreError> {
    let page = PageDocument::parse(url, html);
    AdapterRegistry::extract(&page)
}
