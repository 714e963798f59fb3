use crate::document::PageDocument;
use crate::extractor::{
    fallback_container_text, first_text_of, first_text_within, insert_field, nested_fields,
    ContentExtractor,
};
use tapreply_core::{CoreError, Metadata, Platform};

const CONTENT_SELECTORS: &[&str] = &[
    r#"[data-testid="tweetText"]"#,
    ".tweet-text",
    "[lang]",
    ".css-901oao",
    ".css-1dbjc4n",
];

// Shorter texts are button labels and counters, longer ones whole threads.
const MIN_CONTENT_CHARS: usize = 10;
const MAX_CONTENT_CHARS: usize = 1000;

const CONTAINER_SELECTORS: &[&str] = &[r#"[data-testid="tweet"], .tweet"#];

const AUTHOR_SELECTORS: &[&str] = &[
    r#"[data-testid="User-Name"]"#,
    ".css-1dbjc4n.r-1wbh5a2.r-dnmrzs",
    ".css-901oao.css-bfa6kz.r-1re7ezh.r-18u37iz.r-1qd0xha.r-a023e6.r-16dba41.r-ad9z0x.r-bcqeeo.r-qvutc0",
];

const SOCIAL_CONTEXT: &str = r#"[data-testid="socialContext"]"#;
const LIKE_BUTTON: &str = r#"[data-testid="like"]"#;
const RETWEET_BUTTON: &str = r#"[data-testid="retweet"]"#;
const COUNT_CONTAINER: &str = r#"[data-testid="app-text-transition-container"]"#;

#[derive(Debug, Clone, Copy, Default)]
pub struct TwitterAdapter;

impl TwitterAdapter {
    pub fn new() -> Self {
        Self
    }

    fn extract_author(&self, page: &PageDocument) -> Result<Option<String>, CoreError> {
        first_text_of(page, AUTHOR_SELECTORS)
    }

    fn extract_is_retweet(&self, page: &PageDocument) -> Result<Option<bool>, CoreError> {
        page.exists(SOCIAL_CONTEXT).map(Some)
    }

    fn extract_engagement(&self, page: &PageDocument) -> Option<Metadata> {
        nested_fields(vec![
            ("likes", page.nested_text(LIKE_BUTTON, COUNT_CONTAINER)),
            ("retweets", page.nested_text(RETWEET_BUTTON, COUNT_CONTAINER)),
        ])
    }
}

impl ContentExtractor for TwitterAdapter {
    fn platform(&self) -> Platform {
        Platform::Twitter
    }

    fn extract_content(&self, page: &PageDocument) -> Result<Option<String>, CoreError> {
        if let Some(text) =
            first_text_within(page, CONTENT_SELECTORS, MIN_CONTENT_CHARS, MAX_CONTENT_CHARS)?
        {
            return Ok(Some(text));
        }
        fallback_container_text(page, CONTAINER_SELECTORS)
    }

    fn extract_metadata(&self, page: &PageDocument) -> Metadata {
        let mut metadata = Metadata::new();
        insert_field(&mut metadata, "author", self.extract_author(page));
        insert_field(&mut metadata, "isRetweet", self.extract_is_retweet(page));
        insert_field(&mut metadata, "engagement", Ok(self.extract_engagement(page)));
        metadata
    }
}
