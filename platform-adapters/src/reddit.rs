use crate::document::PageDocument;
use crate::extractor::{
    fallback_container_text, first_text_of, insert_field, nested_fields, ContentExtractor,
};
use tapreply_core::{CoreError, Metadata, Platform};
use url::Url;

const TITLE_SELECTOR: &str = "h1, .Post__title";
const BODY_SELECTOR: &str = r#"[id*="t3_"][id*="post-rtjson-content"]"#;
const CONTAINER_SELECTORS: &[&str] = &["shreddit-post", r#"[data-testid="post-container"]"#];

const SUBREDDIT_SELECTOR: &str = "a.subreddit-name";
const AUTHOR_SELECTORS: &[&str] = &[
    r#"a[href^="/user/"]"#,
    ".Post__author",
    r#"[data-testid="post-author"]"#,
];
const FLAIR_SELECTOR: &str = ".Post__flair, .flair";
const UPVOTE_SELECTOR: &str = r#"[data-testid="post-upvote"]"#;
const COMMENT_SELECTOR: &str = r#"[data-testid="post-comment"]"#;

/// Checked in order; the first marker present decides the post type.
const POST_TYPE_MARKERS: &[(&str, &str)] = &[
    (".Post__image", "image"),
    (".Post__video", "video"),
    (".Post__link", "link"),
    (".Post__text", "text"),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct RedditAdapter;

impl RedditAdapter {
    pub fn new() -> Self {
        Self
    }

    fn extract_subreddit(&self, page: &PageDocument) -> Result<Option<String>, CoreError> {
        if let Some(name) = page.first_text(SUBREDDIT_SELECTOR)? {
            return Ok(Some(name));
        }
        Ok(subreddit_from_url(page.url()))
    }

    fn extract_author(&self, page: &PageDocument) -> Result<Option<String>, CoreError> {
        Ok(first_text_of(page, AUTHOR_SELECTORS)?
            .map(|name| name.strip_prefix("u/").unwrap_or(&name).to_string()))
    }

    fn extract_post_type(&self, page: &PageDocument) -> Result<Option<String>, CoreError> {
        for (marker, post_type) in POST_TYPE_MARKERS {
            if page.exists(marker)? {
                return Ok(Some(post_type.to_string()));
            }
        }
        Ok(Some("text".to_string()))
    }

    fn extract_engagement(&self, page: &PageDocument) -> Option<Metadata> {
        nested_fields(vec![
            ("upvotes", page.first_text(UPVOTE_SELECTOR)),
            ("comments", page.first_text(COMMENT_SELECTOR)),
        ])
    }

    fn extract_flair(&self, page: &PageDocument) -> Result<Option<String>, CoreError> {
        page.first_text(FLAIR_SELECTOR)
    }
}

impl ContentExtractor for RedditAdapter {
    fn platform(&self) -> Platform {
        Platform::Reddit
    }

    /// Title and body joined by a blank line; either part may be missing.
    fn extract_content(&self, page: &PageDocument) -> Result<Option<String>, CoreError> {
        let title = page.first_text(TITLE_SELECTOR)?.unwrap_or_default();
        let body = page.first_text(BODY_SELECTOR)?.unwrap_or_default();

        let mut full = String::new();
        if !title.is_empty() {
            full.push_str(&title);
            full.push_str("\n\n");
        }
        full.push_str(&body);

        let full = full.trim();
        if !full.is_empty() {
            return Ok(Some(full.to_string()));
        }
        fallback_container_text(page, CONTAINER_SELECTORS)
    }

    fn extract_metadata(&self, page: &PageDocument) -> Metadata {
        let mut metadata = Metadata::new();
        insert_field(&mut metadata, "subreddit", self.extract_subreddit(page));
        insert_field(&mut metadata, "author", self.extract_author(page));
        insert_field(&mut metadata, "postType", self.extract_post_type(page));
        insert_field(&mut metadata, "engagement", Ok(self.extract_engagement(page)));
        insert_field(&mut metadata, "flair", self.extract_flair(page));
        metadata
    }
}

/// Name following the first `/r/` path segment, e.g. `rust` for
/// `https://www.reddit.com/r/rust/comments/...`.
fn subreddit_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let mut segments = parsed.path_segments()?;
    segments
        .by_ref()
        .find(|segment| *segment == "r")
        .and_then(|_| segments.next())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::subreddit_from_url;

    #[test]
    fn test_subreddit_from_url() {
        assert_eq!(
            subreddit_from_url("https://www.reddit.com/r/rust/comments/abc/title/").as_deref(),
            Some("rust")
        );
        assert_eq!(subreddit_from_url("https://www.reddit.com/"), None);
        assert_eq!(subreddit_from_url("https://www.reddit.com/r/"), None);
        assert_eq!(subreddit_from_url("not a url"), None);
    }
}
