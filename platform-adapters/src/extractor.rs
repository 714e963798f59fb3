use crate::document::PageDocument;
use serde_json::Value;
use tapreply_core::{CoreError, ExtractedContent, Metadata, Platform};
use tracing::debug;

/// Text from containers is only trusted when it is longer than this.
pub const FALLBACK_MIN_CHARS: usize = 50;

/// Length as a browser reports it for `textContent`: UTF-16 code units.
pub(crate) fn text_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Per-platform extraction strategy.
///
/// Missing elements are never errors: `extract_content` returns `Ok(None)`
/// and metadata fields are simply left out. `Err` is reserved for internal
/// faults such as a malformed selector.
pub trait ContentExtractor {
    fn platform(&self) -> Platform;

    fn extract_content(&self, page: &PageDocument) -> Result<Option<String>, CoreError>;

    fn extract_metadata(&self, page: &PageDocument) -> Metadata;

    fn extract_content_data(&self, page: &PageDocument) -> Result<ExtractedContent, CoreError> {
        let text = self.extract_content(page)?;
        let metadata = self.extract_metadata(page);
        debug!(
            "Extracted {} post: text={} metadata_fields={}",
            self.platform(),
            text.is_some(),
            metadata.len()
        );

        Ok(ExtractedContent {
            platform: self.platform(),
            text,
            metadata: Some(metadata),
        })
    }
}

/// First text across `selectors` (every match of each, in order) whose
/// [`text_len`] lies strictly between `min_chars` and `max_chars`.
pub(crate) fn first_text_within(
    page: &PageDocument,
    selectors: &[&str],
    min_chars: usize,
    max_chars: usize,
) -> Result<Option<String>, CoreError> {
    for selector in selectors {
        for text in page.texts(selector)? {
            let len = text_len(&text);
            if len > min_chars && len < max_chars {
                debug!("Content matched selector {}", selector);
                return Ok(Some(text));
            }
        }
    }
    Ok(None)
}

/// Last-resort scan of known post containers.
pub(crate) fn fallback_container_text(
    page: &PageDocument,
    containers: &[&str],
) -> Result<Option<String>, CoreError> {
    for container in containers {
        if let Some(text) = page
            .texts(container)?
            .into_iter()
            .find(|text| text_len(text) > FALLBACK_MIN_CHARS)
        {
            debug!("Content taken from fallback container {}", container);
            return Ok(Some(text));
        }
    }
    Ok(None)
}

/// First non-empty text of the first element matching any of `selectors`.
pub(crate) fn first_text_of(
    page: &PageDocument,
    selectors: &[&str],
) -> Result<Option<String>, CoreError> {
    for selector in selectors {
        if let Some(text) = page.first_text(selector)? {
            return Ok(Some(text));
        }
    }
    Ok(None)
}

/// Stores one metadata field. A failed field is logged and skipped so the
/// remaining fields still get extracted.
pub(crate) fn insert_field<T: Into<Value>>(
    metadata: &mut Metadata,
    key: &str,
    field: Result<Option<T>, CoreError>,
) {
    match field {
        Ok(Some(value)) => {
            metadata.insert(key.to_string(), value.into());
        }
        Ok(None) => {}
        Err(e) => debug!("Skipping metadata field {}: {}", key, e),
    }
}

/// Builds a nested metadata object; `None` when no sub-field was found.
pub(crate) fn nested_fields(fields: Vec<(&str, Result<Option<String>, CoreError>)>) -> Option<Metadata> {
    let mut nested = Metadata::new();
    for (key, field) in fields {
        insert_field(&mut nested, key, field);
    }
    if nested.is_empty() {
        None
    } else {
        Some(nested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tapreply_core::ExtractionError;

    fn bad_selector() -> CoreError {
        ExtractionError::InvalidSelector {
            selector: "div >".to_string(),
            reason: "dangling combinator".to_string(),
        }
        .into()
    }

    #[test]
    fn test_failed_field_does_not_block_others() {
        let mut metadata = Metadata::new();
        insert_field(&mut metadata, "author", Ok(Some("@ana")));
        insert_field::<String>(&mut metadata, "flair", Err(bad_selector()));
        insert_field(&mut metadata, "isRetweet", Ok(Some(false)));
        insert_field::<String>(&mut metadata, "subreddit", Ok(None));

        assert_eq!(metadata.keys().collect::<Vec<_>>(), vec!["author", "isRetweet"]);
        assert_eq!(metadata["author"], "@ana");
        assert_eq!(metadata["isRetweet"], false);
        assert!(!metadata.contains_key("flair"));
    }

    #[test]
    fn test_nested_fields_skip_failed_sub_field() {
        let engagement = nested_fields(vec![
            ("likes", Ok(Some("12".to_string()))),
            ("retweets", Err(bad_selector())),
            ("replies", Ok(Some("3".to_string()))),
        ])
        .unwrap();

        assert_eq!(engagement.keys().collect::<Vec<_>>(), vec!["likes", "replies"]);
        assert!(nested_fields(vec![("likes", Err(bad_selector())), ("retweets", Ok(None))]).is_none());
    }

    #[test]
    fn test_lengths_count_utf16_units() {
        assert_eq!(text_len("hello"), 5);
        assert_eq!(text_len("\u{1F680}"), 2);
        assert_eq!(text_len("caf\u{e9}"), 4);
    }

    #[test]
    fn test_emoji_text_passes_length_bounds() {
        // Six emoji are six chars but twelve UTF-16 units.
        let page = PageDocument::parse(
            "https://x.com/a/status/1",
            "<div data-testid=\"tweetText\">\u{1F680}\u{1F680}\u{1F680}\u{1F680}\u{1F680}\u{1F680}</div>",
        );
        let text = first_text_within(&page, &[r#"[data-testid="tweetText"]"#], 10, 1000).unwrap();
        assert_eq!(text.as_deref(), Some("\u{1F680}\u{1F680}\u{1F680}\u{1F680}\u{1F680}\u{1F680}"));
    }

    #[test]
    fn test_fallback_container_threshold() {
        let long = "a".repeat(51);
        let html = format!("<div class=\"tweet\">short</div><div class=\"tweet\">{}</div>", long);
        let page = PageDocument::parse("https://x.com/a/status/1", &html);

        assert_eq!(fallback_container_text(&page, &[".tweet"]).unwrap(), Some(long));
        let short = PageDocument::parse("https://x.com/a/status/1", &format!("<div class=\"tweet\">{}</div>", "a".repeat(50)));
        assert_eq!(fallback_container_text(&short, &[".tweet"]).unwrap(), None);
    }
}
