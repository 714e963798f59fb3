//! Turns an extracted post plus the user's selections into the system and
//! user prompts sent to a provider.
//!
//! The system prompt is a persona block: a JSON document describing voice,
//! hard style rules, optional background about the user, and a few sample
//! replies. The user prompt names the platform, tone and length, lists the
//! post metadata one `key: value` per line, then quotes the post.

use serde::Serialize;
use serde_json::Value;
use tapreply_core::{CoreError, Metadata, Platform, PromptPair, ReplyLength, ReplyRequest, Tone};
use tracing::debug;

pub fn tone_instruction(tone: Tone) -> &'static str {
    match tone {
        Tone::Supportive => "Supportive, an encouraging reply that shows empathy and understanding towards the post content subject or author",
        Tone::Analytical => "Analytical, a reply that provides thoughtful insights and constructive feedback, furthering the conversation by bringing value",
        Tone::Witty => "Witty, an engaging reply that's clever and entertaining without being too cringe",
    }
}

pub fn length_instruction(length: ReplyLength) -> &'static str {
    match length {
        ReplyLength::Short => "Keep the reply very tight, 1-2 sentences, 50-100 characters",
        ReplyLength::Medium => "Keep the reply moderate in length, 2-3 sentences, 100-200 characters",
        ReplyLength::Long => "You can write a longer, more detailed reply, 3-4 sentences, 200+ characters",
    }
}

pub const LOWERCASE_RULE: &str =
    "use all lowercase (e.g. thanks lol.) unless referring to a product or brand name";

const BASE_RULES: &[&str] = &[
    "Never use the em dash symbol (—). Replace all em dashes with commas (,). Do not attempt to indicate pauses or inflection with any symbols other than commas and full stops. Em dashes should never appear in your output for any reason",
    "never use hyphenated emulation (-)",
    "never wrap replies in quotes",
    "avoid excessive quote usage",
    "never use semi-colons (;)",
    "never start your replies with 'Reply:'",
    "use shorthand when possible and natural (e.g., 'Congratz', 'lol')",
];

const ASCII_RULE: &str = "use ascii characters only";

#[derive(Serialize)]
struct PersonaBlock<'a> {
    persona: Persona,
    rules: Vec<&'a str>,
    formatting: Formatting,
    engagement: Engagement,
    user_context: UserContext<'a>,
    examples: Examples,
}

#[derive(Serialize)]
struct Persona {
    style: &'static str,
    tone: &'static str,
    avoid: [&'static str; 4],
}

#[derive(Serialize)]
struct Formatting {
    no_wrapping_quotes: bool,
    light_informal_tone: bool,
}

#[derive(Serialize)]
struct Engagement {
    engage_with_post: bool,
    add_value_or_humor: bool,
}

#[derive(Serialize)]
struct UserContext<'a> {
    data: &'a str,
    rules: UserContextRules,
}

#[derive(Serialize)]
struct UserContextRules {
    use_when: &'static str,
    avoid_when: &'static str,
    integration: &'static str,
}

#[derive(Serialize)]
struct Examples {
    post_1: ExamplePost,
    misc: [&'static str; 1],
}

#[derive(Serialize)]
struct ExamplePost {
    content: &'static str,
    replies: [&'static str; 3],
}

const EXAMPLE_POST: &str = "I wonder what kind of 10x engineer decided to make the \"-> type\" in functions a suggestion\n\nIt would've made more sense if it was actually checking for something gives editors / linters (Pylance, MyPy, Pyright, Ruff…) something to check; does absolutely nothing at runtime unless you add a library or code that reads the annotation and enforces it.";

const EXAMPLE_REPLIES: [&str; 3] = [
    "If only there was a document, a Python improvement proposal of sorts, that describes the decisions that went into the design of type annotations. We'll probably never know what went through their minds",
    "The flexibility lets Python stay dynamic, but yeah, runtime checks would be nice sometimes.",
    "It's intentional. Keeps Python flexible while letting static tools do the heavy lifting.",
];

const EXAMPLE_MISC: [&str; 1] =
    ["Congrats on the first paying user. SaaS rite of passage tbh. What’s next on the checklist?"];

pub struct PromptBuilder;

impl PromptBuilder {
    /// Builds both prompts for one reply. `platform` must be a supported one.
    pub fn build(
        content: &str,
        metadata: Option<&Metadata>,
        platform: Platform,
        request: &ReplyRequest,
    ) -> Result<PromptPair, CoreError> {
        let system_prompt = Self::system_prompt(request)?;
        let user_prompt = Self::user_prompt(content, metadata, platform, request)?;
        debug!(
            "Built prompts: platform={} tone={} length={} system_chars={} user_chars={}",
            platform,
            request.tone,
            request.length,
            system_prompt.len(),
            user_prompt.len()
        );

        Ok(PromptPair {
            system_prompt,
            user_prompt,
        })
    }

    pub fn system_prompt(request: &ReplyRequest) -> Result<String, CoreError> {
        let mut rules: Vec<&str> = BASE_RULES.to_vec();
        if request.all_lowercase {
            rules.push(LOWERCASE_RULE);
        }
        rules.push(ASCII_RULE);

        let block = PersonaBlock {
            persona: Persona {
                style: "clever, tight, dryly humorous",
                tone: "slightly cynical but insightful",
                avoid: [
                    "sounding like a chatbot",
                    "overly cheerful or helpful",
                    "corporate language",
                    "explaining yourself",
                ],
            },
            rules,
            formatting: Formatting {
                no_wrapping_quotes: true,
                light_informal_tone: true,
            },
            engagement: Engagement {
                engage_with_post: true,
                add_value_or_humor: true,
            },
            user_context: UserContext {
                data: &request.user_knowledge,
                rules: UserContextRules {
                    use_when: "Adds value naturally",
                    avoid_when: "It would reduce authenticity or feel forced",
                    integration: "Casually mention products or user experience when relevant",
                },
            },
            examples: Examples {
                post_1: ExamplePost {
                    content: EXAMPLE_POST,
                    replies: EXAMPLE_REPLIES,
                },
                misc: EXAMPLE_MISC,
            },
        };

        Ok(serde_json::to_string(&block)?)
    }

    pub fn user_prompt(
        content: &str,
        metadata: Option<&Metadata>,
        platform: Platform,
        request: &ReplyRequest,
    ) -> Result<String, CoreError> {
        let label = platform.display_name().ok_or_else(|| CoreError::InvalidInput {
            message: format!("cannot build a reply prompt for platform '{}'", platform),
        })?;

        let context = metadata
            .map(|m| flatten_metadata(m).join("\n"))
            .unwrap_or_default();

        Ok(format!(
            "Reply with a {} comment, {}. {}.\n\n{}\n\nPost: \n{}",
            label,
            tone_instruction(request.tone),
            length_instruction(request.length),
            context,
            content
        ))
    }
}

/// One `key: value` line per non-null field.
///
/// Nested objects are flattened exactly one level: their entries become
/// sibling lines keyed by the nested key, and the parent key is dropped.
/// Anything nested deeper is written as compact JSON.
pub fn flatten_metadata(metadata: &Metadata) -> Vec<String> {
    let mut lines = Vec::new();
    for (key, value) in metadata {
        match value {
            Value::Null => {}
            Value::Object(nested) => {
                for (nested_key, nested_value) in nested {
                    if !nested_value.is_null() {
                        lines.push(format!("{}: {}", nested_key, render_value(nested_value)));
                    }
                }
            }
            other => lines.push(format!("{}: {}", key, render_value(other))),
        }
    }
    lines
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn metadata(value: Value) -> Metadata {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    fn request(tone: Tone) -> ReplyRequest {
        ReplyRequest::new(tone)
    }

    #[test]
    fn test_flatten_one_level_of_nesting() {
        let meta = metadata(json!({
            "author": "alice",
            "isRetweet": false,
            "engagement": { "likes": "12", "retweets": null, "views": 400 },
            "flair": null
        }));

        let lines = flatten_metadata(&meta);
        assert_eq!(
            lines,
            vec!["author: alice", "isRetweet: false", "likes: 12", "views: 400"]
        );
    }

    #[test]
    fn test_flatten_line_count_matches_non_null_leaves() {
        let meta = metadata(json!({
            "subreddit": "rust",
            "author": null,
            "postType": "text",
            "engagement": { "upvotes": "10", "comments": null },
            "flair": "Help"
        }));
        assert_eq!(flatten_metadata(&meta).len(), 4);
    }

    #[test]
    fn test_flatten_deeper_values_as_json() {
        let meta = metadata(json!({
            "engagement": { "breakdown": { "a": 1 } },
            "tags": ["x", "y"]
        }));
        assert_eq!(
            flatten_metadata(&meta),
            vec![r#"breakdown: {"a":1}"#, r#"tags: ["x","y"]"#]
        );
    }

    #[test]
    fn test_flatten_empty() {
        assert!(flatten_metadata(&Metadata::new()).is_empty());
    }

    #[test]
    fn test_every_tone_and_length_instruction_appears() {
        for tone in Tone::ALL {
            for length in ReplyLength::ALL {
                let req = request(tone).with_length(length);
                let pair = PromptBuilder::build("A post", None, Platform::Reddit, &req).unwrap();
                assert!(pair.user_prompt.contains(tone_instruction(tone)));
                assert!(pair.user_prompt.contains(length_instruction(length)));
            }
        }
    }

    #[test]
    fn test_user_prompt_layout() {
        let meta = metadata(json!({ "author": "jane", "engagement": { "likes": "5" } }));
        let req = request(Tone::Witty).with_length(ReplyLength::Short);
        let prompt =
            PromptBuilder::user_prompt("Great product launch!", Some(&meta), Platform::Twitter, &req)
                .unwrap();

        assert_eq!(
            prompt,
            format!(
                "Reply with a Twitter/X comment, {}. {}.\n\nauthor: jane\nlikes: 5\n\nPost: \nGreat product launch!",
                tone_instruction(Tone::Witty),
                length_instruction(ReplyLength::Short)
            )
        );
    }

    #[test]
    fn test_user_prompt_without_metadata() {
        let prompt = PromptBuilder::user_prompt(
            "Body",
            None,
            Platform::Reddit,
            &request(Tone::Supportive),
        )
        .unwrap();
        assert!(prompt.starts_with("Reply with a Reddit comment, Supportive"));
        assert!(prompt.ends_with("Post: \nBody"));
        assert!(prompt.contains(length_instruction(ReplyLength::Medium)));
    }

    #[test]
    fn test_unsupported_platform_is_rejected() {
        let result = PromptBuilder::build(
            "Body",
            None,
            Platform::Unsupported,
            &request(Tone::Witty),
        );
        assert!(matches!(result, Err(CoreError::InvalidInput { .. })));
    }

    #[test]
    fn test_lowercase_rule_is_gated() {
        let on = PromptBuilder::system_prompt(&request(Tone::Witty).with_all_lowercase(true)).unwrap();
        let off = PromptBuilder::system_prompt(&request(Tone::Witty)).unwrap();
        assert!(on.contains(LOWERCASE_RULE));
        assert!(!off.contains(LOWERCASE_RULE));
    }

    #[test]
    fn test_system_prompt_is_structured_persona() {
        let req = request(Tone::Analytical).with_all_lowercase(true);
        let system = PromptBuilder::system_prompt(&req).unwrap();
        let parsed: Value = serde_json::from_str(&system).unwrap();

        assert_eq!(parsed["persona"]["style"], "clever, tight, dryly humorous");
        let rules = parsed["rules"].as_array().unwrap();
        assert_eq!(rules.len(), BASE_RULES.len() + 2);
        assert_eq!(rules[rules.len() - 2], LOWERCASE_RULE);
        assert_eq!(rules[rules.len() - 1], ASCII_RULE);
        assert!(rules.iter().any(|r| r == "never use semi-colons (;)"));
        assert!(rules.iter().any(|r| r == "never start your replies with 'Reply:'"));
        assert_eq!(parsed["formatting"]["no_wrapping_quotes"], true);
        assert_eq!(parsed["examples"]["post_1"]["replies"].as_array().unwrap().len(), 3);

        let keys: Vec<&String> = parsed.as_object().unwrap().keys().collect();
        assert_eq!(
            keys,
            vec!["persona", "rules", "formatting", "engagement", "user_context", "examples"]
        );
    }

    #[test]
    fn test_user_knowledge_is_escaped_into_persona() {
        let knowledge = r#"I run "Acme" analytics, ex-\backend"#;
        let req = request(Tone::Supportive).with_user_knowledge(knowledge);
        let system = PromptBuilder::system_prompt(&req).unwrap();

        let parsed: Value = serde_json::from_str(&system).unwrap();
        assert_eq!(parsed["user_context"]["data"], knowledge);
        assert_eq!(
            parsed["user_context"]["rules"]["use_when"],
            "Adds value naturally"
        );
    }
}
