//! CLI definitions for TapReply.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// TapReply CLI.
#[derive(Parser)]
#[command(name = "tapreply")]
#[command(about = "Draft social media replies with an LLM")]
#[command(version)]
pub(crate) struct Cli {
    /// Settings file path (default: <config dir>/tapreply/settings.toml)
    #[arg(short, long, global = true)]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Extract post content and metadata from a saved page
    Extract {
        /// Page URL, used to pick the platform adapter
        #[arg(long)]
        url: String,

        /// Saved HTML of the page
        #[arg(long)]
        html: PathBuf,
    },

    /// Extract a saved page and generate a reply for it
    Generate {
        /// Page URL, used to pick the platform adapter
        #[arg(long)]
        url: String,

        /// Saved HTML of the page
        #[arg(long)]
        html: PathBuf,

        /// Reply tone (supportive, analytical, witty); defaults to the preferred tone
        #[arg(long)]
        tone: Option<String>,
    },

    /// Check that an API key works with a provider
    TestConnection {
        /// Provider identifier (openai, gemini)
        #[arg(long)]
        provider: String,

        /// API key to test; not saved
        #[arg(long)]
        api_key: String,
    },

    /// Settings management commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Read one JSON background message from stdin and print the JSON response
    Message,
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Print the current settings with the API key redacted
    Show,

    /// Update and save settings
    Set {
        #[arg(long)]
        api_key: Option<String>,

        /// Provider identifier (openai, gemini)
        #[arg(long)]
        provider: Option<String>,

        /// Reply length (short, medium, long)
        #[arg(long)]
        reply_length: Option<String>,

        /// Background about you that replies may draw on
        #[arg(long)]
        user_knowledge: Option<String>,

        #[arg(long)]
        all_lowercase: Option<bool>,

        /// Preferred tone (supportive, analytical, witty)
        #[arg(long)]
        tone: Option<String>,

        #[arg(long)]
        auto_detect_platform: Option<bool>,
    },

    /// Restore default settings
    Reset,
}
