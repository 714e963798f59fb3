mod cli;

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use background_service::{GenerateReplyRequest, RequestOrchestrator, TestConnectionRequest};
use clap::Parser;
use cli::{Cli, Commands, ConfigAction};
use llm_interface::ProviderClient;
use tapreply_core::{
    redact, ConfigError, CoreError, ErrorExt, FileSettingsStore, SettingsStore, Tone,
};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str =
    "tapreply=info,background_service=info,llm_interface=info,platform_adapters=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store = FileSettingsStore::new(cli.settings.unwrap_or_else(default_settings_path));
    tracing::debug!("Using settings file {}", store.path().display());

    match cli.command {
        Commands::Extract { url, html } => {
            let html = read_page(&html)?;
            let content = platform_adapters::extract_page(&url, &html)?;
            println!("{}", serde_json::to_string_pretty(&content)?);
        }
        Commands::Generate { url, html, tone } => {
            let tone = tone.map(|t| t.parse::<Tone>()).transpose()?;
            let html = read_page(&html)?;
            let content = platform_adapters::extract_page(&url, &html)?;

            if !content.platform.is_supported() {
                bail!("No post content found. Please make sure you are on a social media post page.");
            }
            if !content.has_text() {
                bail!("No post content found on this page. Please navigate to a specific post and try again.");
            }
            if let Some(preview) = content.preview() {
                tracing::info!("Replying to: {}", preview);
            }

            let orchestrator = RequestOrchestrator::new(store, ProviderClient::new()?);
            if let Some(tone) = tone {
                orchestrator.select_tone(tone)?;
            }
            let response = orchestrator
                .generate_reply(GenerateReplyRequest {
                    content: content.text,
                    metadata: content.metadata,
                    tone,
                    platform: content.platform,
                })
                .await;

            match (response.reply, response.error) {
                (Some(reply), _) => println!("{}", reply),
                (None, error) => bail!(error.unwrap_or_else(|| "Failed to generate reply".to_string())),
            }
        }
        Commands::TestConnection { provider, api_key } => {
            let orchestrator = RequestOrchestrator::new(store, ProviderClient::new()?);
            let response = orchestrator
                .test_api_connection(TestConnectionRequest { provider, api_key })
                .await;

            match (response.message, response.error) {
                (Some(message), _) if response.success => println!("{}", message),
                (_, error) => bail!(error.unwrap_or_else(|| "API test failed".to_string())),
            }
        }
        Commands::Config { action } => run_config(&store, action)?,
        Commands::Message => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("reading message from stdin")?;

            let orchestrator = RequestOrchestrator::new(store, ProviderClient::new()?);
            let response = orchestrator.handle_json(&raw).await;
            println!("{}", serde_json::to_string(&response)?);
        }
    }

    Ok(())
}

fn run_config(store: &FileSettingsStore, action: ConfigAction) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            let settings = store.load()?;
            let mut shown = serde_json::to_value(&settings)?;
            shown["apiKey"] = redact(&settings.api_key).into();
            println!("{}", serde_json::to_string_pretty(&shown)?);
        }
        ConfigAction::Set {
            api_key,
            provider,
            reply_length,
            user_knowledge,
            all_lowercase,
            tone,
            auto_detect_platform,
        } => {
            let mut settings = store.load()?;
            if let Some(api_key) = api_key {
                settings.api_key = api_key;
            }
            if let Some(provider) = provider {
                settings.api_provider = provider;
            }
            if let Some(length) = reply_length {
                settings.reply_length = length.parse()?;
            }
            if let Some(knowledge) = user_knowledge {
                settings.user_knowledge = knowledge;
            }
            if let Some(enabled) = all_lowercase {
                settings.all_lowercase = enabled;
            }
            if let Some(tone) = tone {
                settings.preferred_tone = tone.parse()?;
            }
            if let Some(enabled) = auto_detect_platform {
                settings.auto_detect_platform = enabled;
            }

            let settings = match settings.validate_for_save() {
                Ok(settings) => settings,
                Err(CoreError::Config(ConfigError::MissingApiKey)) => {
                    bail!("Please enter your API key")
                }
                Err(e) => bail!(e.user_friendly_message()),
            };
            store.save(&settings)?;
            println!("Settings saved successfully!");
        }
        ConfigAction::Reset => {
            let reset = store.load()?.reset_defaults();
            store.save(&reset)?;
            println!("Settings reset to defaults");
        }
    }

    Ok(())
}

fn read_page(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn default_settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tapreply")
        .join("settings.toml")
}
