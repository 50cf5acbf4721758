//! Quick Translate CLI - translate text from the terminal and manage history.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use quick_translate_core::{
    AppConfig, Audience, Domain, Lang, MemoryStore, PROVIDER_PRESETS, QuickTranslator, Tone,
    TranslationContext, TranslationResult, provider_preset, source_languages,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

/// Longest input accepted, matching the panel's text box
const MAX_INPUT_CHARS: usize = 1000;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DomainOption {
    General,
    Technical,
    Medical,
    Legal,
    Business,
    Academic,
    Casual,
}

impl From<DomainOption> for Domain {
    fn from(opt: DomainOption) -> Self {
        match opt {
            DomainOption::General => Self::General,
            DomainOption::Technical => Self::Technical,
            DomainOption::Medical => Self::Medical,
            DomainOption::Legal => Self::Legal,
            DomainOption::Business => Self::Business,
            DomainOption::Academic => Self::Academic,
            DomainOption::Casual => Self::Casual,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ToneOption {
    Formal,
    Informal,
    Neutral,
    Friendly,
}

impl From<ToneOption> for Tone {
    fn from(opt: ToneOption) -> Self {
        match opt {
            ToneOption::Formal => Self::Formal,
            ToneOption::Informal => Self::Informal,
            ToneOption::Neutral => Self::Neutral,
            ToneOption::Friendly => Self::Friendly,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AudienceOption {
    General,
    Expert,
    Children,
    Students,
}

impl From<AudienceOption> for Audience {
    fn from(opt: AudienceOption) -> Self {
        match opt {
            AudienceOption::General => Self::General,
            AudienceOption::Expert => Self::Expert,
            AudienceOption::Children => Self::Children,
            AudienceOption::Students => Self::Students,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProviderOption {
    Openrouter,
    Glm,
    Deepseek,
    Gpt,
    Claude,
    Gemini,
}

impl ProviderOption {
    const fn id(self) -> &'static str {
        match self {
            Self::Openrouter => "openrouter",
            Self::Glm => "glm",
            Self::Deepseek => "deepseek",
            Self::Gpt => "gpt",
            Self::Claude => "claude",
            Self::Gemini => "gemini",
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "qtranslate")]
#[command(author, version, about = "Translate text with an LLM", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Preset provider; fills in the API base URL and model
    #[arg(long, value_enum, env = "QTRANSLATE_PROVIDER", global = true)]
    provider: Option<ProviderOption>,

    /// OpenAI-compatible API base URL (overrides the provider preset)
    #[arg(long, env = "OPENAI_API_BASE", global = true)]
    api_base: Option<String>,

    /// Model name for the OpenAI-compatible API (overrides the provider preset)
    #[arg(long, env = "OPENAI_MODEL", global = true)]
    model: Option<String>,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Keep the credential and history in memory only
    #[arg(long, global = true)]
    ephemeral: bool,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Translate a piece of text
    Translate {
        /// Text to translate
        #[arg(required = true)]
        text: Vec<String>,

        /// Target language code
        #[arg(short = 't', long)]
        target: Option<String>,

        /// Source language code, or "auto" to detect it
        #[arg(short = 's', long)]
        source: Option<String>,

        /// Do not save the result to history
        #[arg(long)]
        no_save: bool,

        /// Subject area of the text
        #[arg(long, value_enum)]
        domain: Option<DomainOption>,

        /// Tone of the translation
        #[arg(long, value_enum)]
        tone: Option<ToneOption>,

        /// Intended readers of the translation
        #[arg(long, value_enum)]
        audience: Option<AudienceOption>,
    },

    /// Show, delete or clear saved translations
    History {
        #[command(subcommand)]
        action: Option<HistoryAction>,
    },

    /// Manage the stored API key
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },

    /// List supported language codes
    Languages,

    /// List provider presets and their models
    Providers,
}

#[derive(Subcommand, Debug)]
enum HistoryAction {
    /// List saved translations, newest first
    List,
    /// Delete every entry with the given timestamp
    Delete { timestamp: i64 },
    /// Remove all saved translations
    Clear,
}

#[derive(Subcommand, Debug)]
enum KeyAction {
    /// Store an API key
    Set { key: String },
    /// Remove the stored API key
    Clear,
    /// Show whether an API key is stored
    Status,
}

fn format_timestamp(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis).map_or_else(
        || millis.to_string(),
        |dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}

fn format_result(result: &TranslationResult) -> String {
    format!(
        "{}\n({} -> {})",
        result.translated_text, result.source_language, result.target_language
    )
}

// CLI output is intentional
#[allow(clippy::print_stdout)]
fn print_result(result: &TranslationResult) {
    println!("{}", format_result(result));
    info!("Translated at {}", format_timestamp(result.timestamp));
}

#[allow(clippy::print_stdout)]
fn print_history(entries: &[TranslationResult]) {
    if entries.is_empty() {
        println!("No translation history yet.");
        return;
    }

    for entry in entries {
        println!(
            "[{}] {} ({} -> {})",
            entry.timestamp,
            format_timestamp(entry.timestamp),
            entry.source_language,
            entry.target_language
        );
        println!("  {}", entry.original_text);
        println!("  {}", entry.translated_text);
    }
}

#[allow(clippy::print_stdout)]
fn print_languages() {
    for lang in source_languages() {
        println!("{:<6} {}", lang.code, lang.name);
    }
}

#[allow(clippy::print_stdout)]
fn print_providers() {
    for preset in PROVIDER_PRESETS {
        let free = if preset.is_free { " (free)" } else { "" };
        println!("{:<11} {}{}", preset.id, preset.api_base, free);
        println!("            {}", preset.models.join(", "));
    }
}

fn check_length(text: &str) -> Result<()> {
    if text.chars().count() > MAX_INPUT_CHARS {
        anyhow::bail!("Text is too long (maximum {MAX_INPUT_CHARS} characters)");
    }
    Ok(())
}

/// Apply the provider preset first so explicit URL and model flags win
fn apply_backend_overrides(config: &mut AppConfig, args: &Args) -> Result<()> {
    if let Some(provider) = args.provider {
        let preset = provider_preset(provider.id())
            .with_context(|| format!("Unknown provider preset {}", provider.id()))?;
        config.translator.apply_preset(preset);
    }
    if let Some(api_base) = &args.api_base {
        config.translator.api_base.clone_from(api_base);
    }
    if let Some(model) = &args.model {
        config.translator.model.clone_from(model);
    }
    Ok(())
}

async fn run_translate(
    translator: &QuickTranslator,
    text: &str,
    target: &Lang,
    source: &Lang,
    context: &TranslationContext,
    save: bool,
) -> Result<()> {
    check_length(text)?;

    let result = match translator
        .translate_with_context(text, target, source, context)
        .await
    {
        Ok(result) => result,
        Err(e) if e.is_not_configured() => {
            anyhow::bail!("No API key configured. Run `qtranslate key set <KEY>` first.");
        }
        Err(e) => {
            return Err(e).context("Translation failed. Please try again.");
        }
    };

    print_result(&result);

    if save {
        translator
            .history()
            .save(&result)
            .context("Failed to save translation")?;
    }

    Ok(())
}

#[allow(clippy::print_stdout)]
async fn run(args: Args, translator: QuickTranslator) -> Result<()> {
    match args.command {
        Command::Translate {
            text,
            target,
            source,
            no_save,
            domain,
            tone,
            audience,
        } => {
            let text = text.join(" ");
            let target = target.map_or_else(|| translator.config().target_lang.clone(), Lang::from);
            let source = source.map_or_else(|| translator.config().source_lang.clone(), Lang::from);
            let context = TranslationContext {
                domain: domain.map(Into::into),
                tone: tone.map(Into::into),
                audience: audience.map(Into::into),
            };

            run_translate(&translator, &text, &target, &source, &context, !no_save).await?;
        }
        Command::History { action } => match action.unwrap_or(HistoryAction::List) {
            HistoryAction::List => print_history(&translator.history().get_all()),
            HistoryAction::Delete { timestamp } => {
                let removed = translator
                    .history()
                    .delete_by_timestamp(timestamp)
                    .context("Failed to delete translation")?;
                println!("Removed {removed} entries");
            }
            HistoryAction::Clear => {
                translator
                    .history()
                    .clear()
                    .context("Failed to clear translation history")?;
                println!("Translation history cleared");
            }
        },
        Command::Key { action } => match action {
            KeyAction::Set { key } => {
                translator
                    .set_credential(&key)
                    .await
                    .context("Failed to save API key")?;
                println!("API key saved");
            }
            KeyAction::Clear => {
                translator
                    .clear_credential()
                    .await
                    .context("Failed to remove API key")?;
                println!("API key removed");
            }
            KeyAction::Status => {
                if translator.is_configured() {
                    println!("API key is configured");
                } else {
                    println!("No API key configured");
                }
            }
        },
        Command::Languages => print_languages(),
        Command::Providers => print_providers(),
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before parsing args so env vars are available)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Setup logging
    let log_level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    // Load or create config
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path).context("Failed to load config file")?
    } else {
        AppConfig::load()
    };

    // Override config with CLI arguments
    apply_backend_overrides(&mut config, &args)?;

    let translator = if args.ephemeral {
        QuickTranslator::with_storage(config, Arc::new(MemoryStore::new()))
    } else {
        QuickTranslator::new(config).context("Failed to open local storage")?
    };

    run(args, translator).await
}
