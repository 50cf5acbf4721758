use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Language codes following ISO 639-1 with regional variants
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lang(pub String);

impl Lang {
    /// Source-language sentinel meaning "detect automatically"
    pub const AUTO: &'static str = "auto";
    /// Result of a language detection that could not be resolved
    pub const UNKNOWN: &'static str = "unknown";

    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn auto() -> Self {
        Self::new(Self::AUTO)
    }

    pub fn unknown() -> Self {
        Self::new(Self::UNKNOWN)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_auto(&self) -> bool {
        self.0 == Self::AUTO
    }
}

// Serde default functions for common languages
fn default_source_lang() -> Lang {
    Lang::auto()
}

fn default_target_lang() -> Lang {
    Lang::new(DEFAULT_TARGET_LANG)
}

impl std::fmt::Display for Lang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Lang {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Lang {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Translator backend configuration for OpenAI-compatible APIs.
///
/// The credential is deliberately absent: it lives in persistent storage and
/// is read through the credential store when a client is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatorConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Request timeout in seconds; `None` leaves the transport default
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl TranslatorConfig {
    pub fn new(api_base: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            model: model.into(),
            timeout_secs: None,
        }
    }
}

/// OpenRouter gateway
pub const DEFAULT_API_BASE: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE, DEFAULT_MODEL)
    }
}

impl TranslatorConfig {
    /// Point the backend at a preset provider and its first listed model
    pub fn apply_preset(&mut self, preset: &ProviderPreset) {
        self.api_base = preset.api_base.to_string();
        self.model = preset.default_model().to_string();
    }
}

/// A known OpenAI-compatible endpoint and the models it serves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderPreset {
    pub id: &'static str,
    pub name: &'static str,
    pub api_base: &'static str,
    pub models: &'static [&'static str],
    /// Usable without a paid plan
    pub is_free: bool,
}

impl ProviderPreset {
    pub fn default_model(&self) -> &'static str {
        self.models.first().copied().unwrap_or(DEFAULT_MODEL)
    }
}

pub const PROVIDER_PRESETS: &[ProviderPreset] = &[
    ProviderPreset {
        id: "openrouter",
        name: "OpenRouter",
        api_base: DEFAULT_API_BASE,
        models: &[DEFAULT_MODEL],
        is_free: false,
    },
    ProviderPreset {
        id: "glm",
        name: "GLM",
        api_base: "https://api.siliconflow.cn/v1",
        models: &["glm-4-9b-chat"],
        is_free: true,
    },
    ProviderPreset {
        id: "deepseek",
        name: "DeepSeek",
        api_base: "https://api.deepseek.com",
        models: &["deepseek-v3"],
        is_free: false,
    },
    ProviderPreset {
        id: "gpt",
        name: "GPT",
        api_base: "https://api.openai.com/v1",
        models: &["gpt-4.1", "gpt-4o"],
        is_free: false,
    },
    ProviderPreset {
        id: "claude",
        name: "Claude",
        api_base: "https://api.anthropic.com/v1/",
        models: &["claude-sonnet-4-20250514", "claude-3-5-sonnet-20241022"],
        is_free: false,
    },
    ProviderPreset {
        id: "gemini",
        name: "Gemini",
        api_base: "https://generativelanguage.googleapis.com/v1beta/openai/",
        models: &["gemini-2.5-pro-preview-05-06", "gemini-2.0-flash"],
        is_free: false,
    },
];

/// Look up a preset by id, ignoring case
pub fn provider_preset(id: &str) -> Option<&'static ProviderPreset> {
    PROVIDER_PRESETS
        .iter()
        .find(|preset| preset.id.eq_ignore_ascii_case(id))
}

/// Persistent storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage directory (defaults to $XDG_DATA_HOME/quick-translate)
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    pub fn resolved_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(crate::util::default_storage_path)
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Source language
    #[serde(default = "default_source_lang")]
    pub source_lang: Lang,

    /// Target language
    #[serde(default = "default_target_lang")]
    pub target_lang: Lang,

    /// Translator backend configuration
    #[serde(default)]
    pub translator: TranslatorConfig,

    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source_lang: default_source_lang(),
            target_lang: default_target_lang(),
            translator: TranslatorConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::error::Error> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            crate::error::Error::ConfigLoad(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, crate::error::Error> {
        toml::from_str(content).map_err(|e| {
            crate::error::Error::ConfigLoad(format!("Failed to parse config: {e}"))
        })
    }

    /// Load from default locations (~/.config/quick-translate/config.toml, ./config.toml)
    pub fn load() -> Self {
        // Try user config
        if let Some(config_dir) = crate::util::config_dir() {
            let user_config = config_dir.join("quick-translate").join("config.toml");
            if user_config.exists() {
                match Self::from_file(&user_config) {
                    Ok(config) => {
                        tracing::debug!("Loaded config from {}", user_config.display());
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // Try local config
        let local_config = std::path::PathBuf::from("config.toml");
        if local_config.exists() {
            match Self::from_file(&local_config) {
                Ok(config) => {
                    tracing::debug!("Loaded config from ./config.toml");
                    return config;
                }
                Err(e) => {
                    tracing::warn!("Failed to load ./config.toml: {}", e);
                }
            }
        }

        tracing::debug!("No config file found, using defaults");
        Self::default()
    }
}

/// A language option for menus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageOption {
    /// ISO language code (e.g., "en", "fr", "zh-CN")
    pub code: &'static str,
    /// Display name (e.g., "English", "French")
    pub name: &'static str,
}

const LANGUAGES: &[LanguageOption] = &[
    LanguageOption { code: "auto", name: "Detect Language" },
    LanguageOption { code: "en", name: "English" },
    LanguageOption { code: "zh-CN", name: "Chinese (Simplified)" },
    LanguageOption { code: "zh-TW", name: "Chinese (Traditional)" },
    LanguageOption { code: "ja", name: "Japanese" },
    LanguageOption { code: "ko", name: "Korean" },
    LanguageOption { code: "fr", name: "French" },
    LanguageOption { code: "de", name: "German" },
    LanguageOption { code: "es", name: "Spanish" },
    LanguageOption { code: "ru", name: "Russian" },
    LanguageOption { code: "ar", name: "Arabic" },
    LanguageOption { code: "hi", name: "Hindi" },
    LanguageOption { code: "pt", name: "Portuguese" },
    LanguageOption { code: "it", name: "Italian" },
    LanguageOption { code: "nl", name: "Dutch" },
    LanguageOption { code: "th", name: "Thai" },
    LanguageOption { code: "vi", name: "Vietnamese" },
    LanguageOption { code: "tr", name: "Turkish" },
    LanguageOption { code: "pl", name: "Polish" },
    LanguageOption { code: "sv", name: "Swedish" },
    LanguageOption { code: "da", name: "Danish" },
    LanguageOption { code: "no", name: "Norwegian" },
    LanguageOption { code: "fi", name: "Finnish" },
];

/// Languages available as translation source, including auto-detection.
pub fn source_languages() -> &'static [LanguageOption] {
    LANGUAGES
}

/// Languages available as translation target.
pub fn target_languages() -> Vec<LanguageOption> {
    LANGUAGES
        .iter()
        .filter(|lang| lang.code != Lang::AUTO)
        .copied()
        .collect()
}

/// Display name for a language code.
///
/// Unknown codes are returned unchanged so prompts stay meaningful for any
/// ISO code the model understands.
pub fn language_name(code: &str) -> &str {
    LANGUAGES
        .iter()
        .find(|lang| lang.code == code)
        .map_or(code, |lang| lang.name)
}

/// Default target language code
pub const DEFAULT_TARGET_LANG: &str = "en";
