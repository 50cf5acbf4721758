//! Quick Translate Core Library
//!
//! This library provides the core functionality for translating text with an
//! LLM behind an OpenAI-compatible API:
//! - Credential storage and a lazily built, credential-bound API client
//! - Prompt construction and the translate / detect-language flow
//! - A persisted, newest-first translation history

pub mod client;
pub mod config;
pub mod credential;
pub mod error;
pub mod history;
pub mod prompt;
pub mod storage;
pub mod translator;
pub mod util;

pub use client::{
    ChatClient, ChatMessage, ChatRequest, ClientBuilder, ClientFactory, OpenAiClient,
};
pub use config::{
    AppConfig, Lang, LanguageOption, ProviderPreset, StorageConfig, TranslatorConfig,
    language_name, provider_preset, source_languages, target_languages,
    DEFAULT_API_BASE, DEFAULT_MODEL, DEFAULT_TARGET_LANG, PROVIDER_PRESETS,
};
pub use credential::CredentialStore;
pub use error::{Error, ErrorKind, Result};
pub use history::HistoryCache;
pub use prompt::{Audience, Domain, Tone, TranslationContext, build_system_prompt};
pub use storage::{DiskStore, KeyValueStore, MemoryStore};
pub use translator::{TranslationResult, TranslationService};

use std::sync::Arc;
use tracing::debug;

/// High-level translator that wires storage, credentials, the API client,
/// the translation flow and the history together.
pub struct QuickTranslator {
    service: TranslationService,
    history: HistoryCache,
    config: AppConfig,
}

impl QuickTranslator {
    /// Open the configured on-disk store and build the translator
    pub fn new(config: AppConfig) -> Result<Self> {
        let storage = storage::open(&config.storage)?;
        Ok(Self::with_storage(config, storage))
    }

    /// Build on an existing store (e.g. [`MemoryStore`] for ephemeral runs)
    pub fn with_storage(config: AppConfig, storage: Arc<dyn KeyValueStore>) -> Self {
        let credentials = CredentialStore::new(Arc::clone(&storage));
        let clients = ClientFactory::new(credentials, config.translator.clone());
        Self::with_clients(config, Arc::new(clients), storage)
    }

    /// Build with a custom client factory
    pub fn with_clients(
        config: AppConfig,
        clients: Arc<ClientFactory>,
        storage: Arc<dyn KeyValueStore>,
    ) -> Self {
        debug!(
            "Translator ready (api base {}, model {})",
            config.translator.api_base, config.translator.model
        );

        Self {
            service: TranslationService::new(clients),
            history: HistoryCache::new(storage),
            config,
        }
    }

    /// Translate `text`; the result is not saved to history
    pub async fn translate(
        &self,
        text: &str,
        target: &Lang,
        source: &Lang,
    ) -> Result<TranslationResult> {
        self.service.translate(text, target, source).await
    }

    pub async fn translate_with_context(
        &self,
        text: &str,
        target: &Lang,
        source: &Lang,
        context: &TranslationContext,
    ) -> Result<TranslationResult> {
        self.service
            .translate_with_context(text, target, source, context)
            .await
    }

    pub async fn detect_language(&self, text: &str) -> Lang {
        self.service.detect_language(text).await
    }

    pub async fn set_credential(&self, value: &str) -> Result<()> {
        self.service.clients().set_credential(value).await
    }

    pub async fn clear_credential(&self) -> Result<()> {
        self.service.clients().clear_credential().await
    }

    pub fn is_configured(&self) -> bool {
        self.service.clients().is_configured()
    }

    pub const fn history(&self) -> &HistoryCache {
        &self.history
    }

    pub const fn config(&self) -> &AppConfig {
        &self.config
    }
}
