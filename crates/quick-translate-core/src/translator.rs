//! Translation flow: prompt, remote call, optional language detection, result.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::client::{ChatClient, ChatMessage, ChatRequest, ClientFactory};
use crate::config::Lang;
use crate::error::{Error, Result};
use crate::prompt::{
    DETECTION_PROMPT, TranslationContext, build_system_prompt_with_context,
    translation_user_message,
};

/// Sampling temperature for translations
pub const TRANSLATION_TEMPERATURE: f32 = 0.1;
/// Output tokens allowed per input character
pub const TOKENS_PER_INPUT_CHAR: u32 = 3;
/// Hard ceiling on translation output tokens
pub const MAX_TRANSLATION_TOKENS: u32 = 4000;
/// Output token bound for language detection
pub const DETECTION_MAX_TOKENS: u32 = 10;
/// Longest reply accepted as a language code
const MAX_LANGUAGE_CODE_LEN: usize = 10;

/// A completed translation, as shown to the user and stored in history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResult {
    pub original_text: String,
    pub translated_text: String,
    /// Resolved source language; never `auto`
    pub source_language: Lang,
    pub target_language: Lang,
    /// Creation time in milliseconds since the Unix epoch
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternatives: Option<Vec<String>>,
}

/// Output token budget for translating `text`
pub fn max_tokens_for(text: &str) -> u32 {
    let chars = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
    chars
        .saturating_mul(TOKENS_PER_INPUT_CHAR)
        .min(MAX_TRANSLATION_TOKENS)
}

/// Normalize a detection reply, accepting only code-shaped answers
fn parse_language_code(raw: &str) -> Option<Lang> {
    let code = raw.trim().to_lowercase();
    let plausible = !code.is_empty()
        && code.len() <= MAX_LANGUAGE_CODE_LEN
        && code.chars().all(|c| c.is_ascii_lowercase() || c == '-')
        && code != Lang::AUTO;
    plausible.then(|| Lang::new(code))
}

/// Sequences prompt construction, the remote call and language detection.
///
/// Results are never persisted here; saving is up to the caller.
pub struct TranslationService {
    clients: Arc<ClientFactory>,
}

impl TranslationService {
    pub const fn new(clients: Arc<ClientFactory>) -> Self {
        Self { clients }
    }

    pub const fn clients(&self) -> &Arc<ClientFactory> {
        &self.clients
    }

    /// Translate `text` into `target`; pass `Lang::auto()` to detect the source
    pub async fn translate(
        &self,
        text: &str,
        target: &Lang,
        source: &Lang,
    ) -> Result<TranslationResult> {
        self.translate_with_context(text, target, source, &TranslationContext::default())
            .await
    }

    /// Translate with domain, tone and audience hints added to the prompt
    pub async fn translate_with_context(
        &self,
        text: &str,
        target: &Lang,
        source: &Lang,
        context: &TranslationContext,
    ) -> Result<TranslationResult> {
        if text.trim().is_empty() {
            return Err(Error::Validation("text to translate is empty".to_string()));
        }

        let client = self.clients.client().await?;

        let request = ChatRequest {
            messages: vec![
                ChatMessage::system(build_system_prompt_with_context(source, target, context)),
                ChatMessage::user(translation_user_message(text)),
            ],
            temperature: TRANSLATION_TEMPERATURE,
            max_tokens: max_tokens_for(text),
        };

        info!(
            "Translating {} chars {} -> {} with {}",
            text.chars().count(),
            source,
            target,
            client.name()
        );

        let translated_text = client
            .complete(&request)
            .await?
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(Error::EmptyResponse)?;

        let source_language = if source.is_auto() {
            detect_with(client.as_ref(), text).await
        } else {
            source.clone()
        };

        Ok(TranslationResult {
            original_text: text.to_string(),
            translated_text,
            source_language,
            target_language: target.clone(),
            timestamp: crate::util::now_millis(),
            confidence: None,
            alternatives: None,
        })
    }

    /// Detect the language of `text`, or `unknown` on any failure
    pub async fn detect_language(&self, text: &str) -> Lang {
        match self.clients.client().await {
            Ok(client) => detect_with(client.as_ref(), text).await,
            Err(e) => {
                warn!("Language detection unavailable: {}", e);
                Lang::unknown()
            }
        }
    }
}

async fn detect_with(client: &dyn ChatClient, text: &str) -> Lang {
    let request = ChatRequest {
        messages: vec![ChatMessage::system(DETECTION_PROMPT), ChatMessage::user(text)],
        temperature: 0.0,
        max_tokens: DETECTION_MAX_TOKENS,
    };

    let detected = match client.complete(&request).await {
        Ok(Some(reply)) => parse_language_code(&reply).unwrap_or_else(|| {
            warn!("Unrecognized language detection reply: {:?}", reply);
            Lang::unknown()
        }),
        Ok(None) => {
            warn!("Language detection returned no content");
            Lang::unknown()
        }
        Err(e) => {
            warn!("Language detection failed: {}", e);
            Lang::unknown()
        }
    };

    debug!("Detected source language: {}", detected);
    detected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_tokens_scales_with_input() {
        assert_eq!(max_tokens_for("hello"), 15);
        assert_eq!(max_tokens_for("héllo"), 15);
    }

    #[test]
    fn test_max_tokens_capped() {
        let long = "a".repeat(5000);
        assert_eq!(max_tokens_for(&long), MAX_TRANSLATION_TOKENS);
    }

    #[test]
    fn test_parse_language_code_normalizes() {
        assert_eq!(parse_language_code("  EN \n"), Some(Lang::new("en")));
        assert_eq!(parse_language_code("zh-CN"), Some(Lang::new("zh-cn")));
        assert_eq!(parse_language_code("unknown"), Some(Lang::unknown()));
    }

    #[test]
    fn test_parse_language_code_rejects_prose() {
        assert_eq!(parse_language_code("The language is French."), None);
        assert_eq!(parse_language_code(""), None);
        assert_eq!(parse_language_code("en1"), None);
        assert_eq!(parse_language_code("abcdefghijk"), None);
        assert_eq!(parse_language_code("AUTO"), None);
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let result = TranslationResult {
            original_text: "hello".into(),
            translated_text: "bonjour".into(),
            source_language: Lang::new("en"),
            target_language: Lang::new("fr"),
            timestamp: 1_700_000_000_000,
            confidence: None,
            alternatives: None,
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["originalText"], "hello");
        assert_eq!(json["sourceLanguage"], "en");
        assert_eq!(json["timestamp"], 1_700_000_000_000_i64);
        assert!(json.get("confidence").is_none());
    }
}
