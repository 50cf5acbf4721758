//! System prompts for translation and language detection.

use serde::{Deserialize, Serialize};

use crate::config::{Lang, language_name};

/// Fixed instruction for the language detection call
pub const DETECTION_PROMPT: &str = "You are a language detection assistant. \
Identify the language of the user's text and reply with only its ISO 639-1 code \
(for example: en, fr, zh). If you cannot tell, reply with exactly: unknown";

/// Subject area of the text being translated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    General,
    Technical,
    Medical,
    Legal,
    Business,
    Academic,
    Casual,
}

/// Register the translation should be written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Formal,
    Informal,
    Neutral,
    Friendly,
}

/// Intended readers of the translation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    General,
    Expert,
    Children,
    Students,
}

impl Domain {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Technical => "technical",
            Self::Medical => "medical",
            Self::Legal => "legal",
            Self::Business => "business",
            Self::Academic => "academic",
            Self::Casual => "casual",
        }
    }
}

impl Tone {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Formal => "formal",
            Self::Informal => "informal",
            Self::Neutral => "neutral",
            Self::Friendly => "friendly",
        }
    }
}

impl Audience {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::General => "a general audience",
            Self::Expert => "domain experts",
            Self::Children => "children",
            Self::Students => "students",
        }
    }
}

/// Optional hints appended to the translation prompt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationContext {
    pub domain: Option<Domain>,
    pub tone: Option<Tone>,
    pub audience: Option<Audience>,
}

impl TranslationContext {
    pub const fn is_empty(&self) -> bool {
        self.domain.is_none() && self.tone.is_none() && self.audience.is_none()
    }
}

/// Build the system instruction for translating `source` into `target`.
///
/// Unknown codes are passed through verbatim. When `source` is `auto` the
/// model is asked to identify the language before translating.
pub fn build_system_prompt(source: &Lang, target: &Lang) -> String {
    let target_name = language_name(target.as_str());

    let mut prompt = if source.is_auto() {
        format!(
            "You are a professional translator. Identify the language of the user's text \
             first, then translate it into {target_name}."
        )
    } else {
        let source_name = language_name(source.as_str());
        format!(
            "You are a professional translator. Translate the user's text from \
             {source_name} into {target_name}."
        )
    };

    prompt.push_str(&format!(
        "\n\nGuidelines:\n\
         - Translate accurately, keeping the full meaning of the original\n\
         - Write natural, fluent {target_name} rather than a word-for-word rendering\n\
         - Respect cultural nuances and adapt idioms appropriately\n\
         - Preserve the tone, style and formatting of the original\n\
         - Reply with the translation only, without notes or explanations"
    ));

    prompt
}

/// Build the system instruction with context clauses appended
pub fn build_system_prompt_with_context(
    source: &Lang,
    target: &Lang,
    context: &TranslationContext,
) -> String {
    let mut prompt = build_system_prompt(source, target);
    if context.is_empty() {
        return prompt;
    }

    prompt.push_str("\n\nContext:");
    if let Some(domain) = context.domain {
        prompt.push_str(&format!(
            "\n- The text comes from the {} domain; use its established terminology",
            domain.as_str()
        ));
    }
    if let Some(tone) = context.tone {
        prompt.push_str(&format!("\n- Use a {} tone", tone.as_str()));
    }
    if let Some(audience) = context.audience {
        prompt.push_str(&format!("\n- The translation is intended for {}", audience.as_str()));
    }
    prompt
}

/// User message carrying the text to translate
pub fn translation_user_message(text: &str) -> String {
    format!("Translate the following text:\n\n{text}")
}
