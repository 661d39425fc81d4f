//! Completion-service abstraction and the quiz generation round trip.
//!
//! - [`LowLevelClient`] is the only thing a provider implements.
//! - [`QuizGenerator`] composes the prompt, makes exactly one request, and runs the
//!   response through the extractor. There is no retry and no cancellation.

use crate::error::{AIError, GenerationError};
use crate::extractor::{extract_outcome, parse_quiz, ExtractionOutcome};
use crate::i18n::Locale;
use crate::interceptors::{Exchange, Interceptor};
use crate::model::{Quiz, QuizConfiguration};
use crate::prompt::{chat_title_prompt, clean_title, PromptComposer};
use async_trait::async_trait;
use chrono::Local;
use std::fmt::{self, Debug};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument, warn};

/// Speed/quality trade-off requested from the completion service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ModelTier {
    #[default]
    Fast,
    Quality,
}

impl ModelTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelTier::Fast => "fast",
            ModelTier::Quality => "quality",
        }
    }
}

impl fmt::Display for ModelTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fast" | "chat" => Ok(Self::Fast),
            "quality" | "reasoner" | "thinking" => Ok(Self::Quality),
            _ => Err(format!("Unknown model tier: '{}'. Supported: fast, quality", s)),
        }
    }
}

/// Low-level model client abstraction.
///
/// Implementors execute one prompt against the model selected by `tier` and
/// return the raw model text.
#[async_trait]
pub trait LowLevelClient: Send + Sync + Debug {
    /// The only method that implementations must provide
    async fn ask_raw(&self, prompt: String, tier: ModelTier) -> Result<String, AIError>;

    /// Clone this client into a boxed trait object
    fn clone_box(&self) -> Box<dyn LowLevelClient>;

    /// Model identifier used for a tier, for logs and transcripts.
    fn model_name(&self, tier: ModelTier) -> String {
        tier.to_string()
    }
}

impl Clone for Box<dyn LowLevelClient> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

#[async_trait]
impl LowLevelClient for Box<dyn LowLevelClient> {
    async fn ask_raw(&self, prompt: String, tier: ModelTier) -> Result<String, AIError> {
        self.as_ref().ask_raw(prompt, tier).await
    }

    fn clone_box(&self) -> Box<dyn LowLevelClient> {
        self.as_ref().clone_box()
    }

    fn model_name(&self, tier: ModelTier) -> String {
        self.as_ref().model_name(tier)
    }
}

/// Reply to a free-form chat message.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatReply {
    /// The reply carried a recoverable quiz.
    Quiz { quiz: Quiz, raw: String },
    /// Plain text, shown as-is.
    Text(String),
}

/// Generates quizzes and chat replies through a [`LowLevelClient`].
#[derive(Clone)]
pub struct QuizGenerator<C: LowLevelClient> {
    client: C,
    composer: PromptComposer,
    locale: Locale,
    tier: ModelTier,
    interceptor: Option<Arc<dyn Interceptor>>,
}

impl<C: LowLevelClient> Debug for QuizGenerator<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizGenerator")
            .field("client", &self.client)
            .field("locale", &self.locale)
            .field("tier", &self.tier)
            .field("intercepted", &self.interceptor.is_some())
            .finish()
    }
}

impl<C: LowLevelClient> QuizGenerator<C> {
    pub fn new(client: C) -> Self {
        info!("Creating new QuizGenerator");
        Self {
            client,
            composer: PromptComposer::default(),
            locale: Locale::default(),
            tier: ModelTier::default(),
            interceptor: None,
        }
    }

    /// Get a reference to the underlying client
    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn tier(&self) -> ModelTier {
        self.tier
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_tier(mut self, tier: ModelTier) -> Self {
        self.tier = tier;
        self
    }

    pub fn with_composer(mut self, composer: PromptComposer) -> Self {
        self.composer = composer;
        self
    }

    pub fn with_interceptor(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.interceptor = Some(interceptor);
        self
    }

    /// One request, with the exchange handed to the interceptor when set.
    async fn ask(&self, purpose: &str, prompt: String, tier: ModelTier) -> Result<String, AIError> {
        let started = Instant::now();
        let response = self.client.ask_raw(prompt.clone(), tier).await?;
        info!(
            purpose,
            %tier,
            elapsed_ms = started.elapsed().as_millis() as u64,
            response_len = response.len(),
            "completion received"
        );

        if let Some(interceptor) = &self.interceptor {
            let model = self.client.model_name(tier);
            let exchange = Exchange {
                purpose,
                model: &model,
                prompt: &prompt,
                response: &response,
            };
            if let Err(e) = interceptor.save(&exchange).await {
                warn!(error = %e, "failed to save transcript");
            }
        }
        Ok(response)
    }

    /// Compose, request and extract a quiz for `config`.
    ///
    /// The detector gate is skipped since a quiz was explicitly requested. A response
    /// with no recoverable question is a [`GenerationError::ParseFailure`].
    #[instrument(
        skip(self, config),
        fields(quiz_type = %config.quiz_type, count = config.question_count)
    )]
    pub async fn generate(&self, config: &QuizConfiguration) -> Result<Quiz, GenerationError> {
        let prompt = self.composer.compose(config);
        let raw = self.ask("quiz", prompt, self.tier).await?;

        match parse_quiz(&raw, Some(config), self.locale) {
            Some((quiz, path)) => {
                info!(
                    ?path,
                    questions = quiz.question_count(),
                    requested = config.question_count,
                    "quiz generated"
                );
                Ok(quiz)
            }
            None => {
                warn!(response_len = raw.len(), "no quiz recovered from response");
                Err(GenerationError::ParseFailure { raw_response: raw })
            }
        }
    }

    /// Free-form chat. Replies that carry a quiz are returned as one.
    #[instrument(skip(self, message), fields(message_len = message.len()))]
    pub async fn respond(&self, message: &str) -> Result<ChatReply, AIError> {
        let raw = self.ask("chat", message.to_string(), self.tier).await?;
        Ok(match extract_outcome(&raw, None, self.locale) {
            ExtractionOutcome::Quiz { quiz, .. } => ChatReply::Quiz { quiz, raw },
            ExtractionOutcome::NotAQuiz | ExtractionOutcome::Unparsed => ChatReply::Text(raw),
        })
    }

    /// Short conversation title from the fast tier, or a timestamped fallback.
    pub async fn suggest_title(&self, first_message: &str) -> String {
        let prompt = chat_title_prompt(first_message, self.locale);
        match self.ask("title", prompt, ModelTier::Fast).await {
            Ok(raw) => {
                let title = clean_title(&raw);
                if !title.is_empty() {
                    return title;
                }
                warn!("empty title suggestion");
            }
            Err(e) => warn!(error = %e, "title suggestion failed"),
        }
        self.locale
            .fallback_chat_title(&Local::now().format("%H:%M:%S").to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_names() {
        assert_eq!("quality".parse::<ModelTier>(), Ok(ModelTier::Quality));
        assert_eq!("CHAT".parse::<ModelTier>(), Ok(ModelTier::Fast));
        assert!("turbo".parse::<ModelTier>().is_err());
        assert_eq!(ModelTier::default().to_string(), "fast");
    }
}
