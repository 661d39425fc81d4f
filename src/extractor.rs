//! Extraction pipeline: detector gate, then the data-block fast path, then the line parser.

use crate::detector::detect;
use crate::i18n::Locale;
use crate::model::{Quiz, QuizConfiguration};
use crate::parser::parse_lines;
use crate::structured::try_structured_parse;
use tracing::{debug, instrument};

/// Which stage produced the quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionPath {
    Structured,
    Lines,
}

/// Result of running a response through the full pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionOutcome {
    /// No quiz-like signal; show the response as plain text.
    NotAQuiz,
    /// Quiz-like signal, but no complete question could be recovered.
    Unparsed,
    Quiz { quiz: Quiz, path: ExtractionPath },
}

impl ExtractionOutcome {
    pub fn into_quiz(self) -> Option<Quiz> {
        match self {
            ExtractionOutcome::Quiz { quiz, .. } => Some(quiz),
            _ => None,
        }
    }

    pub fn is_quiz(&self) -> bool {
        matches!(self, ExtractionOutcome::Quiz { .. })
    }
}

/// Parse without the detector gate. Used when the caller already knows a quiz was requested.
pub fn parse_quiz(text: &str, config: Option<&QuizConfiguration>, locale: Locale) -> Option<(Quiz, ExtractionPath)> {
    if let Some(quiz) = try_structured_parse(text, config, locale) {
        return Some((quiz, ExtractionPath::Structured));
    }
    parse_lines(text, config, locale).map(|quiz| (quiz, ExtractionPath::Lines))
}

/// Full pipeline with outcome classification.
#[instrument(skip(text, config), fields(text_len = text.len()))]
pub fn extract_outcome(text: &str, config: Option<&QuizConfiguration>, locale: Locale) -> ExtractionOutcome {
    if !detect(text) {
        debug!("detector rejected response");
        return ExtractionOutcome::NotAQuiz;
    }
    match parse_quiz(text, config, locale) {
        Some((quiz, path)) => {
            debug!(
                ?path,
                questions = quiz.question_count(),
                "extracted quiz"
            );
            ExtractionOutcome::Quiz { quiz, path }
        }
        None => {
            debug!("quiz-like response yielded no complete questions");
            ExtractionOutcome::Unparsed
        }
    }
}

/// `Some` only when at least one complete question was recovered.
pub fn extract(text: &str, config: Option<&QuizConfiguration>, locale: Locale) -> Option<Quiz> {
    extract_outcome(text, config, locale).into_quiz()
}
