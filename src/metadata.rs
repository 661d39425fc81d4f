//! Title, subject, difficulty and time-limit resolution for an extracted quiz.
//!
//! Configuration always wins over anything read from the response text. Without a
//! configuration the response is mined for a heading, an "about X" phrase and an
//! "X difficulty" phrase; anything unmatched uses the locale defaults.

use crate::i18n::Locale;
use crate::model::{Difficulty, Question, Quiz, QuizConfiguration};
use once_cell::sync::Lazy;
use regex::Regex;
use std::str::FromStr;

/// Minimum default time budget, in minutes.
pub const MIN_DEFAULT_MINUTES: u32 = 5;

static TITLE_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^#{1,6}[ \t]*\**[ \t]*([^*\n]*(?:quiz|test|assessment|اختبار)[^*\n]*)")
        .expect("title heading pattern")
});
static NUMBERED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.").expect("numbered prefix pattern"));
static SUBJECT_ABOUT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\babout\s+([^,\n]+)").expect("subject about pattern"));
static SUBJECT_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)quiz:\s*([^,\n(]+)").expect("subject label pattern"));
static DIFFICULTY_PHRASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(easy|medium|hard|expert)\s+difficulty").expect("difficulty pattern")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizMeta {
    pub title: String,
    pub description: String,
    pub subject: String,
    pub difficulty: Difficulty,
    pub category: String,
}

impl QuizMeta {
    /// Labels for a configured generation request.
    pub fn from_config(config: &QuizConfiguration, locale: Locale) -> Self {
        let subject = locale.config_subject(config);
        Self {
            title: locale.config_title(config),
            description: locale.description(config.difficulty, &subject),
            subject,
            difficulty: config.difficulty,
            category: locale.category().to_string(),
        }
    }

    /// Labels mined from the response text, for unconfigured (chat) responses.
    pub fn infer_from_text(text: &str, locale: Locale) -> Self {
        let title = infer_title(text).unwrap_or_else(|| locale.default_title().to_string());
        let subject = infer_subject(text).unwrap_or_else(|| locale.default_subject().to_string());
        let difficulty = infer_difficulty(text).unwrap_or_default();
        Self {
            title,
            description: locale.description(difficulty, &subject),
            subject,
            difficulty,
            category: locale.category().to_string(),
        }
    }

    /// Labels for the line parser: configuration first, text inference otherwise.
    pub fn resolve(text: &str, config: Option<&QuizConfiguration>, locale: Locale) -> Self {
        match config {
            Some(config) => Self::from_config(config, locale),
            None => Self::infer_from_text(text, locale),
        }
    }

    pub fn into_quiz(self, questions: Vec<Question>, config: Option<&QuizConfiguration>) -> Quiz {
        let time_limit_minutes = time_limit(config, questions.len());
        Quiz {
            title: self.title,
            description: self.description,
            subject: self.subject,
            difficulty: self.difficulty,
            category: self.category,
            max_score: questions.len(),
            questions,
            time_limit_minutes,
        }
    }
}

/// One minute per question, never under five minutes.
pub fn default_time_limit(question_count: usize) -> u32 {
    u32::try_from(question_count)
        .unwrap_or(u32::MAX)
        .max(MIN_DEFAULT_MINUTES)
}

/// Configured limit when positive, computed default otherwise.
pub fn time_limit(config: Option<&QuizConfiguration>, question_count: usize) -> u32 {
    match config {
        Some(config) if config.time_limit_minutes > 0 => config.time_limit_minutes,
        _ => default_time_limit(question_count),
    }
}

pub fn infer_title(text: &str) -> Option<String> {
    TITLE_HEADING
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .find(|title| !title.is_empty() && !NUMBERED.is_match(title))
        .map(str::to_string)
}

pub fn infer_subject(text: &str) -> Option<String> {
    SUBJECT_ABOUT
        .captures(text)
        .or_else(|| SUBJECT_LABEL.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| clean_phrase(m.as_str()))
        .filter(|s| !s.is_empty())
}

pub fn infer_difficulty(text: &str) -> Option<Difficulty> {
    DIFFICULTY_PHRASE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| Difficulty::from_str(m.as_str()).ok())
}

fn clean_phrase(raw: &str) -> String {
    raw.trim()
        .trim_end_matches(|c: char| matches!(c, '.' | ':' | '*' | '!' | '?' | '؟'))
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuizType;

    #[test]
    fn default_time_limit_has_floor() {
        assert_eq!(default_time_limit(0), 5);
        assert_eq!(default_time_limit(3), 5);
        assert_eq!(default_time_limit(12), 12);
    }

    #[test]
    fn zero_configured_limit_uses_default() {
        let config = QuizConfiguration::new(QuizType::MultipleChoice, Difficulty::Easy, 8);
        assert_eq!(time_limit(Some(&config), 8), 8);
        assert_eq!(time_limit(Some(&config.clone().with_time_limit(20)), 8), 20);
        assert_eq!(time_limit(None, 2), 5);
    }

    #[test]
    fn title_skips_numbered_question_headings() {
        let text = "#### **1. Which test is harder?**\n## **Biology Quiz**\n";
        assert_eq!(infer_title(text).as_deref(), Some("Biology Quiz"));
    }

    #[test]
    fn subject_and_difficulty_from_text() {
        let text = "Here is a hard difficulty quiz about the Roman Empire, enjoy.";
        assert_eq!(infer_subject(text).as_deref(), Some("the Roman Empire"));
        assert_eq!(infer_difficulty(text), Some(Difficulty::Hard));
    }

    #[test]
    fn subject_label_form() {
        assert_eq!(infer_subject("Quiz: Chemistry (basics)").as_deref(), Some("Chemistry"));
    }

    #[test]
    fn config_overrides_text() {
        let config = QuizConfiguration::new(QuizType::Mixed, Difficulty::Expert, 4).with_subject("Art");
        let meta = QuizMeta::resolve("an easy difficulty quiz about music", Some(&config), Locale::English);
        assert_eq!(meta.subject, "Art");
        assert_eq!(meta.title, "Art Quiz");
        assert_eq!(meta.difficulty, Difficulty::Expert);
    }

    #[test]
    fn defaults_without_config_or_hints() {
        let meta = QuizMeta::infer_from_text("1. What?", Locale::Arabic);
        assert_eq!(meta.title, "اختبار مُولد");
        assert_eq!(meta.subject, "معرفة عامة");
        assert_eq!(meta.difficulty, Difficulty::Medium);
    }
}
