//! Quiz domain types shared by the extractor, the prompt composer and the quiz runner.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum QuizType {
    #[default]
    MultipleChoice,
    TextAnswer,
    Mixed,
}

impl QuizType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuizType::MultipleChoice => "multiple-choice",
            QuizType::TextAnswer => "text-answer",
            QuizType::Mixed => "mixed",
        }
    }
}

impl fmt::Display for QuizType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuizType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "multiple-choice" | "multiple_choice" | "mcq" | "mc" => Ok(Self::MultipleChoice),
            "text-answer" | "text_answer" | "text" => Ok(Self::TextAnswer),
            "mixed" => Ok(Self::Mixed),
            _ => Err(format!("Unknown quiz type: '{}'. Supported: multiple-choice, text-answer, mixed", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            "expert" => Ok(Self::Expert),
            _ => Err(format!("Unknown difficulty: '{}'. Supported: easy, medium, hard, expert", s)),
        }
    }
}

/// Language the generated questions are written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QuizLanguage {
    #[default]
    English,
    Arabic,
}

impl FromStr for QuizLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "english" | "en" => Ok(Self::English),
            "arabic" | "ar" => Ok(Self::Arabic),
            _ => Err(format!("Unknown quiz language: '{}'. Supported: english, arabic", s)),
        }
    }
}

/// What the user asked for. Immutable once submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizConfiguration {
    #[serde(rename = "type")]
    pub quiz_type: QuizType,
    pub difficulty: Difficulty,
    pub question_count: u32,
    /// 0 means unlimited.
    pub time_limit_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_instructions: Option<String>,
    pub quiz_language: QuizLanguage,
    /// Document excerpt the questions must be drawn from, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_text: Option<String>,
}

impl Default for QuizConfiguration {
    fn default() -> Self {
        Self {
            quiz_type: QuizType::MultipleChoice,
            difficulty: Difficulty::Medium,
            question_count: 10,
            time_limit_minutes: 0,
            subject: None,
            custom_instructions: None,
            quiz_language: QuizLanguage::English,
            source_text: None,
        }
    }
}

impl QuizConfiguration {
    pub fn new(quiz_type: QuizType, difficulty: Difficulty, question_count: u32) -> Self {
        Self {
            quiz_type,
            difficulty,
            question_count: question_count.max(1),
            ..Self::default()
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_time_limit(mut self, minutes: u32) -> Self {
        self.time_limit_minutes = minutes;
        self
    }

    pub fn with_language(mut self, language: QuizLanguage) -> Self {
        self.quiz_language = language;
        self
    }

    pub fn with_custom_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.custom_instructions = Some(instructions.into());
        self
    }

    pub fn with_source_text(mut self, text: impl Into<String>) -> Self {
        self.source_text = Some(text.into());
        self
    }

    /// Subject with blank values treated as absent.
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn custom_instructions(&self) -> Option<&str> {
        self.custom_instructions.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn source_text(&self) -> Option<&str> {
        self.source_text.as_deref().filter(|s| !s.trim().is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionKind {
    MultipleChoice,
    TextAnswer,
}

/// A single quiz question.
///
/// For text-answer questions `options` holds exactly the reference answer and
/// `correct_index` is 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "question")]
    pub text: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub options: Vec<String>,
    #[serde(rename = "correctAnswer")]
    pub correct_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl Question {
    pub fn multiple_choice(text: impl Into<String>, options: Vec<String>, correct_index: usize) -> Self {
        Self {
            text: text.into(),
            kind: QuestionKind::MultipleChoice,
            options,
            correct_index,
            explanation: None,
        }
    }

    pub fn text_answer(text: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: QuestionKind::TextAnswer,
            options: vec![answer.into()],
            correct_index: 0,
            explanation: None,
        }
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    /// Completeness invariant: only complete questions are ever surfaced.
    pub fn is_complete(&self) -> bool {
        if self.text.trim().is_empty() {
            return false;
        }
        match self.kind {
            QuestionKind::TextAnswer => self.options.len() == 1 && self.correct_index == 0,
            QuestionKind::MultipleChoice => {
                self.options.len() >= 2 && self.correct_index < self.options.len()
            }
        }
    }

    pub fn correct_option(&self) -> Option<&str> {
        self.options.get(self.correct_index).map(String::as_str)
    }
}

/// A successfully extracted quiz. Owned by the caller once returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub title: String,
    pub description: String,
    pub subject: String,
    pub difficulty: Difficulty,
    pub category: String,
    pub questions: Vec<Question>,
    pub max_score: usize,
    pub time_limit_minutes: u32,
}

impl Quiz {
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}
