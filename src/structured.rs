//! Fast path: a fenced JSON data block carrying a `questions` array.
//!
//! Each question element is validated on its own; invalid elements are dropped.
//! When nothing survives the caller falls back to the line parser.

use crate::error::StructuredBlockError;
use crate::i18n::Locale;
use crate::json_scan::first_object;
use crate::metadata::QuizMeta;
use crate::model::{Difficulty, Question, Quiz, QuizConfiguration};
use once_cell::sync::Lazy;
use regex::Regex;
use schemars::{schema_for, JsonSchema};
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;
use tracing::{debug, instrument};

static FENCED_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```[ \t]*(?i:json)?[ \t]*\r?\n?(.*?)```").expect("fenced block pattern"));

/// Shape of the data block as advertised to the model.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
#[schemars(title = "Quiz", description = "A generated quiz")]
pub struct StructuredQuiz {
    pub title: Option<String>,
    pub description: Option<String>,
    pub subject: Option<String>,
    /// One of easy, medium, hard, expert
    pub difficulty: Option<String>,
    pub category: Option<String>,
    pub questions: Vec<StructuredQuestion>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StructuredQuestion {
    /// The question text
    pub question: String,
    /// At least two answer options
    pub options: Vec<String>,
    /// Zero-based index of the correct option
    pub correct_answer: f64,
    #[serde(default)]
    pub explanation: Option<String>,
}

impl StructuredQuestion {
    fn into_question(self) -> Option<Question> {
        let text = self.question.trim();
        if text.is_empty() || self.options.len() < 2 {
            return None;
        }
        let index = self.correct_answer;
        if index.fract() != 0.0 || index < 0.0 || index >= self.options.len() as f64 {
            return None;
        }
        let options = self.options.iter().map(|o| o.trim().to_string()).collect();
        let mut question = Question::multiple_choice(text, options, index as usize);
        question.explanation = self
            .explanation
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());
        question.is_complete().then_some(question)
    }
}

/// Validated contents of a data block.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredBlock {
    pub title: Option<String>,
    pub description: Option<String>,
    pub subject: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub category: Option<String>,
    pub questions: Vec<Question>,
    pub dropped: usize,
}

fn string_field(object: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Object in one fence body that carries a `questions` array.
fn quiz_object(body: &str) -> Result<serde_json::Map<String, Value>, StructuredBlockError> {
    let raw = first_object(body).ok_or(StructuredBlockError::NoObject)?;
    match serde_json::from_str::<Value>(raw)? {
        Value::Object(object) if object.get("questions").is_some_and(Value::is_array) => Ok(object),
        Value::Object(_) => Err(StructuredBlockError::MissingQuestions),
        _ => Err(StructuredBlockError::NoObject),
    }
}

/// Locate and validate the data block: the first fence holding a `questions` array.
#[instrument(skip(text), fields(text_len = text.len()))]
pub fn parse_structured_block(text: &str) -> Result<StructuredBlock, StructuredBlockError> {
    let mut last_error = StructuredBlockError::NoBlock;
    let mut found = None;
    for caps in FENCED_BLOCK.captures_iter(text) {
        let body = caps.get(1).map_or("", |m| m.as_str());
        match quiz_object(body) {
            Ok(object) => {
                found = Some(object);
                break;
            }
            Err(e) => {
                debug!(error = %e, "skipping fenced block");
                last_error = e;
            }
        }
    }
    let object = found.ok_or(last_error)?;
    let elements = object
        .get("questions")
        .and_then(Value::as_array)
        .ok_or(StructuredBlockError::MissingQuestions)?;

    let questions: Vec<Question> = elements
        .iter()
        .filter_map(|element| serde_json::from_value::<StructuredQuestion>(element.clone()).ok())
        .filter_map(StructuredQuestion::into_question)
        .collect();

    let dropped = elements.len() - questions.len();
    if questions.is_empty() {
        return Err(StructuredBlockError::NoValidQuestions(elements.len()));
    }
    debug!(kept = questions.len(), dropped, "validated data block");

    Ok(StructuredBlock {
        title: string_field(&object, "title"),
        description: string_field(&object, "description"),
        subject: string_field(&object, "subject"),
        difficulty: string_field(&object, "difficulty").and_then(|d| Difficulty::from_str(&d).ok()),
        category: string_field(&object, "category"),
        questions,
        dropped,
    })
}

/// Fast path. `None` means "use the line parser", never an error.
pub fn try_structured_parse(text: &str, config: Option<&QuizConfiguration>, locale: Locale) -> Option<Quiz> {
    let block = match parse_structured_block(text) {
        Ok(block) => block,
        Err(e) => {
            debug!(error = %e, "structured parse unavailable");
            return None;
        }
    };

    let fallback = match config {
        Some(config) => QuizMeta::from_config(config, locale),
        None => QuizMeta {
            title: locale.default_title().to_string(),
            description: locale.generic_description().to_string(),
            subject: locale.default_subject().to_string(),
            difficulty: Difficulty::default(),
            category: locale.category().to_string(),
        },
    };

    let meta = QuizMeta {
        title: block.title.unwrap_or(fallback.title),
        description: block.description.unwrap_or(fallback.description),
        subject: block.subject.unwrap_or(fallback.subject),
        difficulty: block.difficulty.unwrap_or(fallback.difficulty),
        category: block.category.unwrap_or(fallback.category),
    };
    Some(meta.into_quiz(block.questions, config))
}

/// Prompt suffix asking for the data block, with its JSON schema.
pub fn schema_guidance() -> String {
    let schema = schema_for!(StructuredQuiz);
    let schema_json = serde_json::to_string_pretty(&schema)
        .unwrap_or_else(|_| "Schema serialization failed".to_string());

    format!(
        "## Response Format\nReturn the quiz as a single fenced ```json block matching this schema. \
`correctAnswer` is the zero-based index of the correct option:\n```json\n{}\n```",
        schema_json
    )
}
