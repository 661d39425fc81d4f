pub mod clients;
pub mod config;
pub mod core;
pub mod detector;
pub mod document;
pub mod error;
pub mod extractor;
pub mod history;
pub mod i18n;
pub mod interceptors;
pub mod json_scan;
pub mod letters;
pub mod metadata;
pub mod model;
pub mod parser;
pub mod prompt;
pub mod scoring;
pub mod structured;

// Convenient re-exports
pub use crate::core::{ChatReply, LowLevelClient, ModelTier, QuizGenerator};
pub use detector::detect;
pub use error::{AIError, GenerationError};
pub use extractor::{extract, extract_outcome, ExtractionOutcome, ExtractionPath};
pub use i18n::Locale;
pub use model::{Difficulty, Question, QuestionKind, Quiz, QuizConfiguration, QuizLanguage, QuizType};
pub use parser::parse_lines;
pub use prompt::{PromptComposer, ResponseFormat};
pub use structured::try_structured_parse;
