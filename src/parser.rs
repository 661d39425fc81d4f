//! Fallback line parser.
//!
//! Every trimmed, non-empty line is classified once into a [`Line`] and then applied
//! to the parser state. Classification tries the rules in a fixed priority order:
//!
//! 1. skip (headers, separators, instruction boilerplate)
//! 2. question start (a numbered line without `?` only while no question is open)
//! 3. text answer (`Answer:` / `الإجابة:` / `إجابة:`)
//! 4. multiple-choice answer (`Correct Answer: b)`, `الإجابة الصحيحة: ب)`, ...)
//! 5. lettered option (Latin patterns before Arabic ones)
//! 6. explanation
//!
//! Rules 3-6 are gated on the state of the question in progress, so a line that
//! fails a gate falls through to the next rule.

use crate::i18n::Locale;
use crate::letters::parse_letter;
use crate::metadata::QuizMeta;
use crate::model::{Question, QuestionKind, Quiz, QuizConfiguration};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, instrument, trace, warn};

/// Optional type tag after the question mark, e.g. `(Multiple Choice)`.
const TAG: &str = r"(?:\s*\([^()]*\))?";

fn compile(patterns: &[String]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("parser pattern"))
        .collect()
}

static HEADER_QUESTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^(?:#{{1,4}}\s*\*{{0,2}}|\*{{1,2}})\s*(\d+)\.\s*(.+[?؟]){TAG}\s*\*{{0,2}}{TAG}\s*$"
    ))
    .expect("header question pattern")
});

/// Interrogative question starts, tried in order after the header form.
static QUESTION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        format!(r"^(\d+)\.\s*(.+[?؟]){TAG}\s*$"),
        format!(r"(?i)^Q(\d+)\.?\s*(.+[?؟]){TAG}\s*$"),
        format!(r"(?i)^Question\s*(\d+)[.:]?\s*(.+[?؟]){TAG}\s*$"),
        format!(r"^سؤال\s*(\d+)[.:]?\s*(.+[?؟]){TAG}\s*$"),
    ])
});

/// Numbered prompt without a question mark (`1. Explain gravity.`), optionally tagged
/// with its question type.
static IMPERATIVE_QUESTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(\d+)\.\s+(\S.*?)(?:\s*\((?i:multiple choice|text answer|اختيار متعدد|إجابة نصية)\))?\s*$",
    )
    .expect("imperative question pattern")
});

static SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:-{3,}|\*{3,}|_{3,})$").expect("separator pattern"));

const SKIP_PREFIXES: &[&str] = &["**Instructions", "**How did you do", "**التعليمات"];

static TEXT_ANSWER_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?i)^Answer:\s*(.+)$".to_string(),
        r"^الإجابة:\s*(.+)$".to_string(),
        r"^إجابة:\s*(.+)$".to_string(),
    ])
});

/// Correct-answer markers, searched anywhere in the line, Latin before Arabic.
static CHOICE_ANSWER_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?i)✅\s*\*{0,2}Correct\s+Answer:\**\s*([a-d])\)".to_string(),
        r"(?i)\*{0,2}Correct\s+Answer:\**\s*([a-d])\)".to_string(),
        r"(?i)Answer:\**\s*([a-d])\)".to_string(),
        r"(?i)Correct:\**\s*([a-d])\)".to_string(),
        r"(?i)✅.*?([a-d])\)".to_string(),
        r"(?i)الإجابة\s+الصحيحة:\s*([a-dأبجد])\)".to_string(),
        r"(?i)إجابة\s+صحيحة:\s*([a-dأبجد])\)".to_string(),
        r"(?i)الصحيحة:\s*([a-dأبجد])\)".to_string(),
        r"(?i)الإجابة:\s*([a-dأبجد])\)".to_string(),
    ])
});

static OPTION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"^([a-dA-D])[).]\s*(.+)$".to_string(),
        r"^\(([a-dA-D])\)\s*(.+)$".to_string(),
        r"^[-*]\s*([a-dA-D])[).]\s*(.+)$".to_string(),
        r"^([أبجد])[).]\s*(.+)$".to_string(),
        r"^\(([أبجد])\)\s*(.+)$".to_string(),
        r"^[-*]\s*([أبجد])[).]\s*(.+)$".to_string(),
    ])
});

static EXPLANATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\**(?:Explanation|الشرح|التفسير)\**\s*:\**\s*(.+)$").expect("explanation pattern")
});

/// Classification of one input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    Skip,
    QuestionStart(&'a str),
    TextAnswer(&'a str),
    ChoiceAnswer(&'a str),
    AnswerOption(&'a str),
    Explanation(&'a str),
    Unmatched,
}

fn capture<'a>(patterns: &[Regex], line: &'a str, group: usize) -> Option<&'a str> {
    patterns
        .iter()
        .find_map(|re| re.captures(line).and_then(|caps| caps.get(group)))
        .map(|m| m.as_str().trim())
}

fn is_skip(line: &str) -> bool {
    (line.starts_with('#') && !HEADER_QUESTION.is_match(line))
        || SEPARATOR.is_match(line)
        || SKIP_PREFIXES.iter().any(|prefix| line.starts_with(prefix))
}

fn question_text(line: &str) -> Option<&str> {
    HEADER_QUESTION
        .captures(line)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str().trim())
        .or_else(|| capture(&QUESTION_PATTERNS, line, 2))
}

fn imperative_text(line: &str) -> Option<&str> {
    IMPERATIVE_QUESTION
        .captures(line)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str().trim())
}

/// Question under construction.
#[derive(Debug, Clone, Default)]
struct DraftQuestion {
    text: String,
    options: Vec<String>,
    correct: Option<usize>,
    kind: Option<QuestionKind>,
    explanation: Option<String>,
}

impl DraftQuestion {
    fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Self::default()
        }
    }

    /// Kind as recorded, or inferred from the option count when no marker set it.
    fn resolved_kind(&self) -> Option<QuestionKind> {
        self.kind.or(match (self.options.len(), self.correct) {
            (1, Some(0)) => Some(QuestionKind::TextAnswer),
            (n, Some(_)) if n >= 2 => Some(QuestionKind::MultipleChoice),
            _ => None,
        })
    }

    fn finish(self) -> Option<Question> {
        let kind = self.resolved_kind()?;
        let question = Question {
            text: self.text,
            kind,
            options: self.options,
            correct_index: self.correct?,
            explanation: self.explanation,
        };
        question.is_complete().then_some(question)
    }
}

/// Line-oriented state machine. Feed it lines, then call [`LineParser::finish`].
#[derive(Debug, Default)]
pub struct LineParser {
    current: Option<DraftQuestion>,
    collecting_options: bool,
    answer_found: bool,
    questions: Vec<Question>,
    discarded: usize,
}

impl LineParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify a trimmed line against the current state.
    pub fn classify<'a>(&self, line: &'a str) -> Line<'a> {
        if is_skip(line) {
            return Line::Skip;
        }
        if let Some(text) = question_text(line) {
            return Line::QuestionStart(text);
        }
        // A numbered line without a question mark only opens a question between questions.
        if self.current.is_none() || self.answer_found {
            if let Some(text) = imperative_text(line) {
                return Line::QuestionStart(text);
            }
        }
        let Some(current) = self.current.as_ref() else {
            return Line::Unmatched;
        };
        if !self.answer_found {
            if let Some(answer) = capture(&TEXT_ANSWER_PATTERNS, line, 1) {
                return Line::TextAnswer(answer);
            }
            if !current.options.is_empty() {
                if let Some(letter) = capture(&CHOICE_ANSWER_PATTERNS, line, 1) {
                    return Line::ChoiceAnswer(letter);
                }
            }
            if self.collecting_options {
                if let Some(option) = capture(&OPTION_PATTERNS, line, 2) {
                    return Line::AnswerOption(option);
                }
            }
        }
        if current.explanation.is_none() {
            if let Some(explanation) = EXPLANATION.captures(line).and_then(|caps| caps.get(1)) {
                return Line::Explanation(explanation.as_str().trim());
            }
        }
        Line::Unmatched
    }

    /// Consume one raw line.
    pub fn feed(&mut self, raw: &str) {
        let line = raw.trim();
        if line.is_empty() {
            return;
        }
        let kind = self.classify(line);
        trace!(?kind, line, "classified line");
        self.apply(kind);
    }

    fn apply(&mut self, line: Line<'_>) {
        match line {
            Line::Skip | Line::Unmatched => {}
            Line::QuestionStart(text) => {
                self.flush();
                self.current = Some(DraftQuestion::new(text));
                self.collecting_options = true;
                self.answer_found = false;
            }
            Line::TextAnswer(answer) => {
                if let Some(current) = self.current.as_mut() {
                    current.options = vec![answer.to_string()];
                    current.correct = Some(0);
                    current.kind = Some(QuestionKind::TextAnswer);
                    self.answer_found = true;
                    self.collecting_options = false;
                }
            }
            Line::ChoiceAnswer(letter) => match parse_letter(letter) {
                Some(index) => {
                    if let Some(current) = self.current.as_mut() {
                        current.correct = Some(index);
                        current.kind = Some(QuestionKind::MultipleChoice);
                        self.answer_found = true;
                        self.collecting_options = false;
                    }
                }
                None => {
                    warn!(%letter, "answer letter out of range, line ignored");
                }
            },
            Line::AnswerOption(option) => {
                if let Some(current) = self.current.as_mut() {
                    current.options.push(option.to_string());
                }
            }
            Line::Explanation(text) => {
                if let Some(current) = self.current.as_mut() {
                    current.explanation = Some(text.to_string());
                }
            }
        }
    }

    /// Push the question in progress if it is complete; drop it otherwise.
    fn flush(&mut self) {
        if let Some(draft) = self.current.take() {
            let text = draft.text.clone();
            match draft.finish() {
                Some(question) => self.questions.push(question),
                None => {
                    self.discarded += 1;
                    debug!(question = %text, "discarding incomplete question");
                }
            }
        }
    }

    /// Number of incomplete questions dropped so far.
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    pub fn finish(mut self) -> Vec<Question> {
        self.flush();
        debug!(
            kept = self.questions.len(),
            discarded = self.discarded,
            "line parse finished"
        );
        self.questions
    }
}

/// Run the state machine over the whole text, returning only complete questions.
pub fn parse_questions(text: &str) -> Vec<Question> {
    let mut parser = LineParser::new();
    for line in text.lines() {
        parser.feed(line);
    }
    parser.finish()
}

/// Fallback parser entry point. `None` means no complete question was recovered.
#[instrument(skip(text, config), fields(text_len = text.len()))]
pub fn parse_lines(text: &str, config: Option<&QuizConfiguration>, locale: Locale) -> Option<Quiz> {
    let questions = parse_questions(text);
    if questions.is_empty() {
        return None;
    }
    Some(QuizMeta::resolve(text, config, locale).into_quiz(questions, config))
}
