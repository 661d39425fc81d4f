//! Cheap pre-filter deciding whether a response is worth parsing as a quiz.
//!
//! Deliberately permissive: a false positive only costs a parse that finds nothing.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, instrument};

const QUIZ_KEYWORDS: &[&str] = &[
    "quiz",
    "question",
    "multiple choice",
    "test",
    "exam",
    "assessment",
    "mcq",
    "correct answer",
    "اختبار",
    "سؤال",
    "أسئلة",
    "اختيار متعدد",
    "امتحان",
    "تقييم",
    "الإجابة الصحيحة",
    "إجابة صحيحة",
];

/// A numbered line ending in a Latin or Arabic question mark somewhere on the line.
static NUMBERED_QUESTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+\.[ \t]*.*[?؟]").expect("numbered question pattern"));

/// Returns the first quiz keyword found, case-insensitively.
pub fn find_keyword(text: &str) -> Option<&'static str> {
    let lowered = text.to_lowercase();
    QUIZ_KEYWORDS.iter().copied().find(|kw| lowered.contains(kw))
}

pub fn has_numbered_question(text: &str) -> bool {
    NUMBERED_QUESTION.is_match(text)
}

/// True iff the text carries a quiz keyword or a numbered interrogative line.
#[instrument(skip(text), fields(text_len = text.len()))]
pub fn detect(text: &str) -> bool {
    let keyword = find_keyword(text);
    let numbered = has_numbered_question(text);
    debug!(?keyword, numbered, "quiz detection");
    keyword.is_some() || numbered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_is_case_insensitive() {
        assert_eq!(find_keyword("Here is your QUIZ"), Some("quiz"));
        assert_eq!(find_keyword("The Correct Answer is below"), Some("correct answer"));
    }

    #[test]
    fn numbered_question_must_stay_on_one_line() {
        assert!(!has_numbered_question("1. First point\nwhy not?"));
        assert!(has_numbered_question("intro\n 2. Why not؟"));
    }
}
