//! Instruction text for the completion service.
//!
//! The worked examples below are the exact surface format the line parser is built
//! against. Change them together.

use crate::document::page_segment_bounds;
use crate::i18n::Locale;
use crate::model::{Difficulty, QuizConfiguration, QuizLanguage, QuizType};
use crate::structured::schema_guidance;
use tracing::debug;

/// Ceiling on the document excerpt embedded in a prompt, in characters.
pub const MAX_SOURCE_CHARS: usize = 8000;

const MULTIPLE_CHOICE_EXAMPLE: &str = "\
1. What is the capital of France?
a) London
b) Berlin
c) Paris
d) Madrid
Correct Answer: c)

2. Which planet is closest to the Sun?
a) Venus
b) Mercury
c) Earth
d) Mars
Correct Answer: b)";

const TEXT_ANSWER_EXAMPLE: &str = "\
1. What are the main causes of climate change and how do they affect global temperatures?
Answer: The main causes include greenhouse gas emissions from fossil fuels, deforestation, and industrial processes, which trap heat in the atmosphere and lead to rising global temperatures.

2. Explain the concept of photosynthesis and its importance to life on Earth.
Answer: Photosynthesis is the process by which plants convert sunlight, carbon dioxide, and water into glucose and oxygen, providing energy for plants and oxygen for other organisms.";

const MIXED_EXAMPLE: &str = "\
1. What is the capital of France? (Multiple Choice)
a) London
b) Berlin
c) Paris
d) Madrid
Correct Answer: c)

2. Explain the significance of the French Revolution in European history. (Text Answer)
Answer: The French Revolution (1789-1799) was a pivotal event that overthrew the monarchy, established democratic principles, and inspired revolutionary movements across Europe, fundamentally changing the political landscape.

3. Which planet is closest to the Sun? (Multiple Choice)
a) Venus
b) Mercury
c) Earth
d) Mars
Correct Answer: b)";

/// Worked example embedded in the prompt for a quiz type.
pub fn worked_example(quiz_type: QuizType) -> &'static str {
    match quiz_type {
        QuizType::MultipleChoice => MULTIPLE_CHOICE_EXAMPLE,
        QuizType::TextAnswer => TEXT_ANSWER_EXAMPLE,
        QuizType::Mixed => MIXED_EXAMPLE,
    }
}

/// How the model is asked to lay out its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    /// Numbered questions, lettered options and answer lines.
    #[default]
    Lettered,
    /// A fenced JSON data block.
    Structured,
}

/// Longest prefix of `text` made of whole page segments within the ceiling.
///
/// Falls back to a hard cutoff at the ceiling when not even the first segment fits.
/// Lengths are counted in characters.
pub fn excerpt(text: &str) -> &str {
    if text.chars().count() <= MAX_SOURCE_CHARS {
        return text;
    }

    let mut used = 0usize;
    let mut end = 0usize;
    for range in page_segment_bounds(text) {
        let len = text[range.clone()].chars().count();
        if used + len > MAX_SOURCE_CHARS {
            break;
        }
        used += len;
        end = range.end;
    }

    let chosen = text[..end].trim_end();
    if !chosen.trim().is_empty() {
        debug!(chars = used, "excerpted whole page segments");
        return chosen;
    }

    debug!("no page segment fits, hard cutoff");
    match text.char_indices().nth(MAX_SOURCE_CHARS) {
        Some((cut, _)) => &text[..cut],
        None => text,
    }
}

fn difficulty_focus(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Easy => "basic concepts and fundamental knowledge",
        Difficulty::Medium => "intermediate understanding and application",
        Difficulty::Hard | Difficulty::Expert => "advanced analysis and complex reasoning",
    }
}

fn language_directive(language: QuizLanguage) -> &'static str {
    match language {
        QuizLanguage::Arabic => {
            "IMPORTANT: Generate all questions and answers in Arabic language. Use proper Arabic grammar and vocabulary."
        }
        QuizLanguage::English => "IMPORTANT: Generate all questions and answers in English language.",
    }
}

fn type_directive(quiz_type: QuizType) -> &'static str {
    match quiz_type {
        QuizType::MultipleChoice => {
            "Each question must have exactly 4 options labeled a), b), c), d) with one correct answer."
        }
        QuizType::TextAnswer => {
            "Create open-ended questions that require written responses. Do NOT include multiple choice options."
        }
        QuizType::Mixed => {
            "Mix multiple choice questions with text-answer questions. Include both types in the quiz."
        }
    }
}

fn format_checklist(quiz_type: QuizType) -> &'static str {
    match quiz_type {
        QuizType::MultipleChoice => "\
Make sure to:
- Number each question (1., 2., 3., etc.)
- Use a), b), c), d) for options
- Include \"Correct Answer: [letter])\" for each question
- End each question with a question mark",
        QuizType::TextAnswer => "\
Make sure to:
- Number each question (1., 2., 3., etc.)
- Use \"Answer: [detailed answer]\" format
- Provide comprehensive answers that demonstrate understanding
- End each question with a question mark",
        QuizType::Mixed => "\
Make sure to:
- Number each question (1., 2., 3., etc.)
- Indicate question type in parentheses
- For multiple choice: use a), b), c), d) options and \"Correct Answer: [letter])\"
- For text answer: use \"Answer: [detailed answer]\" format
- Mix the question types throughout the quiz",
    }
}

/// Builds generation prompts from a [`QuizConfiguration`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptComposer {
    format: ResponseFormat,
}

impl PromptComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(mut self, format: ResponseFormat) -> Self {
        self.format = format;
        self
    }

    pub fn format(&self) -> ResponseFormat {
        self.format
    }

    pub fn compose(&self, config: &QuizConfiguration) -> String {
        let mut sections = Vec::new();

        match config.source_text() {
            Some(source) => sections.push(document_preamble(config, excerpt(source))),
            None => sections.push(open_preamble(config)),
        }

        sections.push(format!(
            "{} {}",
            language_directive(config.quiz_language),
            type_directive(config.quiz_type)
        ));

        match self.format {
            ResponseFormat::Lettered => {
                sections.push(format!(
                    "IMPORTANT: Format the quiz exactly like this:\n\n{}",
                    worked_example(config.quiz_type)
                ));
                sections.push(format_checklist(config.quiz_type).to_string());
            }
            ResponseFormat::Structured => sections.push(schema_guidance()),
        }

        let mut closing = Vec::new();
        if config.time_limit_minutes > 0 {
            closing.push(format!(
                "The quiz should be designed to be completed in approximately {} minutes.",
                config.time_limit_minutes
            ));
        }
        if let Some(extra) = config.custom_instructions() {
            closing.push(format!("Additional requirements: {}", extra));
        }
        if !closing.is_empty() {
            sections.push(closing.join(" "));
        }

        let prompt = sections.join("\n\n");
        debug!(
            quiz_type = %config.quiz_type,
            format = ?self.format,
            chars = prompt.len(),
            "composed prompt"
        );
        prompt
    }
}

fn open_preamble(config: &QuizConfiguration) -> String {
    let mut intro = format!(
        "Create a high-quality, accurate {} quiz with exactly {} questions at {} difficulty level.",
        config.quiz_type, config.question_count, config.difficulty
    );
    if let Some(subject) = config.subject() {
        intro.push_str(&format!(" The quiz should be about {}.", subject));
    }
    format!(
        "{}\n\nQUALITY REQUIREMENTS:
- Ensure all questions are factually accurate and well-researched
- Provide clear, unambiguous questions with precise wording
- For multiple choice questions, ensure only one answer is definitively correct
- Avoid trick questions or ambiguous phrasing
- Make sure difficulty level is appropriate: {}
- Double-check all facts and information for accuracy",
        intro,
        difficulty_focus(config.difficulty)
    )
}

fn document_preamble(config: &QuizConfiguration, source: &str) -> String {
    format!(
        "CRITICAL INSTRUCTION: You are a STRICT quiz generator that MUST create questions EXCLUSIVELY from the provided document content. You are FORBIDDEN from using any external knowledge, general knowledge, or information not explicitly stated in the document below.

DOCUMENT CONTENT:
{source}

END OF DOCUMENT CONTENT

STRICT REQUIREMENTS:
1. ONLY use information that is EXPLICITLY written in the document above
2. NEVER add information from your general knowledge
3. NEVER make assumptions or inferences beyond what is directly stated
4. If a concept is mentioned but not fully explained in the document, DO NOT elaborate with external knowledge
5. Every question and answer MUST be directly traceable to specific text in the document
6. If the document lacks sufficient content for {count} questions, create fewer questions rather than inventing content

Create a {kind} quiz with exactly {count} questions at {difficulty} difficulty level using ONLY the content provided above.

VERIFICATION CHECKLIST - Before finalizing each question, verify:
✓ Is this information explicitly stated in the document?
✓ Can I point to the exact text that supports this question/answer?
✓ Am I using ONLY document content without adding external knowledge?",
        source = source,
        count = config.question_count,
        kind = config.quiz_type,
        difficulty = config.difficulty,
    )
}

/// Prompt asking for a short conversation title in the UI language.
pub fn chat_title_prompt(first_message: &str, locale: Locale) -> String {
    match locale {
        Locale::English => format!(
            "Generate a short, descriptive title (3-5 words) for a chat that starts with: \"{}\". Only return the title, nothing else.",
            first_message
        ),
        Locale::Arabic => format!(
            "قم بإنشاء عنوان قصير ووصفي (3-5 كلمات) للمحادثة التي تبدأ بـ: \"{}\". أرجع العنوان فقط، لا شيء آخر. يجب أن يكون العنوان باللغة العربية.",
            first_message
        ),
    }
}

/// Strips quote characters and surrounding whitespace from a model-suggested title.
pub fn clean_title(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '"' | '\''))
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(excerpt("--- Page 1 --- short"), "--- Page 1 --- short");
    }

    #[test]
    fn excerpt_counts_characters_not_bytes() {
        let arabic = "ب".repeat(MAX_SOURCE_CHARS);
        assert_eq!(excerpt(&arabic), arabic);
    }

    #[test]
    fn oversized_single_segment_is_cut_on_a_char_boundary() {
        let text = format!("--- Page 1 --- {}", "ج".repeat(MAX_SOURCE_CHARS));
        let cut = excerpt(&text);
        assert_eq!(cut.chars().count(), MAX_SOURCE_CHARS);
        assert!(text.starts_with(cut));
    }

    #[test]
    fn clean_title_strips_quotes() {
        assert_eq!(clean_title("  \"Roman History Basics\"\n"), "Roman History Basics");
        assert_eq!(clean_title("'Cells'"), "Cells");
    }

    #[test]
    fn difficulty_focus_groups_hard_and_expert() {
        assert_eq!(difficulty_focus(Difficulty::Hard), difficulty_focus(Difficulty::Expert));
        assert_ne!(difficulty_focus(Difficulty::Easy), difficulty_focus(Difficulty::Medium));
    }
}
