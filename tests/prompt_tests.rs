use quiz_extract::document::{extract_text, TextPages};
use quiz_extract::prompt::{chat_title_prompt, clean_title, excerpt, worked_example, MAX_SOURCE_CHARS};
use quiz_extract::{
    parse_lines, Difficulty, Locale, PromptComposer, QuestionKind, QuizConfiguration, QuizLanguage, QuizType,
    ResponseFormat,
};

async fn long_document(pages: usize) -> String {
    let body = "word ".repeat(200);
    let source = TextPages::new((0..pages).map(|_| body.clone()).collect());
    extract_text(&source).await.expect("in-memory pages")
}

#[tokio::test]
async fn excerpt_keeps_whole_pages_within_the_ceiling() {
    let text = long_document(20).await;
    assert!(text.chars().count() > MAX_SOURCE_CHARS);

    let cut = excerpt(&text);
    assert!(cut.chars().count() <= MAX_SOURCE_CHARS);
    assert!(cut.starts_with("--- Page 1 ---"));
    assert!(cut.ends_with("word"));
    assert_eq!(cut.matches("--- Page ").count(), 7);

    let rest = &text[cut.len()..];
    assert!(rest.trim_start().starts_with("--- Page 8 ---"));
}

#[test]
fn excerpt_hard_cutoff_when_first_segment_is_too_long() {
    let text = format!("--- Page 1 --- {}", "ب".repeat(MAX_SOURCE_CHARS * 2));
    let cut = excerpt(&text);
    assert_eq!(cut.chars().count(), MAX_SOURCE_CHARS);
    assert!(text.starts_with(cut));
}

#[test]
fn short_source_is_untouched() {
    let text = "--- Page 1 --- short";
    assert_eq!(excerpt(text), text);
}

#[test]
fn multiple_choice_example_round_trips() {
    let quiz = parse_lines(worked_example(QuizType::MultipleChoice), None, Locale::English).expect("quiz");
    assert_eq!(quiz.questions.len(), 2);
    let answers: Vec<usize> = quiz.questions.iter().map(|q| q.correct_index).collect();
    assert_eq!(answers, vec![2, 1]);
    assert!(quiz.questions.iter().all(|q| q.options.len() == 4));
    assert_eq!(quiz.questions[0].correct_option(), Some("Paris"));
}

#[test]
fn text_answer_example_round_trips() {
    let quiz = parse_lines(worked_example(QuizType::TextAnswer), None, Locale::English).expect("quiz");
    assert_eq!(quiz.questions.len(), 2);
    assert!(quiz.questions.iter().all(|q| q.kind == QuestionKind::TextAnswer));
    assert!(quiz.questions[1].text.starts_with("Explain the concept of photosynthesis"));
}

#[test]
fn mixed_example_round_trips() {
    let quiz = parse_lines(worked_example(QuizType::Mixed), None, Locale::English).expect("quiz");
    let kinds: Vec<QuestionKind> = quiz.questions.iter().map(|q| q.kind).collect();
    assert_eq!(
        kinds,
        vec![QuestionKind::MultipleChoice, QuestionKind::TextAnswer, QuestionKind::MultipleChoice]
    );
    let answers: Vec<usize> = quiz.questions.iter().map(|q| q.correct_index).collect();
    assert_eq!(answers, vec![2, 0, 1]);
    assert_eq!(quiz.questions[0].text, "What is the capital of France?");
    assert!(quiz.questions[1].text.ends_with("European history."));
}

#[test]
fn open_prompt_carries_every_directive() {
    let config = QuizConfiguration::new(QuizType::MultipleChoice, Difficulty::Hard, 8)
        .with_subject("History")
        .with_time_limit(15)
        .with_language(QuizLanguage::Arabic)
        .with_custom_instructions("Focus on dates");
    let prompt = PromptComposer::new().compose(&config);

    assert!(prompt.contains("exactly 8 questions at hard difficulty level"));
    assert!(prompt.contains("The quiz should be about History."));
    assert!(prompt.contains("advanced analysis and complex reasoning"));
    assert!(prompt.contains("in Arabic language"));
    assert!(prompt.contains("exactly 4 options labeled a), b), c), d)"));
    assert!(prompt.contains(worked_example(QuizType::MultipleChoice)));
    assert!(prompt.contains("approximately 15 minutes"));
    assert!(prompt.contains("Additional requirements: Focus on dates"));
    assert!(!prompt.contains("DOCUMENT CONTENT"));
}

#[test]
fn unlimited_time_and_no_instructions_are_omitted() {
    let config = QuizConfiguration::new(QuizType::TextAnswer, Difficulty::Easy, 3);
    let prompt = PromptComposer::new().compose(&config);
    assert!(!prompt.contains("approximately"));
    assert!(!prompt.contains("Additional requirements"));
    assert!(prompt.contains("Do NOT include multiple choice options"));
    assert!(prompt.contains("in English language"));
}

#[tokio::test]
async fn document_prompt_is_strict_and_excerpted() {
    let text = long_document(20).await;
    let config = QuizConfiguration::new(QuizType::Mixed, Difficulty::Medium, 5).with_source_text(text);
    let prompt = PromptComposer::new().compose(&config);

    assert!(prompt.contains("DOCUMENT CONTENT:"));
    assert!(prompt.contains("END OF DOCUMENT CONTENT"));
    assert!(prompt.contains("create fewer questions rather than inventing content"));
    assert!(prompt.contains("--- Page 7 ---"));
    assert!(!prompt.contains("--- Page 8 ---"));
    assert!(!prompt.contains("QUALITY REQUIREMENTS"));
}

#[test]
fn structured_format_asks_for_a_data_block() {
    let config = QuizConfiguration::new(QuizType::MultipleChoice, Difficulty::Medium, 4);
    let composer = PromptComposer::new().with_format(ResponseFormat::Structured);
    assert_eq!(composer.format(), ResponseFormat::Structured);

    let prompt = composer.compose(&config);
    assert!(prompt.contains("```json"));
    assert!(prompt.contains("correctAnswer"));
    assert!(!prompt.contains("Correct Answer: c)"));
}

#[test]
fn title_prompts_follow_the_ui_language() {
    let english = chat_title_prompt("Tell me about volcanoes", Locale::English);
    assert!(english.contains("\"Tell me about volcanoes\""));
    assert!(english.contains("3-5 words"));

    let arabic = chat_title_prompt("أخبرني عن البراكين", Locale::Arabic);
    assert!(arabic.contains("أخبرني عن البراكين"));
    assert!(arabic.contains("باللغة العربية"));

    assert_eq!(clean_title("  \"Volcano 'Basics'\"\n"), "Volcano Basics");
}
