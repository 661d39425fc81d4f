use quiz_extract::extractor::{extract, extract_outcome, parse_quiz, ExtractionOutcome, ExtractionPath};
use quiz_extract::parser::{parse_lines, parse_questions};
use quiz_extract::structured::try_structured_parse;
use quiz_extract::{Difficulty, Locale, QuestionKind, QuizConfiguration, QuizType};

const SCENARIO_A: &str = "1. What is 2+2?\na) 3\nb) 4\nc) 5\nd) 6\nCorrect Answer: b)";
const SCENARIO_B: &str = "1. Explain gravity.\nAnswer: Gravity attracts masses.";
const SCENARIO_C: &str = "1. ما هي عاصمة مصر؟\nأ) القاهرة\nب) الإسكندرية\nالإجابة الصحيحة: أ)";

#[test]
fn scenario_a_multiple_choice() {
    let quiz = extract(SCENARIO_A, None, Locale::English).expect("quiz");
    assert_eq!(quiz.questions.len(), 1);
    let question = &quiz.questions[0];
    assert_eq!(question.kind, QuestionKind::MultipleChoice);
    assert_eq!(question.text, "What is 2+2?");
    assert_eq!(question.options, vec!["3", "4", "5", "6"]);
    assert_eq!(question.correct_index, 1);

    assert_eq!(quiz.max_score, 1);
    assert_eq!(quiz.time_limit_minutes, 5);
    assert_eq!(quiz.title, "Generated Quiz");
    assert_eq!(quiz.subject, "General Knowledge");
    assert_eq!(quiz.difficulty, Difficulty::Medium);
    assert_eq!(quiz.category, "AI Generated");
}

#[test]
fn scenario_b_text_answer() {
    let quiz = parse_lines(SCENARIO_B, None, Locale::English).expect("quiz");
    assert_eq!(quiz.questions.len(), 1);
    let question = &quiz.questions[0];
    assert_eq!(question.kind, QuestionKind::TextAnswer);
    assert_eq!(question.text, "Explain gravity.");
    assert_eq!(question.options, vec!["Gravity attracts masses."]);
    assert_eq!(question.correct_index, 0);
}

#[test]
fn scenario_c_arabic_multiple_choice() {
    let quiz = extract(SCENARIO_C, None, Locale::Arabic).expect("quiz");
    assert_eq!(quiz.questions.len(), 1);
    let question = &quiz.questions[0];
    assert_eq!(question.kind, QuestionKind::MultipleChoice);
    assert_eq!(question.text, "ما هي عاصمة مصر؟");
    assert_eq!(question.options, vec!["القاهرة", "الإسكندرية"]);
    assert_eq!(question.correct_index, 0);
    assert_eq!(quiz.title, "اختبار مُولد");
    assert_eq!(quiz.subject, "معرفة عامة");
}

#[test]
fn scenario_d_question_without_options_or_answer() {
    let text = "Here is your quiz.\n1. What is the capital of France?\nThink about it.";
    assert_eq!(extract(text, None, Locale::English), None);
    assert_eq!(extract_outcome(text, None, Locale::English), ExtractionOutcome::Unparsed);
    assert_eq!(parse_lines(text, None, Locale::English), None);
}

#[test]
fn scenario_f_structured_block_drops_invalid_questions() {
    let text = r#"Here is your quiz:
```json
{
  "title": "Planets",
  "questions": [
    {"question": "Which planet is closest to the Sun?", "options": ["Venus", "Mercury"], "correctAnswer": 1, "explanation": "Mercury orbits closest."},
    {"question": "Broken?", "options": ["only one"], "correctAnswer": 0}
  ]
}
```
Good luck!"#;
    let (quiz, path) = parse_quiz(text, None, Locale::English).expect("quiz");
    assert_eq!(path, ExtractionPath::Structured);
    assert_eq!(quiz.title, "Planets");
    assert_eq!(quiz.questions.len(), 1);
    let question = &quiz.questions[0];
    assert_eq!(question.text, "Which planet is closest to the Sun?");
    assert_eq!(question.correct_index, 1);
    assert_eq!(question.explanation.as_deref(), Some("Mercury orbits closest."));
    assert_eq!(quiz.max_score, 1);
}

#[test]
fn structured_block_with_no_valid_questions_falls_back_to_lines() {
    let text = "```json\n{\"questions\": [{\"question\": \"\", \"options\": [\"a\", \"b\"], \"correctAnswer\": 0}]}\n```\n1. Which is bigger?\na) 1\nb) 2\nCorrect Answer: b)";
    assert_eq!(try_structured_parse(text, None, Locale::English), None);
    let (quiz, path) = parse_quiz(text, None, Locale::English).expect("quiz");
    assert_eq!(path, ExtractionPath::Lines);
    assert_eq!(quiz.questions[0].correct_index, 1);
}

#[test]
fn structured_block_uses_config_labels_when_missing() {
    let config = QuizConfiguration::new(QuizType::MultipleChoice, Difficulty::Hard, 1)
        .with_subject("Astronomy")
        .with_time_limit(12);
    let text = "```json\n{\"questions\": [{\"question\": \"Q?\", \"options\": [\"a\", \"b\"], \"correctAnswer\": 0}]}\n```";
    let quiz = try_structured_parse(text, Some(&config), Locale::English).expect("quiz");
    assert_eq!(quiz.title, "Astronomy Quiz");
    assert_eq!(quiz.subject, "Astronomy");
    assert_eq!(quiz.difficulty, Difficulty::Hard);
    assert_eq!(quiz.time_limit_minutes, 12);
}

#[test]
fn parsing_is_idempotent() {
    let text = format!("{}\n\n2. Why?\nAnswer: Because.\n\n{}", SCENARIO_A, SCENARIO_C.replacen("1.", "3.", 1));
    let first = extract(&text, None, Locale::English);
    let second = extract(&text, None, Locale::English);
    assert!(first.is_some());
    assert_eq!(first, second);
}

#[test]
fn only_complete_questions_are_surfaced() {
    let text = "\
# Mixed Bag Quiz
1. Has no answer?
a) x
b) y
2. Has one option?
a) lonely
Correct Answer: a)
3. Answer letter past options?
a) x
b) y
Correct Answer: d)
4. Fine one?
a) x
b) y
c) z
Correct Answer: c)
5. Open question?
Answer: An open answer.
6. Trailing question?";
    let quiz = extract(text, None, Locale::English).expect("quiz");
    assert_eq!(quiz.questions.len(), 2);
    assert!(quiz.questions.iter().all(|q| q.is_complete()));
    assert_eq!(quiz.questions[0].text, "Fine one?");
    assert_eq!(quiz.questions[1].kind, QuestionKind::TextAnswer);
    assert_eq!(quiz.max_score, 2);
    assert_eq!(quiz.title, "Mixed Bag Quiz");
}

#[test]
fn header_wrapped_questions_and_checkmark_answers() {
    let text = "\
## **Chemistry Quiz**
---
#### **1. What is H2O?**
a) Water
b) Salt
✅ **Correct Answer: a)**
#### **2. What is NaCl?**
- a) Water
- b) Salt
✅ b) Salt
**How did you do?**";
    let quiz = extract(text, None, Locale::English).expect("quiz");
    assert_eq!(quiz.title, "Chemistry Quiz");
    assert_eq!(quiz.questions.len(), 2);
    assert_eq!(quiz.questions[0].text, "What is H2O?");
    assert_eq!(quiz.questions[0].correct_index, 0);
    assert_eq!(quiz.questions[1].options, vec!["Water", "Salt"]);
    assert_eq!(quiz.questions[1].correct_index, 1);
}

#[test]
fn alternative_question_prefixes() {
    let text = "\
Q1. First?
a) yes
b) no
Correct: a)
Question 2. Second?
A. yes
B. no
Answer: b) no
سؤال 3. الثالث؟
أ) نعم
ب) لا
الإجابة: ب)";
    let questions = parse_questions(text);
    assert_eq!(questions.len(), 3);
    assert_eq!(questions[0].correct_index, 0);
    // A bare "Answer:" line is read as a text answer before any letter marker.
    assert_eq!(questions[1].kind, QuestionKind::TextAnswer);
    assert_eq!(questions[1].options, vec!["b) no"]);
    // The Arabic "الإجابة:" prefix is likewise a text answer.
    assert_eq!(questions[2].kind, QuestionKind::TextAnswer);
}

#[test]
fn later_answer_lines_do_not_override_the_first() {
    let text = "1. Q?\na) x\nb) y\nCorrect Answer: a)\nCorrect Answer: b)\nc) z";
    let questions = parse_questions(text);
    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0].correct_index, 0);
    assert_eq!(questions[0].options.len(), 2);

    let text = "1. Q?\nAnswer: words\nCorrect Answer: a)";
    let questions = parse_questions(text);
    assert_eq!(questions[0].kind, QuestionKind::TextAnswer);
    assert_eq!(questions[0].options, vec!["words"]);
}

#[test]
fn explanations_attach_to_their_question() {
    let text = "1. Q?\na) x\nb) y\nCorrect Answer: b)\nExplanation: y is right.\n2. R?\nAnswer: r\nالشرح: تفسير";
    let questions = parse_questions(text);
    assert_eq!(questions[0].explanation.as_deref(), Some("y is right."));
    assert_eq!(questions[1].explanation.as_deref(), Some("تفسير"));
}

#[test]
fn config_labels_take_precedence() {
    let config = QuizConfiguration::new(QuizType::MultipleChoice, Difficulty::Easy, 1).with_subject("Maths");
    let text = format!("# Geography Test\nAn expert difficulty quiz about rivers\n{}", SCENARIO_A);
    let quiz = extract(&text, Some(&config), Locale::English).expect("quiz");
    assert_eq!(quiz.title, "Maths Quiz");
    assert_eq!(quiz.subject, "Maths");
    assert_eq!(quiz.difficulty, Difficulty::Easy);
    assert_eq!(quiz.time_limit_minutes, 5);

    let quiz = extract(&text, Some(&config.with_time_limit(30)), Locale::English).expect("quiz");
    assert_eq!(quiz.time_limit_minutes, 30);
}

#[test]
fn labels_inferred_from_text_without_config() {
    let text = format!("# World Capitals Quiz\nHere is a hard difficulty quiz about European capitals.\n{}", SCENARIO_A);
    let quiz = extract(&text, None, Locale::English).expect("quiz");
    assert_eq!(quiz.title, "World Capitals Quiz");
    assert_eq!(quiz.subject, "European capitals");
    assert_eq!(quiz.difficulty, Difficulty::Hard);
}

#[test]
fn default_time_limit_is_one_minute_per_question() {
    let text: String = (1..=7)
        .map(|n| format!("{}. Q{}?\na) x\nb) y\nCorrect Answer: a)\n", n, n))
        .collect();
    let quiz = extract(&text, None, Locale::English).expect("quiz");
    assert_eq!(quiz.questions.len(), 7);
    assert_eq!(quiz.time_limit_minutes, 7);
}

#[test]
fn hostile_input_never_panics() {
    let long_line = "x".repeat(100_000);
    let inputs = [
        "",
        "   \n\n\t  \r\n",
        "\u{0}\u{1}\u{2}ÿþ\u{fffd}\u{7f}",
        "1.\n?\n؟\na)\nCorrect Answer: )",
        "سؤال 1. mixed script ما هو? \na) x\nب) y\nالإجابة الصحيحة: z)",
        long_line.as_str(),
        "a) orphan option\nCorrect Answer: a)\nAnswer: orphan",
        "1. ?",
    ];
    for input in inputs {
        assert_eq!(parse_lines(input, None, Locale::English), None, "input {:?}", input);
        let _ = extract(input, None, Locale::Arabic);
    }
}

#[test]
fn numbered_note_between_options_and_answer_keeps_the_question() {
    let text = "1. What is 2+2?\na) 3\nb) 4\n2. Note: pick the best one\nCorrect Answer: b)";
    let questions = parse_questions(text);
    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0].kind, QuestionKind::MultipleChoice);
    assert_eq!(questions[0].options, vec!["3", "4"]);
    assert_eq!(questions[0].correct_index, 1);
}

#[test]
fn bold_question_with_trailing_type_tag() {
    let text = "**1. What is the capital of France?** (Multiple Choice)\na) London\nb) Paris\nCorrect Answer: b)";
    let questions = parse_questions(text);
    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0].text, "What is the capital of France?");
    assert_eq!(questions[0].correct_index, 1);
}

#[test]
fn structured_block_after_an_unrelated_json_fence() {
    let text = r#"Settings I used:
```json
{"model": "deepseek-chat", "temperature": 0.7}
```
And the quiz:
```json
{"title": "Oceans", "questions": [{"question": "Largest ocean?", "options": ["Atlantic", "Pacific"], "correctAnswer": 1}]}
```"#;
    let (quiz, path) = parse_quiz(text, None, Locale::English).expect("quiz");
    assert_eq!(path, ExtractionPath::Structured);
    assert_eq!(quiz.title, "Oceans");
    assert_eq!(quiz.questions[0].correct_index, 1);
}
