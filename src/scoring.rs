//! Quiz runner state: answers, scoring, grading and timer arithmetic.

use crate::error::AttemptError;
use crate::model::Quiz;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A stored answer for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Choice(usize),
    Text(String),
}

/// Outcome of a finished attempt, as persisted in history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResults {
    pub score: usize,
    pub total_questions: usize,
    #[serde(rename = "timeElapsed")]
    pub elapsed_seconds: u64,
    pub answers: BTreeMap<usize, Answer>,
}

impl QuizResults {
    /// Whole-number percentage, 0 for an empty quiz.
    pub fn percentage(&self) -> u32 {
        if self.total_questions == 0 {
            return 0;
        }
        ((self.score as f64 / self.total_questions as f64) * 100.0).round() as u32
    }

    pub fn grade(&self) -> &'static str {
        grade(self.percentage())
    }

    pub fn wrong(&self) -> usize {
        self.total_questions.saturating_sub(self.score)
    }
}

pub fn grade(percentage: u32) -> &'static str {
    match percentage {
        90.. => "A+",
        80..=89 => "A",
        70..=79 => "B",
        60..=69 => "C",
        _ => "F",
    }
}

#[derive(Debug, Clone, Copy)]
struct AnswerKey {
    options: usize,
    correct: usize,
}

/// One run through a quiz.
#[derive(Debug, Clone)]
pub struct QuizAttempt {
    key: Vec<AnswerKey>,
    answers: BTreeMap<usize, Answer>,
    results: Option<QuizResults>,
}

impl QuizAttempt {
    pub fn new(quiz: &Quiz) -> Self {
        let key = quiz
            .questions
            .iter()
            .map(|q| AnswerKey {
                options: q.options.len(),
                correct: q.correct_index,
            })
            .collect();
        Self {
            key,
            answers: BTreeMap::new(),
            results: None,
        }
    }

    fn check_open(&self, question: usize) -> Result<AnswerKey, AttemptError> {
        if self.results.is_some() {
            return Err(AttemptError::Finished);
        }
        self.key
            .get(question)
            .copied()
            .ok_or(AttemptError::QuestionOutOfRange(question))
    }

    /// Record a chosen option, replacing any earlier answer to the question.
    pub fn select_option(&mut self, question: usize, option: usize) -> Result<(), AttemptError> {
        let key = self.check_open(question)?;
        if option >= key.options {
            return Err(AttemptError::OptionOutOfRange { question, option });
        }
        self.answers.insert(question, Answer::Choice(option));
        Ok(())
    }

    /// Record a free-text answer. Text answers are kept for review but never scored.
    pub fn submit_text(&mut self, question: usize, text: impl Into<String>) -> Result<(), AttemptError> {
        self.check_open(question)?;
        self.answers.insert(question, Answer::Text(text.into()));
        Ok(())
    }

    pub fn answer(&self, question: usize) -> Option<&Answer> {
        self.answers.get(&question)
    }

    pub fn answered(&self) -> usize {
        self.answers.len()
    }

    pub fn score(&self) -> usize {
        self.key
            .iter()
            .enumerate()
            .filter(|(i, key)| self.answers.get(i) == Some(&Answer::Choice(key.correct)))
            .count()
    }

    pub fn is_finished(&self) -> bool {
        self.results.is_some()
    }

    /// Freeze the attempt. Further answers are rejected.
    pub fn finish(&mut self, elapsed_seconds: u64) -> Result<QuizResults, AttemptError> {
        if self.results.is_some() {
            return Err(AttemptError::Finished);
        }
        let results = QuizResults {
            score: self.score(),
            total_questions: self.key.len(),
            elapsed_seconds,
            answers: self.answers.clone(),
        };
        self.results = Some(results.clone());
        Ok(results)
    }
}

/// Seconds left, or `None` for an unlimited quiz.
pub fn time_remaining(limit_minutes: u32, elapsed_seconds: u64) -> Option<u64> {
    (limit_minutes > 0).then(|| (u64::from(limit_minutes) * 60).saturating_sub(elapsed_seconds))
}

pub fn is_time_up(limit_minutes: u32, elapsed_seconds: u64) -> bool {
    time_remaining(limit_minutes, elapsed_seconds) == Some(0)
}

/// `m:ss`
pub fn format_clock(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
