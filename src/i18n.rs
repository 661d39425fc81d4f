//! Localized labels and user-facing messages.
//!
//! The locale only ever picks label text. It never changes how a response is parsed.

use crate::error::{AIError, UpstreamErrorKind};
use crate::model::{Difficulty, QuizConfiguration, QuizType};
use std::str::FromStr;

/// UI language of the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    #[default]
    English,
    Arabic,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Self::English),
            "ar" | "arabic" => Ok(Self::Arabic),
            _ => Err(format!("Unknown locale: '{}'. Supported: en, ar", s)),
        }
    }
}

impl Locale {
    pub fn is_rtl(&self) -> bool {
        matches!(self, Locale::Arabic)
    }

    pub fn default_title(&self) -> &'static str {
        match self {
            Locale::English => "Generated Quiz",
            Locale::Arabic => "اختبار مُولد",
        }
    }

    pub fn default_subject(&self) -> &'static str {
        match self {
            Locale::English => "General Knowledge",
            Locale::Arabic => "معرفة عامة",
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            Locale::English => "AI Generated",
            Locale::Arabic => "مُولد بالذكاء الاصطناعي",
        }
    }

    pub fn quiz_type_label(&self, quiz_type: QuizType) -> &'static str {
        match (self, quiz_type) {
            (Locale::English, QuizType::MultipleChoice) => "Multiple Choice",
            (Locale::English, QuizType::TextAnswer) => "Text Answer",
            (Locale::English, QuizType::Mixed) => "Mixed",
            (Locale::Arabic, QuizType::MultipleChoice) => "اختيار متعدد",
            (Locale::Arabic, QuizType::TextAnswer) => "إجابة نصية",
            (Locale::Arabic, QuizType::Mixed) => "مختلط",
        }
    }

    pub fn difficulty_label(&self, difficulty: Difficulty) -> &'static str {
        match (self, difficulty) {
            (Locale::English, d) => d.as_str(),
            (Locale::Arabic, Difficulty::Easy) => "سهل",
            (Locale::Arabic, Difficulty::Medium) => "متوسط",
            (Locale::Arabic, Difficulty::Hard) => "صعب",
            (Locale::Arabic, Difficulty::Expert) => "خبير",
        }
    }

    /// `"<topic> Quiz"` or `"اختبار <topic>"`.
    pub fn quiz_title(&self, topic: &str) -> String {
        match self {
            Locale::English => format!("{} Quiz", topic),
            Locale::Arabic => format!("اختبار {}", topic),
        }
    }

    /// Title for a configured quiz: the subject when given, else the quiz type.
    pub fn config_title(&self, config: &QuizConfiguration) -> String {
        match config.subject() {
            Some(subject) => self.quiz_title(subject),
            None => self.quiz_title(self.quiz_type_label(config.quiz_type)),
        }
    }

    /// Subject for a configured quiz: the subject when given, else the quiz type.
    pub fn config_subject(&self, config: &QuizConfiguration) -> String {
        config
            .subject()
            .map(str::to_string)
            .unwrap_or_else(|| self.quiz_type_label(config.quiz_type).to_string())
    }

    pub fn description(&self, difficulty: Difficulty, subject: &str) -> String {
        match self {
            Locale::English => format!("AI-generated {} difficulty quiz about {}", difficulty.as_str(), subject),
            Locale::Arabic => format!(
                "اختبار مُولد بالذكاء الاصطناعي بمستوى {} حول {}",
                self.difficulty_label(difficulty),
                subject
            ),
        }
    }

    pub fn generic_description(&self) -> &'static str {
        match self {
            Locale::English => "AI-generated quiz based on your request",
            Locale::Arabic => "اختبار مُولد بالذكاء الاصطناعي بناءً على طلبك",
        }
    }

    pub fn parse_failure_message(&self) -> &'static str {
        match self {
            Locale::English => "Failed to generate quiz. Please try again with different settings.",
            Locale::Arabic => "فشل إنشاء الاختبار. يرجى المحاولة مرة أخرى بإعدادات مختلفة.",
        }
    }

    pub fn missing_key_message(&self) -> &'static str {
        match self {
            Locale::English => "API key not configured. Please add your DeepSeek API key to the .env file and restart.",
            Locale::Arabic => "لم يتم تكوين مفتاح API. يرجى إضافة مفتاح DeepSeek إلى ملف .env وإعادة التشغيل.",
        }
    }

    pub fn upstream_message(&self, kind: UpstreamErrorKind) -> &'static str {
        match (self, kind) {
            (Locale::English, UpstreamErrorKind::Authentication) => {
                "Authentication failed. Please check your API key in the .env file."
            }
            (Locale::English, UpstreamErrorKind::RateLimit) => {
                "Rate limit exceeded. Please wait a moment and try again."
            }
            (Locale::English, UpstreamErrorKind::Server) => "Server error. Please try again later.",
            (Locale::English, UpstreamErrorKind::Api) => {
                "Sorry, I encountered an error while processing your request. Please try again."
            }
            (Locale::Arabic, UpstreamErrorKind::Authentication) => {
                "فشلت المصادقة. يرجى التحقق من مفتاح API في ملف .env."
            }
            (Locale::Arabic, UpstreamErrorKind::RateLimit) => {
                "تم تجاوز حد الطلبات. يرجى الانتظار قليلاً والمحاولة مرة أخرى."
            }
            (Locale::Arabic, UpstreamErrorKind::Server) => "خطأ في الخادم. يرجى المحاولة لاحقاً.",
            (Locale::Arabic, UpstreamErrorKind::Api) => {
                "عذراً، حدث خطأ أثناء معالجة طلبك. يرجى المحاولة مرة أخرى."
            }
        }
    }

    /// User-facing text for a completion failure.
    pub fn error_message(&self, error: &AIError) -> &'static str {
        if error.is_missing_key() {
            self.missing_key_message()
        } else {
            self.upstream_message(error.kind())
        }
    }

    pub fn quiz_ready_message(&self, question_count: usize, subject: &str, difficulty: Difficulty) -> String {
        match self {
            Locale::English => format!(
                "Quiz generated successfully! The quiz has {} questions about \"{}\" at {} difficulty level.",
                question_count,
                subject,
                difficulty.as_str()
            ),
            Locale::Arabic => format!(
                "تم إنشاء الاختبار بنجاح! يحتوي الاختبار على {} أسئلة حول \"{}\" بمستوى {}.",
                question_count,
                subject,
                self.difficulty_label(difficulty)
            ),
        }
    }

    pub fn fallback_chat_title(&self, clock: &str) -> String {
        match self {
            Locale::English => format!("Chat {}", clock),
            Locale::Arabic => format!("محادثة {}", clock),
        }
    }
}
