use thiserror::Error;

/// Failure of a full quiz generation round trip.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("AI error: {0}")]
    Ai(#[from] AIError),
    /// The model answered, but no complete question could be recovered from it.
    #[error("No complete quiz questions found in model response ({} chars)", .raw_response.len())]
    ParseFailure { raw_response: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AIError {
    #[error("DeepSeek API error: {0}")]
    DeepSeek(#[from] DeepSeekError),
    #[error("Mock error: {0}")]
    Mock(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeepSeekError {
    #[error("API key not configured")]
    MissingKey,
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("API error: {0}")]
    Api(String),
    #[error("Server error: {0}")]
    Server(u16),
    #[error("Rate limit exceeded")]
    RateLimit,
    #[error("Authentication failed")]
    Authentication,
}

/// Coarse classification of upstream failures, one user-facing message each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamErrorKind {
    Authentication,
    RateLimit,
    Server,
    Api,
}

impl AIError {
    pub fn kind(&self) -> UpstreamErrorKind {
        match self {
            AIError::DeepSeek(DeepSeekError::MissingKey | DeepSeekError::Authentication) => {
                UpstreamErrorKind::Authentication
            }
            AIError::DeepSeek(DeepSeekError::RateLimit) => UpstreamErrorKind::RateLimit,
            AIError::DeepSeek(DeepSeekError::Server(_)) => UpstreamErrorKind::Server,
            AIError::DeepSeek(DeepSeekError::Api(_) | DeepSeekError::Http(_)) => UpstreamErrorKind::Api,
            AIError::Mock(_) => UpstreamErrorKind::Api,
        }
    }

    /// True when the credential is absent rather than rejected.
    pub fn is_missing_key(&self) -> bool {
        matches!(self, AIError::DeepSeek(DeepSeekError::MissingKey))
    }
}

/// Reasons the embedded data block could not be used. Never surfaced to callers;
/// any of these sends the extractor to the line parser.
#[derive(Error, Debug)]
pub enum StructuredBlockError {
    #[error("no fenced data block")]
    NoBlock,
    #[error("fenced block holds no JSON object")]
    NoObject,
    #[error("invalid JSON in data block: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("data block has no questions array")]
    MissingQuestions,
    #[error("none of {0} questions in data block were valid")]
    NoValidQuestions(usize),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("history serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DocumentError {
    #[error("page {0} does not exist")]
    MissingPage(usize),
    #[error("failed to read page {page}: {reason}")]
    Page { page: usize, reason: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttemptError {
    #[error("question {0} is out of range")]
    QuestionOutOfRange(usize),
    #[error("option {option} is out of range for question {question}")]
    OptionOutOfRange { question: usize, option: usize },
    #[error("attempt already finished")]
    Finished,
}
