use crate::core::ModelTier;
use crate::i18n::Locale;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.deepseek.com/v1";
pub const DEFAULT_HISTORY_DIR: &str = ".quiz-history";

/// Values shipped in sample `.env` files that mean "not configured".
const PLACEHOLDER_KEYS: &[&str] = &["your_deepseek_api_key_here", "your_api_key_here"];

/// Trait for types that can retrieve their configuration key from environment variables
pub trait KeyFromEnv {
    /// The environment variable name for this client's API key
    const KEY_NAME: &'static str;

    /// Find the API key by checking environment variables first, then .env file.
    /// Blank and placeholder values count as missing.
    fn find_key() -> Option<String> {
        // Silently ignore a missing .env file
        let _ = dotenvy::dotenv();

        let key = env::var(Self::KEY_NAME).ok()?;
        let key = key.trim();
        if key.is_empty() || PLACEHOLDER_KEYS.contains(&key) {
            debug!(name = Self::KEY_NAME, "credential unset or placeholder");
            return None;
        }
        Some(key.to_string())
    }
}

fn var(name: &str) -> Option<String> {
    env::var(name).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parsed_or<T: FromStr + Copy>(name: &str, default: T) -> T {
    match var(name) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(name, value = %raw, "unrecognized value, using default");
            default
        }),
        None => default,
    }
}

/// Process-level settings read from the environment (and `.env`).
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model_tier: ModelTier,
    pub locale: Locale,
    pub history_dir: PathBuf,
    pub transcript_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model_tier: ModelTier::default(),
            locale: Locale::default(),
            history_dir: PathBuf::from(DEFAULT_HISTORY_DIR),
            transcript_dir: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        let defaults = Self::default();
        Self {
            api_key: crate::clients::DeepSeekClient::find_key(),
            base_url: var("DEEPSEEK_BASE_URL").unwrap_or(defaults.base_url),
            model_tier: parsed_or("QUIZ_MODEL_TIER", defaults.model_tier),
            locale: parsed_or("QUIZ_UI_LANGUAGE", defaults.locale),
            history_dir: var("QUIZ_HISTORY_DIR").map(PathBuf::from).unwrap_or(defaults.history_dir),
            transcript_dir: var("QUIZ_TRANSCRIPT_DIR").map(PathBuf::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct PlaceholderKey;

    impl KeyFromEnv for PlaceholderKey {
        const KEY_NAME: &'static str = "QUIZ_EXTRACT_TEST_PLACEHOLDER_KEY";
    }

    struct RealKey;

    impl KeyFromEnv for RealKey {
        const KEY_NAME: &'static str = "QUIZ_EXTRACT_TEST_REAL_KEY";
    }

    #[test]
    fn placeholder_counts_as_missing() {
        env::set_var(PlaceholderKey::KEY_NAME, "your_deepseek_api_key_here");
        assert_eq!(PlaceholderKey::find_key(), None);
        env::set_var(RealKey::KEY_NAME, "  sk-123 ");
        assert_eq!(RealKey::find_key().as_deref(), Some("sk-123"));
    }

    #[test]
    fn bad_values_fall_back() {
        env::set_var("QUIZ_EXTRACT_TEST_TIER", "turbo");
        assert_eq!(parsed_or("QUIZ_EXTRACT_TEST_TIER", ModelTier::Fast), ModelTier::Fast);
        env::set_var("QUIZ_EXTRACT_TEST_TIER2", "quality");
        assert_eq!(parsed_or("QUIZ_EXTRACT_TEST_TIER2", ModelTier::Fast), ModelTier::Quality);
    }
}
