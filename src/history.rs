//! Persisted chat and quiz history.
//!
//! The log is a single JSON array stored under one key of a [`KeyValueStore`].
//! Reads fall back to the legacy key when the current key is absent; every save
//! writes both so older readers keep working.

use crate::error::StoreError;
use crate::model::Quiz;
use crate::scoring::QuizResults;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info, instrument};
use uuid::Uuid;

pub const HISTORY_KEY: &str = "cubic_chats";
pub const LEGACY_HISTORY_KEY: &str = "pquiz_chats";
/// Most recent entries kept.
pub const HISTORY_CAP: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRecord {
    pub id: String,
    pub title: String,
    pub messages: Vec<ChatMessage>,
    pub timestamp: DateTime<Utc>,
}

impl ChatRecord {
    pub fn new(title: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            id: format!("chat_{}", Uuid::new_v4().simple()),
            title: title.into(),
            messages,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizRecord {
    pub id: String,
    pub title: String,
    pub timestamp: DateTime<Utc>,
    pub quiz: Quiz,
    /// `null` until the quiz has been taken.
    pub results: Option<QuizResults>,
}

impl QuizRecord {
    pub fn new(quiz: Quiz) -> Self {
        Self {
            id: format!("quiz_{}", Uuid::new_v4().simple()),
            title: quiz.title.clone(),
            timestamp: Utc::now(),
            quiz,
            results: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum HistoryRecord {
    Chat(ChatRecord),
    Quiz(QuizRecord),
}

impl HistoryRecord {
    pub fn id(&self) -> &str {
        match self {
            HistoryRecord::Chat(chat) => &chat.id,
            HistoryRecord::Quiz(quiz) => &quiz.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            HistoryRecord::Chat(chat) => &chat.title,
            HistoryRecord::Quiz(quiz) => &quiz.title,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            HistoryRecord::Chat(chat) => chat.timestamp,
            HistoryRecord::Quiz(quiz) => quiz.timestamp,
        }
    }

    pub fn is_quiz(&self) -> bool {
        matches!(self, HistoryRecord::Quiz(_))
    }
}

impl From<ChatRecord> for HistoryRecord {
    fn from(record: ChatRecord) -> Self {
        HistoryRecord::Chat(record)
    }
}

impl From<QuizRecord> for HistoryRecord {
    fn from(record: QuizRecord) -> Self {
        HistoryRecord::Quiz(record)
    }
}

/// String values under string keys.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(self, key: &str, value: impl Into<String>) -> Self {
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.into());
        self
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.lock().unwrap_or_else(|e| e.into_inner()).get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per key under a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.path_for(key), value).await?;
        Ok(())
    }
}

/// History log over a key-value store.
#[derive(Debug)]
pub struct HistoryLog<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> HistoryLog<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Stored order (newest insertions first).
    pub async fn load(&self) -> Result<Vec<HistoryRecord>, StoreError> {
        let raw = match self.store.get(HISTORY_KEY).await? {
            Some(raw) => Some(raw),
            None => {
                let legacy = self.store.get(LEGACY_HISTORY_KEY).await?;
                if legacy.is_some() {
                    debug!("reading history from legacy key");
                }
                legacy
            }
        };
        match raw {
            Some(raw) if !raw.trim().is_empty() => Ok(serde_json::from_str(&raw)?),
            _ => Ok(Vec::new()),
        }
    }

    async fn save(&self, mut records: Vec<HistoryRecord>) -> Result<(), StoreError> {
        records.truncate(HISTORY_CAP);
        let raw = serde_json::to_string(&records)?;
        self.store.set(HISTORY_KEY, &raw).await?;
        self.store.set(LEGACY_HISTORY_KEY, &raw).await?;
        debug!(entries = records.len(), "history saved");
        Ok(())
    }

    /// Insert newest-first, or replace the entry with the same id in place.
    #[instrument(skip(self, record))]
    pub async fn append(&self, record: impl Into<HistoryRecord>) -> Result<(), StoreError> {
        let record = record.into();
        let mut records = self.load().await?;
        match records.iter().position(|r| r.id() == record.id()) {
            Some(index) => records[index] = record,
            None => records.insert(0, record),
        }
        self.save(records).await
    }

    /// Apply `change` to the entry with `id`. Returns false when no entry matched.
    pub async fn update<F>(&self, id: &str, change: F) -> Result<bool, StoreError>
    where
        F: FnOnce(&mut HistoryRecord) + Send,
    {
        let mut records = self.load().await?;
        let Some(record) = records.iter_mut().find(|r| r.id() == id) else {
            return Ok(false);
        };
        change(record);
        self.save(records).await?;
        Ok(true)
    }

    pub async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let mut records = self.load().await?;
        let before = records.len();
        records.retain(|r| r.id() != id);
        if records.len() == before {
            return Ok(false);
        }
        info!(id, "history entry deleted");
        self.save(records).await?;
        Ok(true)
    }

    /// All entries, most recent timestamp first.
    pub async fn list(&self) -> Result<Vec<HistoryRecord>, StoreError> {
        let mut records = self.load().await?;
        records.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
        Ok(records)
    }

    pub async fn get(&self, id: &str) -> Result<Option<HistoryRecord>, StoreError> {
        Ok(self.load().await?.into_iter().find(|r| r.id() == id))
    }

    /// Case-insensitive title search, optionally restricted to quizzes.
    pub async fn search(&self, term: &str, quizzes_only: bool) -> Result<Vec<HistoryRecord>, StoreError> {
        let term = term.to_lowercase();
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|r| !quizzes_only || r.is_quiz())
            .filter(|r| r.title().to_lowercase().contains(&term))
            .collect())
    }

    /// Attach results to a quiz entry that has none yet, bumping its timestamp.
    /// Returns false when the entry is missing, not a quiz, or already scored.
    pub async fn record_results(&self, id: &str, results: QuizResults) -> Result<bool, StoreError> {
        let mut records = self.load().await?;
        let target = records.iter_mut().find_map(|r| match r {
            HistoryRecord::Quiz(quiz) if quiz.id == id && quiz.results.is_none() => Some(quiz),
            _ => None,
        });
        let Some(quiz) = target else {
            return Ok(false);
        };
        quiz.results = Some(results);
        quiz.timestamp = Utc::now();
        self.save(records).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_are_tagged_by_type() {
        let record = HistoryRecord::from(ChatRecord::new("Hello", vec![ChatMessage::user("hi")]));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "chat");
        assert_eq!(json["messages"][0]["role"], "user");
        assert!(record.id().starts_with("chat_"));
    }

    #[tokio::test]
    async fn memory_store_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").await.unwrap(), None);
        store.set("k", "v").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
    }
}
