use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

use crate::{
    core::{LowLevelClient, ModelTier},
    error::AIError,
};

/// A scripted reply.
#[derive(Debug, Clone, PartialEq)]
pub enum MockResponse {
    Success(String),
    Failure(AIError),
}

/// A request the mock received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCall {
    pub prompt: String,
    pub tier: ModelTier,
}

#[derive(Debug, Default)]
struct MockState {
    queue: VecDeque<MockResponse>,
    fallback: Option<String>,
    calls: Vec<MockCall>,
}

/// Controls a [`MockClient`] and inspects what it was asked.
#[derive(Debug, Default)]
pub struct MockHandle {
    state: Mutex<MockState>,
}

impl MockHandle {
    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn add_response(&self, response: MockResponse) {
        self.state().queue.push_back(response);
    }

    pub fn add_success(&self, text: impl Into<String>) {
        self.add_response(MockResponse::Success(text.into()));
    }

    pub fn add_failure(&self, error: impl Into<AIError>) {
        self.add_response(MockResponse::Failure(error.into()));
    }

    /// Reply used once the scripted queue is empty.
    pub fn set_fallback(&self, text: impl Into<String>) {
        self.state().fallback = Some(text.into());
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.state().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state().calls.len()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.state().calls.last().map(|c| c.prompt.clone())
    }

    pub fn remaining(&self) -> usize {
        self.state().queue.len()
    }
}

/// Scripted client for tests: replies in order, then with the fallback.
#[derive(Debug, Clone, Default)]
pub struct MockClient {
    handle: Arc<MockHandle>,
}

impl MockClient {
    pub fn new() -> (Self, Arc<MockHandle>) {
        let client = Self::default();
        let handle = client.handle.clone();
        (client, handle)
    }

    pub fn with_responses(responses: Vec<MockResponse>) -> (Self, Arc<MockHandle>) {
        let (client, handle) = Self::new();
        for response in responses {
            handle.add_response(response);
        }
        (client, handle)
    }
}

#[async_trait]
impl LowLevelClient for MockClient {
    async fn ask_raw(&self, prompt: String, tier: ModelTier) -> Result<String, AIError> {
        let mut state = self.handle.state();
        state.calls.push(MockCall { prompt, tier });
        let next = state.queue.pop_front();
        debug!(calls = state.calls.len(), scripted = next.is_some(), "mock request");
        match next {
            Some(MockResponse::Success(text)) => Ok(text),
            Some(MockResponse::Failure(error)) => Err(error),
            None => state
                .fallback
                .clone()
                .ok_or_else(|| AIError::Mock("no scripted response left".to_string())),
        }
    }

    fn clone_box(&self) -> Box<dyn LowLevelClient> {
        Box::new(self.clone())
    }

    fn model_name(&self, tier: ModelTier) -> String {
        format!("mock-{}", tier)
    }
}
