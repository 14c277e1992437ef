//! Deterministic mock implementation of the shared `agent_provider` contract.
//!
//! Replies are served from a script in order. Every query is recorded so tests can assert
//! exactly what the backend was shown.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use agent_provider::{ChatBackend, ChatMessage, ProviderProfile};

/// Stable provider identifier used for explicit startup selection.
pub const MOCK_PROVIDER_ID: &str = "mock";

/// Reply used once the script is exhausted.
pub const EXHAUSTED_REPLY: &str = "The mock script has no more replies.";

/// One scripted backend outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedReply {
    Text(String),
    Fail(String),
}

impl From<&str> for ScriptedReply {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for ScriptedReply {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// What the backend saw for one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedQuery {
    pub history: Vec<ChatMessage>,
    pub message: String,
}

/// Deterministic mock backend used by `coding_agent` tests and local runs.
#[derive(Debug)]
pub struct MockProvider {
    model_id: String,
    replies: Mutex<VecDeque<ScriptedReply>>,
    queries: Mutex<Vec<RecordedQuery>>,
}

impl MockProvider {
    /// Creates a mock provider serving `replies` in order.
    #[must_use]
    pub fn new<I, R>(replies: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<ScriptedReply>,
    {
        Self::with_model_id("mock", replies)
    }

    #[must_use]
    pub fn with_model_id<I, R>(model_id: impl Into<String>, replies: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<ScriptedReply>,
    {
        let model_id = model_id.into();
        let model_id = if model_id.trim().is_empty() {
            "mock".to_string()
        } else {
            model_id.trim().to_string()
        };

        Self {
            model_id,
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Appends one more reply to the end of the script.
    pub fn push_reply(&self, reply: impl Into<ScriptedReply>) {
        lock_unpoisoned(&self.replies).push_back(reply.into());
    }

    /// Returns every query received so far.
    #[must_use]
    pub fn queries(&self) -> Vec<RecordedQuery> {
        lock_unpoisoned(&self.queries).clone()
    }

    #[must_use]
    pub fn remaining_replies(&self) -> usize {
        lock_unpoisoned(&self.replies).len()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new([
            "I'll start the file with a small greeting function.\n\
             ```json\n\
             {\"code\": \"def greet(name):\\n    return f\\\"Hello, {name}!\\\"\\n\", \"start\": 1, \"end\": 1}\n\
             ```\n\
             Review the conflict markers and keep what you like.",
            "Here is a usage example; it goes above the function until you move it.\n\
             ```json\n\
             [{\"code\": \"if __name__ == \\\"__main__\\\":\\n    print(greet(\\\"world\\\"))\\n\", \"start\": 1, \"end\": 1}]\n\
             ```",
        ])
    }
}

impl ChatBackend for MockProvider {
    fn profile(&self) -> ProviderProfile {
        ProviderProfile {
            provider_id: MOCK_PROVIDER_ID.to_string(),
            model_id: self.model_id.clone(),
        }
    }

    fn query(&self, history: &[ChatMessage], message: &str) -> Result<String, String> {
        lock_unpoisoned(&self.queries).push(RecordedQuery {
            history: history.to_vec(),
            message: message.to_string(),
        });

        match lock_unpoisoned(&self.replies).pop_front() {
            Some(ScriptedReply::Text(text)) => Ok(text),
            Some(ScriptedReply::Fail(error)) => Err(error),
            None => Ok(EXHAUSTED_REPLY.to_string()),
        }
    }
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
