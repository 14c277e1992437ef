//! Minimal provider-agnostic contract for querying a chat backend.
//!
//! This crate defines only the shared conversation types and the blocking query seam.
//! It excludes transport details and anything about how responses are interpreted.

use std::fmt;

/// Prefix that marks a System message as machine-inserted program context.
pub const CONTEXT_ANNOUNCEMENT_PREFIX: &str = "[program-context]";

/// Error returned while constructing/configuring a provider before any query runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderInitError {
    message: String,
}

impl ProviderInitError {
    /// Creates a new provider initialization error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the underlying error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ProviderInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ProviderInitError {}

impl From<String> for ProviderInitError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for ProviderInitError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Assistant => "Assistant",
            Self::System => "System",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the append-only conversation log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Builds a System message tagged with [`CONTEXT_ANNOUNCEMENT_PREFIX`].
    #[must_use]
    pub fn context_announcement(body: &str) -> Self {
        Self::system(format!("{CONTEXT_ANNOUNCEMENT_PREFIX} {body}"))
    }

    /// Returns true for machine-inserted program context messages.
    #[must_use]
    pub fn is_context_announcement(&self) -> bool {
        self.role == Role::System && self.content.starts_with(CONTEXT_ANNOUNCEMENT_PREFIX)
    }
}

/// Returns `messages` without any context announcements, preserving order.
#[must_use]
pub fn strip_context_announcements(messages: &[ChatMessage]) -> Vec<ChatMessage> {
    messages
        .iter()
        .filter(|message| !message.is_context_announcement())
        .cloned()
        .collect()
}

/// Immutable metadata describing a chat backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderProfile {
    pub provider_id: String,
    pub model_id: String,
}

/// Backend interface for one blocking query per user turn.
pub trait ChatBackend: Send + Sync + 'static {
    /// Returns provider/model identity metadata.
    fn profile(&self) -> ProviderProfile;

    /// Sends `message` with the preceding conversation and returns the full response text.
    ///
    /// `history` is everything the backend should see before `message`, including
    /// System instructions and context announcements.
    fn query(&self, history: &[ChatMessage], message: &str) -> Result<String, String>;
}
