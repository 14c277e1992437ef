use agent_provider::{strip_context_announcements, ChatMessage, Role};

use crate::schema::{HistoryFile, HistoryRecord, HistoryRole};

impl From<Role> for HistoryRole {
    fn from(role: Role) -> Self {
        match role {
            Role::User => Self::User,
            Role::Assistant => Self::Assistant,
            Role::System => Self::System,
        }
    }
}

impl From<HistoryRole> for Role {
    fn from(role: HistoryRole) -> Self {
        match role {
            HistoryRole::User => Self::User,
            HistoryRole::Assistant => Self::Assistant,
            HistoryRole::System => Self::System,
        }
    }
}

impl From<&ChatMessage> for HistoryRecord {
    fn from(message: &ChatMessage) -> Self {
        Self {
            role: message.role.into(),
            content: message.content.clone(),
        }
    }
}

impl From<HistoryRecord> for ChatMessage {
    fn from(record: HistoryRecord) -> Self {
        ChatMessage::new(record.role.into(), record.content)
    }
}

/// Converts live messages into persistable records, dropping context announcements.
pub(crate) fn records_from_messages(messages: &[ChatMessage]) -> Vec<HistoryRecord> {
    strip_context_announcements(messages)
        .iter()
        .map(HistoryRecord::from)
        .collect()
}

impl HistoryFile {
    /// Rebuilds the conversation, dropping any context announcement found on disk.
    #[must_use]
    pub fn replay(self) -> Vec<ChatMessage> {
        let messages: Vec<ChatMessage> = self.messages.into_iter().map(ChatMessage::from).collect();
        strip_context_announcements(&messages)
    }
}
