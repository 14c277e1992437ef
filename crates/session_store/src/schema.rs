use serde::{Deserialize, Serialize};

pub const HISTORY_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryRole {
    User,
    Assistant,
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HistoryRecord {
    pub role: HistoryRole,
    pub content: String,
}

/// On-disk sidecar document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HistoryFile {
    pub version: u32,
    pub saved_at: String,
    pub messages: Vec<HistoryRecord>,
}

impl HistoryFile {
    #[must_use]
    pub fn v1(saved_at: impl Into<String>, messages: Vec<HistoryRecord>) -> Self {
        Self {
            version: HISTORY_VERSION,
            saved_at: saved_at.into(),
            messages,
        }
    }
}
