use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use agent_provider::ChatMessage;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::error::SessionStoreError;
use crate::paths::{history_path, temp_path};
use crate::replay::records_from_messages;
use crate::schema::{HistoryFile, HISTORY_VERSION};

/// JSON sidecar holding the persisted conversation for one program file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    /// Store at the sidecar path derived from `program`.
    #[must_use]
    pub fn for_program(program: &Path) -> Self {
        Self::at(history_path(program))
    }

    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the saved conversation. A missing sidecar is an empty history.
    pub fn load(&self) -> Result<Vec<ChatMessage>, SessionStoreError> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(SessionStoreError::io(
                    "reading history file",
                    &self.path,
                    source,
                ))
            }
        };

        let file: HistoryFile = serde_json::from_slice(&data)
            .map_err(|source| SessionStoreError::json_parse(&self.path, source))?;
        validate_history_file(&self.path, &file)?;

        let messages = file.replay();
        tracing::debug!(path = %self.path.display(), messages = messages.len(), "history loaded");
        Ok(messages)
    }

    /// Writes `messages` without context announcements, replacing the sidecar atomically.
    pub fn save(&self, messages: &[ChatMessage]) -> Result<(), SessionStoreError> {
        let saved_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .map_err(SessionStoreError::ClockFormat)?;
        let file = HistoryFile::v1(saved_at, records_from_messages(messages));
        let bytes = serde_json::to_vec_pretty(&file)
            .map_err(|source| SessionStoreError::json_serialize(&self.path, source))?;

        let tmp_path = temp_path(&self.path);
        fs::write(&tmp_path, bytes)
            .map_err(|source| SessionStoreError::io("writing history file", &tmp_path, source))?;
        fs::rename(&tmp_path, &self.path).map_err(|source| {
            SessionStoreError::io("replacing history file", &self.path, source)
        })?;

        tracing::debug!(
            path = %self.path.display(),
            messages = file.messages.len(),
            "history saved"
        );
        Ok(())
    }

    /// Removes the sidecar. Missing sidecars are not an error.
    pub fn clear(&self) -> Result<(), SessionStoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SessionStoreError::io(
                "removing history file",
                &self.path,
                source,
            )),
        }
    }
}

pub(crate) fn validate_history_file(
    path: &Path,
    file: &HistoryFile,
) -> Result<(), SessionStoreError> {
    if file.version != HISTORY_VERSION {
        return Err(SessionStoreError::UnsupportedVersion {
            path: path.to_path_buf(),
            found: file.version,
        });
    }

    validate_rfc3339(path, "saved_at", &file.saved_at)
}

pub(crate) fn validate_rfc3339(
    path: &Path,
    field: &'static str,
    value: &str,
) -> Result<(), SessionStoreError> {
    if OffsetDateTime::parse(value, &Rfc3339).is_err() {
        return Err(SessionStoreError::InvalidTimestamp {
            path: path.to_path_buf(),
            field,
            value: value.to_string(),
        });
    }

    Ok(())
}
