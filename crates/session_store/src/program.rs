use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use agent_provider::ChatMessage;
use apply_patch_engine::{apply_edit, EditDescriptor};

use crate::error::SessionStoreError;
use crate::store::HistoryStore;

/// Owner of one program file and its chat-history sidecar.
///
/// The file on disk is the only copy of the program. The session keeps the last content
/// it wrote or observed so that edits made outside the session can be detected; it does
/// not prevent them.
#[derive(Debug)]
pub struct ProgramSession {
    path: PathBuf,
    last_observed: String,
    history: HistoryStore,
}

impl ProgramSession {
    /// Opens `path`, creating an empty file if it does not exist.
    ///
    /// The last-observed snapshot starts empty, so a non-empty existing file reports as
    /// changed until it is observed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SessionStoreError> {
        let path = path.into();
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| SessionStoreError::io("creating program file", &path, source))?;

        let history = HistoryStore::for_program(&path);
        Ok(Self {
            path,
            last_observed: String::new(),
            history,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn history_path(&self) -> &Path {
        self.history.path()
    }

    /// Reads the current program from disk.
    pub fn program(&self) -> Result<String, SessionStoreError> {
        fs::read_to_string(&self.path)
            .map_err(|source| SessionStoreError::io("reading program file", &self.path, source))
    }

    /// True when the file differs from what this session last wrote or observed.
    pub fn is_changed(&self) -> Result<bool, SessionStoreError> {
        Ok(self.program()? != self.last_observed)
    }

    /// Reads the program and records it as observed.
    pub fn observe(&mut self) -> Result<String, SessionStoreError> {
        let program = self.program()?;
        self.last_observed.clone_from(&program);
        Ok(program)
    }

    /// Applies one edit as a conflict-marker block and writes the file back.
    ///
    /// A range error leaves the file untouched.
    pub fn update_program(&mut self, edit: &EditDescriptor) -> Result<(), SessionStoreError> {
        let current = self.program()?;
        let updated = apply_edit(&current, &edit.code, edit.start, edit.end).map_err(|source| {
            SessionStoreError::Edit {
                path: self.path.clone(),
                source,
            }
        })?;

        fs::write(&self.path, &updated)
            .map_err(|source| SessionStoreError::io("writing program file", &self.path, source))?;
        self.last_observed = updated;

        tracing::info!(
            path = %self.path.display(),
            start = edit.start,
            end = edit.end,
            "applied edit"
        );
        Ok(())
    }

    pub fn load_history(&self) -> Result<Vec<ChatMessage>, SessionStoreError> {
        self.history.load()
    }

    /// Persists `history` with context announcements stripped.
    pub fn save_history(&self, history: &[ChatMessage]) -> Result<(), SessionStoreError> {
        self.history.save(history)
    }

    pub fn clear_history(&self) -> Result<(), SessionStoreError> {
        self.history.clear()
    }
}
