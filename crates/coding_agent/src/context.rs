//! Keeps the backend's view of the program current.
//!
//! The live history holds at most one context announcement at a time. When the program
//! has changed since the backend last saw it, the old announcement is retracted and a
//! fresh line-numbered listing is appended.

use agent_provider::ChatMessage;
use patch_relay::display::numbered_listing;
use session_store::{ProgramSession, SessionStoreError};

pub const CHANGED_HEADER: &str = "The user modified the program. The current program is:";
pub const CURRENT_HEADER: &str = "The current program is:";
pub const EMPTY_PROGRAM_NOTE: &str = "The program is currently empty.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    /// The newest announcement matches the file.
    Fresh,
    /// No announcement has been sent, or the file changed since the last one.
    Stale,
}

#[derive(Debug, Clone)]
pub struct ContextSync {
    state: ContextState,
    /// Set after the first announcement; the first listing is a baseline, not a change.
    announced: bool,
}

impl Default for ContextSync {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextSync {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: ContextState::Stale,
            announced: false,
        }
    }

    #[must_use]
    pub fn state(&self) -> ContextState {
        self.state
    }

    /// Forces the next [`ContextSync::sync`] to re-announce the program.
    pub fn mark_stale(&mut self) {
        self.state = ContextState::Stale;
    }

    /// Re-announces the program into `history` when needed.
    ///
    /// Returns whether an announcement was inserted. On error the history is left as it
    /// was and the state stays unchanged.
    ///
    /// Any change the session did not make itself is announced as a user modification,
    /// whether or not the context was already stale.
    pub fn sync(
        &mut self,
        session: &mut ProgramSession,
        history: &mut Vec<ChatMessage>,
    ) -> Result<bool, SessionStoreError> {
        let changed = session.is_changed()?;
        if !changed && self.state == ContextState::Fresh {
            return Ok(false);
        }

        let modified_out_of_band = changed && self.announced;
        let program = session.observe()?;

        let retracted = history.len();
        history.retain(|message| !message.is_context_announcement());
        let retracted = retracted - history.len();

        history.push(announcement(&program, modified_out_of_band));
        self.state = ContextState::Fresh;
        self.announced = true;

        tracing::debug!(
            path = %session.path().display(),
            retracted,
            modified_out_of_band,
            "announced program context"
        );
        Ok(true)
    }
}

fn announcement(program: &str, modified_out_of_band: bool) -> ChatMessage {
    if program.is_empty() {
        return ChatMessage::context_announcement(EMPTY_PROGRAM_NOTE);
    }

    let header = if modified_out_of_band {
        CHANGED_HEADER
    } else {
        CURRENT_HEADER
    };
    ChatMessage::context_announcement(&format!("{header}\n{}", numbered_listing(program)))
}
