//! Durable state for one editing session.
//!
//! [`ProgramSession`] owns the program file and detects out-of-band edits to it.
//! [`HistoryStore`] persists the chat log in a JSON sidecar next to the program, never
//! including context announcements.

mod error;
mod paths;
mod program;
mod replay;
mod schema;
mod store;

pub use error::SessionStoreError;
pub use paths::{history_path, HISTORY_SUFFIX};
pub use program::ProgramSession;
pub use schema::{HistoryFile, HistoryRecord, HistoryRole, HISTORY_VERSION};
pub use store::HistoryStore;
