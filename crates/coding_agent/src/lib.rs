//! Chat-driven editing of one program file.
//!
//! ## Provider bootstrap
//!
//! `coding_agent` requires explicit provider selection:
//!
//! - `CODING_AGENT_PROVIDER=mock` for the deterministic scripted backend
//!
//! The mock serves its built-in script unless `CODING_AGENT_MOCK_SCRIPT` points at a
//! UTF-8 JSON file holding an array of response strings:
//!
//! ```json
//! [
//!   "Adding a header.\n```json\n{\"code\": \"# demo\\n\", \"start\": 1, \"end\": 1}\n```"
//! ]
//! ```
//!
//! ## System instructions
//!
//! Every backend query starts with one System message carrying the edit-block protocol.
//! Set `CODING_AGENT_SYSTEM_INSTRUCTIONS` to replace the built-in text. Instructions are
//! never persisted or displayed.
//!
//! ## Turn contract
//!
//! [`app::App::handle_user_message`] runs one full turn: program context sync, backend
//! query, edit extraction and validation, conflict-marker application, history save.
//! Every failure inside a turn becomes a `System` message starting with `Error: `; it is
//! kept in history so the backend sees it on later turns.

pub mod app;
pub mod commands;
pub mod context;
pub mod pipeline;
pub mod providers;
pub mod transcript;
