//! Response handling after the backend has answered: extract, validate, apply.
//!
//! Nothing here talks to the backend, so the whole path is testable against a scratch
//! file.

use std::fmt::Display;

use agent_provider::ChatMessage;
use apply_patch_engine::{extract_edits, EditBatch, ParseError};
use session_store::ProgramSession;

/// Prefix of every turn-level failure recorded in history.
pub const ERROR_PREFIX: &str = "Error: ";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResponseOutcome {
    pub applied: usize,
    /// System messages to append after the assistant response.
    pub notes: Vec<ChatMessage>,
}

#[must_use]
pub fn error_note(detail: impl Display) -> ChatMessage {
    ChatMessage::system(format!("{ERROR_PREFIX}{detail}"))
}

fn parse_error_note(error: &ParseError) -> ChatMessage {
    if error.is_contract_violation() {
        error_note(format_args!("internal: {error}"))
    } else {
        error_note(error)
    }
}

/// Applies every edit block in `response` to the session's program.
///
/// A malformed block or an overlapping batch applies nothing. Range failures skip only
/// the offending edit; edits applied before it stay applied.
pub fn apply_response(session: &mut ProgramSession, response: &str) -> ResponseOutcome {
    let edits = match extract_edits(response) {
        Ok(edits) => edits,
        Err(error) => {
            tracing::warn!(%error, "rejected malformed response");
            return ResponseOutcome {
                applied: 0,
                notes: vec![parse_error_note(&error)],
            };
        }
    };
    let batch = match EditBatch::validate(edits) {
        Ok(batch) => batch,
        Err(error) => {
            tracing::warn!(%error, "rejected overlapping batch");
            return ResponseOutcome {
                applied: 0,
                notes: vec![error_note(error)],
            };
        }
    };
    if batch.is_empty() {
        return ResponseOutcome::default();
    }
    tracing::debug!(edits = batch.len(), "applying validated batch");

    let mut outcome = ResponseOutcome::default();
    for edit in batch.descending() {
        match session.update_program(edit) {
            Ok(()) => outcome.applied += 1,
            Err(error) => {
                tracing::warn!(start = edit.start, end = edit.end, %error, "edit not applied");
                let detail = match error.range_error() {
                    Some(range) => range.to_string(),
                    None => error.to_string(),
                };
                outcome.notes.push(error_note(format_args!(
                    "edit [{}, {}) was not applied: {detail}",
                    edit.start, edit.end
                )));
            }
        }
    }

    if outcome.applied > 0 {
        outcome.notes.push(ChatMessage::system(format!(
            "Applied {} edit(s) to {}.",
            outcome.applied,
            session.path().display()
        )));
    }
    outcome
}
