use thiserror::Error;

use crate::descriptor::EditDescriptor;

/// Failure while scanning a response for structured edit blocks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid edit block at byte {offset}: expected '{{' or '[' after the opening fence, found {found}")]
    MissingOpener { offset: usize, found: String },

    #[error("invalid edit block at byte {offset}: no complete JSON value could be parsed")]
    UnterminatedBlock { offset: usize },

    #[error("invalid edit block at byte {offset}: missing closing ``` fence")]
    MissingClosingFence { offset: usize },

    #[error("backend contract violation in edit block at byte {offset}: {reason}")]
    ContractViolation { offset: usize, reason: String },
}

impl ParseError {
    /// True when the block parsed but did not match the `{code, start, end}` schema.
    #[must_use]
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::ContractViolation { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("overlapping edits: [{}, {}) overlaps [{}, {})", first.start, first.end, second.start, second.end)]
pub struct OverlapError {
    pub first: EditDescriptor,
    pub second: EditDescriptor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("line {line} is out of range; valid lines are 1..={max}")]
    Line { line: usize, max: usize },

    #[error("edit range [{start}, {end}) is invalid for a buffer of {line_count} line(s)")]
    Edit {
        start: usize,
        end: usize,
        line_count: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Overlap(#[from] OverlapError),

    #[error(transparent)]
    Range(#[from] RangeError),
}
