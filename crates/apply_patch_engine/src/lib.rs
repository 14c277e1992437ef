//! Patch protocol for model-proposed, line-addressed edits.
//!
//! A response is scanned for ` ```json ` blocks ([`extract_blocks`]), the resulting
//! descriptors are validated as one batch ([`EditBatch::validate`]), and each edit is
//! applied bottom-up as a conflict-marker block ([`apply_edit`]). Original lines are never
//! deleted; resolving the markers is left to a human.

mod batch;
mod descriptor;
mod error;
mod extract;
pub mod lenient;
mod line_buffer;

pub use batch::{apply_batch, apply_patch, BatchOutcome};
pub use descriptor::{sorted_edits, EditBatch, EditDescriptor};
pub use error::{OverlapError, ParseError, PatchError, RangeError};
pub use extract::{extract_blocks, extract_edits, Block, BlockExtractor, CLOSE_FENCE, OPEN_FENCE};
pub use line_buffer::{
    apply_edit, insert_line, line_count, split_lines, LineEnding, ORIGINAL_MARKER,
    SEPARATOR_MARKER, SUGGESTION_MARKER,
};
