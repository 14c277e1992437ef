use std::io::Write;
use std::path::Path;

use anyhow::Context;

use crate::descriptor::{EditBatch, EditDescriptor};
use crate::error::RangeError;
use crate::extract::extract_edits;
use crate::line_buffer::apply_edit;

/// Result of applying one validated batch to an in-memory buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    pub buffer: String,
    /// Edits that were applied, in application order.
    pub applied: Vec<EditDescriptor>,
    /// Edits rejected by range checks, in application order.
    pub failed: Vec<(EditDescriptor, RangeError)>,
}

/// Applies every edit of `batch` bottom-up.
///
/// A range failure skips that edit only; edits already applied stay applied.
#[must_use]
pub fn apply_batch(buffer: &str, batch: &EditBatch) -> BatchOutcome {
    let mut current = buffer.to_string();
    let mut applied = Vec::new();
    let mut failed = Vec::new();

    for edit in batch.descending() {
        match apply_edit(&current, &edit.code, edit.start, edit.end) {
            Ok(next) => {
                current = next;
                applied.push(edit.clone());
            }
            Err(error) => {
                tracing::warn!(start = edit.start, end = edit.end, %error, "edit rejected");
                failed.push((edit.clone(), error));
            }
        }
    }

    BatchOutcome {
        buffer: current,
        applied,
        failed,
    }
}

/// Applies every edit block in `response` to the file at `path`.
///
/// Prints a summary of applied ranges to `stdout` and one line per rejected edit to
/// `stderr`. Parse and overlap failures leave the file untouched.
pub fn apply_patch(
    path: &Path,
    response: &str,
    stdout: &mut impl Write,
    stderr: &mut impl Write,
) -> anyhow::Result<()> {
    let edits = extract_edits(response).context("invalid patch response")?;
    let batch = EditBatch::validate(edits).context("invalid patch response")?;

    let original = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let outcome = apply_batch(&original, &batch);

    if !outcome.applied.is_empty() {
        std::fs::write(path, &outcome.buffer)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    writeln!(
        stdout,
        "Success. Applied {} edit(s) to {}:",
        outcome.applied.len(),
        path.display()
    )?;
    for edit in &outcome.applied {
        writeln!(stdout, "~ [{}, {})", edit.start, edit.end)?;
    }
    for (edit, error) in &outcome.failed {
        writeln!(stderr, "Skipped [{}, {}): {error}", edit.start, edit.end)?;
    }

    if outcome.failed.is_empty() {
        Ok(())
    } else {
        anyhow::bail!("{} edit(s) could not be applied", outcome.failed.len())
    }
}
