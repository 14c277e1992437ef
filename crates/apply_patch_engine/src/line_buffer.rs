//! Line-indexed edits on a text buffer.
//!
//! Lines are 1-based and keep their terminators. Edits never remove original text: the
//! replaced range is wrapped in conflict markers with the proposed code after the separator.

use crate::error::RangeError;

pub const ORIGINAL_MARKER: &str = "<<<<<<< Original Code";
pub const SEPARATOR_MARKER: &str = "=======";
pub const SUGGESTION_MARKER: &str = ">>>>>>> LLM Suggestion";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    /// `CrLf` when the buffer contains any `\r\n`, `Lf` otherwise.
    #[must_use]
    pub fn detect(buffer: &str) -> Self {
        if buffer.contains("\r\n") {
            Self::CrLf
        } else {
            Self::Lf
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }
}

/// Splits `buffer` into lines, each keeping its trailing `\n` (if any).
#[must_use]
pub fn split_lines(buffer: &str) -> Vec<&str> {
    buffer.split_inclusive('\n').collect()
}

#[must_use]
pub fn line_count(buffer: &str) -> usize {
    split_lines(buffer).len()
}

/// Inserts `literal` immediately before line `line_number`.
///
/// `line_number == line_count + 1` appends; an unterminated last line gets a terminator
/// first so the insertion does not fuse with it.
pub fn insert_line(buffer: &str, literal: &str, line_number: usize) -> Result<String, RangeError> {
    let lines = split_lines(buffer);
    let max = lines.len() + 1;
    if line_number < 1 || line_number > max {
        return Err(RangeError::Line {
            line: line_number,
            max,
        });
    }

    let mut out = String::with_capacity(buffer.len() + literal.len() + 2);
    for (index, line) in lines.iter().enumerate() {
        if index + 1 == line_number {
            out.push_str(literal);
        }
        out.push_str(line);
    }

    if line_number == max {
        if lines.last().is_some_and(|last| !last.ends_with('\n')) {
            out.push_str(LineEnding::detect(buffer).as_str());
        }
        out.push_str(literal);
    }

    Ok(out)
}

/// Wraps lines `[start, end)` in conflict markers and appends `code` as the suggestion.
///
/// ```text
/// <<<<<<< Original Code
/// <original lines start..end>
/// =======
/// <code>
/// >>>>>>> LLM Suggestion
/// ```
pub fn apply_edit(buffer: &str, code: &str, start: usize, end: usize) -> Result<String, RangeError> {
    let line_count = line_count(buffer);
    if start < 1 || start > end || end > line_count + 1 {
        return Err(RangeError::Edit {
            start,
            end,
            line_count,
        });
    }

    let ending = LineEnding::detect(buffer);
    let terminator = ending.as_str();
    let code = terminate_code(code, ending);

    let opened = insert_line(buffer, &format!("{ORIGINAL_MARKER}{terminator}"), start)?;
    let separated = insert_line(&opened, &format!("{SEPARATOR_MARKER}{terminator}"), end + 1)?;
    insert_line(
        &separated,
        &format!("{code}{SUGGESTION_MARKER}{terminator}"),
        end + 2,
    )
}

/// Converts `code` to the buffer's line ending and terminates its last line.
fn terminate_code(code: &str, ending: LineEnding) -> String {
    if code.is_empty() {
        return String::new();
    }

    let mut code = code.replace("\r\n", "\n");
    if ending == LineEnding::CrLf {
        code = code.replace('\n', "\r\n");
    }
    if !code.ends_with('\n') {
        code.push_str(ending.as_str());
    }
    code
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    use super::{apply_edit, insert_line, line_count, split_lines, LineEnding};
    use crate::error::RangeError;

    fn remove_line(buffer: &str, line_number: usize) -> String {
        split_lines(buffer)
            .into_iter()
            .enumerate()
            .filter(|(index, _)| index + 1 != line_number)
            .map(|(_, line)| line)
            .collect()
    }

    #[test]
    fn line_ending_detection() {
        assert_eq!(LineEnding::detect(""), LineEnding::Lf);
        assert_eq!(LineEnding::detect("a\nb\n"), LineEnding::Lf);
        assert_eq!(LineEnding::detect("a\r\nb\r\n"), LineEnding::CrLf);
        assert_eq!(LineEnding::detect("a\nb\r\n"), LineEnding::CrLf);
        assert_eq!(LineEnding::detect("no terminator"), LineEnding::Lf);
    }

    #[test]
    fn split_keeps_terminators() {
        assert_eq!(split_lines("a\r\nb\nc"), vec!["a\r\n", "b\n", "c"]);
        assert_eq!(line_count(""), 0);
        assert_eq!(line_count("x"), 1);
        assert_eq!(line_count("x\n"), 1);
    }

    #[test]
    fn insert_line_places_before_the_target() {
        assert_eq!(insert_line("a\nb\n", "x\n", 1).expect("front"), "x\na\nb\n");
        assert_eq!(insert_line("a\nb\n", "x\n", 2).expect("middle"), "a\nx\nb\n");
        assert_eq!(insert_line("a\nb\n", "x\n", 3).expect("end"), "a\nb\nx\n");
        assert_eq!(insert_line("", "x\n", 1).expect("empty"), "x\n");
    }

    #[test]
    fn insert_at_end_terminates_the_last_line() {
        assert_eq!(insert_line("a\nb", "x\n", 3).expect("append"), "a\nb\nx\n");
        assert_eq!(
            insert_line("a\r\nb", "x\r\n", 3).expect("append crlf"),
            "a\r\nb\r\nx\r\n"
        );
    }

    #[test]
    fn insert_line_rejects_out_of_range() {
        assert_matches!(
            insert_line("a\n", "x\n", 0),
            Err(RangeError::Line { line: 0, max: 2 })
        );
        assert_matches!(
            insert_line("a\n", "x\n", 3),
            Err(RangeError::Line { line: 3, max: 2 })
        );
    }

    #[test]
    fn insert_then_remove_round_trips() {
        let buffers = ["", "one\n", "one\ntwo\nthree\n", "a\r\nb\r\n", "tail only"];
        for buffer in buffers {
            let count = line_count(buffer);
            for line_number in 1..=count + 1 {
                let inserted = insert_line(buffer, "inserted\n", line_number).expect("in range");
                let appended_to_open_tail =
                    line_number == count + 1 && !buffer.is_empty() && !buffer.ends_with('\n');
                let expected = if appended_to_open_tail {
                    format!("{buffer}\n")
                } else {
                    buffer.to_string()
                };
                assert_eq!(
                    remove_line(&inserted, line_number),
                    expected,
                    "line {line_number} of {buffer:?}"
                );
            }
        }
    }

    #[test]
    fn replacement_wraps_original_lines() {
        let buffer = "def add(a, b):\n    return a + b\n";
        let result = apply_edit(buffer, "def add(*args):\n    return sum(args)\n", 1, 3)
            .expect("edit applies");

        assert_eq!(
            result,
            "<<<<<<< Original Code\n\
             def add(a, b):\n    return a + b\n\
             =======\n\
             def add(*args):\n    return sum(args)\n\
             >>>>>>> LLM Suggestion\n"
        );
        assert_eq!(line_count(&result), 7);
    }

    #[test]
    fn insertion_into_empty_buffer_has_empty_original_section() {
        let result = apply_edit("", "x=1\n", 1, 1).expect("insert");
        assert_eq!(
            result,
            "<<<<<<< Original Code\n=======\nx=1\n>>>>>>> LLM Suggestion\n"
        );
    }

    #[test]
    fn code_without_terminator_gets_one() {
        let result = apply_edit("a\nb\nc\n", "B", 2, 3).expect("edit");
        assert_eq!(
            result,
            "a\n<<<<<<< Original Code\nb\n=======\nB\n>>>>>>> LLM Suggestion\nc\n"
        );
    }

    #[test]
    fn crlf_buffers_get_crlf_markers_and_code() {
        let result = apply_edit("a\r\nb\r\n", "x\ny\n", 2, 3).expect("edit");
        assert_eq!(
            result,
            "a\r\n<<<<<<< Original Code\r\nb\r\n=======\r\nx\r\ny\r\n>>>>>>> LLM Suggestion\r\n"
        );
    }

    #[test]
    fn unterminated_last_line_is_kept_intact() {
        let result = apply_edit("a\nlast", "new\n", 2, 3).expect("edit");
        assert_eq!(
            result,
            "a\n<<<<<<< Original Code\nlast\n=======\nnew\n>>>>>>> LLM Suggestion\n"
        );
    }

    #[test]
    fn deletion_keeps_full_bracketing() {
        let result = apply_edit("keep\ndrop\n", "", 2, 3).expect("delete");
        assert_eq!(
            result,
            "keep\n<<<<<<< Original Code\ndrop\n=======\n>>>>>>> LLM Suggestion\n"
        );
    }

    #[test]
    fn apply_edit_rejects_bad_ranges() {
        assert_matches!(
            apply_edit("a\n", "x", 0, 1),
            Err(RangeError::Edit { start: 0, end: 1, line_count: 1 })
        );
        assert_matches!(
            apply_edit("a\n", "x", 2, 1),
            Err(RangeError::Edit { .. })
        );
        assert_matches!(
            apply_edit("a\n", "x", 1, 3),
            Err(RangeError::Edit { end: 3, .. })
        );
        assert!(apply_edit("a\n", "x", 2, 2).is_ok());
    }
}
