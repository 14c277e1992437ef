//! Splits a model response into prose and structured edit blocks.
//!
//! Edit blocks are fenced as ` ```json ` and hold one object or an array of objects with
//! `code`, `start` and `end`. Block boundaries are found by trying every candidate closing
//! bracket in order and accepting the first prefix that parses, so brackets inside `code`
//! strings never truncate a block.

use std::collections::VecDeque;

use serde_json::Value;

use crate::descriptor::EditDescriptor;
use crate::error::ParseError;
use crate::lenient;

pub const OPEN_FENCE: &str = "```json";
pub const CLOSE_FENCE: &str = "```";

/// One item of an extracted response, in response order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Prose(String),
    Edit(EditDescriptor),
}

/// Lazy iterator over the [`Block`]s of a response.
///
/// Yields at most one `Err`, after which the iterator is exhausted.
#[derive(Debug)]
pub struct BlockExtractor<'a> {
    text: &'a str,
    cursor: usize,
    pending: VecDeque<EditDescriptor>,
    finished: bool,
}

#[must_use]
pub fn extract_blocks(text: &str) -> BlockExtractor<'_> {
    BlockExtractor {
        text,
        cursor: 0,
        pending: VecDeque::new(),
        finished: false,
    }
}

/// Collects every edit in `text`, failing on the first malformed block.
pub fn extract_edits(text: &str) -> Result<Vec<EditDescriptor>, ParseError> {
    let mut edits = Vec::new();
    for block in extract_blocks(text) {
        if let Block::Edit(edit) = block? {
            edits.push(edit);
        }
    }
    Ok(edits)
}

impl Iterator for BlockExtractor<'_> {
    type Item = Result<Block, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(edit) = self.pending.pop_front() {
            return Some(Ok(Block::Edit(edit)));
        }
        if self.finished {
            return None;
        }

        match self.advance() {
            Ok(Some(block)) => Some(Ok(block)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(error) => {
                self.finished = true;
                Some(Err(error))
            }
        }
    }
}

impl BlockExtractor<'_> {
    fn advance(&mut self) -> Result<Option<Block>, ParseError> {
        loop {
            self.cursor = skip_whitespace(self.text, self.cursor);
            let rest = &self.text[self.cursor..];
            if rest.is_empty() {
                return Ok(None);
            }

            let Some(fence_at) = rest.find(OPEN_FENCE) else {
                self.cursor = self.text.len();
                return Ok(Some(Block::Prose(rest.to_string())));
            };
            if fence_at > 0 {
                self.cursor += fence_at;
                return Ok(Some(Block::Prose(rest[..fence_at].to_string())));
            }

            let block_start = skip_whitespace(self.text, self.cursor + OPEN_FENCE.len());
            let closer = match self.text[block_start..].chars().next() {
                Some('{') => '}',
                Some('[') => ']',
                other => {
                    return Err(ParseError::MissingOpener {
                        offset: block_start,
                        found: match other {
                            Some(ch) => format!("'{ch}'"),
                            None => "end of input".to_string(),
                        },
                    })
                }
            };

            let (value, block_end) = parse_first_complete(self.text, block_start, closer)?;
            let edits = descriptors_from_value(value, block_start)?;

            let fence_at = skip_whitespace(self.text, block_end);
            if !self.text[fence_at..].starts_with(CLOSE_FENCE) {
                return Err(ParseError::MissingClosingFence { offset: fence_at });
            }
            self.cursor = fence_at + CLOSE_FENCE.len();

            tracing::debug!(
                offset = block_start,
                edits = edits.len(),
                "extracted structured edit block"
            );
            self.pending.extend(edits);
            if let Some(edit) = self.pending.pop_front() {
                return Ok(Some(Block::Edit(edit)));
            }
        }
    }
}

/// Tries each `closer` position after `start` and returns the first prefix that parses.
fn parse_first_complete(
    text: &str,
    start: usize,
    closer: char,
) -> Result<(Value, usize), ParseError> {
    let body = &text[start..];
    for (index, _) in body.match_indices(closer) {
        let end = start + index + closer.len_utf8();
        if let Ok(value) = lenient::parse(&text[start..end]) {
            return Ok((value, end));
        }
    }

    Err(ParseError::UnterminatedBlock { offset: start })
}

fn descriptors_from_value(value: Value, offset: usize) -> Result<Vec<EditDescriptor>, ParseError> {
    let items = match value {
        Value::Array(items) => items,
        object @ Value::Object(_) => vec![object],
        _ => {
            return Err(ParseError::ContractViolation {
                offset,
                reason: "expected an object or an array of objects".to_string(),
            })
        }
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            EditDescriptor::from_value(item).map_err(|reason| ParseError::ContractViolation {
                offset,
                reason: format!("item {index}: {reason}"),
            })
        })
        .collect()
}

fn skip_whitespace(text: &str, from: usize) -> usize {
    let rest = &text[from..];
    from + (rest.len() - rest.trim_start().len())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    use super::{extract_blocks, extract_edits, Block};
    use crate::descriptor::EditDescriptor;
    use crate::error::ParseError;

    fn collect(text: &str) -> Vec<Block> {
        extract_blocks(text)
            .collect::<Result<Vec<_>, _>>()
            .expect("response should extract")
    }

    #[test]
    fn plain_prose_is_a_single_fragment() {
        assert_eq!(
            collect("  just talking\nabout code "),
            vec![Block::Prose("just talking\nabout code ".to_string())]
        );
        assert!(collect("   \n\t").is_empty());
    }

    #[test]
    fn prose_and_blocks_interleave_in_order() {
        let text = "Here is a fix:\n```json\n{\"code\": \"x = 1\\n\", \"start\": 1, \"end\": 2}\n```\nand one more\n```json\n[{\"code\": \"y\\n\", \"start\": 4, \"end\": 4}, {\"code\": \"\", \"start\": 6, \"end\": 7}]\n```\nDone.";

        assert_eq!(
            collect(text),
            vec![
                Block::Prose("Here is a fix:\n".to_string()),
                Block::Edit(EditDescriptor::new("x = 1\n", 1, 2)),
                Block::Prose("and one more\n".to_string()),
                Block::Edit(EditDescriptor::new("y\n", 4, 4)),
                Block::Edit(EditDescriptor::new("", 6, 7)),
                Block::Prose("Done.".to_string()),
            ]
        );
    }

    #[test]
    fn closer_inside_code_string_does_not_end_the_block() {
        let text = "```json\n{\"code\": \"d = {'a': 1}\\nprint(d)\\n\", \"start\": 3, \"end\": 3}\n```";
        assert_eq!(
            extract_edits(text).expect("block parses"),
            vec![EditDescriptor::new("d = {'a': 1}\nprint(d)\n", 3, 3)]
        );

        let text = "```json\n[{\"code\": \"xs = [1, 2]\\n\", \"start\": 1, \"end\": 1}]\n```";
        assert_eq!(
            extract_edits(text).expect("array block parses"),
            vec![EditDescriptor::new("xs = [1, 2]\n", 1, 1)]
        );
    }

    #[test]
    fn lenient_blocks_are_accepted() {
        let text = "```json\n{code: \"pass\n\", start: 2, end: 5,}\n```";
        assert_eq!(
            extract_edits(text).expect("lenient block"),
            vec![EditDescriptor::new("pass\n", 2, 5)]
        );
    }

    #[test]
    fn empty_array_block_yields_nothing_and_continues() {
        assert_eq!(
            collect("before\n```json\n[]\n```\nafter"),
            vec![
                Block::Prose("before\n".to_string()),
                Block::Prose("after".to_string()),
            ]
        );
    }

    #[test]
    fn fence_without_structural_opener_is_fatal() {
        let mut blocks = extract_blocks("intro\n```json\nnot json\n```");
        assert_eq!(
            blocks.next(),
            Some(Ok(Block::Prose("intro\n".to_string())))
        );
        assert_matches!(
            blocks.next(),
            Some(Err(ParseError::MissingOpener { found, .. })) if found == "'n'"
        );
        assert_eq!(blocks.next(), None);

        assert_matches!(
            extract_edits("```json"),
            Err(ParseError::MissingOpener { found, .. }) if found == "end of input"
        );
    }

    #[test]
    fn block_with_no_parsable_prefix_is_fatal() {
        assert_matches!(
            extract_edits("```json\n{\"code\": \"x\", \"start\": 1\n```"),
            Err(ParseError::UnterminatedBlock { offset: 8 })
        );
    }

    #[test]
    fn missing_closing_fence_is_fatal() {
        assert_matches!(
            extract_edits("```json\n{\"code\": \"x\", \"start\": 1, \"end\": 1} trailing"),
            Err(ParseError::MissingClosingFence { .. })
        );
    }

    #[test]
    fn missing_fields_are_contract_violations() {
        let error = extract_edits("```json\n[{\"code\": \"x\", \"start\": 1, \"end\": 1}, {\"code\": \"y\", \"start\": 2}]\n```")
            .expect_err("second item lacks end");
        assert!(error.is_contract_violation());
        assert!(error.to_string().contains("item 1: missing required field 'end'"));
    }
}
