//! Tolerant JSON reading for model-authored edit blocks.
//!
//! Input is first tried as strict JSON. On failure it is rewritten into strict JSON and
//! parsed again. The rewrite handles the deviations generative text tends to produce:
//!
//! - bare object keys (`{code: "x"}`)
//! - trailing commas before `}` or `]`
//! - single-quoted strings
//! - raw newlines, tabs and other control characters inside strings
//!
//! Anything else is left for `serde_json` to reject.

use serde_json::Value;

/// Parses `text` as JSON, retrying once on a normalized copy.
pub fn parse(text: &str) -> Result<Value, serde_json::Error> {
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(strict_error) => {
            let normalized = normalize(text);
            if normalized == text {
                return Err(strict_error);
            }
            serde_json::from_str(&normalized)
        }
    }
}

/// Rewrites near-JSON into strict JSON without touching string contents.
#[must_use]
pub fn normalize(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 16);
    let mut index = 0;

    while index < chars.len() {
        let ch = chars[index];
        match ch {
            '"' | '\'' => {
                index = copy_string(&chars, index, &mut out);
            }
            ',' => {
                let next = skip_whitespace(&chars, index + 1);
                if !matches!(chars.get(next), Some('}' | ']')) {
                    out.push(',');
                }
                index += 1;
            }
            ch if is_key_start(ch) && expects_key(&out) => {
                let word_start = index;
                while index < chars.len() && is_key_continue(chars[index]) {
                    index += 1;
                }
                let word: String = chars[word_start..index].iter().collect();
                let next = skip_whitespace(&chars, index);
                if chars.get(next) == Some(&':') {
                    out.push('"');
                    out.push_str(&word);
                    out.push('"');
                } else {
                    out.push_str(&word);
                }
            }
            _ => {
                out.push(ch);
                index += 1;
            }
        }
    }

    out
}

/// Copies one quoted string starting at `start` as a double-quoted JSON string.
///
/// Returns the index just past the closing quote, or the input length when unterminated.
fn copy_string(chars: &[char], start: usize, out: &mut String) -> usize {
    let quote = chars[start];
    let mut index = start + 1;
    out.push('"');

    while index < chars.len() {
        let ch = chars[index];
        match ch {
            '\\' => {
                match chars.get(index + 1) {
                    Some('\'') if quote == '\'' => out.push('\''),
                    Some(escaped) => {
                        out.push('\\');
                        out.push(*escaped);
                    }
                    None => out.push('\\'),
                }
                index += 2;
                continue;
            }
            ch if ch == quote => {
                out.push('"');
                return index + 1;
            }
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            ch if ch.is_control() => out.push_str(&format!("\\u{:04x}", ch as u32)),
            ch => out.push(ch),
        }
        index += 1;
    }

    chars.len()
}

fn skip_whitespace(chars: &[char], mut index: usize) -> usize {
    while index < chars.len() && chars[index].is_whitespace() {
        index += 1;
    }
    index
}

fn expects_key(out: &str) -> bool {
    matches!(out.trim_end().chars().last(), Some('{' | ','))
}

fn is_key_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_' || ch == '$'
}

fn is_key_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '$'
}
