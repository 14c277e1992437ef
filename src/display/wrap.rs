use unicode_segmentation::UnicodeSegmentation;

use super::width::{grapheme_width, visible_width};

/// Word-wraps `text` to `width` columns, keeping explicit line breaks.
///
/// Words wider than `width` are split at grapheme boundaries. A `width` of 0 disables
/// wrapping.
#[must_use]
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    for line in text.split('\n') {
        let line = line.trim_end_matches('\r');
        if width == 0 || visible_width(line) <= width {
            out.push(line.to_string());
            continue;
        }
        wrap_line(line, width, &mut out);
    }
    out
}

fn wrap_line(line: &str, width: usize, out: &mut Vec<String>) {
    let mut current = String::new();
    let mut current_width = 0;

    for word in line.split_word_bounds() {
        let word_width = visible_width(word);
        if current_width + word_width <= width {
            current.push_str(word);
            current_width += word_width;
            continue;
        }

        if !current.is_empty() {
            out.push(current.trim_end().to_string());
            current.clear();
            current_width = 0;
            if word.trim().is_empty() {
                continue;
            }
        }

        if word_width <= width {
            current.push_str(word);
            current_width = word_width;
            continue;
        }

        for grapheme in word.graphemes(true) {
            let grapheme_cols = grapheme_width(grapheme);
            if current_width + grapheme_cols > width && !current.is_empty() {
                out.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push_str(grapheme);
            current_width += grapheme_cols;
        }
    }

    if !current.is_empty() {
        out.push(current.trim_end().to_string());
    }
}

/// Renders `content` under a `label:` prefix with continuation lines indented to match.
#[must_use]
pub fn render_labeled(label: &str, content: &str, width: usize) -> String {
    let prefix = format!("{label}: ");
    let indent = " ".repeat(visible_width(&prefix));
    let body_width = width.saturating_sub(indent.len()).max(1);

    wrap_text(content, body_width)
        .into_iter()
        .enumerate()
        .map(|(index, line)| {
            if index == 0 {
                format!("{prefix}{line}")
            } else if line.is_empty() {
                String::new()
            } else {
                format!("{indent}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
