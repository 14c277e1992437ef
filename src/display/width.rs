use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;

const TAB_WIDTH: usize = 4;

pub fn grapheme_width(grapheme: &str) -> usize {
    if grapheme == "\t" {
        return TAB_WIDTH;
    }

    grapheme
        .chars()
        .map(|ch| {
            if ch == '\t' {
                TAB_WIDTH
            } else {
                UnicodeWidthChar::width(ch).unwrap_or(0)
            }
        })
        .sum()
}

pub fn visible_width(input: &str) -> usize {
    input.graphemes(true).map(grapheme_width).sum()
}

#[cfg(test)]
mod tests {
    use super::visible_width;

    #[test]
    fn ascii_counts_columns() {
        assert_eq!(visible_width(""), 0);
        assert_eq!(visible_width("abc"), 3);
        assert_eq!(visible_width("a\tb"), 6);
    }

    #[test]
    fn wide_and_combining_characters() {
        assert_eq!(visible_width("日本"), 4);
        assert_eq!(visible_width("e\u{301}"), 1);
    }
}
