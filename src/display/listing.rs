/// Renders `program` with 1-based, right-aligned line numbers: `" 9| x"`, `"10| y"`.
///
/// Number width matches the digit count of the last line number. Line terminators are
/// dropped; an empty program renders as an empty string.
#[must_use]
pub fn numbered_listing(program: &str) -> String {
    let lines: Vec<&str> = program
        .split_inclusive('\n')
        .map(|line| line.trim_end_matches('\n').trim_end_matches('\r'))
        .collect();
    let width = lines.len().to_string().len();

    lines
        .iter()
        .enumerate()
        .map(|(index, line)| format!("{:>width$}| {line}", index + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::numbered_listing;

    #[test]
    fn empty_program_has_no_lines() {
        assert_eq!(numbered_listing(""), "");
    }

    #[test]
    fn single_digit_listing() {
        assert_eq!(
            numbered_listing("def add(a, b):\n    return a + b\n"),
            "1| def add(a, b):\n2|     return a + b"
        );
    }

    #[test]
    fn numbers_are_right_aligned_to_the_widest() {
        let program: String = (1..=10).map(|n| format!("x{n}\n")).collect();
        let listing = numbered_listing(&program);
        let lines: Vec<&str> = listing.lines().collect();

        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0], " 1| x1");
        assert_eq!(lines[8], " 9| x9");
        assert_eq!(lines[9], "10| x10");
    }

    #[test]
    fn crlf_and_missing_final_terminator() {
        assert_eq!(numbered_listing("a\r\nb"), "1| a\n2| b");
        assert_eq!(numbered_listing("\n"), "1| ");
    }
}
