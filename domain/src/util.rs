//! Shared utility functions.

/// Single-line preview of `s`, at most `max_chars` characters.
///
/// Newlines and runs of whitespace collapse to one space; an ellipsis marks
/// truncation.
pub fn preview(s: &str, max_chars: usize) -> String {
    let flat = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let cut: String = flat.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_short_text_unchanged() {
        assert_eq!(preview("hello world", 20), "hello world");
    }

    #[test]
    fn preview_collapses_whitespace() {
        assert_eq!(preview("a\n\n  b\tc", 20), "a b c");
    }

    #[test]
    fn preview_truncates_on_char_boundary() {
        assert_eq!(preview("あのねあのね", 4), "あのね…");
        assert_eq!(preview("hello world", 6), "hello…");
    }
}
