/// Returns at most the first `limit` characters of `text`.
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Truncates `text` to `limit` characters and marks the cut with "...".
pub fn preview(text: &str, limit: usize) -> String {
    let cut = truncate_chars(text, limit);
    if cut.len() < text.len() {
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("договор", 3), "дог");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("", 0), "");
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview("hello world", 5), "hello...");
        assert_eq!(preview("hello", 5), "hello");
    }
}
