// src/util/text.rs

/// First non-empty line of `content`, trimmed and cut to `max_chars`.
///
/// Truncated lines end with an ellipsis that counts towards the limit.
///
/// # Examples
///
/// ```
/// use supanotes::util::text::preview;
///
/// assert_eq!(preview("\n  buy milk  \nand eggs", 40), "buy milk");
/// assert_eq!(preview("abcdefghij", 5), "abcd…");
/// ```
pub fn preview(content: &str, max_chars: usize) -> String {
    let line = content
        .lines()
        .map(|line| line.trim())
        .find(|line| !line.is_empty())
        .unwrap_or("");

    if line.chars().count() <= max_chars {
        return line.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }

    let mut cut: String = line.chars().take(max_chars - 1).collect();
    cut.push('…');
    cut
}
