//! Unicode text helpers for item labels.
//!
//! Labels come from element text content, so they can hold anything: wide
//! characters, stray control characters, surrounding whitespace. These
//! helpers measure and clip them for rendering, and normalize them for
//! type-ahead matching.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Remove control characters, folding newlines and tabs into spaces.
pub fn sanitize(s: &str) -> String {
    s.chars()
        .filter_map(|c| match c {
            '\n' | '\t' => Some(' '),
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect()
}

/// Display width of `s` in terminal columns.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate a string to fit within `max_width` display columns.
///
/// If the string fits, it is returned unchanged. Otherwise `tail` (e.g.
/// "...") is appended and the total width of the result, tail included,
/// does not exceed `max_width`.
///
/// # Examples
///
/// ```
/// use shui_widgets::runeutil::truncate;
///
/// assert_eq!(truncate("hello world", 8, "..."), "hello...");
/// assert_eq!(truncate("hi", 10, "..."), "hi");
/// ```
pub fn truncate(s: &str, max_width: usize, tail: &str) -> String {
    if display_width(s) <= max_width {
        return s.to_string();
    }

    let tail_width = display_width(tail);
    if tail_width >= max_width {
        return take_columns(tail, max_width);
    }

    let mut result = take_columns(s, max_width - tail_width);
    result.push_str(tail);
    result
}

/// Normalized form of a label for prefix matching: trimmed and lowercased.
pub fn match_key(label: &str) -> String {
    label.trim().to_lowercase()
}

fn take_columns(s: &str, columns: usize) -> String {
    let mut result = String::new();
    let mut width = 0;
    for c in s.chars() {
        let cw = c.width().unwrap_or(0);
        if width + cw > columns {
            break;
        }
        result.push(c);
        width += cw;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_folds_whitespace_and_drops_controls() {
        assert_eq!(sanitize("a\x07b\nc\td"), "ab c d");
    }

    #[test]
    fn display_width_cjk() {
        assert_eq!(display_width("abc"), 3);
        assert_eq!(display_width("日本"), 4);
    }

    #[test]
    fn truncate_basic() {
        assert_eq!(truncate("hello world", 8, "..."), "hello...");
        assert_eq!(truncate("hello", 5, "..."), "hello");
    }

    #[test]
    fn truncate_never_splits_wide_chars() {
        // 3 columns for text: only one 2-column glyph fits
        assert_eq!(truncate("日本語", 4, "…"), "日…");
    }

    #[test]
    fn truncate_tail_wider_than_max() {
        assert_eq!(truncate("hello world", 2, "..."), "..");
    }

    #[test]
    fn match_key_trims_and_lowercases() {
        assert_eq!(match_key("  Settings \n"), "settings");
    }
}
