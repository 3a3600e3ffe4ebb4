//! Text Measurement
//!
//! Utilities for measuring text in terminal cells.
//!
//! Terminal text width depends on Unicode character widths:
//! - ASCII characters: 1 cell
//! - CJK characters: 2 cells (fullwidth)
//! - Emoji: 2 cells (most)
//! - Zero-width and control characters: 0 cells
//!
//! Content strings may carry caret markup (`^r` red, `^+` bold, `^:` reset,
//! `^[fg:blue]` long form, `^^` a literal caret). Markup takes no cells.

use unicode_width::UnicodeWidthChar;

/// Width of one character in cells.
#[inline]
pub fn char_width(c: char) -> u16 {
    UnicodeWidthChar::width(c).unwrap_or(0) as u16
}

/// Measure the display width of a string in terminal cells.
pub fn string_width(s: &str) -> u16 {
    s.chars().map(char_width).fold(0u16, u16::saturating_add)
}

/// Remove caret markup, keeping the visible text.
pub fn strip_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '^' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('^') => out.push('^'),
            Some('[') => {
                // Long form runs to the closing bracket
                for inner in chars.by_ref() {
                    if inner == ']' {
                        break;
                    }
                }
            }
            Some(_) | None => {}
        }
    }
    out
}

/// Width of content that may carry markup.
pub fn display_width(text: &str, has_markup: bool) -> u16 {
    if has_markup {
        string_width(&strip_markup(text))
    } else {
        string_width(text)
    }
}

/// Truncate text to fit within a width, ending with `ellipsis`.
///
/// Text that already fits is returned unchanged. When even the ellipsis does
/// not fit, the ellipsis itself is cut to the width.
pub fn truncate_text(text: &str, width: u16, ellipsis: &str) -> String {
    if string_width(text) <= width {
        return text.to_string();
    }

    let ellipsis_width = string_width(ellipsis);
    if ellipsis_width >= width {
        return take_width(ellipsis, width);
    }

    let mut result = take_width(text, width - ellipsis_width);
    result.push_str(ellipsis);
    result
}

/// Like [`truncate_text`], for content that may carry markup. Markup is
/// kept when the content fits and dropped when it has to be cut.
pub fn truncate_content(text: &str, has_markup: bool, width: u16, ellipsis: &str) -> (String, bool) {
    if display_width(text, has_markup) <= width {
        return (text.to_string(), has_markup);
    }
    let plain = if has_markup { strip_markup(text) } else { text.to_string() };
    (truncate_text(&plain, width, ellipsis), false)
}

/// Longest prefix of `text` that fits in `width` cells.
fn take_width(text: &str, width: u16) -> String {
    let mut result = String::new();
    let mut current = 0u16;
    for c in text.chars() {
        let w = char_width(c);
        if current.saturating_add(w) > width {
            break;
        }
        result.push(c);
        current = current.saturating_add(w);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_width_ascii() {
        assert_eq!(string_width("hello"), 5);
        assert_eq!(string_width(""), 0);
        assert_eq!(string_width("a b c"), 5);
    }

    #[test]
    fn test_string_width_wide_and_control() {
        assert_eq!(string_width("日本"), 4);
        assert_eq!(string_width("a\tb"), 2);
        assert_eq!(string_width("«»"), 2);
    }

    #[test]
    fn test_strip_markup() {
        assert_eq!(strip_markup("^rDone"), "Done");
        assert_eq!(strip_markup("^+^bIn^: Progress"), "In Progress");
        assert_eq!(strip_markup("2^^3"), "2^3");
        assert_eq!(strip_markup("^[fg:blue]x"), "x");
        assert_eq!(strip_markup("trailing^"), "trailing");
    }

    #[test]
    fn test_display_width() {
        assert_eq!(display_width("^rDone", true), 4);
        assert_eq!(display_width("^rDone", false), 6);
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("hello", 10, "…"), "hello");
        assert_eq!(truncate_text("hello world", 6, "…"), "hello…");
        assert_eq!(truncate_text("", 5, "…"), "");
        assert_eq!(truncate_text("hello", 4, "..."), "h...");
        assert_eq!(truncate_text("hello", 2, "..."), "..");
    }

    #[test]
    fn test_truncate_content_drops_markup_only_when_cut() {
        assert_eq!(
            truncate_content("^rDone", true, 10, "…"),
            ("^rDone".to_string(), true)
        );
        assert_eq!(
            truncate_content("^rIn Progress", true, 5, "…"),
            ("In P…".to_string(), false)
        );
    }
}
