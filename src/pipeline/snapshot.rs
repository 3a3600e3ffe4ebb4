//! Plain-text snapshot of the element tree.
//!
//! Paints `left padding + content + right padding` of every element with
//! text at its rect, in tree order, into a grid of characters. Markup is
//! stripped; colors and attributes are not represented.

use crate::engine::arrays::{core, text};
use crate::engine::{descendants, get_roots};
use crate::layout::text_measure::{char_width, strip_markup};

/// Render the document into `height` lines of `width` cells.
pub fn snapshot(width: u16, height: u16) -> Vec<String> {
    let mut grid = vec![vec![' '; width as usize]; height as usize];

    let mut order = Vec::new();
    for root in get_roots() {
        order.push(root);
        order.extend(descendants(root));
    }

    for index in order {
        let content = text::get_text_content(index);
        let (left, right) = text::get_padding(index);
        if content.is_empty() && left.is_empty() && right.is_empty() {
            continue;
        }

        let mut line = format!("{left}{content}{right}");
        if text::get_has_markup(index) {
            line = strip_markup(&line);
        }

        let rect = core::get_rect(index);
        let mut y = rect.y as usize;
        let mut x = rect.x as usize;
        let x_end = (rect.x as usize + rect.width.max(1) as usize).min(width as usize);
        for c in line.chars() {
            if c == '\n' {
                y += 1;
                x = rect.x as usize;
                continue;
            }
            if y >= grid.len() {
                break;
            }
            let w = char_width(c) as usize;
            if x + w.max(1) > x_end {
                continue;
            }
            grid[y][x] = c;
            // Continuation cell of a wide character
            if w == 2 {
                grid[y][x + 1] = '\0';
            }
            x += w.max(1);
        }
    }

    grid.into_iter()
        .map(|row| {
            row.into_iter()
                .filter(|&c| c != '\0')
                .collect::<String>()
                .trim_end()
                .to_string()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{allocate_index, reset_registry};
    use crate::types::Rect;

    #[test]
    fn test_snapshot_paints_padding_and_content() {
        reset_registry();

        let root = allocate_index(None, None);
        let a = allocate_index(None, Some(root));
        let b = allocate_index(None, Some(root));
        core::set_rect(a, Rect::new(0, 0, 10, 1));
        core::set_rect(b, Rect::new(2, 1, 10, 1));
        text::set_text_content(a, "Todo".to_string(), false);
        text::set_padding(a, "[", "]");
        text::set_text_content(b, "^rDone".to_string(), true);

        let lines = snapshot(12, 3);
        assert_eq!(lines, vec!["[Todo]".to_string(), "  Done".to_string(), String::new()]);
    }

    #[test]
    fn test_snapshot_clips_to_rect() {
        reset_registry();

        let a = allocate_index(None, None);
        core::set_rect(a, Rect::new(0, 0, 3, 1));
        text::set_text_content(a, "abcdef".to_string(), false);

        assert_eq!(snapshot(10, 1), vec!["abc".to_string()]);
    }
}
