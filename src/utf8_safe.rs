//! Display-width aware string helpers.
//!
//! Caret offsets and column layout are measured in terminal columns, not bytes
//! or chars, so double-width glyphs never get split or misplaced.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Width of `s` in terminal columns.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Return a slice of the string bounded by display columns rather than raw characters.
/// This prevents splitting a multi-byte or double-width glyph when showing a viewport.
pub fn window_by_columns(s: &str, start_cols: usize, width_cols: usize) -> &str {
    if width_cols == 0 || s.is_empty() {
        return "";
    }

    let mut col = 0usize;
    let mut start_byte = None;
    let mut end_byte = s.len();
    let target_end = start_cols.saturating_add(width_cols);

    for (idx, ch) in s.char_indices() {
        let glyph_width = UnicodeWidthChar::width(ch).unwrap_or(0).max(1);
        let next_col = col.saturating_add(glyph_width);

        if start_byte.is_none() && start_cols < next_col {
            start_byte = Some(idx);
        }

        if start_byte.is_some() && next_col > target_end {
            end_byte = idx;
            break;
        }

        col = next_col;
    }

    match start_byte {
        Some(start) if start <= end_byte => &s[start..end_byte],
        _ => "",
    }
}

/// The rightmost part of `s` that fits in `width_cols` columns.
///
/// Used for input fields: while typing past the edge, the end of the text stays visible.
pub fn tail_by_columns(s: &str, width_cols: usize) -> &str {
    let total = display_width(s);
    if total <= width_cols {
        return s;
    }
    let mut col = total;
    for (idx, ch) in s.char_indices() {
        if col <= width_cols {
            return &s[idx..];
        }
        col -= UnicodeWidthChar::width(ch).unwrap_or(0);
    }
    ""
}

/// Truncate or pad `s` to exactly `width_cols` columns.
pub fn fit_columns(s: &str, width_cols: usize) -> String {
    let clipped = window_by_columns(s, 0, width_cols);
    let mut out = String::with_capacity(clipped.len() + width_cols);
    out.push_str(clipped);
    let used = display_width(clipped);
    out.extend(std::iter::repeat(' ').take(width_cols.saturating_sub(used)));
    out
}
