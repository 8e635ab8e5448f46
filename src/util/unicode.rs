use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width in terminal cells. Tabs count as 4 cells.
pub fn display_width(s: &str) -> usize {
    s.split('\t')
        .enumerate()
        .map(|(i, part)| {
            let w = UnicodeWidthStr::width(part);
            if i > 0 { w + 4 } else { w }
        })
        .sum()
}

/// Truncate a string to fit within `max_cells` terminal cells, appending `…` if truncated.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if max_cells == 0 {
        return String::new();
    }
    let sw = display_width(s);
    if sw <= max_cells {
        return s.to_string();
    }
    if max_cells <= 1 {
        return "\u{2026}".to_string();
    }
    let budget = max_cells - 1; // reserve 1 cell for '…'
    let mut width = 0;
    let mut result = String::new();
    for grapheme in s.graphemes(true) {
        let gw = grapheme_display_width(grapheme);
        if width + gw > budget {
            break;
        }
        width += gw;
        result.push_str(grapheme);
    }
    result.push('\u{2026}');
    result
}

/// Shorten a title longer than `max_len` grapheme clusters to its first
/// `max_len - 2` clusters followed by `..`. Returns `None` when the title
/// already fits.
pub fn shorten_title(title: &str, max_len: usize) -> Option<String> {
    if title.graphemes(true).count() <= max_len {
        return None;
    }
    let keep = max_len.saturating_sub(2);
    let mut short: String = title.graphemes(true).take(keep).collect();
    short.push_str("..");
    Some(short)
}

/// Pad `s` with spaces to exactly `cells` display cells (truncating if wider).
pub fn pad_to_width(s: &str, cells: usize) -> String {
    let fitted = truncate_to_width(s, cells);
    let w = display_width(&fitted);
    if w >= cells {
        return fitted;
    }
    let mut out = fitted;
    out.push_str(&" ".repeat(cells - w));
    out
}

/// Display width of a grapheme cluster.
fn grapheme_display_width(g: &str) -> usize {
    // Tab handling
    if g == "\t" {
        return 4;
    }
    UnicodeWidthStr::width(g)
}
