use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::model::{Entry, Panel};
use crate::tui::app::App;
use crate::util::unicode::{pad_to_width, truncate_to_width};

/// Outer width of one panel, borders included
pub const PANEL_WIDTH: u16 = 32;

/// Where a panel lands in the masonry grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub column: usize,
    /// Row offset from the top of the grid
    pub y: u16,
}

/// Rows a panel needs: one per entry (one for an empty panel) plus borders.
pub fn panel_height(panel: &Panel) -> u16 {
    u16::try_from(panel.entries.len().max(1))
        .unwrap_or(u16::MAX)
        .saturating_add(2)
}

/// Masonry placement: each panel goes to the currently shortest column,
/// leftmost on ties.
pub fn layout_panels(heights: &[u16], columns: usize) -> Vec<Slot> {
    let columns = columns.max(1);
    let mut bottoms = vec![0u16; columns];
    heights
        .iter()
        .map(|&h| {
            let column = (0..columns).min_by_key(|&c| (bottoms[c], c)).unwrap_or(0);
            let slot = Slot {
                column,
                y: bottoms[column],
            };
            bottoms[column] = bottoms[column].saturating_add(h);
            slot
        })
        .collect()
}

/// Render every visible panel in a masonry grid, scrolled so the focused
/// panel is on screen.
pub fn render_panels_view(frame: &mut Frame, app: &mut App, area: Rect) {
    if let Some(reason) = &app.not_ready {
        let msg = Paragraph::new(format!("Bookmarks not ready: {}", reason))
            .style(Style::default().fg(app.theme.red).bg(app.theme.background))
            .alignment(Alignment::Center);
        frame.render_widget(msg, centered_row(area));
        return;
    }

    let heights: Vec<u16> = app.visible_panels().iter().map(|p| panel_height(p)).collect();
    if heights.is_empty() {
        let msg = Paragraph::new("No bookmarks to show")
            .style(Style::default().fg(app.theme.dim).bg(app.theme.background))
            .alignment(Alignment::Center);
        frame.render_widget(msg, centered_row(area));
        return;
    }

    let columns = (area.width / PANEL_WIDTH).max(1) as usize;
    let slots = layout_panels(&heights, columns);

    // Keep the focused panel in view
    let focus = app.cursor.panel.min(slots.len() - 1);
    let top = slots[focus].y;
    let bottom = top.saturating_add(heights[focus]);
    if top < app.scroll {
        app.scroll = top;
    } else if bottom > app.scroll.saturating_add(area.height) {
        app.scroll = bottom.saturating_sub(area.height).min(top);
    }

    let app = &*app;
    for (i, panel) in app.visible_panels().into_iter().enumerate() {
        let slot = slots[i];
        if slot.y < app.scroll {
            continue;
        }
        let y = slot.y - app.scroll;
        if y.saturating_add(2) > area.height {
            continue;
        }
        let x = slot.column as u16 * PANEL_WIDTH;
        if x + PANEL_WIDTH > area.width && slot.column > 0 {
            continue;
        }
        let rect = Rect {
            x: area.x + x,
            y: area.y + y,
            width: PANEL_WIDTH.min(area.width - x),
            height: heights[i].min(area.height - y),
        };
        render_panel(frame, app, panel, i == app.cursor.panel, rect);
    }
}

fn render_panel(frame: &mut Frame, app: &App, panel: &Panel, focused: bool, area: Rect) {
    let theme = &app.theme;
    let bg = theme.background;
    let inner_width = area.width.saturating_sub(2) as usize;

    let border_style = if focused {
        Style::default().fg(theme.selection_border).bg(bg)
    } else {
        Style::default().fg(theme.dim).bg(bg)
    };
    let header_focused = focused && app.cursor.entry.is_none();
    let title_style = if header_focused {
        Style::default()
            .fg(theme.text_bright)
            .bg(theme.selection_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(theme.text_bright)
            .bg(bg)
            .add_modifier(Modifier::BOLD)
    };
    let title = truncate_to_width(&panel.title, inner_width.saturating_sub(2));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(format!(" {} ", title), title_style));

    let lines: Vec<Line> = if panel.entries.is_empty() {
        vec![Line::from(Span::styled(
            "(empty)",
            Style::default().fg(theme.dim).bg(bg),
        ))]
    } else {
        panel
            .entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| {
                let selected = focused && app.cursor.entry == Some(idx);
                entry_line(app, entry, selected, inner_width)
            })
            .collect()
    };

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn entry_line(app: &App, entry: &Entry, selected: bool, width: usize) -> Line<'static> {
    let theme = &app.theme;
    let (text, mut style) = match entry {
        Entry::Link { title, .. } => (
            format!("  {}", title),
            Style::default().fg(theme.kind_color("link")),
        ),
        Entry::Folder { title, .. } => (
            format!("\u{25B8} {}", title),
            Style::default()
                .fg(theme.kind_color("folder"))
                .add_modifier(Modifier::BOLD),
        ),
        Entry::Back { .. } => (
            entry.label().to_string(),
            Style::default().fg(theme.kind_color("back")),
        ),
        Entry::Separator => ("\u{2500}".repeat(width), Style::default().fg(theme.dim)),
    };
    style = if selected {
        style.fg(theme.text_bright).bg(theme.selection_bg)
    } else {
        style.bg(theme.background)
    };
    let text = if selected {
        pad_to_width(&text, width)
    } else {
        truncate_to_width(&text, width)
    };
    Line::from(Span::styled(text, style))
}

/// A one-row rect in the vertical middle of `area`.
fn centered_row(area: Rect) -> Rect {
    Rect {
        x: area.x,
        y: area.y + area.height / 2,
        width: area.width,
        height: area.height.min(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::Cursor;
    use crate::tui::render::test_helpers::{TERM_H, TERM_W, render_to_string, sample_app};

    #[test]
    fn masonry_fills_shortest_column() {
        let slots = layout_panels(&[5, 3, 4, 2], 2);
        assert_eq!(
            slots,
            vec![
                Slot { column: 0, y: 0 },
                Slot { column: 1, y: 0 },
                Slot { column: 1, y: 3 },
                Slot { column: 0, y: 5 },
            ]
        );
    }

    #[test]
    fn oversized_panels_saturate() {
        let huge = Panel {
            id: "1".into(),
            title: "Huge".into(),
            hover: "Open in tabs".into(),
            entries: vec![Entry::Separator; 70_000],
        };
        assert_eq!(panel_height(&huge), u16::MAX);

        let slots = layout_panels(&[u16::MAX, u16::MAX, 3], 1);
        assert_eq!(slots[1], Slot { column: 0, y: u16::MAX });
        assert_eq!(slots[2], Slot { column: 0, y: u16::MAX });
    }

    #[test]
    fn focus_on_far_panel_does_not_overflow() {
        let mut app = sample_app();
        let huge = Panel {
            id: "huge".into(),
            title: "Huge".into(),
            hover: "Open in tabs".into(),
            entries: vec![Entry::Separator; 70_000],
        };
        app.tree.as_mut().unwrap().panels.insert(0, huge);
        app.cursor = Cursor {
            panel: 1,
            entry: None,
        };
        let out = render_to_string(PANEL_WIDTH, 6, |frame, area| {
            render_panels_view(frame, &mut app, area);
        });
        assert!(app.scroll > 0);
        assert!(!out.contains(" Huge "));
    }

    #[test]
    fn single_column_stacks() {
        let slots = layout_panels(&[3, 3], 0);
        assert_eq!(slots[1], Slot { column: 0, y: 3 });
    }

    #[test]
    fn renders_panels_side_by_side() {
        let mut app = sample_app();
        let out = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_panels_view(frame, &mut app, area);
        });
        let first = out.lines().next().unwrap();
        assert!(first.contains(" Bar "));
        assert!(first.contains(" Reading "));
        assert!(out.contains("  Rust"));
        assert!(out.contains("\u{25B8} Deep"));
        assert!(out.contains(" Other "));
        assert!(out.contains("  Docs"));
    }

    #[test]
    fn drilled_panel_shows_back_row() {
        let mut app = sample_app();
        app.nav
            .change_folder(app.store.as_ref(), "12", "121")
            .unwrap();
        let out = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_panels_view(frame, &mut app, area);
        });
        assert!(out.contains(" Deep "));
        assert!(out.contains("  Paper"));
        assert!(out.contains("<< Back"));
        assert!(!out.contains(" Reading "));
    }

    #[test]
    fn not_ready_message_replaces_panels() {
        let mut app = sample_app();
        app.not_ready = Some("bookmark store unavailable".into());
        let out = render_to_string(TERM_W, 5, |frame, area| {
            render_panels_view(frame, &mut app, area);
        });
        assert!(out.contains("Bookmarks not ready: bookmark store unavailable"));
        assert!(!out.contains("Rust"));
    }

    #[test]
    fn scrolls_to_focused_panel() {
        let mut app = sample_app();
        app.cursor = Cursor {
            panel: 2,
            entry: None,
        };
        // One column, four rows: only one panel fits at a time
        let out = render_to_string(PANEL_WIDTH, 4, |frame, area| {
            render_panels_view(frame, &mut app, area);
        });
        assert!(app.scroll > 0);
        assert!(out.contains(" Other "));
        assert!(!out.contains(" Bar "));
    }
}
