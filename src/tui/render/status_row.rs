use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::Entry;
use crate::tui::app::App;
use crate::util::unicode::display_width;

const KEY_HINTS: &str = "hjkl move  Enter open  o open all  r reload  q quit";

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let mut spans = Vec::new();
    if let Some(status) = &app.status {
        spans.push(Span::styled(
            status.clone(),
            Style::default().fg(app.theme.yellow).bg(bg),
        ));
    } else if let Some(text) = focus_description(app) {
        spans.push(Span::styled(text, Style::default().fg(app.theme.dim).bg(bg)));
    }

    if app.show_key_hints {
        let content_width: usize = spans.iter().map(|s| display_width(&s.content)).sum();
        let hint_width = display_width(KEY_HINTS);
        if content_width + hint_width < width {
            let padding = width - content_width - hint_width;
            spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
            spans.push(Span::styled(
                KEY_HINTS,
                Style::default().fg(app.theme.dim).bg(bg),
            ));
        }
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

/// Hover text of the focused row: the full title of a shortened entry, the
/// url of a link, or the header's "Open in tabs" hint.
fn focus_description(app: &App) -> Option<String> {
    let panel = app.current_panel()?;
    let Some(entry) = app.current_entry() else {
        return Some(panel.hover.clone());
    };
    match entry {
        Entry::Link { hover, url, .. } => Some(match hover {
            Some(full) => format!("{}  {}", full, url),
            None => url.clone(),
        }),
        Entry::Folder { hover, .. } => hover.clone(),
        Entry::Back { .. } | Entry::Separator => None,
    }
}
