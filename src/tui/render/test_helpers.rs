use std::sync::Arc;

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::io::memory_store::MemoryStore;
use crate::model::{AppConfig, RawNode};
use crate::ops::context::BackgroundContext;
use crate::ops::render::RenderOptions;
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// Two shelves: "Bar" with a link, a separator and a "Reading" folder
/// (which nests "Deep"), and "Other" with one link. Renders as panels
/// "1", "12" and "2".
pub fn sample_tree() -> RawNode {
    RawNode::root(vec![
        RawNode::folder(
            "1",
            "Bar",
            vec![
                RawNode::link("10", "Rust", "https://www.rust-lang.org/"),
                RawNode::separator("11"),
                RawNode::folder(
                    "12",
                    "Reading",
                    vec![
                        RawNode::link("120", "Blog", "https://blog.rust-lang.org/"),
                        RawNode::folder(
                            "121",
                            "Deep",
                            vec![RawNode::link("1210", "Paper", "https://arxiv.org/")],
                        ),
                    ],
                ),
            ],
        ),
        RawNode::folder(
            "2",
            "Other",
            vec![RawNode::link("20", "Docs", "https://docs.rs/")],
        ),
    ])
}

/// An attached, loaded app over [`sample_tree`] in a memory store.
pub fn sample_app() -> App {
    let config = AppConfig::default();
    let ctx = BackgroundContext::new(RenderOptions::from_config(&config));
    let mut app = App::new(
        Box::new(MemoryStore::new(sample_tree())),
        Arc::clone(&ctx),
        &config,
    );
    ctx.attach(app.store.as_ref()).unwrap();
    app.reload();
    app
}
