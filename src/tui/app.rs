use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::file_store::JsonFileStore;
use crate::io::store::{BookmarkStore, StoreError};
use crate::model::{AppConfig, Entry, Panel, PanelTree};
use crate::ops::context::BackgroundContext;
use crate::ops::navigation::{NavError, NavigationController};
use crate::ops::render::RenderOptions;
use crate::ops::tabs::{CollectingOpener, open_in_tabs};

use super::input;
use super::render;
use super::theme::Theme;

/// Which panel and which row inside it has focus
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub panel: usize,
    /// `None` = the panel header (activating it opens all links)
    pub entry: Option<usize>,
}

/// Main application state
pub struct App {
    pub store: Box<dyn BookmarkStore>,
    pub ctx: Arc<BackgroundContext>,
    pub nav: NavigationController,
    /// Last good render; `None` until the store has answered once
    pub tree: Option<PanelTree>,
    /// Cache generation `tree` was displayed at
    pub shown_generation: Option<u64>,
    pub cursor: Cursor,
    /// First panel row shown (vertical scroll)
    pub scroll: u16,
    pub theme: Theme,
    pub show_key_hints: bool,
    pub status: Option<String>,
    /// Why the tree could not be loaded, shown instead of panels
    pub not_ready: Option<String>,
    pub should_quit: bool,
    /// Urls handed off when leaving (header or link activation)
    pub exit_urls: Vec<String>,
}

impl App {
    pub fn new(
        store: Box<dyn BookmarkStore>,
        ctx: Arc<BackgroundContext>,
        config: &AppConfig,
    ) -> Self {
        App {
            store,
            nav: NavigationController::new(Arc::clone(&ctx)),
            ctx,
            tree: None,
            shown_generation: None,
            cursor: Cursor::default(),
            scroll: 0,
            theme: Theme::from_config(&config.ui),
            show_key_hints: config.ui.show_key_hints,
            status: None,
            not_ready: None,
            should_quit: false,
            exit_urls: Vec::new(),
        }
    }

    /// Apply the result of a display attempt started at cache `generation`.
    pub fn apply_load(&mut self, generation: u64, result: Result<PanelTree, StoreError>) {
        match result {
            Ok(tree) => {
                self.nav.reset();
                self.tree = Some(tree);
                self.shown_generation = Some(generation);
                self.not_ready = None;
                self.clamp_cursor();
            }
            Err(e) => {
                tracing::error!("failed to load bookmarks: {}", e);
                if self.tree.is_some() {
                    self.status = Some(format!("reload failed: {}", e));
                } else {
                    self.not_ready = Some(e.to_string());
                }
            }
        }
    }

    /// Redisplay from the shared context (cached unless invalidated).
    pub fn reload(&mut self) {
        let generation = self.ctx.generation();
        let result = self.ctx.display(self.store.as_ref()).map(|(tree, _)| tree);
        self.apply_load(generation, result);
    }

    /// Called once per event loop turn: pick up store changes.
    ///
    /// Compares generations rather than cache validity: a drill-down may
    /// already have refilled the cache after a mutation, leaving `tree`
    /// stale while the cache looks valid.
    pub fn tick(&mut self) {
        if self.tree.is_some() && self.shown_generation != Some(self.ctx.generation()) {
            tracing::debug!("render invalidated; redisplaying");
            self.reload();
            self.status = Some("Bookmarks changed".into());
        }
    }

    /// Panels as currently shown, navigation applied.
    pub fn visible_panels(&self) -> Vec<&Panel> {
        match &self.tree {
            Some(tree) => self.nav.panels(tree),
            None => Vec::new(),
        }
    }

    pub fn current_panel(&self) -> Option<&Panel> {
        self.visible_panels().get(self.cursor.panel).copied()
    }

    pub fn current_entry(&self) -> Option<&Entry> {
        let idx = self.cursor.entry?;
        self.current_panel()?.entries.get(idx)
    }

    pub fn move_panel(&mut self, delta: isize) {
        let count = self.visible_panels().len();
        if count == 0 {
            return;
        }
        let next = (self.cursor.panel as isize + delta).clamp(0, count as isize - 1) as usize;
        if next != self.cursor.panel {
            self.cursor = Cursor {
                panel: next,
                entry: None,
            };
        }
    }

    /// Move within the focused panel, skipping separators. Moving up from
    /// the first activatable row lands on the header.
    pub fn move_entry(&mut self, delta: isize) {
        let Some(panel) = self.current_panel() else {
            return;
        };
        let activatable: Vec<usize> = panel
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_activatable())
            .map(|(i, _)| i)
            .collect();

        let next = match (self.cursor.entry, delta.signum()) {
            (None, 1) => activatable.first().copied(),
            (None, _) => None,
            (Some(cur), 1) => activatable
                .iter()
                .copied()
                .find(|&i| i > cur)
                .or(Some(cur)),
            (Some(cur), -1) => activatable.iter().copied().rev().find(|&i| i < cur),
            (Some(cur), _) => Some(cur),
        };
        self.cursor.entry = next;
    }

    /// Activate the focused row: the header opens every link, a link opens
    /// itself, folders and back rows navigate the panel.
    pub fn activate(&mut self) {
        let Some(panel) = self.current_panel() else {
            return;
        };
        let panel_id = panel.id.clone();
        let entry = match self.cursor.entry {
            None => {
                self.open_panel_in_tabs();
                return;
            }
            Some(idx) => match panel.entries.get(idx) {
                Some(entry) => entry.clone(),
                None => return,
            },
        };

        match &entry {
            Entry::Link { url, .. } => {
                self.exit_urls = vec![url.clone()];
                self.should_quit = true;
            }
            Entry::Folder { .. } | Entry::Back { .. } => {
                match self.nav.activate(self.store.as_ref(), &panel_id, &entry) {
                    Ok(_) => {
                        self.cursor.entry = None;
                        self.status = None;
                    }
                    Err(NavError::NotFound(id)) => {
                        self.status = Some(format!("folder {} no longer exists", id));
                    }
                    Err(e) => self.status = Some(e.to_string()),
                }
            }
            Entry::Separator => {}
        }
    }

    /// Open every link of the focused panel and leave.
    pub fn open_panel_in_tabs(&mut self) {
        let Some(panel) = self.current_panel() else {
            return;
        };
        let mut opener = CollectingOpener::default();
        let count = open_in_tabs(panel, &mut opener);
        if count == 0 {
            self.status = Some("no links in this panel".into());
            return;
        }
        self.exit_urls = opener.urls;
        self.should_quit = opener.closed;
    }

    fn clamp_cursor(&mut self) {
        let count = self.visible_panels().len();
        if count == 0 {
            self.cursor = Cursor::default();
            return;
        }
        self.cursor.panel = self.cursor.panel.min(count - 1);
        let len = self.current_panel().map_or(0, |p| p.entries.len());
        if self.cursor.entry.is_some_and(|i| i >= len) {
            self.cursor.entry = None;
        }
    }
}

/// Run the TUI application
pub fn run(config: AppConfig, file: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let store = JsonFileStore::new(file);
    let ctx = BackgroundContext::new(RenderOptions::from_config(&config));
    let mut app = App::new(Box::new(store), Arc::clone(&ctx), &config);

    if let Err(e) = ctx.attach(app.store.as_ref()) {
        tracing::warn!("not watching bookmarks: {}", e);
        app.status = Some(format!("not watching for changes: {}", e));
    }
    let delay = Duration::from_millis(config.load.retry_delay_ms);
    let generation = ctx.generation();
    let initial = ctx
        .load_with_retry(app.store.as_ref(), delay)
        .map(|(tree, _)| tree);
    app.apply_load(generation, initial);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    for url in &app.exit_urls {
        println!("{}", url);
    }

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        app.tick();
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
