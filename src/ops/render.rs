use crate::model::config::AppConfig;
use crate::model::{BookmarkNode, Entry, NodeKind, Panel, PanelTree};
use crate::ops::classify::is_ignored_link;
use crate::ops::favicon::FaviconResolver;
use crate::util::unicode::shorten_title;

/// Hover text on every panel header
pub const OPEN_IN_TABS: &str = "Open in tabs";

/// Everything the renderer needs besides the nodes themselves
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub max_title_length: usize,
    pub ignored_schemes: Vec<String>,
    pub favicons: FaviconResolver,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions::from_config(&AppConfig::default())
    }
}

impl RenderOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        RenderOptions {
            max_title_length: config.display.max_title_length,
            ignored_schemes: config.display.ignored_schemes.clone(),
            favicons: FaviconResolver::new(&config.favicon),
        }
    }

    fn is_ignored(&self, url: &str) -> bool {
        is_ignored_link(url, &self.ignored_schemes)
    }

    fn is_rendered_link(&self, node: &BookmarkNode) -> bool {
        node.url().is_some_and(|u| !self.is_ignored(u))
    }
}

/// Strip the scheme and a leading `//` from a url:
/// `http://www.example.com/a` → `www.example.com/a`.
pub fn remove_scheme(url: &str) -> &str {
    let rest = match url.find(':') {
        Some(i) => &url[i + 1..],
        None => url,
    };
    rest.strip_prefix("//").unwrap_or(rest)
}

/// Display title and optional full-title hover for a node.
///
/// An empty title falls back to the url without its scheme; a title longer
/// than the limit is shortened and the original kept as hover text.
pub fn display_title(node: &BookmarkNode, max_len: usize) -> (String, Option<String>) {
    if node.title.is_empty() {
        return (remove_scheme(node.url().unwrap_or_default()).to_string(), None);
    }
    match shorten_title(&node.title, max_len) {
        Some(short) => (short, Some(node.title.clone())),
        None => (node.title.clone(), None),
    }
}

/// An empty panel for `folder`: header only.
pub fn panel_header(folder: &BookmarkNode, opts: &RenderOptions) -> Panel {
    let (title, full) = display_title(folder, opts.max_title_length);
    let hover = match full {
        Some(full) => format!("{}: {}", OPEN_IN_TABS, full),
        None => OPEN_IN_TABS.to_string(),
    };
    Panel {
        id: folder.id.clone(),
        title,
        hover,
        entries: Vec::new(),
    }
}

/// One entry per child of `folder`, in input order. Ignored links are left
/// out; so is anything that is not a link, folder or separator (logged).
pub fn render_entries(
    folder: &BookmarkNode,
    children: &[BookmarkNode],
    opts: &RenderOptions,
) -> Vec<Entry> {
    children
        .iter()
        .filter_map(|child| render_entry(folder, child, opts))
        .collect()
}

fn render_entry(folder: &BookmarkNode, child: &BookmarkNode, opts: &RenderOptions) -> Option<Entry> {
    match &child.kind {
        NodeKind::Link { url } => {
            if opts.is_ignored(url) {
                return None;
            }
            let (title, hover) = display_title(child, opts.max_title_length);
            Some(Entry::Link {
                title,
                hover,
                favicon: opts.favicons.resolve(Some(url)),
                url: url.clone(),
            })
        }
        NodeKind::Folder { .. } => {
            let (title, hover) = display_title(child, opts.max_title_length);
            Some(Entry::Folder {
                id: child.id.clone(),
                title,
                hover,
                favicon: opts.favicons.resolve(None),
            })
        }
        NodeKind::Separator => Some(Entry::Separator),
        NodeKind::Root { .. } => {
            tracing::warn!(
                folder = %folder.id,
                child = %child.id,
                "skipping entry of unexpected kind {}",
                child.tag()
            );
            None
        }
    }
}

/// Lay out the whole tree as top-level panels.
///
/// For each shelf (direct child of the root), in order:
/// - the first rendered link materializes the shelf's own panel at that
///   point in the output; later links and separators join it, separators
///   before it are dropped;
/// - every folder becomes a sibling panel holding its own rendered children
///   (subfolders appear as folder entries).
///
/// A shelf holding only folders, or only ignored links, gets no panel of its
/// own. Folders with no children render header-only panels.
pub fn render_tree(root: &BookmarkNode, opts: &RenderOptions) -> PanelTree {
    let mut panels: Vec<Panel> = Vec::new();

    for shelf in root.children().unwrap_or_default() {
        let Some(children) = shelf.children() else {
            continue;
        };
        // Index of the shelf's own panel in `panels`, once materialized
        let mut shelf_panel: Option<usize> = None;

        for child in children {
            match &child.kind {
                NodeKind::Link { .. } => {
                    if !opts.is_rendered_link(child) {
                        continue;
                    }
                    let idx = *shelf_panel.get_or_insert_with(|| {
                        panels.push(panel_header(shelf, opts));
                        panels.len() - 1
                    });
                    if let Some(entry) = render_entry(shelf, child, opts) {
                        panels[idx].entries.push(entry);
                    }
                }
                NodeKind::Separator => {
                    if let Some(idx) = shelf_panel {
                        panels[idx].entries.push(Entry::Separator);
                    }
                }
                NodeKind::Folder { children } => {
                    let mut panel = panel_header(child, opts);
                    if let Some(grandchildren) = children {
                        panel.entries = render_entries(child, grandchildren, opts);
                    }
                    panels.push(panel);
                }
                NodeKind::Root { .. } => {
                    tracing::warn!(shelf = %shelf.id, child = %child.id, "nested root skipped");
                }
            }
        }
    }

    PanelTree { panels }
}
