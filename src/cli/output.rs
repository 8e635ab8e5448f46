use serde::Serialize;

use crate::model::{Entry, Panel, PanelTree, RootIndex};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct PanelsJson<'a> {
    pub panels: &'a [Panel],
    pub roots: &'a RootIndex,
}

#[derive(Serialize)]
pub struct FolderJson<'a> {
    pub panel: &'a Panel,
    pub state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<&'a str>,
}

#[derive(Serialize)]
pub struct OpenJson<'a> {
    pub panel: &'a str,
    pub urls: Vec<&'a str>,
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// One line per entry, indented under a `Title [id]` header.
pub fn format_panel(panel: &Panel) -> Vec<String> {
    let mut lines = vec![format!("{} [{}]", panel.title, panel.id)];
    if panel.entries.is_empty() {
        lines.push("  (empty)".to_string());
    }
    for entry in &panel.entries {
        lines.push(format!("  {}", format_entry(entry)));
    }
    lines
}

pub fn format_entry(entry: &Entry) -> String {
    match entry {
        Entry::Link { title, url, .. } => format!("{}  <{}>", title, url),
        Entry::Folder { id, title, .. } => format!("> {} [{}]", title, id),
        Entry::Separator => "---".to_string(),
        Entry::Back { target } => format!("<< Back [{}]", target),
    }
}

/// All panels separated by blank lines.
pub fn format_tree(tree: &PanelTree) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, panel) in tree.panels.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.extend(format_panel(panel));
    }
    if lines.is_empty() {
        lines.push("No bookmarks to show".to_string());
    }
    lines
}
