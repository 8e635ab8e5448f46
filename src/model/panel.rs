use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// One rendered row inside a panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Entry {
    /// A navigable bookmark
    Link {
        title: String,
        /// Full title when `title` was shortened
        #[serde(default, skip_serializing_if = "Option::is_none")]
        hover: Option<String>,
        favicon: String,
        url: String,
    },
    /// A subfolder; activating it drills the panel into `id`
    Folder {
        id: String,
        title: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        hover: Option<String>,
        favicon: String,
    },
    /// Visual divider, not activatable
    Separator,
    /// "<< Back" row; activating it drills the panel into `target`
    Back { target: String },
}

impl Entry {
    /// Folder id this entry navigates to, if it is a folder or back entry.
    pub fn target_folder(&self) -> Option<&str> {
        match self {
            Entry::Folder { id, .. } => Some(id),
            Entry::Back { target } => Some(target),
            _ => None,
        }
    }

    pub fn is_activatable(&self) -> bool {
        !matches!(self, Entry::Separator)
    }

    pub fn label(&self) -> &str {
        match self {
            Entry::Link { title, .. } | Entry::Folder { title, .. } => title,
            Entry::Separator => "",
            Entry::Back { .. } => "<< Back",
        }
    }
}

/// Rendered content for one folder, independently navigable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Panel {
    /// Id of the folder the panel was created for. Stays fixed while the
    /// panel drills into other folders.
    pub id: String,
    pub title: String,
    /// Header tooltip ("Open in tabs", plus the full title if shortened)
    pub hover: String,
    pub entries: Vec<Entry>,
}

impl Panel {
    /// URLs of all link entries, in display order.
    pub fn link_urls(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter_map(|e| match e {
                Entry::Link { url, .. } => Some(url.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// The whole top-level render: panels in display order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelTree {
    pub panels: Vec<Panel>,
}

impl PanelTree {
    pub fn find(&self, panel_id: &str) -> Option<&Panel> {
        self.panels.iter().find(|p| p.id == panel_id)
    }
}

/// Folder ids treated as top-level: showing one of them never adds a back entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RootIndex(BTreeSet<String>);

impl RootIndex {
    pub fn contains(&self, folder_id: &str) -> bool {
        self.0.contains(folder_id)
    }

    pub fn insert(&mut self, folder_id: impl Into<String>) {
        self.0.insert(folder_id.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for RootIndex {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        RootIndex(iter.into_iter().map(Into::into).collect())
    }
}
