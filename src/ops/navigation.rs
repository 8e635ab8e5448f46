use std::collections::HashMap;
use std::sync::Arc;

use crate::io::store::{BookmarkStore, StoreError};
use crate::model::{Entry, Panel, PanelTree};
use crate::ops::classify::{classify, classify_all};
use crate::ops::context::BackgroundContext;
use crate::ops::render::{panel_header, render_entries};

/// Error type for panel navigation
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    #[error("folder not found: {0}")]
    NotFound(String),
    #[error("not a folder: {0}")]
    NotAFolder(String),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl NavError {
    fn from_store(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => NavError::NotFound(id),
            other => NavError::Store(other),
        }
    }
}

/// A panel showing a folder below the top level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelState {
    pub panel_id: String,
    pub current_folder_id: String,
    pub parent_folder_id: String,
}

/// Where a panel currently is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavState {
    TopLevel,
    Drilled { folder_id: String, parent_id: String },
}

/// Drives drill-down and back navigation for every panel of one page.
///
/// Each panel remembers only its current folder and that folder's parent;
/// going back is just another `change_folder` to the parent.
pub struct NavigationController {
    ctx: Arc<BackgroundContext>,
    states: HashMap<String, PanelState>,
    /// Content of panels that have navigated away from their initial render
    views: HashMap<String, Panel>,
}

impl NavigationController {
    pub fn new(ctx: Arc<BackgroundContext>) -> Self {
        NavigationController {
            ctx,
            states: HashMap::new(),
            views: HashMap::new(),
        }
    }

    pub fn state(&self, panel_id: &str) -> NavState {
        match self.states.get(panel_id) {
            Some(s) => NavState::Drilled {
                folder_id: s.current_folder_id.clone(),
                parent_id: s.parent_folder_id.clone(),
            },
            None => NavState::TopLevel,
        }
    }

    pub fn panel_state(&self, panel_id: &str) -> Option<&PanelState> {
        self.states.get(panel_id)
    }

    /// Show `folder_id` in panel `panel_id`.
    ///
    /// On success the panel lists the folder's children, plus a back entry
    /// to the folder's parent unless the folder is top-level. If the folder
    /// vanished in the meantime the panel keeps its previous content and
    /// state and [`NavError::NotFound`] is returned.
    pub fn change_folder(
        &mut self,
        store: &dyn BookmarkStore,
        panel_id: &str,
        folder_id: &str,
    ) -> Result<&Panel, NavError> {
        tracing::info!(panel = panel_id, folder = folder_id, "change folder");

        let fetched = store
            .get_node(folder_id)
            .and_then(|folder| Ok((folder, store.get_children(folder_id)?)));
        let (raw_folder, raw_children) = match fetched {
            Ok(pair) => pair,
            Err(e) => {
                tracing::warn!(
                    panel = panel_id,
                    folder = folder_id,
                    "folder change aborted: {}",
                    e
                );
                return Err(NavError::from_store(e));
            }
        };

        let folder = classify(&raw_folder)
            .filter(|f| f.is_folder() || f.parent_id.is_none())
            .ok_or_else(|| NavError::NotAFolder(folder_id.to_string()))?;
        let children = classify_all(&raw_children);
        let (_, root_index) = self.ctx.display(store)?;

        let opts = self.ctx.options();
        let mut panel = panel_header(&folder, opts);
        panel.id = panel_id.to_string();
        panel.entries = render_entries(&folder, &children, opts);

        match (&folder.parent_id, root_index.contains(folder_id)) {
            (Some(parent_id), false) => {
                panel.entries.push(Entry::Back {
                    target: parent_id.clone(),
                });
                self.states.insert(
                    panel_id.to_string(),
                    PanelState {
                        panel_id: panel_id.to_string(),
                        current_folder_id: folder_id.to_string(),
                        parent_folder_id: parent_id.clone(),
                    },
                );
            }
            _ => {
                self.states.remove(panel_id);
            }
        }

        self.views.insert(panel_id.to_string(), panel);
        Ok(&self.views[panel_id])
    }

    /// Activate an entry of `panel_id`. Folder and back entries navigate;
    /// links and separators do nothing here (`Ok(None)`).
    pub fn activate(
        &mut self,
        store: &dyn BookmarkStore,
        panel_id: &str,
        entry: &Entry,
    ) -> Result<Option<&Panel>, NavError> {
        match entry.target_folder() {
            Some(target) => {
                let target = target.to_string();
                self.change_folder(store, panel_id, &target).map(Some)
            }
            None => Ok(None),
        }
    }

    /// What panel `panel_id` shows right now: its navigated content, or its
    /// entry in the top-level render.
    pub fn panel<'a>(&'a self, panel_id: &str, tree: &'a PanelTree) -> Option<&'a Panel> {
        self.views.get(panel_id).or_else(|| tree.find(panel_id))
    }

    /// All panels of `tree` as currently shown.
    pub fn panels<'a>(&'a self, tree: &'a PanelTree) -> Vec<&'a Panel> {
        tree.panels
            .iter()
            .map(|p| self.views.get(&p.id).unwrap_or(p))
            .collect()
    }

    /// Forget all navigation, e.g. after the tree was rebuilt.
    pub fn reset(&mut self) {
        self.states.clear();
        self.views.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::memory_store::MemoryStore;
    use crate::model::RawNode;
    use crate::ops::render::RenderOptions;

    /// root → shelf "s" → folder "1" → folder "F" → folder "G"
    fn store() -> MemoryStore {
        MemoryStore::new(RawNode::root(vec![RawNode::folder(
            "s",
            "Bookmarks Bar",
            vec![RawNode::folder(
                "1",
                "Projects",
                vec![
                    RawNode::link("1a", "Tracker", "https://tracker.example"),
                    RawNode::folder(
                        "F",
                        "Frontend",
                        vec![
                            RawNode::link("Fa", "", "https://react.dev"),
                            RawNode::folder("G", "Graveyard", vec![]),
                        ],
                    ),
                ],
            )],
        )]))
    }

    fn controller() -> NavigationController {
        NavigationController::new(BackgroundContext::new(RenderOptions::default()))
    }

    #[test]
    fn drill_into_non_top_level_folder_adds_back_entry() {
        let store = store();
        let mut nav = controller();

        let panel = nav.change_folder(&store, "1", "F").unwrap();
        assert_eq!(panel.id, "1");
        assert_eq!(panel.title, "Frontend");
        assert_eq!(panel.entries.len(), 3);
        assert_eq!(panel.entries[0].label(), "react.dev");
        assert_eq!(panel.entries[1].target_folder(), Some("G"));
        assert_eq!(
            panel.entries[2],
            Entry::Back {
                target: "1".into()
            }
        );
        assert_eq!(
            nav.state("1"),
            NavState::Drilled {
                folder_id: "F".into(),
                parent_id: "1".into()
            }
        );
    }

    #[test]
    fn back_entry_is_a_plain_folder_change() {
        let store = store();
        let mut nav = controller();
        let back = nav.change_folder(&store, "1", "F").unwrap().entries[2].clone();

        let panel = nav.activate(&store, "1", &back).unwrap().unwrap();
        assert_eq!(panel.title, "Projects");
        assert!(
            !panel
                .entries
                .iter()
                .any(|e| matches!(e, Entry::Back { .. }))
        );
        assert_eq!(nav.state("1"), NavState::TopLevel);
        assert!(nav.panel_state("1").is_none());
    }

    #[test]
    fn nested_drill_keeps_only_parent_pointer() {
        let store = store();
        let mut nav = controller();
        nav.change_folder(&store, "1", "F").unwrap();
        let panel = nav.change_folder(&store, "1", "G").unwrap();

        // header-only folder: just the back entry
        assert_eq!(
            panel.entries,
            vec![Entry::Back {
                target: "F".into()
            }]
        );
        let state = nav.panel_state("1").unwrap();
        assert_eq!(state.current_folder_id, "G");
        assert_eq!(state.parent_folder_id, "F");
    }

    #[test]
    fn vanished_folder_keeps_previous_panel() {
        let store = store();
        let mut nav = controller();
        let before = nav.change_folder(&store, "1", "F").unwrap().clone();

        store.remove("G").unwrap();
        let err = nav.change_folder(&store, "1", "G").unwrap_err();
        assert!(matches!(err, NavError::NotFound(id) if id == "G"));

        let tree = PanelTree::default();
        assert_eq!(nav.panel("1", &tree), Some(&before));
        assert_eq!(
            nav.state("1"),
            NavState::Drilled {
                folder_id: "F".into(),
                parent_id: "1".into()
            }
        );
    }

    #[test]
    fn links_and_separators_do_not_navigate() {
        let store = store();
        let mut nav = controller();
        assert!(
            nav.activate(&store, "1", &Entry::Separator)
                .unwrap()
                .is_none()
        );
        assert_eq!(nav.state("1"), NavState::TopLevel);
    }

    #[test]
    fn link_id_is_not_a_folder() {
        let store = store();
        let mut nav = controller();
        assert!(matches!(
            nav.change_folder(&store, "1", "1a"),
            Err(NavError::NotAFolder(_))
        ));
    }

    #[test]
    fn panels_overlay_navigated_content() {
        let store = store();
        let ctx = BackgroundContext::new(RenderOptions::default());
        let (tree, _) = ctx.display(&store).unwrap();
        let mut nav = NavigationController::new(Arc::clone(&ctx));

        assert_eq!(nav.panels(&tree)[0].title, "Projects");
        nav.change_folder(&store, "1", "F").unwrap();
        assert_eq!(nav.panels(&tree)[0].title, "Frontend");

        nav.reset();
        assert_eq!(nav.panels(&tree)[0].title, "Projects");
        assert_eq!(nav.state("1"), NavState::TopLevel);
    }
}
