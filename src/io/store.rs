use std::path::PathBuf;

use crate::model::RawNode;

/// Error type for bookmark store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("bookmark not found: {0}")]
    NotFound(String),
    #[error("bookmark store unavailable: {0}")]
    Unavailable(String),
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse bookmark tree: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("could not watch bookmark store: {0}")]
    Watch(#[from] notify::Error),
    #[error("the root node cannot be removed")]
    RootRemoval,
    #[error("cannot move {0} into its own subtree")]
    InvalidMove(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// What kind of mutation happened. Carries no diff: listeners are expected to
/// throw away whatever they derived from the store and fetch again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeEvent {
    Created,
    Removed,
    Changed,
    Moved,
    Reordered,
    ImportEnded,
}

/// Mutation callback. Listeners may be invoked from a watcher thread.
pub type ChangeListener = Box<dyn Fn(ChangeEvent) + Send + Sync>;

/// Keeps a subscription alive; dropping it stops delivery where the store
/// supports that.
pub struct Subscription {
    _guard: Option<Box<dyn Send>>,
}

impl Subscription {
    /// A subscription with nothing to tear down.
    pub fn detached() -> Self {
        Subscription { _guard: None }
    }

    /// A subscription that owns `guard` (a watcher, a thread handle, ...).
    pub fn holding<G: Send + 'static>(guard: G) -> Self {
        Subscription {
            _guard: Some(Box::new(guard)),
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("owns_guard", &self._guard.is_some())
            .finish()
    }
}

/// The host bookmark store.
///
/// `get_node` returns the node without its subtree; `get_children` returns
/// the direct children in order, each without its own subtree. Both fail with
/// [`StoreError::NotFound`] once the id is gone.
pub trait BookmarkStore: Send + Sync {
    /// The whole tree, starting at the implicit root.
    fn fetch_tree(&self) -> Result<RawNode, StoreError>;

    fn get_node(&self, id: &str) -> Result<RawNode, StoreError>;

    fn get_children(&self, id: &str) -> Result<Vec<RawNode>, StoreError>;

    /// Register a listener fired on create/remove/change/move/reorder/import.
    fn subscribe(&self, listener: ChangeListener) -> Result<Subscription, StoreError>;

    /// Remove a node and its subtree.
    fn remove(&self, id: &str) -> Result<(), StoreError>;
}

/// Lookup helpers shared by store implementations working on a full tree.
pub(crate) fn node_in(tree: &RawNode, id: &str) -> Result<RawNode, StoreError> {
    tree.find(id)
        .map(RawNode::shallow)
        .ok_or_else(|| StoreError::NotFound(id.to_string()))
}

pub(crate) fn children_in(tree: &RawNode, id: &str) -> Result<Vec<RawNode>, StoreError> {
    let node = tree
        .find(id)
        .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
    Ok(node
        .children
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(RawNode::shallow)
        .collect())
}

pub(crate) fn remove_in(tree: &mut RawNode, id: &str) -> Result<RawNode, StoreError> {
    if tree.id == id {
        return Err(StoreError::RootRemoval);
    }
    tree.detach(id)
        .ok_or_else(|| StoreError::NotFound(id.to_string()))
}
