use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::io::store::{
    BookmarkStore, ChangeEvent, ChangeListener, StoreError, Subscription, children_in, node_in,
    remove_in,
};
use crate::io::watcher::StoreWatcher;
use crate::model::RawNode;

/// On-disk shape: either `getTree()` output (an array holding the root) or
/// the bare root object. Writes keep whichever shape was read.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum TreeFile {
    Array(Vec<RawNode>),
    Single(RawNode),
}

impl TreeFile {
    fn root_mut(&mut self) -> Option<&mut RawNode> {
        match self {
            TreeFile::Array(roots) => roots.first_mut(),
            TreeFile::Single(root) => Some(root),
        }
    }

    fn into_root(self) -> Option<RawNode> {
        match self {
            TreeFile::Array(roots) => roots.into_iter().next(),
            TreeFile::Single(root) => Some(root),
        }
    }
}

type SharedListener = Arc<ChangeListener>;
type ListenerList = Arc<Mutex<Vec<SharedListener>>>;

/// Keeps a listener in the store's local list; dropping it (with the
/// owning [`Subscription`]) takes the listener out again.
struct LocalRegistration {
    listeners: ListenerList,
    listener: SharedListener,
}

impl Drop for LocalRegistration {
    fn drop(&mut self) {
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.retain(|l| !Arc::ptr_eq(l, &self.listener));
        }
    }
}

/// A bookmark store backed by a JSON file. Every read re-parses the file, so
/// callers always see a freshly built tree.
pub struct JsonFileStore {
    path: PathBuf,
    listeners: ListenerList,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore {
            path: path.into(),
            listeners: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Listeners whose subscription is still alive.
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().map(|l| l.len()).unwrap_or(0)
    }

    fn read_file(&self) -> Result<TreeFile, StoreError> {
        let text = fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                StoreError::Unavailable(format!("{} does not exist", self.path.display()))
            }
            _ => StoreError::Read {
                path: self.path.clone(),
                source: e,
            },
        })?;
        Ok(serde_json::from_str(&text)?)
    }

    fn read_root(&self) -> Result<RawNode, StoreError> {
        self.read_file()?
            .into_root()
            .ok_or_else(|| StoreError::Unavailable("bookmark file holds no root".to_string()))
    }

    fn notify_local(&self, change: ChangeEvent) {
        let listeners: Vec<SharedListener> = match self.listeners.lock() {
            Ok(l) => l.clone(),
            Err(_) => return,
        };
        for listener in listeners {
            listener(change);
        }
    }
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

impl BookmarkStore for JsonFileStore {
    fn fetch_tree(&self) -> Result<RawNode, StoreError> {
        self.read_root()
    }

    fn get_node(&self, id: &str) -> Result<RawNode, StoreError> {
        node_in(&self.read_root()?, id)
    }

    fn get_children(&self, id: &str) -> Result<Vec<RawNode>, StoreError> {
        children_in(&self.read_root()?, id)
    }

    /// Listeners hear about external edits through the file watcher and
    /// about this store's own `remove` immediately. A local removal is
    /// therefore usually reported twice, once more when the watcher sees the
    /// rewrite; listeners must treat events as idempotent.
    fn subscribe(&self, listener: ChangeListener) -> Result<Subscription, StoreError> {
        let listener: SharedListener = Arc::new(listener);
        let for_watcher = Arc::clone(&listener);
        let watcher = StoreWatcher::start(&self.path, move |change| for_watcher(change))?;
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.push(Arc::clone(&listener));
        }
        let registration = LocalRegistration {
            listeners: Arc::clone(&self.listeners),
            listener,
        };
        Ok(Subscription::holding((watcher, registration)))
    }

    fn remove(&self, id: &str) -> Result<(), StoreError> {
        let mut file = self.read_file()?;
        let root = file
            .root_mut()
            .ok_or_else(|| StoreError::Unavailable("bookmark file holds no root".to_string()))?;
        let removed = remove_in(root, id)?;
        tracing::info!(id = %removed.id, title = %removed.title, "removed bookmark");

        let content = serde_json::to_string_pretty(&file)?;
        atomic_write(&self.path, content.as_bytes())?;
        self.notify_local(ChangeEvent::Removed);
        Ok(())
    }
}
