use std::sync::{Arc, Mutex, MutexGuard};

use crate::io::store::{
    BookmarkStore, ChangeEvent, ChangeListener, StoreError, Subscription, children_in, node_in,
    remove_in,
};
use crate::model::RawNode;
use crate::model::node::reindex;

/// An in-process bookmark store. Mutations notify listeners synchronously on
/// the calling thread.
pub struct MemoryStore {
    tree: Mutex<RawNode>,
    listeners: Mutex<Vec<Arc<ChangeListener>>>,
    available: Mutex<bool>,
}

impl MemoryStore {
    pub fn new(root: RawNode) -> Self {
        MemoryStore {
            tree: Mutex::new(root),
            listeners: Mutex::new(Vec::new()),
            available: Mutex::new(true),
        }
    }

    /// Toggle availability. While unavailable every read fails with
    /// [`StoreError::Unavailable`].
    pub fn set_available(&self, available: bool) {
        if let Ok(mut flag) = self.available.lock() {
            *flag = available;
        }
    }

    /// Number of listeners registered so far.
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().map(|l| l.len()).unwrap_or(0)
    }

    /// Append `node` under `parent_id`.
    pub fn insert(&self, parent_id: &str, mut node: RawNode) -> Result<(), StoreError> {
        {
            let mut tree = self.tree()?;
            let parent = tree
                .find_mut(parent_id)
                .ok_or_else(|| StoreError::NotFound(parent_id.to_string()))?;
            node.parent_id = Some(parent_id.to_string());
            let children = parent.children.get_or_insert_with(Vec::new);
            children.push(node);
            reindex(children);
        }
        self.notify(ChangeEvent::Created);
        Ok(())
    }

    /// Move `id` to the end of `new_parent_id`.
    pub fn move_node(&self, id: &str, new_parent_id: &str) -> Result<(), StoreError> {
        {
            let mut tree = self.tree()?;
            if tree.find(new_parent_id).is_none() {
                return Err(StoreError::NotFound(new_parent_id.to_string()));
            }
            if tree
                .find(id)
                .is_some_and(|n| n.find(new_parent_id).is_some())
            {
                return Err(StoreError::InvalidMove(id.to_string()));
            }
            let mut node = remove_in(&mut tree, id)?;
            node.parent_id = Some(new_parent_id.to_string());
            let Some(parent) = tree.find_mut(new_parent_id) else {
                return Err(StoreError::NotFound(new_parent_id.to_string()));
            };
            let children = parent.children.get_or_insert_with(Vec::new);
            children.push(node);
            reindex(children);
        }
        self.notify(ChangeEvent::Moved);
        Ok(())
    }

    /// Fire a change event without touching the tree.
    pub fn notify(&self, change: ChangeEvent) {
        let listeners: Vec<Arc<ChangeListener>> = match self.listeners.lock() {
            Ok(l) => l.clone(),
            Err(_) => return,
        };
        for listener in listeners {
            listener(change);
        }
    }

    fn tree(&self) -> Result<MutexGuard<'_, RawNode>, StoreError> {
        if !self.available.lock().map(|a| *a).unwrap_or(false) {
            return Err(StoreError::Unavailable("store is offline".to_string()));
        }
        self.tree
            .lock()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }
}

impl BookmarkStore for MemoryStore {
    fn fetch_tree(&self) -> Result<RawNode, StoreError> {
        Ok(self.tree()?.clone())
    }

    fn get_node(&self, id: &str) -> Result<RawNode, StoreError> {
        node_in(&*self.tree()?, id)
    }

    fn get_children(&self, id: &str) -> Result<Vec<RawNode>, StoreError> {
        children_in(&*self.tree()?, id)
    }

    fn subscribe(&self, listener: ChangeListener) -> Result<Subscription, StoreError> {
        self.listeners
            .lock()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))?
            .push(Arc::new(listener));
        Ok(Subscription::detached())
    }

    fn remove(&self, id: &str) -> Result<(), StoreError> {
        {
            let mut tree = self.tree()?;
            remove_in(&mut tree, id)?;
        }
        self.notify(ChangeEvent::Removed);
        Ok(())
    }
}
