use crate::model::{BookmarkNode, RootIndex};

/// Folder ids that count as top-level: every shelf (direct child of the
/// root) and every folder directly inside a shelf.
///
/// Exactly two levels below the root are inspected; deeper folders are never
/// top-level. Nodes that are not folders are ignored at both levels.
pub fn compute_root_index(root: &BookmarkNode) -> RootIndex {
    let mut index = RootIndex::default();
    for shelf in root.children().unwrap_or_default() {
        if !shelf.is_folder() {
            continue;
        }
        index.insert(shelf.id.clone());
        for child in shelf.children().unwrap_or_default() {
            if child.is_folder() {
                index.insert(child.id.clone());
            }
        }
    }
    index
}
