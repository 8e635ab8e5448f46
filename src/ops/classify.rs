use crate::model::{BookmarkNode, NodeKind, RawNode};

/// Classify a raw node (and its fetched subtree) into a tagged node.
///
/// Rules, first match wins:
/// - a node with a url is a link;
/// - a node tagged "separator" is a separator;
/// - a node with children, or tagged "folder", is a folder (the implicit
///   root when it has no parent);
/// - anything else is logged and skipped (`None`).
///
/// Unclassifiable descendants are dropped from their parent's children; they
/// never abort classification of the rest of the tree.
pub fn classify(raw: &RawNode) -> Option<BookmarkNode> {
    let kind = if let Some(url) = &raw.url {
        NodeKind::Link { url: url.clone() }
    } else if raw.node_type.as_deref() == Some("separator") {
        NodeKind::Separator
    } else if raw.children.is_some() || raw.node_type.as_deref() == Some("folder") {
        let children = raw
            .children
            .as_ref()
            .map(|c| c.iter().filter_map(classify).collect::<Vec<_>>());
        if raw.parent_id.is_none() {
            NodeKind::Root {
                children: children.unwrap_or_default(),
            }
        } else {
            NodeKind::Folder { children }
        }
    } else {
        tracing::warn!(
            id = %raw.id,
            node_type = raw.node_type.as_deref().unwrap_or("<none>"),
            "skipping bookmark node of unknown kind"
        );
        return None;
    };

    Some(BookmarkNode {
        id: raw.id.clone(),
        parent_id: raw.parent_id.clone(),
        title: raw.title.clone(),
        kind,
    })
}

/// Classify a list of sibling nodes, keeping order and dropping unknown ones.
pub fn classify_all(raw: &[RawNode]) -> Vec<BookmarkNode> {
    raw.iter().filter_map(classify).collect()
}

/// True if `url` starts with one of the non-navigable `schemes`
/// (e.g. `place:` queries or `data:` URIs). Such links are classified as
/// links but never rendered.
pub fn is_ignored_link<S: AsRef<str>>(url: &str, schemes: &[S]) -> bool {
    schemes.iter().any(|s| url.starts_with(s.as_ref()))
}
