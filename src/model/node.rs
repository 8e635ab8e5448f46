use serde::{Deserialize, Serialize};

/// A bookmark node as the host store hands it out, before classification.
///
/// Mirrors the WebExtension `BookmarkTreeNode` shape. Whether `children` is
/// absent or empty matters: absent means "not fetched", empty means "fetched,
/// no children".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNode {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Explicit tag: "bookmark", "folder" or "separator"
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<RawNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<u64>,
}

impl RawNode {
    /// The implicit root (id "0") holding `shelves`.
    pub fn root(shelves: Vec<RawNode>) -> RawNode {
        RawNode::folder("0", "", shelves).orphaned()
    }

    /// A folder whose fetched children are `children`; their parent ids are
    /// set to `id`.
    pub fn folder(id: &str, title: &str, mut children: Vec<RawNode>) -> RawNode {
        for child in children.iter_mut() {
            child.parent_id = Some(id.to_string());
        }
        reindex(&mut children);
        RawNode {
            id: id.to_string(),
            title: title.to_string(),
            children: Some(children),
            ..RawNode::bare(id)
        }
    }

    pub fn link(id: &str, title: &str, url: &str) -> RawNode {
        RawNode {
            title: title.to_string(),
            url: Some(url.to_string()),
            ..RawNode::bare(id)
        }
    }

    pub fn separator(id: &str) -> RawNode {
        RawNode {
            node_type: Some("separator".to_string()),
            ..RawNode::bare(id)
        }
    }

    /// A node with nothing but an id: no url, no children, no tag.
    pub fn bare(id: &str) -> RawNode {
        RawNode {
            id: id.to_string(),
            parent_id: None,
            title: String::new(),
            url: None,
            node_type: None,
            children: None,
            index: None,
            date_added: None,
        }
    }

    fn orphaned(mut self) -> RawNode {
        self.parent_id = None;
        self.index = None;
        self
    }

    /// A copy of this node without its subtree (children become "not fetched").
    /// Untagged folders get an explicit "folder" tag so they still classify
    /// as folders once their children are gone.
    pub fn shallow(&self) -> RawNode {
        let node_type = match (&self.node_type, &self.url, &self.children) {
            (None, None, Some(_)) => Some("folder".to_string()),
            (tag, _, _) => tag.clone(),
        };
        RawNode {
            id: self.id.clone(),
            parent_id: self.parent_id.clone(),
            title: self.title.clone(),
            url: self.url.clone(),
            node_type,
            children: None,
            index: self.index,
            date_added: self.date_added,
        }
    }

    /// Depth-first search for a node by id.
    pub fn find(&self, id: &str) -> Option<&RawNode> {
        if self.id == id {
            return Some(self);
        }
        self.children
            .as_deref()?
            .iter()
            .find_map(|child| child.find(id))
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut RawNode> {
        if self.id == id {
            return Some(self);
        }
        self.children
            .as_deref_mut()?
            .iter_mut()
            .find_map(|child| child.find_mut(id))
    }

    /// Detach the node with the given id from this subtree. The root itself
    /// cannot be detached.
    pub fn detach(&mut self, id: &str) -> Option<RawNode> {
        let children = self.children.as_mut()?;
        if let Some(pos) = children.iter().position(|c| c.id == id) {
            let removed = children.remove(pos);
            reindex(children);
            return Some(removed);
        }
        children.iter_mut().find_map(|child| child.detach(id))
    }
}

/// Rewrite `index` fields so they match list positions.
pub(crate) fn reindex(children: &mut [RawNode]) {
    for (i, child) in children.iter_mut().enumerate() {
        child.index = Some(i as u32);
    }
}

/// A classified bookmark node. The kind is decided once, at classification,
/// and carried from then on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookmarkNode {
    pub id: String,
    /// `None` only for the implicit root
    pub parent_id: Option<String>,
    pub title: String,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The implicit tree root; its children are the shelves
    Root { children: Vec<BookmarkNode> },
    /// `None` = children not fetched, `Some(vec![])` = fetched and empty
    Folder { children: Option<Vec<BookmarkNode>> },
    Link { url: String },
    Separator,
}

/// Payload-free discriminant of [`NodeKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindTag {
    Root,
    Folder,
    Link,
    Separator,
}

impl std::fmt::Display for KindTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KindTag::Root => write!(f, "root"),
            KindTag::Folder => write!(f, "folder"),
            KindTag::Link => write!(f, "link"),
            KindTag::Separator => write!(f, "separator"),
        }
    }
}

impl BookmarkNode {
    pub fn tag(&self) -> KindTag {
        match self.kind {
            NodeKind::Root { .. } => KindTag::Root,
            NodeKind::Folder { .. } => KindTag::Folder,
            NodeKind::Link { .. } => KindTag::Link,
            NodeKind::Separator => KindTag::Separator,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self.kind, NodeKind::Folder { .. })
    }

    pub fn url(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Link { url } => Some(url),
            _ => None,
        }
    }

    /// Fetched children of a root or folder. `None` for links, separators
    /// and folders whose children were not fetched.
    pub fn children(&self) -> Option<&[BookmarkNode]> {
        match &self.kind {
            NodeKind::Root { children } => Some(children),
            NodeKind::Folder { children } => children.as_deref(),
            _ => None,
        }
    }
}
