//! Node types stored in the content tree arena.

use std::path::PathBuf;

use chrono::{DateTime, Local};
use indexmap::IndexMap;

use crate::content::front_matter::FrontMatter;

/// Handle to a node in a [`Tree`](super::Tree) arena.
///
/// Ids are cheap to copy and remain valid for the lifetime of the tree they
/// were issued by. Detaching a node does not invalidate its id; the node
/// simply becomes unreachable from the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Typed per-node metadata attached after construction, via the creation
/// hook or the generator's processing passes.
#[derive(Debug, Clone, Default)]
pub struct RenderMeta {
    pub publish_date: Option<DateTime<Local>>,
    pub is_post: bool,
    pub site_url: String,
    /// Set on the sibling copy of a pagination chain's first page, pointing
    /// at the address the content canonically lives at.
    pub canonical_href: Option<String>,
}

/// A node in the content tree: a folder or a page.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub(crate) parent: Option<NodeId>,
    /// Open string-keyed map for caller extensions.
    pub user_data: IndexMap<String, String>,
    pub meta: RenderMeta,
    pub kind: NodeKind,
}

impl Node {
    pub(crate) fn folder(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            user_data: IndexMap::new(),
            meta: RenderMeta::default(),
            kind: NodeKind::Folder(FolderNode::default()),
        }
    }

    pub(crate) fn page(name: impl Into<String>, page: PageNode) -> Self {
        Self {
            name: name.into(),
            parent: None,
            user_data: IndexMap::new(),
            meta: RenderMeta::default(),
            kind: NodeKind::Page(page),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_folder(&self) -> bool {
        matches!(self.kind, NodeKind::Folder(_))
    }

    pub fn is_page(&self) -> bool {
        matches!(self.kind, NodeKind::Page(_))
    }

    pub fn as_folder(&self) -> Option<&FolderNode> {
        match &self.kind {
            NodeKind::Folder(folder) => Some(folder),
            NodeKind::Page(_) => None,
        }
    }

    pub(crate) fn as_folder_mut(&mut self) -> Option<&mut FolderNode> {
        match &mut self.kind {
            NodeKind::Folder(folder) => Some(folder),
            NodeKind::Page(_) => None,
        }
    }

    pub fn as_page(&self) -> Option<&PageNode> {
        match &self.kind {
            NodeKind::Page(page) => Some(page),
            NodeKind::Folder(_) => None,
        }
    }

    pub(crate) fn as_page_mut(&mut self) -> Option<&mut PageNode> {
        match &mut self.kind {
            NodeKind::Page(page) => Some(page),
            NodeKind::Folder(_) => None,
        }
    }
}

/// Closed folder-or-page variant. All structural dispatch pattern-matches on
/// this, never on attribute presence.
#[derive(Debug, Clone)]
pub enum NodeKind {
    Folder(FolderNode),
    Page(PageNode),
}

/// A container node: ordered children plus at most one index page.
///
/// The index page is not a regular child; its href collapses onto the
/// folder's own path.
#[derive(Debug, Clone, Default)]
pub struct FolderNode {
    pub(crate) children: Vec<NodeId>,
    pub(crate) index_page: Option<NodeId>,
}

impl FolderNode {
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn index_page(&self) -> Option<NodeId> {
        self.index_page
    }
}

/// A leaf node: a page or post.
///
/// `front_matter`, `raw_content` and `content` are derived state, set only
/// by the explicit `parse_front_matter` and `process_content` calls on the
/// tree. Reading them beforehand logs a warning and yields nothing.
#[derive(Debug, Clone)]
pub struct PageNode {
    pub(crate) source_path: Option<PathBuf>,
    pub(crate) source: Option<String>,
    pub(crate) front_matter: Option<FrontMatter>,
    pub(crate) raw_content: Option<String>,
    pub(crate) content: Option<String>,
    pub kind: PageKind,
}

impl PageNode {
    pub(crate) fn standard(source_path: Option<PathBuf>, source: Option<String>) -> Self {
        Self {
            source_path,
            source,
            front_matter: None,
            raw_content: None,
            content: None,
            kind: PageKind::Standard,
        }
    }

    pub(crate) fn procedural(kind: PageKind) -> Self {
        Self {
            source_path: None,
            source: None,
            front_matter: None,
            raw_content: None,
            content: None,
            kind,
        }
    }

    pub fn source_path(&self) -> Option<&PathBuf> {
        self.source_path.as_ref()
    }

    /// True for pages synthesized by aggregation or pagination, which
    /// tolerate having no source at all.
    pub fn is_procedural(&self) -> bool {
        !matches!(self.kind, PageKind::Standard)
    }

    pub fn pagination(&self) -> Option<&Pagination> {
        match &self.kind {
            PageKind::Paginated { pagination, .. } => Some(pagination),
            _ => None,
        }
    }

    /// The posts an aggregated or paginated page holds, in order.
    pub fn aggregated_posts(&self) -> &[NodeId] {
        match &self.kind {
            PageKind::Aggregated { posts } | PageKind::Paginated { posts, .. } => posts,
            _ => &[],
        }
    }

    pub fn aggregated_groups(&self) -> Option<&IndexMap<String, Vec<NodeId>>> {
        match &self.kind {
            PageKind::Groups { groups } => Some(groups),
            _ => None,
        }
    }
}

/// What kind of page a leaf is.
#[derive(Debug, Clone)]
pub enum PageKind {
    /// A page backed by an actual content file or in-memory source.
    Standard,
    /// A synthetic page listing other posts, e.g. a folder or category index.
    Aggregated { posts: Vec<NodeId> },
    /// One fixed-size slice of an aggregated page's post list.
    Paginated {
        posts: Vec<NodeId>,
        pagination: Pagination,
    },
    /// A synthetic page listing named groups of posts, e.g. the category or
    /// archive summary page.
    Groups {
        groups: IndexMap<String, Vec<NodeId>>,
    },
}

/// Linking record carried by every page of a pagination chain.
///
/// `first_page` and `last_page` are identical across the chain;
/// `prev_page`/`next_page` form a consistent doubly-linked list.
#[derive(Debug, Clone)]
pub struct Pagination {
    /// 1-based.
    pub page_number: usize,
    pub max_page_number: usize,
    pub first_page: NodeId,
    pub last_page: NodeId,
    pub prev_page: Option<NodeId>,
    pub next_page: Option<NodeId>,
}
