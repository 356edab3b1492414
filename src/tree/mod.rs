//! The content tree: a hierarchical, mutable, in-memory document tree.
//!
//! Nodes live in a flat arena inside [`Tree`] and refer to each other by
//! [`NodeId`]. The tree is built once per generator run, either by walking a
//! content directory or procedurally during aggregation, and mutated through
//! the operations here; paths and hrefs are always computed, never stored.

pub mod node;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;

use crate::content::front_matter::{split_front_matter, FrontMatterError};

pub use node::{FolderNode, Node, NodeId, NodeKind, PageKind, PageNode, Pagination, RenderMeta};

/// Callback invoked on every node right after its creation, used by
/// collaborators to attach per-node metadata.
pub type CreateHook<'a> = dyn FnMut(&mut Tree, NodeId) + 'a;

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("'{name}' is a leaf node and cannot hold children")]
    NotAContainer { name: String },
    #[error("'{name}' is not a page")]
    NotAPage { name: String },
    #[error("'{name}' has neither 'source' nor 'source_path' defined")]
    MissingSource { name: String },
    #[error("failed to read the source of '{name}' from {path}")]
    SourceIo {
        name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to walk content directory {path}")]
    Walk {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid front matter in '{name}': {source}")]
    FrontMatter {
        name: String,
        #[source]
        source: FrontMatterError,
    },
    #[error("the path '{path}' does not exist")]
    Lookup { path: String },
    #[error("can't group an empty list of nodes")]
    EmptyGroup,
    #[error("can't paginate with less than 1 posts per page")]
    ZeroPageSize,
    #[error("the page '{name}' is already paginated")]
    AlreadyPaginated { name: String },
    #[error("'{name}' is not an aggregated page and cannot be paginated")]
    NotAggregated { name: String },
}

/// The arena holding every node of one content tree.
///
/// Node 0 is always the root: a folder with the fixed name `/` and no
/// parent. Detached nodes stay in the arena but are unreachable from it.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::folder("/")],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Creates a detached folder node.
    pub fn new_folder(&mut self, name: &str) -> NodeId {
        self.alloc(Node::folder(name))
    }

    /// Creates a detached standard page node.
    pub fn new_page(
        &mut self,
        name: &str,
        source_path: Option<PathBuf>,
        source: Option<String>,
    ) -> NodeId {
        self.alloc(Node::page(name, PageNode::standard(source_path, source)))
    }

    /// Creates a detached aggregated page listing `posts`.
    pub fn new_aggregated_page(&mut self, name: &str, posts: Vec<NodeId>) -> NodeId {
        self.alloc(Node::page(
            name,
            PageNode::procedural(PageKind::Aggregated { posts }),
        ))
    }

    /// Creates a detached groups page, e.g. a category or archive summary.
    pub fn new_groups_page(
        &mut self,
        name: &str,
        groups: indexmap::IndexMap<String, Vec<NodeId>>,
    ) -> NodeId {
        self.alloc(Node::page(
            name,
            PageNode::procedural(PageKind::Groups { groups }),
        ))
    }

    // ------------------------------------------------------------------
    // Structure

    /// Moves `id` under `new_parent`, detaching it from any current parent
    /// or index-page role first.
    pub fn reparent(&mut self, id: NodeId, new_parent: NodeId) -> Result<(), TreeError> {
        if !self.node(new_parent).is_folder() {
            return Err(TreeError::NotAContainer {
                name: self.node(new_parent).name.clone(),
            });
        }
        self.detach(id);
        match &mut self.node_mut(new_parent).kind {
            NodeKind::Folder(folder) => folder.children.push(id),
            NodeKind::Page(_) => unreachable!("checked above"),
        }
        self.node_mut(id).parent = Some(new_parent);
        Ok(())
    }

    /// Removes `id` from its parent's child list or index-page slot. The
    /// node stays in the arena, unreachable until reattached.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.node(id).parent else {
            return;
        };
        if let Some(folder) = self.node_mut(parent).as_folder_mut() {
            if folder.index_page == Some(id) {
                folder.index_page = None;
            } else {
                folder.children.retain(|&c| c != id);
            }
        }
        self.node_mut(id).parent = None;
    }

    /// Makes `page` the index page of `folder`, displacing any previous
    /// index page (which is left detached).
    pub fn set_index_page(&mut self, folder: NodeId, page: NodeId) -> Result<(), TreeError> {
        if !self.node(folder).is_folder() {
            return Err(TreeError::NotAContainer {
                name: self.node(folder).name.clone(),
            });
        }
        if !self.node(page).is_page() {
            return Err(TreeError::NotAPage {
                name: self.node(page).name.clone(),
            });
        }
        self.detach(page);
        let previous = self
            .node_mut(folder)
            .as_folder_mut()
            .and_then(|f| f.index_page.replace(page));
        if let Some(previous) = previous {
            self.node_mut(previous).parent = None;
        }
        self.node_mut(page).parent = Some(folder);
        Ok(())
    }

    pub fn index_page(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).as_folder().and_then(|f| f.index_page)
    }

    /// The ordered children of `id`; empty for leaf nodes.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).as_folder().map_or(&[], |f| &f.children)
    }

    pub fn is_index_page(&self, id: NodeId) -> bool {
        self.node(id)
            .parent
            .and_then(|p| self.index_page(p))
            .map_or(false, |index| index == id)
    }

    /// The chain of ancestors of `id`, nearest first, ending at the root.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut current = self.node(id).parent;
        while let Some(parent) = current {
            chain.push(parent);
            current = self.node(parent).parent;
        }
        chain
    }

    /// Groups the given nodes into a new folder under `parent`.
    pub fn group(
        &mut self,
        parent: NodeId,
        name: &str,
        nodes: &[NodeId],
    ) -> Result<NodeId, TreeError> {
        if nodes.is_empty() {
            return Err(TreeError::EmptyGroup);
        }
        let group = self.new_folder(name);
        self.reparent(group, parent)?;
        for &node in nodes {
            self.reparent(node, group)?;
        }
        Ok(group)
    }

    // ------------------------------------------------------------------
    // Paths

    /// The slash-separated path of `id` relative to the root. Computed,
    /// never stored; the root's path is `/`.
    pub fn path(&self, id: NodeId) -> String {
        let node = self.node(id);
        let Some(parent) = node.parent else {
            return "/".to_string();
        };
        let parent_path = self.path(parent);

        // Paginated pages address themselves as pageN under either the
        // parent folder directly (when the chain holds the index page) or
        // their own name; a single-page chain drops the suffix entirely.
        if let Some(pagination) = node.as_page().and_then(|p| p.pagination()) {
            if self.is_index_page(pagination.first_page) {
                return join_path(&parent_path, &format!("page{}", pagination.page_number));
            }
            if pagination.max_page_number == 1 {
                return join_path(&parent_path, &node.name);
            }
            let base = join_path(&parent_path, &node.name);
            return join_path(&base, &format!("page{}", pagination.page_number));
        }

        join_path(&parent_path, &node.name)
    }

    /// The URL a node is served at: its own path, except index pages, which
    /// collapse onto their parent folder's path.
    pub fn href(&self, id: NodeId) -> String {
        match self.node(id).parent {
            Some(parent) if self.is_index_page(id) => self.path(parent),
            _ => self.path(id),
        }
    }

    /// Where the rendered output of `id` goes under `build_dir`.
    pub fn render_path(&self, id: NodeId, build_dir: &Path) -> PathBuf {
        let href = self.href(id);
        build_dir
            .join(href.trim_start_matches('/'))
            .join("index.html")
    }

    // ------------------------------------------------------------------
    // Construction from the filesystem

    /// Builds a tree by recursively walking `directory`.
    ///
    /// Directory entries are visited in sorted name order. Each accepted
    /// file becomes a page named after its stem, except `index.<ext>` which
    /// becomes the containing folder's index page, named after the folder.
    /// The creation hook runs on every node, the root included.
    pub fn from_directory(
        directory: &Path,
        accepted_file_types: &[String],
        hook: &mut CreateHook<'_>,
    ) -> Result<Tree, TreeError> {
        let mut tree = Tree::new();
        let root = tree.root();
        hook(&mut tree, root);
        tree.walk_into(root, directory, accepted_file_types, hook)?;
        Ok(tree)
    }

    fn walk_into(
        &mut self,
        parent: NodeId,
        directory: &Path,
        accepted_file_types: &[String],
        hook: &mut CreateHook<'_>,
    ) -> Result<(), TreeError> {
        let walk_err = |source| TreeError::Walk {
            path: directory.to_path_buf(),
            source,
        };
        let mut entries = fs::read_dir(directory)
            .map_err(walk_err)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(walk_err)?;
        entries.sort();

        for path in entries {
            if path.is_dir() {
                let name = file_name(&path);
                let folder = self.new_folder(&name);
                self.reparent(folder, parent)?;
                hook(self, folder);
                self.walk_into(folder, &path, accepted_file_types, hook)?;
                continue;
            }

            let extension = match path.extension() {
                Some(ext) => format!(".{}", ext.to_string_lossy()),
                None => continue,
            };
            if !accepted_file_types.iter().any(|a| *a == extension) {
                continue;
            }

            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            if stem == "index" {
                let name = self.node(parent).name.clone();
                let page = self.new_page(&name, Some(path), None);
                self.set_index_page(parent, page)?;
                hook(self, page);
            } else {
                let page = self.new_page(&stem, Some(path), None);
                self.reparent(page, parent)?;
                hook(self, page);
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Lookup & traversal

    /// Resolves a slash-separated path relative to the root.
    pub fn get(&self, path: &str) -> Result<NodeId, TreeError> {
        self.get_from(self.root(), path)
    }

    /// Resolves a slash-separated path relative to `start`.
    ///
    /// Each segment addresses a child by name, by positional `{i}` token,
    /// or, for paginated pages, by a `pageN` token.
    pub fn get_from(&self, start: NodeId, path: &str) -> Result<NodeId, TreeError> {
        let lookup_err = || TreeError::Lookup {
            path: path.to_string(),
        };
        let mut current = start;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            let folder = self.node(current).as_folder().ok_or_else(lookup_err)?;
            let mut next = None;
            for (i, &child) in folder.children.iter().enumerate() {
                let node = self.node(child);
                let matches = node.name == segment
                    || segment == format!("{{{i}}}")
                    || node
                        .as_page()
                        .and_then(|p| p.pagination())
                        .map_or(false, |p| segment == format!("page{}", p.page_number));
                if matches {
                    next = Some(child);
                    break;
                }
            }
            current = next.ok_or_else(lookup_err)?;
        }
        Ok(current)
    }

    /// Applies `func` to every node under `id`: children first, then the
    /// index page, recursing into folders.
    pub fn for_each(&self, id: NodeId, func: &mut dyn FnMut(&Tree, NodeId)) {
        for &child in self.children(id) {
            func(self, child);
            if self.node(child).is_folder() {
                self.for_each(child, func);
            }
        }
        if let Some(index) = self.index_page(id) {
            func(self, index);
        }
    }

    /// A flat, one dimensional list of all descendants of `id`. Each level
    /// lists its children (recursing in place) followed by its index page.
    pub fn flat(&self, id: NodeId) -> Vec<NodeId> {
        let mut flattened = Vec::new();
        for &child in self.children(id) {
            flattened.push(child);
            if self.node(child).is_folder() {
                flattened.extend(self.flat(child));
            }
        }
        if let Some(index) = self.index_page(id) {
            flattened.push(index);
        }
        flattened
    }

    /// All leaf (page) descendants of `id`, index pages included.
    pub fn leaves(&self, id: NodeId) -> Vec<NodeId> {
        self.flat(id)
            .into_iter()
            .filter(|&n| self.node(n).is_page())
            .collect()
    }

    /// Sorts the descendants of `id` into named groups.
    pub fn to_groups(
        &self,
        id: NodeId,
        grouping: &dyn Fn(&Tree, NodeId) -> String,
        filter: &dyn Fn(&Tree, NodeId) -> bool,
    ) -> indexmap::IndexMap<String, Vec<NodeId>> {
        let mut grouped: indexmap::IndexMap<String, Vec<NodeId>> = indexmap::IndexMap::new();
        let mut members = self.children(id).to_vec();
        if let Some(index) = self.index_page(id) {
            members.push(index);
        }
        for child in members {
            if filter(self, child) {
                grouped.entry(grouping(self, child)).or_default().push(child);
            }
            if self.node(child).is_folder() {
                for (key, nodes) in self.to_groups(child, grouping, filter) {
                    grouped.entry(key).or_default().extend(nodes);
                }
            }
        }
        grouped
    }

    /// Removes from the subtree under `id` every node failing the
    /// predicate. Folders that still have children after their own subtree
    /// is filtered are kept even when they fail the predicate themselves.
    pub fn filter_in_place(&mut self, id: NodeId, predicate: &dyn Fn(&Tree, NodeId) -> bool) {
        let mut to_remove = Vec::new();
        for child in self.children(id).to_vec() {
            if self.node(child).is_folder() {
                self.filter_in_place(child, predicate);
                if !predicate(self, child) && self.children(child).is_empty() {
                    to_remove.push(child);
                }
            } else if !predicate(self, child) {
                to_remove.push(child);
            }
        }
        for child in to_remove {
            self.detach(child);
        }
        if let Some(index) = self.index_page(id) {
            if !predicate(self, index) {
                self.detach(index);
            }
        }
    }

    /// Returns a filtered copy of the whole tree; the original is left
    /// untouched.
    pub fn filtered(&self, predicate: &dyn Fn(&Tree, NodeId) -> bool) -> Tree {
        let mut copy = self.clone();
        copy.filter_in_place(copy.root(), predicate);
        copy
    }

    // ------------------------------------------------------------------
    // Sources & derived state

    /// The source text of a page.
    ///
    /// An explicitly set in-memory source wins over the source path. A
    /// standard page with neither is an error; procedural pages resolve to
    /// an empty source instead.
    pub fn source(&self, id: NodeId) -> Result<String, TreeError> {
        let node = self.node(id);
        let page = node.as_page().ok_or_else(|| TreeError::NotAPage {
            name: node.name.clone(),
        })?;
        if let Some(source) = &page.source {
            return Ok(source.clone());
        }
        if let Some(path) = &page.source_path {
            return fs::read_to_string(path).map_err(|e| TreeError::SourceIo {
                name: node.name.clone(),
                path: path.clone(),
                source: e,
            });
        }
        if page.is_procedural() {
            Ok(String::new())
        } else {
            Err(TreeError::MissingSource {
                name: node.name.clone(),
            })
        }
    }

    pub fn set_source(&mut self, id: NodeId, source: String) -> Result<(), TreeError> {
        let name = self.node(id).name.clone();
        let page = self
            .node_mut(id)
            .as_page_mut()
            .ok_or(TreeError::NotAPage { name: name.clone() })?;
        page.source = Some(source);
        if page.source_path.is_some() {
            warn!(
                "the 'source' of '{}' was set while a 'source_path' exists; \
                 the in-memory source takes precedence",
                name
            );
        }
        Ok(())
    }

    pub fn set_source_path(&mut self, id: NodeId, path: PathBuf) -> Result<(), TreeError> {
        let name = self.node(id).name.clone();
        let page = self
            .node_mut(id)
            .as_page_mut()
            .ok_or(TreeError::NotAPage { name: name.clone() })?;
        page.source_path = Some(path);
        if page.source.is_some() {
            warn!(
                "the 'source_path' of '{}' was set but a 'source' is already \
                 present, so the new path will have no effect",
                name
            );
        }
        Ok(())
    }

    /// The parsed front matter of a page, if `parse_front_matter` has run.
    pub fn front_matter(&self, id: NodeId) -> Option<&crate::content::FrontMatter> {
        let node = self.node(id);
        let page = node.as_page()?;
        if page.front_matter.is_none() {
            warn!(
                "'front_matter' was requested on '{}' before it was parsed",
                node.name
            );
        }
        page.front_matter.as_ref()
    }

    /// The body text of a page, if `parse_front_matter` has run.
    pub fn raw_content(&self, id: NodeId) -> Option<&str> {
        let node = self.node(id);
        let page = node.as_page()?;
        if page.raw_content.is_none() {
            warn!(
                "'raw_content' was requested on '{}' before it was parsed",
                node.name
            );
        }
        page.raw_content.as_deref()
    }

    /// The markup-processed content of a page, if `process_content` has run.
    pub fn content(&self, id: NodeId) -> Option<&str> {
        let node = self.node(id);
        let page = node.as_page()?;
        if page.content.is_none() {
            warn!(
                "'content' was requested on '{}' before it was generated",
                node.name
            );
        }
        page.content.as_deref()
    }

    pub fn has_parsed_front_matter(&self, id: NodeId) -> bool {
        self.node(id)
            .as_page()
            .map_or(false, |p| p.front_matter.is_some())
    }

    pub fn has_processed_content(&self, id: NodeId) -> bool {
        self.node(id)
            .as_page()
            .map_or(false, |p| p.content.is_some())
    }

    /// Splits the page's source into front matter and body, storing both.
    pub fn parse_front_matter(&mut self, id: NodeId, delimiter: char) -> Result<(), TreeError> {
        let source = self.source(id)?;
        let name = self.node(id).name.clone();
        let (front_matter, body) = split_front_matter(&source, delimiter)
            .map_err(|e| TreeError::FrontMatter { name: name.clone(), source: e })?;
        let page = self
            .node_mut(id)
            .as_page_mut()
            .ok_or(TreeError::NotAPage { name })?;
        page.front_matter = Some(front_matter);
        page.raw_content = Some(body);
        Ok(())
    }

    /// Runs the markup processor over the page's body, storing the result.
    pub fn process_content(
        &mut self,
        id: NodeId,
        markup: &dyn Fn(&str) -> String,
    ) -> Result<(), TreeError> {
        let name = self.node(id).name.clone();
        let raw = self
            .node(id)
            .as_page()
            .ok_or(TreeError::NotAPage { name: name.clone() })?
            .raw_content
            .clone()
            .unwrap_or_default();
        let rendered = markup(&raw);
        let page = self
            .node_mut(id)
            .as_page_mut()
            .ok_or(TreeError::NotAPage { name })?;
        page.content = Some(rendered);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Pagination

    /// Splits an aggregated page into fixed-size paginated pages.
    ///
    /// If the page was its parent's index page, the first paginated page
    /// takes over that role and the rest become ordinary siblings;
    /// otherwise all pages become siblings in the original's place. The
    /// original node is detached either way. Each new page inherits the
    /// original's source, derived state and user data, and goes through the
    /// creation hook.
    pub fn paginate(
        &mut self,
        id: NodeId,
        posts_per_page: usize,
        hook: &mut CreateHook<'_>,
    ) -> Result<Vec<NodeId>, TreeError> {
        if posts_per_page == 0 {
            return Err(TreeError::ZeroPageSize);
        }
        let node = self.node(id);
        let name = node.name.clone();
        let page = node
            .as_page()
            .ok_or(TreeError::NotAPage { name: name.clone() })?;
        let posts = match &page.kind {
            PageKind::Aggregated { posts } => posts.clone(),
            PageKind::Paginated { .. } => {
                return Err(TreeError::AlreadyPaginated { name });
            }
            _ => return Err(TreeError::NotAggregated { name }),
        };
        let source_path = page.source_path.clone();
        let source = page.source.clone();
        let front_matter = page.front_matter.clone();
        let raw_content = page.raw_content.clone();
        let content = page.content.clone();
        let user_data = node.user_data.clone();

        let parent = node.parent;
        let was_index = self.is_index_page(id);

        // An empty aggregation still yields a single, empty page so the
        // folder keeps a rendered index.
        let chunks: Vec<Vec<NodeId>> = if posts.is_empty() {
            vec![Vec::new()]
        } else {
            posts.chunks(posts_per_page).map(|c| c.to_vec()).collect()
        };
        let max_page_number = chunks.len();

        // Ids are handed out sequentially, so the whole chain is known
        // before any page exists.
        let first = NodeId(self.nodes.len());
        let last = NodeId(self.nodes.len() + max_page_number - 1);

        let mut pages = Vec::with_capacity(max_page_number);
        for (i, chunk) in chunks.into_iter().enumerate() {
            let pagination = Pagination {
                page_number: i + 1,
                max_page_number,
                first_page: first,
                last_page: last,
                prev_page: (i > 0).then(|| NodeId(first.0 + i - 1)),
                next_page: (i + 1 < max_page_number).then(|| NodeId(first.0 + i + 1)),
            };
            let mut page_node = PageNode::procedural(PageKind::Paginated {
                posts: chunk,
                pagination,
            });
            page_node.source_path = source_path.clone();
            page_node.source = source.clone();
            let new_page = self.alloc(Node::page(name.clone(), page_node));
            hook(self, new_page);
            {
                let node = self.node_mut(new_page);
                node.user_data = user_data.clone();
                if let NodeKind::Page(p) = &mut node.kind {
                    p.front_matter = front_matter.clone();
                    p.raw_content = raw_content.clone();
                    p.content = content.clone();
                }
            }
            pages.push(new_page);
        }

        if let Some(parent) = parent {
            self.detach(id);
            let mut remaining = pages.iter();
            if was_index {
                if let Some(&index) = remaining.next() {
                    self.set_index_page(parent, index)?;
                }
            }
            for &sibling in remaining {
                self.reparent(sibling, parent)?;
            }
        }

        Ok(pages)
    }

    /// A compact, indented rendition of the subtree under `id`.
    pub fn pretty(&self, id: NodeId) -> String {
        self.pretty_at(id, 0)
    }

    fn pretty_at(&self, id: NodeId, level: usize) -> String {
        let indent = "  ".repeat(level);
        let node = self.node(id);
        match &node.kind {
            NodeKind::Folder(folder) => {
                let mut lines = vec![format!("{indent}{}/", node.name)];
                if let Some(index) = folder.index_page {
                    lines.push(format!("{indent}  i {}", self.node(index).name));
                }
                for &child in &folder.children {
                    lines.push(self.pretty_at(child, level + 1));
                }
                lines.join("\n")
            }
            NodeKind::Page(page) => match &page.kind {
                PageKind::Standard => format!("{indent}{}", node.name),
                PageKind::Aggregated { posts } => format!(
                    "{indent}{} [{}]",
                    node.name,
                    posts
                        .iter()
                        .map(|&p| self.node(p).name.as_str())
                        .collect::<Vec<_>>()
                        .join(",")
                ),
                PageKind::Paginated { posts, pagination } => format!(
                    "{indent}{} ({}/{}) [{}]",
                    node.name,
                    pagination.page_number,
                    pagination.max_page_number,
                    posts
                        .iter()
                        .map(|&p| self.node(p).name.as_str())
                        .collect::<Vec<_>>()
                        .join(",")
                ),
                PageKind::Groups { groups } => format!(
                    "{indent}{} {{{}}}",
                    node.name,
                    groups.keys().cloned().collect::<Vec<_>>().join(", ")
                ),
            },
        }
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

fn join_path(parent: &str, segment: &str) -> String {
    if parent == "/" {
        format!("/{segment}")
    } else {
        format!("{parent}/{segment}")
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
