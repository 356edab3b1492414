//! The site generator: ties the content tree to the configuration.
//!
//! One generator run walks the content directory, resolves publish dates,
//! builds the synthetic aggregated, category and archive pages, derives the
//! navigation and finally renders everything into the build directory.

pub mod nav;
pub mod render;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use indexmap::IndexMap;
use serde_json::{json, Value as JsonValue};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::SiteConfig;
use crate::content::MarkdownRenderer;
use crate::tree::{NodeId, PageKind, Tree, TreeError};

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(
        "both a whitelist and a blacklist have been specified for {scope} \
         aggregation, which is not supported"
    )]
    AggregateFilter { scope: &'static str },
    #[error(
        "the following posts have no category, but uncategorized posts \
         are not allowed: {}", names.join(", ")
    )]
    Uncategorized { names: Vec<String> },
    #[error("there are no posts to put in the archive")]
    EmptyArchive,
    #[error("the archive must be built before archive pages can be made out of it")]
    ArchiveNotBuilt,
    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// Classifies a leaf as a standalone page rather than a post. The default
/// treats direct children of the root as pages.
pub type IsPageFn = fn(&Tree, NodeId) -> bool;

pub fn default_is_page(tree: &Tree, id: NodeId) -> bool {
    tree.node(id).parent() == Some(tree.root())
}

/// Attaches the generator's per-node metadata; runs on every node created
/// in the context of a generator, synthetic ones included.
fn attach_meta(tree: &mut Tree, id: NodeId, site_url: &str, is_page: IsPageFn) {
    let is_post = {
        let node = tree.node(id);
        matches!(node.as_page(), Some(p) if matches!(p.kind, PageKind::Standard))
            && !is_page(tree, id)
    };
    let node = tree.node_mut(id);
    node.meta.is_post = is_post;
    node.meta.site_url = site_url.to_string();
}

/// The state of one site generation run.
#[derive(Debug)]
pub struct SiteGenerator {
    pub config: SiteConfig,
    pub tree: Tree,
    pub categories: Option<Categories>,
    pub archive: Option<Archive>,
    pub navigation: Option<JsonValue>,
    pub globally_aggregated: Vec<NodeId>,
    pub build_date: DateTime<Local>,
    pub(crate) is_page: IsPageFn,
    pub(crate) markdown: MarkdownRenderer,

    pub content_dir: PathBuf,
    pub static_dir: PathBuf,
    pub templates_dir: PathBuf,
    pub theme_dir: PathBuf,
    pub build_dir: PathBuf,
}

impl SiteGenerator {
    /// Walks the content directory and sets up a generator run.
    pub fn new(config: SiteConfig, site_dir: &Path) -> Result<Self, GenerateError> {
        if !config.locally_aggregate_whitelist.is_empty()
            && !config.locally_aggregate_blacklist.is_empty()
        {
            return Err(GenerateError::AggregateFilter { scope: "local" });
        }
        if !config.globally_aggregate_whitelist.is_empty()
            && !config.globally_aggregate_blacklist.is_empty()
        {
            return Err(GenerateError::AggregateFilter { scope: "global" });
        }

        let content_dir = site_dir.join(&config.content_dir);
        let is_page: IsPageFn = default_is_page;
        let url = config.url.clone();
        let mut hook =
            move |tree: &mut Tree, id: NodeId| attach_meta(tree, id, &url, is_page);
        let tree = Tree::from_directory(&content_dir, &config.accepted_file_types, &mut hook)?;

        Ok(Self {
            content_dir,
            static_dir: site_dir.join(&config.static_dir),
            templates_dir: site_dir.join(&config.templates_dir),
            theme_dir: site_dir.join(&config.theme_dir),
            build_dir: site_dir.join(&config.build_dir),
            config,
            tree,
            categories: None,
            archive: None,
            navigation: None,
            globally_aggregated: Vec::new(),
            build_date: Local::now(),
            is_page,
            markdown: MarkdownRenderer::new(),
        })
    }

    fn creation_hook(&self) -> impl FnMut(&mut Tree, NodeId) {
        let url = self.config.url.clone();
        let is_page = self.is_page;
        move |tree: &mut Tree, id: NodeId| attach_meta(tree, id, &url, is_page)
    }

    /// Parses every leaf's front matter and resolves its publish date.
    ///
    /// The date comes from the configured front-matter key when present,
    /// else from the source file's modification time, else the epoch.
    pub fn process_content_tree(&mut self) -> Result<(), GenerateError> {
        for leaf in self.tree.leaves(self.tree.root()) {
            self.tree
                .parse_front_matter(leaf, self.config.front_matter_delimiter)?;

            if self.tree.node(leaf).meta.publish_date.is_none() {
                let date = self.resolve_publish_date(leaf);
                self.tree.node_mut(leaf).meta.publish_date = Some(date);
            }
        }
        Ok(())
    }

    fn resolve_publish_date(&self, leaf: NodeId) -> DateTime<Local> {
        let node = self.tree.node(leaf);
        let format = &self.config.read_date_format;

        let from_front_matter = node
            .as_page()
            .and_then(|p| p.front_matter.as_ref())
            .and_then(|fm| fm.get(&self.config.publish_date_key))
            .and_then(|v| v.as_str())
            .and_then(|text| parse_date(text, format));
        if let Some(date) = from_front_matter {
            return date;
        }

        let from_mtime = node
            .as_page()
            .and_then(|p| p.source_path())
            .and_then(|path| fs::metadata(path).ok())
            .and_then(|meta| meta.modified().ok())
            .map(DateTime::<Local>::from);
        if let Some(date) = from_mtime {
            return date;
        }

        warn!(
            "there's no '{}' key in the front matter of '{}' and no \
             'source_path' to read a modification time from, so the publish \
             date is going to be the epoch",
            self.config.publish_date_key,
            self.tree.path(leaf)
        );
        DateTime::<Local>::from(std::time::UNIX_EPOCH)
    }

    fn publish_date(&self, id: NodeId) -> DateTime<Local> {
        self.tree
            .node(id)
            .meta
            .publish_date
            .unwrap_or_else(|| DateTime::<Local>::from(std::time::UNIX_EPOCH))
    }

    fn sort_by_date_descending(&self, posts: &mut Vec<NodeId>) {
        posts.sort_by(|&a, &b| self.publish_date(b).cmp(&self.publish_date(a)));
    }

    /// Whether a node passes a name-or-path whitelist/blacklist pair.
    /// A node matches a list entry by its name or by its full path.
    fn passes_filter(&self, id: NodeId, whitelist: &[String], blacklist: &[String]) -> bool {
        let name = &self.tree.node(id).name;
        let path = self.tree.path(id);
        if !whitelist.is_empty() {
            return whitelist.iter().any(|e| e == name || *e == path);
        }
        if !blacklist.is_empty() {
            return !blacklist.iter().any(|e| e == name || *e == path);
        }
        true
    }

    /// Builds the synthetic aggregated index pages: one per folder without
    /// an index page, and a `home` page when the root itself has none.
    pub fn aggregate_posts(&mut self) -> Result<(), GenerateError> {
        let mut hook = self.creation_hook();

        // Local aggregation.
        let to_locally_aggregate: Vec<NodeId> = self
            .tree
            .flat(self.tree.root())
            .into_iter()
            .filter(|&n| self.tree.node(n).is_folder() && self.tree.index_page(n).is_none())
            .filter(|&n| {
                self.passes_filter(
                    n,
                    &self.config.locally_aggregate_whitelist,
                    &self.config.locally_aggregate_blacklist,
                )
            })
            .collect();

        for folder in to_locally_aggregate {
            let mut posts: Vec<NodeId> = self
                .tree
                .children(folder)
                .iter()
                .copied()
                .filter(|&c| {
                    matches!(self.tree.node(c).as_page(), Some(p) if matches!(p.kind, PageKind::Standard))
                })
                .collect();
            self.sort_by_date_descending(&mut posts);

            let name = self.tree.node(folder).name.clone();
            debug!("aggregating {} posts into the index of '{}'", posts.len(), name);
            let index = self.tree.new_aggregated_page(&name, posts);
            self.tree.set_index_page(folder, index)?;
            hook(&mut self.tree, index);
            if let Some(per_page) = self.config.posts_per_page {
                self.tree.paginate(index, per_page, &mut hook)?;
            }
        }

        // Global aggregation, optionally feeding a synthetic home page.
        let is_page = self.is_page;
        let to_globally_aggregate: Vec<NodeId> = self
            .tree
            .leaves(self.tree.root())
            .into_iter()
            .filter(|&n| {
                !self.tree.is_index_page(n)
                    && !is_page(&self.tree, n)
                    && self
                        .tree
                        .node(n)
                        .as_page()
                        .map_or(false, |p| p.pagination().is_none())
            })
            .filter(|&n| match self.tree.node(n).parent() {
                Some(parent) => self.passes_filter(
                    parent,
                    &self.config.globally_aggregate_whitelist,
                    &self.config.globally_aggregate_blacklist,
                ),
                None => false,
            })
            .collect();

        self.globally_aggregated = to_globally_aggregate.clone();

        if self.tree.index_page(self.tree.root()).is_none() {
            let mut posts = to_globally_aggregate;
            self.sort_by_date_descending(&mut posts);
            let home = self.tree.new_aggregated_page("home", posts);
            let root = self.tree.root();
            self.tree.set_index_page(root, home)?;
            hook(&mut self.tree, home);
            if let Some(per_page) = self.config.posts_per_page {
                self.tree.paginate(home, per_page, &mut hook)?;
            }
        }

        Ok(())
    }

    /// All leaves that are posts, i.e. standard pages failing the is-page
    /// classifier.
    pub fn posts(&self) -> Vec<NodeId> {
        let is_page = self.is_page;
        self.tree
            .leaves(self.tree.root())
            .into_iter()
            .filter(|&n| {
                matches!(self.tree.node(n).as_page(), Some(p) if matches!(p.kind, PageKind::Standard))
                    && !is_page(&self.tree, n)
            })
            .collect()
    }

    /// The category a post declares in its front matter, or an empty string.
    fn category_of(&self, id: NodeId) -> String {
        self.tree
            .node(id)
            .as_page()
            .and_then(|p| p.front_matter.as_ref())
            .and_then(|fm| fm.get(&self.config.categories.key))
            .map(|v| v.to_display_string())
            .unwrap_or_default()
    }

    /// Groups posts by category and builds a page per category, plus the
    /// optional grouping folder and summary list page.
    pub fn build_category_pages(&mut self) -> Result<(), GenerateError> {
        let cfg = self.config.categories.clone();
        let mut hook = self.creation_hook();

        let mut grouped: IndexMap<String, Vec<NodeId>> = IndexMap::new();
        for post in self.posts() {
            grouped.entry(self.category_of(post)).or_default().push(post);
        }

        if let Some(uncategorized) = grouped.shift_remove("") {
            if !cfg.allow_uncategorized {
                return Err(GenerateError::Uncategorized {
                    names: uncategorized
                        .into_iter()
                        .map(|n| self.tree.path(n))
                        .collect(),
                });
            }
            grouped.insert(cfg.uncategorized_name.clone(), uncategorized);
        }

        for posts in grouped.values_mut() {
            self.sort_by_date_descending(posts);
        }

        let root = self.tree.root();
        let mut pages_by_category: IndexMap<String, NodeId> = IndexMap::new();
        let mut all_category_pages: Vec<NodeId> = Vec::new();
        for (category, posts) in &grouped {
            let page = self.tree.new_aggregated_page(category, posts.clone());
            hook(&mut self.tree, page);
            self.tree.reparent(page, root)?;

            if let Some(per_page) = self.config.posts_per_page {
                let paginated = self.tree.paginate(page, per_page, &mut hook)?;
                pages_by_category.insert(category.clone(), paginated[0]);
                all_category_pages.extend(paginated);
            } else {
                pages_by_category.insert(category.clone(), page);
                all_category_pages.push(page);
            }
        }

        let folder = if cfg.group && !all_category_pages.is_empty() {
            Some(self.tree.group(
                root,
                cfg.list_page_name.as_deref().unwrap_or("categories"),
                &all_category_pages,
            )?)
        } else {
            None
        };

        let mut list_page = None;
        if let Some(name) = &cfg.list_page_name {
            if !pages_by_category.is_empty() {
                let page = self.tree.new_groups_page(name, grouped.clone());
                hook(&mut self.tree, page);
                match folder {
                    Some(folder) => self.tree.set_index_page(folder, page)?,
                    None => self.tree.reparent(page, root)?,
                }
                list_page = Some(page);
            }
        }

        self.categories = Some(Categories {
            posts_by_category: grouped,
            pages_by_category,
            list_page,
            folder,
            uncategorized_name: cfg.uncategorized_name,
        });
        Ok(())
    }

    /// Sorts the posts into month and year buckets, most recent bucket
    /// first. Ordering follows each bucket's newest publish date, never the
    /// formatted key text.
    pub fn build_archive(&mut self) -> Result<(), GenerateError> {
        let month_format = self.config.archive.month_format.clone();
        let year_format = self.config.archive.year_format.clone();

        let mut by_month: IndexMap<String, (DateTime<Local>, Vec<NodeId>)> = IndexMap::new();
        let mut by_year: IndexMap<String, (DateTime<Local>, Vec<NodeId>)> = IndexMap::new();
        for post in self.posts() {
            let date = self.publish_date(post);
            for (buckets, format) in [(&mut by_month, &month_format), (&mut by_year, &year_format)]
            {
                let key = date.format(format).to_string();
                let entry = buckets.entry(key).or_insert_with(|| (date, Vec::new()));
                entry.0 = entry.0.max(date);
                entry.1.push(post);
            }
        }

        let newest_first = |buckets: IndexMap<String, (DateTime<Local>, Vec<NodeId>)>| {
            let mut entries: Vec<_> = buckets.into_iter().collect();
            entries.sort_by(|a, b| b.1 .0.cmp(&a.1 .0));
            entries
                .into_iter()
                .map(|(key, (_, posts))| (key, posts))
                .collect::<IndexMap<String, Vec<NodeId>>>()
        };

        self.archive = Some(Archive {
            posts_by_month: newest_first(by_month),
            posts_by_year: newest_first(by_year),
            pages_by_month: Vec::new(),
            pages_by_year: Vec::new(),
            list_page: None,
        });
        Ok(())
    }

    /// Turns the archive buckets into aggregated pages, plus the optional
    /// grouping folder and summary list page.
    pub fn build_archive_pages(&mut self) -> Result<(), GenerateError> {
        let cfg = self.config.archive.clone();
        let mut hook = self.creation_hook();
        let archive = self.archive.as_ref().ok_or(GenerateError::ArchiveNotBuilt)?;

        let month_buckets: Vec<(String, Vec<NodeId>)> = if cfg.by_month {
            archive
                .posts_by_month
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()
        } else {
            Vec::new()
        };
        let year_buckets: Vec<(String, Vec<NodeId>)> = if cfg.by_year {
            archive
                .posts_by_year
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()
        } else {
            Vec::new()
        };
        if month_buckets.is_empty() && year_buckets.is_empty() {
            return Err(GenerateError::EmptyArchive);
        }

        let root = self.tree.root();
        let mut pages = [Vec::new(), Vec::new()];
        for (i, buckets) in [month_buckets, year_buckets].into_iter().enumerate() {
            for (key, posts) in buckets {
                let page = self.tree.new_aggregated_page(&key, posts);
                hook(&mut self.tree, page);
                self.tree.reparent(page, root)?;

                if let Some(per_page) = self.config.posts_per_page {
                    pages[i].extend(self.tree.paginate(page, per_page, &mut hook)?);
                } else {
                    pages[i].push(page);
                }
            }
        }
        let [pages_by_month, pages_by_year] = pages;

        let all_pages: Vec<NodeId> = pages_by_month
            .iter()
            .chain(pages_by_year.iter())
            .copied()
            .collect();
        let folder = if cfg.group {
            Some(self.tree.group(
                root,
                cfg.list_page_name.as_deref().unwrap_or("archive"),
                &all_pages,
            )?)
        } else {
            None
        };

        let mut list_page = None;
        if let Some(name) = &cfg.list_page_name {
            if !all_pages.is_empty()
                && (cfg.display_by_month_in_list_page || cfg.display_by_year_in_list_page)
            {
                let archive = self.archive.as_ref().ok_or(GenerateError::ArchiveNotBuilt)?;
                let mut groups: IndexMap<String, Vec<NodeId>> = IndexMap::new();
                if cfg.display_by_month_in_list_page {
                    groups.extend(
                        archive
                            .posts_by_month
                            .iter()
                            .map(|(k, v)| (k.clone(), v.clone())),
                    );
                }
                if cfg.display_by_year_in_list_page {
                    groups.extend(
                        archive
                            .posts_by_year
                            .iter()
                            .map(|(k, v)| (k.clone(), v.clone())),
                    );
                }

                let page = self.tree.new_groups_page(name, groups);
                hook(&mut self.tree, page);
                match folder {
                    Some(folder) => self.tree.set_index_page(folder, page)?,
                    None => self.tree.reparent(page, root)?,
                }
                list_page = Some(page);
            }
        }

        let archive = self.archive.as_mut().ok_or(GenerateError::ArchiveNotBuilt)?;
        archive.pages_by_month = pages_by_month;
        archive.pages_by_year = pages_by_year;
        archive.list_page = list_page;
        Ok(())
    }

    /// Runs the whole pipeline up to, but not including, rendering.
    pub fn build(&mut self) -> Result<(), GenerateError> {
        self.process_content_tree()?;
        self.aggregate_posts()?;

        if self.config.categories.build {
            self.build_category_pages()?;
        }
        if self.config.archive.by_month || self.config.archive.by_year {
            self.build_archive()?;
            self.build_archive_pages()?;
        }

        self.build_navigation();
        Ok(())
    }
}

/// Everything the category pass produced, kept for navigation and the
/// site-level template context.
#[derive(Debug)]
pub struct Categories {
    pub posts_by_category: IndexMap<String, Vec<NodeId>>,
    /// The first (or only) page of each category's pagination chain.
    pub pages_by_category: IndexMap<String, NodeId>,
    pub list_page: Option<NodeId>,
    pub folder: Option<NodeId>,
    pub uncategorized_name: String,
}

impl Categories {
    /// All category pages, the list page excluded.
    pub fn all_pages(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.pages_by_category.values().copied()
    }

    pub fn as_nav(&self, tree: &Tree) -> JsonValue {
        json!({
            "self": self.list_page.map(|p| tree.href(p)),
            "categories": self
                .pages_by_category
                .iter()
                .map(|(k, &v)| (k.clone(), tree.href(v)))
                .collect::<IndexMap<String, String>>(),
            "uncategorized_name": self.uncategorized_name,
        })
    }
}

/// Everything the archive pass produced.
#[derive(Debug)]
pub struct Archive {
    pub posts_by_month: IndexMap<String, Vec<NodeId>>,
    pub posts_by_year: IndexMap<String, Vec<NodeId>>,
    pub pages_by_month: Vec<NodeId>,
    pub pages_by_year: Vec<NodeId>,
    pub list_page: Option<NodeId>,
}

impl Archive {
    pub fn all_pages(&self) -> Vec<NodeId> {
        self.pages_by_month
            .iter()
            .chain(self.pages_by_year.iter())
            .copied()
            .collect()
    }

    /// Name and href of the first page of every archive bucket.
    pub fn as_nav(&self, tree: &Tree) -> JsonValue {
        let entries = |pages: &[NodeId]| -> Vec<(String, String)> {
            pages
                .iter()
                .filter(|&&p| {
                    tree.node(p)
                        .as_page()
                        .and_then(|page| page.pagination())
                        .map_or(true, |pagination| pagination.page_number == 1)
                })
                .map(|&p| (tree.node(p).name.clone(), tree.href(p)))
                .collect()
        };
        json!({
            "by_month": entries(&self.pages_by_month),
            "by_year": entries(&self.pages_by_year),
        })
    }
}

/// Parses a publish date, accepting a date-only value at midnight when the
/// full format doesn't match.
fn parse_date(text: &str, format: &str) -> Option<DateTime<Local>> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
        return Local.from_local_datetime(&naive).single();
    }
    let date_only_format = format.split_whitespace().next().unwrap_or(format);
    if let Ok(date) = NaiveDate::parse_from_str(text, date_only_format) {
        let naive = date.and_hms_opt(0, 0, 0)?;
        return Local.from_local_datetime(&naive).single();
    }
    warn!("could not parse the publish date '{}' with '{}'", text, format);
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn post(title: &str, date: &str, category: Option<&str>) -> String {
        let category_line = category
            .map(|c| format!("category = \"{c}\"\n"))
            .unwrap_or_default();
        format!(
            "++++\ntitle = \"{title}\"\npublish_date = \"{date}\"\n{category_line}++++\nBody of {title}."
        )
    }

    fn site_with_blog() -> (TempDir, SiteConfig) {
        let dir = TempDir::new().unwrap();
        let content = dir.path().join("content");
        write(&content.join("about.md"), "++++\ntitle = \"About\"\n++++\nAbout.");
        write(
            &content.join("blog/post1.md"),
            &post("Post One", "01-01-2024 10:00", Some("news")),
        );
        write(
            &content.join("blog/post2.md"),
            &post("Post Two", "02-03-2024 10:00", None),
        );
        write(
            &content.join("blog/post3.md"),
            &post("Post Three", "05-02-2024 10:00", Some("news")),
        );
        (dir, SiteConfig::default())
    }

    #[test]
    fn test_local_aggregation_sorts_by_date_descending() {
        let (dir, config) = site_with_blog();
        let mut site = SiteGenerator::new(config, dir.path()).unwrap();
        site.process_content_tree().unwrap();
        site.aggregate_posts().unwrap();

        let blog = site.tree.get("blog").unwrap();
        let index = site.tree.index_page(blog).unwrap();
        let posts: Vec<String> = site
            .tree
            .node(index)
            .as_page()
            .unwrap()
            .aggregated_posts()
            .iter()
            .map(|&p| site.tree.node(p).name.clone())
            .collect();
        assert_eq!(posts, vec!["post2", "post3", "post1"]);
    }

    #[test]
    fn test_global_aggregation_builds_home() {
        let (dir, config) = site_with_blog();
        let mut site = SiteGenerator::new(config, dir.path()).unwrap();
        site.process_content_tree().unwrap();
        site.aggregate_posts().unwrap();

        let home = site.tree.index_page(site.tree.root()).unwrap();
        assert_eq!(site.tree.node(home).name, "home");
        // `about` is a page (direct child of the root), not a post.
        assert_eq!(
            site.tree.node(home).as_page().unwrap().aggregated_posts().len(),
            3
        );
        assert_eq!(site.globally_aggregated.len(), 3);
    }

    #[test]
    fn test_both_lists_is_an_error() {
        let (dir, mut config) = site_with_blog();
        config.locally_aggregate_whitelist = vec!["blog".to_string()];
        config.locally_aggregate_blacklist = vec!["other".to_string()];
        let err = SiteGenerator::new(config, dir.path()).unwrap_err();
        assert!(matches!(err, GenerateError::AggregateFilter { scope: "local" }));
    }

    #[test]
    fn test_local_aggregation_blacklist_by_path() {
        let (dir, mut config) = site_with_blog();
        config.locally_aggregate_blacklist = vec!["/blog".to_string()];
        let mut site = SiteGenerator::new(config, dir.path()).unwrap();
        site.process_content_tree().unwrap();
        site.aggregate_posts().unwrap();

        let blog = site.tree.get("blog").unwrap();
        assert!(site.tree.index_page(blog).is_none());
    }

    #[test]
    fn test_category_pages() {
        let (dir, mut config) = site_with_blog();
        config.categories.build = true;
        config.categories.list_page_name = Some("categories".to_string());
        config.categories.group = true;
        let mut site = SiteGenerator::new(config, dir.path()).unwrap();
        site.process_content_tree().unwrap();
        site.aggregate_posts().unwrap();
        site.build_category_pages().unwrap();

        let categories = site.categories.as_ref().unwrap();
        assert_eq!(
            categories.posts_by_category.keys().collect::<Vec<_>>(),
            vec!["news", "Uncategorized"]
        );
        assert_eq!(categories.posts_by_category["news"].len(), 2);
        assert!(categories.list_page.is_some());
        let folder = categories.folder.unwrap();
        assert_eq!(site.tree.index_page(folder), categories.list_page);
        assert_eq!(site.tree.path(folder), "/categories");
    }

    #[test]
    fn test_uncategorized_disallowed_names_offenders() {
        let (dir, mut config) = site_with_blog();
        config.categories.build = true;
        config.categories.allow_uncategorized = false;
        let mut site = SiteGenerator::new(config, dir.path()).unwrap();
        site.process_content_tree().unwrap();
        site.aggregate_posts().unwrap();

        let err = site.build_category_pages().unwrap_err();
        match err {
            GenerateError::Uncategorized { names } => {
                assert_eq!(names, vec!["/blog/post2".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_archive_buckets_are_chronological() {
        let (dir, mut config) = site_with_blog();
        config.archive.by_month = true;
        config.archive.by_year = true;
        config.archive.list_page_name = Some("archive".to_string());
        config.archive.group = true;
        let mut site = SiteGenerator::new(config, dir.path()).unwrap();
        site.process_content_tree().unwrap();
        site.aggregate_posts().unwrap();
        site.build_archive().unwrap();

        let archive = site.archive.as_ref().unwrap();
        // "February, 2024" would sort before "January, 2024" lexically;
        // chronological order puts March first.
        assert_eq!(
            archive.posts_by_month.keys().collect::<Vec<_>>(),
            vec!["March, 2024", "February, 2024", "January, 2024"]
        );

        site.build_archive_pages().unwrap();
        let archive = site.archive.as_ref().unwrap();
        assert_eq!(archive.pages_by_month.len(), 3);
        assert_eq!(archive.pages_by_year.len(), 1);
        assert!(archive.list_page.is_some());
    }

    #[test]
    fn test_archive_pages_require_build_archive() {
        let (dir, mut config) = site_with_blog();
        config.archive.by_month = true;
        let mut site = SiteGenerator::new(config, dir.path()).unwrap();
        site.process_content_tree().unwrap();
        assert!(matches!(
            site.build_archive_pages(),
            Err(GenerateError::ArchiveNotBuilt)
        ));
    }

    #[test]
    fn test_pagination_during_aggregation() {
        let (dir, mut config) = site_with_blog();
        config.posts_per_page = Some(2);
        let mut site = SiteGenerator::new(config, dir.path()).unwrap();
        site.process_content_tree().unwrap();
        site.aggregate_posts().unwrap();

        let blog = site.tree.get("blog").unwrap();
        let index = site.tree.index_page(blog).unwrap();
        let pagination = site
            .tree
            .node(index)
            .as_page()
            .unwrap()
            .pagination()
            .unwrap()
            .clone();
        assert_eq!(pagination.page_number, 1);
        assert_eq!(pagination.max_page_number, 2);
        assert_eq!(site.tree.get("blog/page2").unwrap(), pagination.last_page);
    }

    #[test]
    fn test_parse_date_accepts_date_only() {
        let full = parse_date("15-01-2024 10:30", "%d-%m-%Y %H:%M").unwrap();
        assert_eq!(full.format("%Y-%m-%d %H:%M").to_string(), "2024-01-15 10:30");
        let date_only = parse_date("15-01-2024", "%d-%m-%Y %H:%M").unwrap();
        assert_eq!(date_only.format("%H:%M").to_string(), "00:00");
        assert!(parse_date("not a date", "%d-%m-%Y %H:%M").is_none());
    }
}
