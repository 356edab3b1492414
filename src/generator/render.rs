//! Rendering: flattened template-facing views and the output driver.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use serde_json::{json, Value as JsonValue};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::content::{excerpt, ExcerptOptions, FrontMatter};
use crate::templates::TemplateRenderer;
use crate::tree::{NodeId, Pagination, Tree};

use super::SiteGenerator;

/// Percent-encoding set mirroring form encoding: everything but
/// alphanumerics and `_.-~` is escaped, spaces become `+`.
const FORM_ENCODE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b' ');

fn quote_plus(text: &str) -> String {
    utf8_percent_encode(text, FORM_ENCODE)
        .to_string()
        .replace(' ', "+")
}

#[derive(Debug, Clone, Serialize)]
pub struct Breadcrumb {
    pub name: String,
    pub href: String,
}

/// The flattened view of one page handed to the template engine.
#[derive(Debug, Clone, Serialize)]
pub struct RenderablePage {
    pub name: String,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub href: String,
    pub site_url: String,
    pub aggregated_posts: Vec<RenderablePage>,
    pub aggregated_grouped_posts: IndexMap<String, Vec<RenderablePage>>,
    /// Empty object unless this page belongs to a multi-page chain.
    pub pagination: JsonValue,
    /// Preformatted with the configured display date format.
    pub publish_date: Option<String>,
    pub user_data: IndexMap<String, String>,
    pub front_matter: FrontMatter,
    pub is_post: bool,
    pub absolute_canonical_href: String,
    pub breadcrumbs: Vec<Breadcrumb>,
}

impl RenderablePage {
    pub fn build(tree: &Tree, id: NodeId, display_date_format: &str) -> Self {
        let node = tree.node(id);
        let page = node.as_page();
        let front_matter = page
            .and_then(|p| p.front_matter.clone())
            .unwrap_or_default();

        let name = node.name.clone();
        let title = front_matter
            .get("title")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| titlecase(&name));
        let content = page
            .and_then(|p| p.content.clone())
            .unwrap_or_default();
        let excerpt = if content.is_empty() {
            String::new()
        } else {
            excerpt(&content, &ExcerptOptions::default())
        };
        let href = tree.href(id);
        let site_url = node.meta.site_url.clone();

        let aggregated_posts = page
            .map(|p| p.aggregated_posts().to_vec())
            .unwrap_or_default()
            .into_iter()
            .map(|post| Self::build(tree, post, display_date_format))
            .collect();
        let aggregated_grouped_posts = page
            .and_then(|p| p.aggregated_groups().cloned())
            .unwrap_or_default()
            .into_iter()
            .map(|(group, posts)| {
                (
                    group,
                    posts
                        .into_iter()
                        .map(|post| Self::build(tree, post, display_date_format))
                        .collect(),
                )
            })
            .collect();

        let pagination_record = page.and_then(|p| p.pagination());
        let pagination = match pagination_record {
            Some(p) if p.max_page_number > 1 => pagination_nav(tree, p),
            _ => json!({}),
        };

        let publish_date = node
            .meta
            .publish_date
            .map(|d| d.format(display_date_format).to_string());
        let is_post = node.meta.is_post;
        let canonical = node
            .meta
            .canonical_href
            .clone()
            .unwrap_or_else(|| href.clone());
        let absolute_canonical_href = quote_plus(&format!("{site_url}{canonical}"));

        let mut breadcrumbs = vec![Breadcrumb {
            name: "home".to_string(),
            href: "/".to_string(),
        }];
        let ancestors = tree.ancestors(id);
        let without_root = ancestors.len().saturating_sub(1);
        for &ancestor in ancestors[..without_root].iter().rev() {
            let folder = tree.node(ancestor);
            breadcrumbs.push(Breadcrumb {
                name: folder.name.clone(),
                href: if tree.index_page(ancestor).is_some() {
                    tree.href(ancestor)
                } else {
                    String::new()
                },
            });
        }
        let on_first_page = pagination_record.map_or(true, |p| p.page_number == 1);
        if href != "/" && !tree.is_index_page(id) && on_first_page {
            breadcrumbs.push(Breadcrumb {
                name: if is_post { title.clone() } else { name.clone() },
                href: href.clone(),
            });
        }

        Self {
            name,
            title,
            content,
            excerpt,
            href,
            site_url,
            aggregated_posts,
            aggregated_grouped_posts,
            pagination,
            publish_date,
            user_data: node.user_data.clone(),
            front_matter,
            is_post,
            absolute_canonical_href,
            breadcrumbs,
        }
    }

    /// A blank page view, used for generated placeholder pages.
    pub fn empty() -> Self {
        Self {
            name: String::new(),
            title: String::new(),
            content: String::new(),
            excerpt: String::new(),
            href: String::new(),
            site_url: String::new(),
            aggregated_posts: Vec::new(),
            aggregated_grouped_posts: IndexMap::new(),
            pagination: json!({}),
            publish_date: None,
            user_data: IndexMap::new(),
            front_matter: FrontMatter::new(),
            is_post: false,
            absolute_canonical_href: String::new(),
            breadcrumbs: Vec::new(),
        }
    }
}

/// The chain navigation record of a paginated page.
fn pagination_nav(tree: &Tree, pagination: &Pagination) -> JsonValue {
    let last_href = tree.href(pagination.last_page);
    let root = last_href
        .replace(&format!("page{}", pagination.max_page_number), "");
    let root = root.trim_end_matches('/');
    json!({
        "page_number": pagination.page_number,
        "max_page_number": pagination.max_page_number,
        "first_page_href": tree.href(pagination.first_page),
        "last_page_href": last_href,
        "prev_page_href": pagination.prev_page.map(|p| tree.href(p)),
        "next_page_href": pagination.next_page.map(|p| tree.href(p)),
        "root": if root.is_empty() { "/" } else { root },
    })
}

/// Site-level information handed to every template render.
#[derive(Debug, Clone, Serialize)]
pub struct SiteInfo {
    pub name: String,
    pub url: String,
    pub subtitle: String,
    pub lang: String,
    pub navigation: JsonValue,
    pub category_nav: JsonValue,
    pub archive_nav: JsonValue,
    pub theme_options: serde_json::Map<String, JsonValue>,
    pub build_date: String,
    pub display_date_format: String,
    pub author_link: String,
}

impl SiteInfo {
    pub fn build(site: &SiteGenerator) -> Self {
        Self {
            name: site.config.name.clone(),
            url: site.config.url.clone(),
            subtitle: site.config.subtitle.clone(),
            lang: site.config.language.clone(),
            navigation: site.navigation.clone().unwrap_or_else(|| json!({})),
            category_nav: site
                .categories
                .as_ref()
                .map(|c| c.as_nav(&site.tree))
                .unwrap_or_else(|| json!({})),
            archive_nav: site
                .archive
                .as_ref()
                .map(|a| a.as_nav(&site.tree))
                .unwrap_or_else(|| json!({})),
            theme_options: site.config.theme_options.clone(),
            build_date: site
                .build_date
                .format(&site.config.display_date_format)
                .to_string(),
            display_date_format: site.config.display_date_format.clone(),
            author_link: site.config.author_link.clone(),
        }
    }
}

fn titlecase(name: &str) -> String {
    name.replace('_', " ")
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl SiteGenerator {
    /// Renders the whole site into the build directory, which is wiped and
    /// recreated first.
    pub fn render(&mut self, renderer: &TemplateRenderer) -> Result<()> {
        if self.build_dir.exists() {
            fs::remove_dir_all(&self.build_dir)
                .with_context(|| format!("wiping {}", self.build_dir.display()))?;
        }
        fs::create_dir_all(&self.build_dir)
            .with_context(|| format!("creating {}", self.build_dir.display()))?;

        self.copy_static(&self.theme_dir.join("static"))?;
        let static_dir = self.static_dir.clone();
        self.copy_static(&static_dir)?;

        // Aggregated pages go last, so every post they list has been
        // processed by the time their view is built.
        let mut leaves = self.tree.leaves(self.tree.root());
        leaves.sort_by_key(|&leaf| {
            self.tree.node(leaf).as_page().map_or(0, |p| {
                p.aggregated_posts().len() + p.aggregated_groups().map_or(0, |g| g.len())
            })
        });

        for leaf in leaves {
            if !self.tree.has_parsed_front_matter(leaf) {
                self.tree
                    .parse_front_matter(leaf, self.config.front_matter_delimiter)?;
            }
            if !self.tree.has_processed_content(leaf) {
                let markdown = &self.markdown;
                self.tree
                    .process_content(leaf, &|raw| markdown.render(raw))?;
            }

            let mut paths = vec![self.tree.render_path(leaf, &self.build_dir)];

            // The first page of a multi-page chain is served both at the
            // folder URL and at page1; whichever of the two it doesn't own
            // gets a copy, with the canonical address recorded.
            let pagination = self
                .tree
                .node(leaf)
                .as_page()
                .and_then(|p| p.pagination())
                .cloned();
            if let Some(pagination) = pagination {
                if pagination.page_number == 1 && pagination.max_page_number != 1 {
                    if let Some(dir) = paths[0].parent() {
                        if self.tree.is_index_page(leaf) {
                            paths.push(dir.join("page1").join("index.html"));
                        } else if let Some(parent_dir) = dir.parent() {
                            paths.push(parent_dir.join("index.html"));
                            let canonical = self
                                .tree
                                .node(leaf)
                                .parent()
                                .map(|parent| {
                                    let base = self.tree.href(parent);
                                    let name = &self.tree.node(leaf).name;
                                    if base == "/" {
                                        format!("/{name}")
                                    } else {
                                        format!("{base}/{name}")
                                    }
                                })
                                .unwrap_or_default();
                            self.tree.node_mut(leaf).meta.canonical_href = Some(canonical);
                        }
                    }
                }
            }

            let template = self
                .tree
                .node(leaf)
                .as_page()
                .and_then(|p| p.front_matter.as_ref())
                .and_then(|fm| fm.get("template"))
                .and_then(|v| v.as_str())
                .unwrap_or("default.html")
                .to_string();

            let page = RenderablePage::build(&self.tree, leaf, &self.config.display_date_format);
            let site_info = SiteInfo::build(self);
            let html = renderer.render(&template, &page, &site_info)?;

            for path in paths {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("creating {}", parent.display()))?;
                }
                fs::write(&path, &html)
                    .with_context(|| format!("writing {}", path.display()))?;
            }
        }

        self.write_placeholders(renderer)?;
        info!("rendered the site into {}", self.build_dir.display());
        Ok(())
    }

    /// Folders with no index page would expose a directory listing; any
    /// such folder with leaf descendants gets a rendered placeholder.
    fn write_placeholders(&self, renderer: &TemplateRenderer) -> Result<()> {
        let mut folders: Vec<NodeId> = self
            .tree
            .flat(self.tree.root())
            .into_iter()
            .filter(|&n| self.tree.node(n).is_folder())
            .collect();
        folders.push(self.tree.root());

        for folder in folders {
            if self.tree.index_page(folder).is_some() {
                continue;
            }
            if self.tree.leaves(folder).is_empty() {
                continue;
            }

            let path = self
                .build_dir
                .join(self.tree.path(folder).trim_start_matches('/'))
                .join("index.html");
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            let html = renderer.render(
                "404.html",
                &RenderablePage::empty(),
                &SiteInfo::build(self),
            )?;
            fs::write(&path, html).with_context(|| format!("writing {}", path.display()))?;

            if folder == self.tree.root() {
                warn!(
                    "there's no home index page; consider writing one or \
                     aggregating posts into it"
                );
            }
        }
        Ok(())
    }

    fn copy_static(&self, static_dir: &Path) -> Result<()> {
        if !static_dir.exists() {
            return Ok(());
        }
        for entry in WalkDir::new(static_dir) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(static_dir)
                .with_context(|| format!("stripping {}", static_dir.display()))?;
            let destination = self.build_dir.join(relative);
            if let Some(parent) = destination.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            fs::copy(entry.path(), &destination)
                .with_context(|| format!("copying {}", entry.path().display()))?;
        }
        Ok(())
    }
}
