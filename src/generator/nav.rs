//! Navigation derivation: a filtered, display-oriented copy of the tree.

use std::collections::HashSet;

use serde_json::{Map, Value as JsonValue};
use tracing::warn;

use crate::tree::{NodeId, Tree};

use super::SiteGenerator;

impl SiteGenerator {
    /// Derives the navigation structure from the content tree.
    ///
    /// A node is navigable if it is a page per the is-page classifier, a
    /// folder, an index page, or a category/archive page unless those are
    /// excluded by configuration; the home index page never is, and only
    /// page 1 represents a pagination chain. Entries named by
    /// `exclude_from_navigation` (by name or path) are dropped on top. A
    /// `custom_navigation` in the configuration bypasses all of this.
    pub fn build_navigation(&mut self) {
        if self.navigation.is_some() {
            warn!("navigation already exists, overwriting");
        }
        if let Some(custom) = &self.config.custom_navigation {
            self.navigation = Some(custom.clone());
            return;
        }

        let category_paths: HashSet<String> = self
            .categories
            .as_ref()
            .map(|c| {
                c.all_pages()
                    .chain(c.list_page)
                    .map(|p| self.tree.path(p))
                    .collect()
            })
            .unwrap_or_default();
        let archive_paths: HashSet<String> = self
            .archive
            .as_ref()
            .map(|a| {
                a.all_pages()
                    .into_iter()
                    .chain(a.list_page)
                    .map(|p| self.tree.path(p))
                    .collect()
            })
            .unwrap_or_default();

        let home_index = self.tree.index_page(self.tree.root());
        let is_page = self.is_page;
        let exclude_categories = self.config.exclude_categories_from_navigation;
        let exclude_archive = self.config.exclude_archive_from_navigation;
        let excluded = self.config.exclude_from_navigation.clone();

        let predicate = move |tree: &Tree, id: NodeId| -> bool {
            let node = tree.node(id);
            let path = tree.path(id);
            let is_category = category_paths.contains(&path);
            let is_archive = archive_paths.contains(&path);

            let navigable = (node.is_page()
                && is_page(tree, id)
                && !is_category
                && !is_archive)
                || node.is_folder()
                || (node.is_page() && tree.is_index_page(id))
                || (!exclude_categories && is_category)
                || (!exclude_archive && is_archive);

            navigable
                && Some(id) != home_index
                && node
                    .as_page()
                    .and_then(|p| p.pagination())
                    .map_or(true, |p| p.page_number == 1)
                && !excluded.contains(&node.name)
                && !excluded.contains(&path)
        };

        let navigable_tree = self.tree.filtered(&predicate);
        let derived = nav_value(&navigable_tree, navigable_tree.root());

        let mut navigation = Map::new();
        if let Some(home_name) = &self.config.home_name_in_navigation {
            navigation.insert(home_name.clone(), JsonValue::String("/".to_string()));
        }
        if let JsonValue::Object(entries) = derived {
            navigation.extend(entries);
        }
        self.navigation = Some(JsonValue::Object(navigation));
    }
}

/// Serializes a subtree as an ordered name-to-href object; folders with
/// children become `{self, children}` entries, where `self` is the folder's
/// href when it has an index page and null otherwise.
fn nav_value(tree: &Tree, id: NodeId) -> JsonValue {
    let mut map = Map::new();
    for &child in tree.children(id) {
        let node = tree.node(child);
        let entry = if node.is_folder() && !tree.children(child).is_empty() {
            let own_href = if tree.index_page(child).is_some() {
                JsonValue::String(tree.href(child))
            } else {
                JsonValue::Null
            };
            serde_json::json!({
                "self": own_href,
                "children": nav_value(tree, child),
            })
        } else {
            JsonValue::String(tree.href(child))
        };
        map.insert(node.name.clone(), entry);
    }
    JsonValue::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn generator(mut mutate: impl FnMut(&mut SiteConfig)) -> SiteGenerator {
        let dir = TempDir::new().unwrap();
        let content = dir.path().join("content");
        write(&content.join("about.md"), "About.");
        write(
            &content.join("blog/post1.md"),
            "++++\npublish_date = \"01-01-2024 10:00\"\n++++\nOne.",
        );
        write(
            &content.join("blog/post2.md"),
            "++++\npublish_date = \"02-01-2024 10:00\"\n++++\nTwo.",
        );
        let mut config = SiteConfig::default();
        mutate(&mut config);
        let mut site = SiteGenerator::new(config, dir.path()).unwrap();
        site.process_content_tree().unwrap();
        site.aggregate_posts().unwrap();
        site
    }

    #[test]
    fn test_navigation_has_pages_and_folders_but_not_home() {
        let mut site = generator(|_| {});
        site.build_navigation();
        let nav = site.navigation.as_ref().unwrap().as_object().unwrap();

        assert_eq!(nav["about"], "/about");
        // The posts are filtered out, so the blog folder serializes as a
        // plain link to its aggregated index.
        assert_eq!(nav["blog"], "/blog");
        assert!(!nav.contains_key("home"));
    }

    #[test]
    fn test_home_name_is_prepended() {
        let mut site = generator(|config| {
            config.home_name_in_navigation = Some("Home".to_string());
        });
        site.build_navigation();
        let nav = site.navigation.as_ref().unwrap().as_object().unwrap();
        assert_eq!(nav.keys().next().unwrap(), "Home");
        assert_eq!(nav["Home"], "/");
    }

    #[test]
    fn test_exclusion_by_name() {
        let mut site = generator(|config| {
            config.exclude_from_navigation = vec!["about".to_string()];
        });
        site.build_navigation();
        let nav = site.navigation.as_ref().unwrap().as_object().unwrap();
        assert!(!nav.contains_key("about"));
        assert!(nav.contains_key("blog"));
    }

    #[test]
    fn test_custom_navigation_bypasses_derivation() {
        let custom = serde_json::json!({"somewhere": "/else"});
        let mut site = generator(|config| {
            config.custom_navigation = Some(custom.clone());
        });
        site.build_navigation();
        assert_eq!(site.navigation.as_ref().unwrap(), &custom);
    }

    #[test]
    fn test_categories_respect_exclusion_flag() {
        let mut site = generator(|config| {
            config.categories.build = true;
            config.exclude_categories_from_navigation = true;
        });
        site.build_category_pages().unwrap();
        site.build_navigation();
        let nav = site.navigation.as_ref().unwrap().as_object().unwrap();
        assert!(!nav.contains_key("Uncategorized"));
    }
}
