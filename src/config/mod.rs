//! Site configuration (site.yml)

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Main site configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub name: String,
    pub url: String,
    pub subtitle: String,
    pub author_link: String,
    pub language: String,

    // Content
    /// Accepted content file extensions, including the leading dot.
    pub accepted_file_types: Vec<String>,
    /// Character whose repeated occurrence delimits the front-matter block.
    pub front_matter_delimiter: char,
    /// Posts per paginated page; absent means no pagination.
    pub posts_per_page: Option<usize>,
    pub publish_date_key: String,
    pub read_date_format: String,
    pub display_date_format: String,

    // Directories, relative to the site directory
    pub content_dir: String,
    pub static_dir: String,
    pub templates_dir: String,
    pub theme_dir: String,
    pub build_dir: String,

    // Navigation
    /// When set, the navigation starts with an entry of this name linking
    /// to the home page.
    pub home_name_in_navigation: Option<String>,
    pub exclude_categories_from_navigation: bool,
    pub exclude_archive_from_navigation: bool,
    /// Names or paths of nodes to leave out of the navigation.
    pub exclude_from_navigation: Vec<String>,
    /// A fully custom navigation structure; bypasses derivation entirely.
    pub custom_navigation: Option<JsonValue>,

    // Aggregation; each pass accepts a whitelist or a blacklist, not both
    pub locally_aggregate_whitelist: Vec<String>,
    pub locally_aggregate_blacklist: Vec<String>,
    pub globally_aggregate_whitelist: Vec<String>,
    pub globally_aggregate_blacklist: Vec<String>,

    pub categories: CategoryConfig,
    pub archive: ArchiveConfig,

    // Passed through to the templates untouched
    pub theme_options: serde_json::Map<String, JsonValue>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "unnamed".to_string(),
            url: "http://localhost:8000".to_string(),
            subtitle: String::new(),
            author_link: String::new(),
            language: "en".to_string(),

            accepted_file_types: vec![".md".to_string()],
            front_matter_delimiter: '+',
            posts_per_page: None,
            publish_date_key: "publish_date".to_string(),
            read_date_format: "%d-%m-%Y %H:%M".to_string(),
            display_date_format: "%B %-d, %Y".to_string(),

            content_dir: "content".to_string(),
            static_dir: "static".to_string(),
            templates_dir: "templates".to_string(),
            theme_dir: "theme".to_string(),
            build_dir: "build".to_string(),

            home_name_in_navigation: None,
            exclude_categories_from_navigation: false,
            exclude_archive_from_navigation: false,
            exclude_from_navigation: Vec::new(),
            custom_navigation: None,

            locally_aggregate_whitelist: Vec::new(),
            locally_aggregate_blacklist: Vec::new(),
            globally_aggregate_whitelist: Vec::new(),
            globally_aggregate_blacklist: Vec::new(),

            categories: CategoryConfig::default(),
            archive: ArchiveConfig::default(),

            theme_options: serde_json::Map::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("reading {}", path.as_ref().display()))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing {}", path.as_ref().display()))?;
        Ok(config)
    }
}

/// Category page configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryConfig {
    pub build: bool,
    /// The front-matter key holding a post's category.
    pub key: String,
    pub allow_uncategorized: bool,
    pub uncategorized_name: String,
    /// When set, a page of this name lists every category with its posts.
    pub list_page_name: Option<String>,
    /// Group the category pages into one folder instead of the root.
    pub group: bool,
}

impl Default for CategoryConfig {
    fn default() -> Self {
        Self {
            build: false,
            key: "category".to_string(),
            allow_uncategorized: true,
            uncategorized_name: "Uncategorized".to_string(),
            list_page_name: None,
            group: false,
        }
    }
}

/// Archive page configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    pub by_month: bool,
    pub by_year: bool,
    /// When set, a page of this name lists the archive buckets with their
    /// posts.
    pub list_page_name: Option<String>,
    /// Group the archive pages into one folder instead of the root.
    pub group: bool,
    pub display_by_month_in_list_page: bool,
    pub display_by_year_in_list_page: bool,
    pub month_format: String,
    pub year_format: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            by_month: false,
            by_year: false,
            list_page_name: None,
            group: false,
            display_by_month_in_list_page: true,
            display_by_year_in_list_page: false,
            month_format: "%B, %Y".to_string(),
            year_format: "%Y".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SiteConfig::default();
        assert_eq!(config.name, "unnamed");
        assert_eq!(config.accepted_file_types, vec![".md".to_string()]);
        assert_eq!(config.front_matter_delimiter, '+');
        assert!(config.posts_per_page.is_none());
        assert!(config.categories.allow_uncategorized);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let yaml = "name: my site\nposts_per_page: 5\ncategories:\n  build: true\n";
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.name, "my site");
        assert_eq!(config.posts_per_page, Some(5));
        assert!(config.categories.build);
        assert_eq!(config.url, "http://localhost:8000");
        assert_eq!(config.categories.key, "category");
    }
}
