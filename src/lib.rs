//! canopy: a static site generator built around an explicit content tree
//!
//! Content is read from a directory of markdown files into a tree of folders
//! and pages, optionally aggregated, paginated and grouped into category and
//! archive pages, and rendered through Tera templates with an embedded
//! default theme.

pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod templates;
pub mod tree;

use anyhow::Result;
use std::path::Path;

/// The main application handle: configuration plus resolved directories.
#[derive(Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Content directory
    pub content_dir: std::path::PathBuf,
    /// Static files directory
    pub static_dir: std::path::PathBuf,
    /// Site template overrides
    pub templates_dir: std::path::PathBuf,
    /// Theme directory
    pub theme_dir: std::path::PathBuf,
    /// Build (output) directory
    pub build_dir: std::path::PathBuf,
}

impl Site {
    /// Create a new Site instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("site.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let content_dir = base_dir.join(&config.content_dir);
        let static_dir = base_dir.join(&config.static_dir);
        let templates_dir = base_dir.join(&config.templates_dir);
        let theme_dir = base_dir.join(&config.theme_dir);
        let build_dir = base_dir.join(&config.build_dir);

        Ok(Self {
            config,
            base_dir,
            content_dir,
            static_dir,
            templates_dir,
            theme_dir,
            build_dir,
        })
    }

    /// Initialize a new site
    pub fn init(&self) -> Result<()> {
        commands::init::run(self)
    }

    /// Build the static site
    pub fn build(&self) -> Result<()> {
        commands::build::run(self)
    }

    /// Clean the build directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
