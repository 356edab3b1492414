//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::Site;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    // Create directory structure
    fs::create_dir_all(target_dir)?;
    fs::create_dir_all(target_dir.join("content/blog"))?;
    fs::create_dir_all(target_dir.join("static"))?;
    fs::create_dir_all(target_dir.join("templates"))?;

    // Create default site.yml
    let config_content = r#"# Site configuration

# Site
name: unnamed
url: http://localhost:8000
subtitle: ''
language: en

# Content
accepted_file_types: ['.md']
front_matter_delimiter: '+'
# posts_per_page: 10
publish_date_key: publish_date
read_date_format: '%d-%m-%Y %H:%M'
display_date_format: '%B %-d, %Y'

# Directories
content_dir: content
static_dir: static
templates_dir: templates
theme_dir: theme
build_dir: build

# Navigation
home_name_in_navigation: home
exclude_categories_from_navigation: false
exclude_archive_from_navigation: false
exclude_from_navigation: []

# Category pages
categories:
  build: false
  key: category
  allow_uncategorized: true
  uncategorized_name: Uncategorized

# Archive pages
archive:
  by_month: false
  by_year: false
  month_format: '%B, %Y'
  year_format: '%Y'
"#;

    fs::write(target_dir.join("site.yml"), config_content)?;

    // Create a home page and a sample post
    let home = r#"# Welcome

This site was just initialized. Edit `content/index.md` to change this page,
drop more markdown files under `content/` to add pages, and put posts in
`content/blog/`.
"#;

    let now = chrono::Local::now();
    let sample_post = format!(
        r#"++++++++++
publish_date = "{}"
++++++++++

# Hello world

This is your first post. Its publish date comes from the front matter
block above; posts without one fall back to the file's modification time.
"#,
        now.format("%d-%m-%Y %H:%M")
    );

    fs::write(target_dir.join("content/index.md"), home)?;
    fs::write(target_dir.join("content/blog/hello-world.md"), sample_post)?;

    Ok(())
}

/// Run the init command with an existing Site instance
pub fn run(site: &Site) -> Result<()> {
    init_site(&site.base_dir)
}
