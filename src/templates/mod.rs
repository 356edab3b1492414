//! Template rendering with an embedded default theme.
//!
//! The default theme templates ship inside the binary; a site's
//! `templates/` directory and a theme's `templates/` directory override
//! them, with the site's own templates taking the highest precedence.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tera::{Context, Tera};
use walkdir::WalkDir;

use crate::generator::render::{RenderablePage, SiteInfo};

/// Template renderer with the embedded default theme.
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Creates a renderer. `override_dirs` are applied in order, each
    /// overriding the previous ones and the embedded templates.
    pub fn new(override_dirs: &[PathBuf]) -> Result<Self> {
        let mut tera = Tera::default();

        // We render full HTML documents, so URLs and markup must come
        // through unescaped.
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("base.html", include_str!("default_theme/base.html")),
            ("nav.html", include_str!("default_theme/nav.html")),
            ("default.html", include_str!("default_theme/default.html")),
            ("404.html", include_str!("default_theme/404.html")),
        ])?;

        for dir in override_dirs {
            if !dir.exists() {
                continue;
            }
            for entry in WalkDir::new(dir) {
                let entry = entry?;
                if !entry.file_type().is_file() {
                    continue;
                }
                if entry.path().extension().map_or(true, |e| e != "html") {
                    continue;
                }
                let name = template_name(entry.path(), dir);
                tera.add_template_file(entry.path(), Some(&name))?;
            }
        }

        tera.register_filter("strip_html", strip_html_filter);

        Ok(Self { tera })
    }

    /// Renders one page through the named template.
    pub fn render(
        &self,
        template_name: &str,
        page: &RenderablePage,
        site_info: &SiteInfo,
    ) -> Result<String> {
        let mut context = Context::new();
        context.insert("page", page);
        context.insert("site_info", site_info);
        Ok(self.tera.render(template_name, &context)?)
    }
}

fn template_name(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

/// Tera filter: strip HTML tags and entities.
fn strip_html_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("strip_html", "value", String, value);
    Ok(tera::Value::String(crate::content::strip_html(&s)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_templates_render() {
        let renderer = TemplateRenderer::new(&[]).unwrap();
        let mut page = RenderablePage::empty();
        page.title = "Hello".to_string();
        page.content = "<p>World</p>".to_string();
        let site_info = sample_site_info();

        let html = renderer.render("default.html", &page, &site_info).unwrap();
        assert!(html.contains("<p>World</p>"));
        assert!(html.contains("Hello"));
        assert!(html.contains("lang=\"en\""));
    }

    #[test]
    fn test_override_directory_wins() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("default.html"),
            "custom: {{ page.title }}",
        )
        .unwrap();
        let renderer = TemplateRenderer::new(&[dir.path().to_path_buf()]).unwrap();

        let mut page = RenderablePage::empty();
        page.title = "T".to_string();
        let html = renderer
            .render("default.html", &page, &sample_site_info())
            .unwrap();
        assert_eq!(html, "custom: T");
    }

    #[test]
    fn test_404_template_renders() {
        let renderer = TemplateRenderer::new(&[]).unwrap();
        let html = renderer
            .render("404.html", &RenderablePage::empty(), &sample_site_info())
            .unwrap();
        assert!(html.contains("404"));
    }

    fn sample_site_info() -> SiteInfo {
        SiteInfo {
            name: "test".to_string(),
            url: "http://localhost:8000".to_string(),
            subtitle: String::new(),
            lang: "en".to_string(),
            navigation: serde_json::json!({"about": "/about"}),
            category_nav: serde_json::json!({}),
            archive_nav: serde_json::json!({}),
            theme_options: serde_json::Map::new(),
            build_date: "January 1, 2024".to_string(),
            display_date_format: "%B %-d, %Y".to_string(),
            author_link: String::new(),
        }
    }
}
