//! Build the site into the build directory.

use anyhow::Result;

use crate::generator::SiteGenerator;
use crate::templates::TemplateRenderer;
use crate::Site;

/// Runs the full pipeline: walk the content, aggregate, paginate, derive
/// the navigation and render everything.
pub fn run(site: &Site) -> Result<()> {
    let start = std::time::Instant::now();

    let mut generator = SiteGenerator::new(site.config.clone(), &site.base_dir)?;
    generator.build()?;

    // Site templates take precedence over the theme's, which in turn
    // override the embedded defaults.
    let renderer = TemplateRenderer::new(&[
        site.theme_dir.join("templates"),
        site.templates_dir.clone(),
    ])?;
    generator.render(&renderer)?;

    tracing::info!(
        "built {} leaves in {:?}",
        generator.tree.leaves(generator.tree.root()).len(),
        start.elapsed()
    );
    Ok(())
}
