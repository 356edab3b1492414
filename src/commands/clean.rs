//! Clean the build directory.

use anyhow::Result;
use std::fs;

use crate::Site;

pub fn run(site: &Site) -> Result<()> {
    if site.build_dir.exists() {
        fs::remove_dir_all(&site.build_dir)?;
        tracing::info!("deleted {:?}", site.build_dir);
    }
    Ok(())
}
