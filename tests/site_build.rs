//! End-to-end build of a small site through the public API.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use canopy::Site;

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn post(title: &str, date: &str) -> String {
    format!("++++\ntitle = \"{title}\"\npublish_date = \"{date}\"\n++++\nBody of {title}.")
}

fn scaffold_site() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(
        &dir.path().join("site.yml"),
        "name: testsite\nposts_per_page: 2\nhome_name_in_navigation: home\n",
    );

    let content = dir.path().join("content");
    write(&content.join("index.md"), "# Welcome home\n\nThe front page.");
    write(
        &content.join("about.md"),
        "++++\ntitle = \"About\"\n++++\nAll about this site.",
    );
    write(
        &content.join("blog/post1.md"),
        &post("Post One", "01-01-2024 10:00"),
    );
    write(
        &content.join("blog/post2.md"),
        &post("Post Two", "02-03-2024 10:00"),
    );
    write(
        &content.join("blog/post3.md"),
        &post("Post Three", "05-02-2024 10:00"),
    );

    write(&dir.path().join("static/style.css"), "body { margin: 0; }");
    dir
}

fn read(build: &Path, rel: &str) -> String {
    fs::read_to_string(build.join(rel)).unwrap_or_else(|_| panic!("missing {rel}"))
}

#[test]
fn test_full_site_build() {
    let dir = scaffold_site();
    let site = Site::new(dir.path()).unwrap();
    site.build().unwrap();

    let build = dir.path().join("build");

    // The home page comes from content/index.md.
    let home = read(&build, "index.html");
    assert!(home.contains("Welcome home"));
    assert!(home.contains("testsite"));

    // Standalone pages render under their own directory.
    let about = read(&build, "about/index.html");
    assert!(about.contains("All about this site."));

    // Posts render individually.
    let post1 = read(&build, "blog/post1/index.html");
    assert!(post1.contains("Body of Post One."));

    // Static files are copied over.
    assert_eq!(read(&build, "style.css"), "body { margin: 0; }");
}

#[test]
fn test_blog_folder_is_aggregated_and_paginated() {
    let dir = scaffold_site();
    let site = Site::new(dir.path()).unwrap();
    site.build().unwrap();

    let build = dir.path().join("build");

    // Three posts at two per page: the first page serves the folder URL
    // and is mirrored at page1, the rest follow as pageN.
    let page1 = read(&build, "blog/index.html");
    assert_eq!(page1, read(&build, "blog/page1/index.html"));
    let page2 = read(&build, "blog/page2/index.html");

    // Newest first: March and February on page one, January on page two.
    assert!(page1.contains("/blog/post2"));
    assert!(page1.contains("/blog/post3"));
    assert!(!page1.contains("/blog/post1"));
    assert!(page2.contains("/blog/post1"));

    assert!(page1.contains("1 / 2"));
    assert!(page1.contains("/blog/page2"));
}

#[test]
fn test_navigation_links() {
    let dir = scaffold_site();
    let site = Site::new(dir.path()).unwrap();
    site.build().unwrap();

    let build = dir.path().join("build");
    let home = read(&build, "index.html");
    assert!(home.contains("href=\"/about\""));
    assert!(home.contains("href=\"/blog\""));
    assert!(home.contains(">home<"));
}

#[test]
fn test_index_less_folders_get_placeholders() {
    let dir = TempDir::new().unwrap();
    write(
        &dir.path().join("site.yml"),
        "name: testsite\nlocally_aggregate_blacklist: [blog]\n",
    );
    let content = dir.path().join("content");
    write(&content.join("index.md"), "# Home");
    write(
        &content.join("blog/post1.md"),
        &post("Post One", "01-01-2024 10:00"),
    );
    fs::create_dir_all(content.join("drafts")).unwrap();

    let site = Site::new(dir.path()).unwrap();
    site.build().unwrap();

    let build = dir.path().join("build");

    // The blacklisted folder keeps a leaf but gets no aggregated index,
    // so its URL serves the rendered placeholder.
    let placeholder = read(&build, "blog/index.html");
    assert!(placeholder.contains("404"));
    assert!(read(&build, "blog/post1/index.html").contains("Body of Post One."));

    // A folder with no leaf descendants gets no placeholder at all.
    assert!(!build.join("drafts/index.html").exists());
    assert!(!build.join("drafts").exists());
}

#[test]
fn test_rebuild_wipes_stale_output() {
    let dir = scaffold_site();
    let site = Site::new(dir.path()).unwrap();
    site.build().unwrap();

    let stale = dir.path().join("build/stale.html");
    fs::write(&stale, "leftover").unwrap();
    site.build().unwrap();
    assert!(!stale.exists());
}

#[test]
fn test_clean_removes_build_dir() {
    let dir = scaffold_site();
    let site = Site::new(dir.path()).unwrap();
    site.build().unwrap();
    assert!(site.build_dir.exists());
    site.clean().unwrap();
    assert!(!site.build_dir.exists());
}

#[test]
fn test_init_then_build() {
    let dir = TempDir::new().unwrap();
    canopy::commands::init::init_site(dir.path()).unwrap();
    assert!(dir.path().join("site.yml").exists());
    assert!(dir.path().join("content/blog/hello-world.md").exists());

    let site = Site::new(dir.path()).unwrap();
    site.build().unwrap();
    assert!(dir.path().join("build/index.html").exists());
    assert!(dir.path().join("build/blog/hello-world/index.html").exists());
}
