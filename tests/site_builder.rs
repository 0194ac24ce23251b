use eventsite::components::site_builder::{build_site, missing_include_marker};
use eventsite::config::SiteConfig;
use std::fs;
use std::path::Path;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn test_build_site_expands_includes_and_copies_assets() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "_includes/footer.html", "<footer>Community Group</footer>\n");
    write(root, "_includes/events-upcoming.html", "<p>No upcoming events at this time. Check back soon!</p>\n");
    write(
        root,
        "index.html",
        "---\nlayout: default\n---\n<main>{% include events-upcoming.html %}</main>\n{% include footer.html %}",
    );
    write(root, "pastevents.html", "<main>{% include events-past.html %}</main>");
    write(root, "simple.css", "body { margin: 0; }");

    let config = SiteConfig::load(root).unwrap();
    let report = build_site(&config).unwrap();

    let out = root.join("_site");
    assert_eq!(report.built.len(), 2);
    assert!(report.skipped.is_empty());
    assert!(report.missing.is_empty());

    let index = fs::read_to_string(out.join("index.html")).unwrap();
    assert_eq!(
        index,
        "<main><p>No upcoming events at this time. Check back soon!</p>\n</main>\n<footer>Community Group</footer>\n"
    );

    // Missing partial leaves a visible marker, the build carries on
    let past = fs::read_to_string(out.join("pastevents.html")).unwrap();
    assert_eq!(
        past,
        format!("<main>{}</main>", missing_include_marker("events-past.html"))
    );

    assert_eq!(
        fs::read_to_string(out.join("simple.css")).unwrap(),
        "body { margin: 0; }"
    );
    assert!(out.join("_includes/footer.html").is_file());
    assert!(out.join("_includes/events-upcoming.html").is_file());
}

#[test]
fn test_build_site_skips_missing_sources() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "index.html", "<p>only page</p>");

    let config = SiteConfig::load(root).unwrap();
    let report = build_site(&config).unwrap();

    assert_eq!(report.built, vec![root.join("_site/index.html")]);
    assert_eq!(report.skipped, vec![root.join("pastevents.html")]);
    assert_eq!(report.missing, vec![root.join("simple.css")]);
    assert!(!root.join("_site/_includes").exists());
}

#[test]
fn test_build_site_uses_site_toml() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(
        root,
        "site.toml",
        "output_dir = \"public\"\npages = [\"about.html\"]\nassets = []\ncopy_includes = false\n",
    );
    write(root, "_includes/nav.html", "<nav></nav>");
    write(root, "about.html", "{% include nav.html %}<h1>About</h1>");

    let config = SiteConfig::load(root).unwrap();
    let report = build_site(&config).unwrap();

    assert_eq!(report.built, vec![root.join("public/about.html")]);
    assert_eq!(
        fs::read_to_string(root.join("public/about.html")).unwrap(),
        "<nav></nav><h1>About</h1>"
    );
    assert!(!root.join("public/_includes").exists());
}

#[test]
fn test_absolute_includes_dir_is_rejected_and_partials_survive() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    let parts = root.join("parts");
    write(root, "parts/footer.html", "<footer>keep me</footer>");
    write(
        root,
        "site.toml",
        &format!("includes_dir = {:?}\n", parts.display().to_string()),
    );
    write(root, "index.html", "{% include footer.html %}");

    assert!(SiteConfig::load(root).is_err());
    assert_eq!(
        fs::read_to_string(parts.join("footer.html")).unwrap(),
        "<footer>keep me</footer>"
    );
}

#[test]
fn test_output_inside_partials_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(
        root,
        "site.toml",
        "output_dir = \"_includes\"\npages = []\nassets = []\n",
    );
    write(root, "_includes/footer.html", "<footer>keep me</footer>");

    let config = SiteConfig::load(root).unwrap();
    assert!(build_site(&config).is_err());
    assert_eq!(
        fs::read_to_string(root.join("_includes/footer.html")).unwrap(),
        "<footer>keep me</footer>"
    );
}

#[test]
fn test_non_utf8_page_and_partial_are_copied_byte_for_byte() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("_includes")).unwrap();
    fs::write(root.join("_includes/footer.html"), b"<footer>caf\xe9</footer>").unwrap();
    fs::write(root.join("index.html"), b"---\n---\n<h1>Men\xfa</h1>{% include footer.html %}").unwrap();
    write(root, "pastevents.html", "<p>past</p>");

    let config = SiteConfig::load(root).unwrap();
    let report = build_site(&config).unwrap();

    assert_eq!(report.built.len(), 2);
    assert!(report.skipped.is_empty());
    assert_eq!(
        fs::read(root.join("_site/index.html")).unwrap(),
        b"<h1>Men\xfa</h1><footer>caf\xe9</footer>".to_vec()
    );
    assert_eq!(
        fs::read_to_string(root.join("_site/pastevents.html")).unwrap(),
        "<p>past</p>"
    );
}
