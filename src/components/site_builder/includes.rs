//! Jekyll-style page preprocessing: front matter removal and
//! `{% include name %}` expansion.
//!
//! Pages and partials are handled as raw bytes so non-UTF-8 content is
//! copied through untouched.

use regex::bytes::{Captures, Regex};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{info, warn};

fn re_front_matter() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // `\A` anchors at the very start of the document only; the body may be empty
    RE.get_or_init(|| {
        Regex::new(r"(?s-u)\A---[ \t]*\r?\n(?:.*?\r?\n)?---[ \t]*(?:\r?\n|\z)").unwrap()
    })
}

fn re_include() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?-u)\{%\s*include\s+([^\s%}]+)\s*%\}").unwrap())
}

/// Comment left in place of a partial that could not be read
pub fn missing_include_marker(name: &str) -> String {
    format!("<!-- Include file not found: {} -->", name)
}

/// Drop a leading `---` delimited metadata block
pub fn remove_front_matter(content: &[u8]) -> Vec<u8> {
    re_front_matter().replace(content, &b""[..]).into_owned()
}

/// Replace every include directive with the named file from `base_dir`
///
/// Expansion is a single pass; directives inside included files are left as
/// they are.
pub fn process_includes(content: &[u8], base_dir: &Path) -> Vec<u8> {
    re_include()
        .replace_all(content, |caps: &Captures| {
            let name = String::from_utf8_lossy(&caps[1]);
            let path = base_dir.join(name.as_ref());
            match fs::read(&path) {
                Ok(partial) => {
                    info!("Included {}", name);
                    partial
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    warn!("Include file not found: {}", name);
                    missing_include_marker(&name).into_bytes()
                }
                Err(e) => {
                    warn!("Could not read include {}: {}", path.display(), e);
                    missing_include_marker(&name).into_bytes()
                }
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip(page: &str) -> String {
        String::from_utf8(remove_front_matter(page.as_bytes())).unwrap()
    }

    fn expand(page: &str, base_dir: &Path) -> String {
        String::from_utf8(process_includes(page.as_bytes(), base_dir)).unwrap()
    }

    #[test]
    fn test_remove_front_matter() {
        let page = "---\nlayout: default\ntitle: Home\n---\n<h1>Hi</h1>\n";
        assert_eq!(strip(page), "<h1>Hi</h1>\n");
    }

    #[test]
    fn test_empty_front_matter() {
        assert_eq!(strip("---\n---\n<h1>Hi</h1>\n"), "<h1>Hi</h1>\n");
        assert_eq!(strip("---\r\n---\r\nbody"), "body");
        assert_eq!(strip("---\n---"), "");
    }

    #[test]
    fn test_front_matter_only_at_start() {
        let page = "<h1>Hi</h1>\n---\nnot: metadata\n---\n";
        assert_eq!(strip(page), page);

        let leading_space = " ---\na: b\n---\nbody";
        assert_eq!(strip(leading_space), leading_space);
    }

    #[test]
    fn test_front_matter_removed_once() {
        let page = "---\na: 1\n---\nbody\n---\nb: 2\n---\nrest";
        assert_eq!(strip(page), "body\n---\nb: 2\n---\nrest");
    }

    #[test]
    fn test_no_front_matter_passes_through() {
        assert_eq!(strip("<p>plain</p>"), "<p>plain</p>");
        assert_eq!(strip(""), "");
    }

    #[test]
    fn test_front_matter_with_non_utf8_body() {
        let page = b"---\ntitle: caf\xe9\n---\n<p>caf\xe9</p>";
        assert_eq!(remove_front_matter(page), b"<p>caf\xe9</p>".to_vec());
    }

    #[test]
    fn test_process_includes() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("footer.html"), "<footer>© 2024</footer>\n").unwrap();

        let page = "<main></main>\n{% include footer.html %}\n{%include   footer.html%}";
        let built = expand(page, dir.path());
        assert_eq!(
            built,
            "<main></main>\n<footer>© 2024</footer>\n\n<footer>© 2024</footer>\n"
        );
    }

    #[test]
    fn test_include_keeps_exact_bytes() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("footer.html"), b"<footer>caf\xe9</footer>").unwrap();

        let built = process_includes(b"<body>{% include footer.html %}</body>", dir.path());
        assert_eq!(built, b"<body><footer>caf\xe9</footer></body>".to_vec());
    }

    #[test]
    fn test_missing_include_leaves_marker() {
        let dir = tempfile::tempdir().unwrap();
        let built = expand("a {% include nav.html %} b", dir.path());
        assert_eq!(built, "a <!-- Include file not found: nav.html --> b");
    }

    #[test]
    fn test_includes_are_not_recursive() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("outer.html"), "[{% include inner.html %}]").unwrap();
        fs::write(dir.path().join("inner.html"), "inner").unwrap();

        let built = expand("{% include outer.html %}", dir.path());
        assert_eq!(built, "[{% include inner.html %}]");
    }

    #[test]
    fn test_include_from_subdirectory() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("parts")).unwrap();
        fs::write(dir.path().join("parts/head.html"), "<head></head>").unwrap();

        let built = expand("{% include parts/head.html %}", dir.path());
        assert_eq!(built, "<head></head>");
    }
}
