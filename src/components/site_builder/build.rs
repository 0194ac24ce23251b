use super::includes::{process_includes, remove_front_matter};
use crate::config::SiteConfig;
use crate::error::{config_error, other_error, SiteResult};
use crate::utils::fs::write_atomic;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

/// What a site build did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Pages written to the output directory
    pub built: Vec<PathBuf>,
    /// Pages listed in the layout but absent from the source
    pub skipped: Vec<PathBuf>,
    /// Assets and partials copied
    pub copied: Vec<PathBuf>,
    /// Assets that could not be found
    pub missing: Vec<PathBuf>,
}

/// Expand one page in memory: strip front matter, then expand includes
pub fn render_page(input: &Path, includes_dir: &Path) -> SiteResult<Vec<u8>> {
    let content = fs::read(input)?;
    let content = remove_front_matter(&content);
    Ok(process_includes(&content, includes_dir))
}

/// Build one page and write the result to `output`
pub fn build_page(input: &Path, output: &Path, includes_dir: &Path) -> SiteResult<()> {
    info!("Processing {}...", input.display());

    refuse_same_path(input, output)?;
    let content = render_page(input, includes_dir)?;
    write_atomic(output, &content)?;

    info!("Built {}", output.display());
    Ok(())
}

/// Both paths exist and resolve to the same file or directory
fn same_path(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn refuse_same_path(src: &Path, dest: &Path) -> SiteResult<()> {
    if same_path(src, dest) {
        return Err(config_error(&format!(
            "Refusing to overwrite {} with itself",
            src.display()
        )));
    }
    Ok(())
}

/// Copy a single file, creating the destination directory
pub fn copy_file(src: &Path, dest: &Path) -> SiteResult<()> {
    refuse_same_path(src, dest)?;
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(src, dest)?;
    info!("Copied {}", src.display());
    Ok(())
}

/// Copy a directory tree, merging into an existing destination
pub fn copy_dir(src: &Path, dest: &Path) -> SiteResult<Vec<PathBuf>> {
    fs::create_dir_all(dest)?;
    let (src_real, dest_real) = (fs::canonicalize(src)?, fs::canonicalize(dest)?);
    if dest_real.starts_with(&src_real) {
        return Err(config_error(&format!(
            "Refusing to copy {} into itself ({})",
            src.display(),
            dest.display()
        )));
    }

    let mut copied = Vec::new();
    for entry in WalkDir::new(src) {
        let entry = entry.map_err(|e| other_error(&format!("Failed to walk {}: {}", src.display(), e)))?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| other_error(&e.to_string()))?;
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
            copied.push(target);
        }
    }
    Ok(copied)
}

/// Build every page and copy every asset named by `config`
///
/// Missing or unreadable sources are reported and skipped. Only failures to
/// write the output stop the build.
pub fn build_site(config: &SiteConfig) -> SiteResult<BuildReport> {
    info!("Building site locally...");
    fs::create_dir_all(&config.output_dir)?;

    let includes_dir = config.includes_path();
    let mut report = BuildReport::default();

    for page in &config.pages {
        let input = config.source_dir.join(page);
        let output = config.output_dir.join(page);
        if !input.is_file() {
            warn!("Skipping {} (not found)", input.display());
            report.skipped.push(input);
            continue;
        }

        info!("Processing {}...", input.display());
        refuse_same_path(&input, &output)?;
        match render_page(&input, &includes_dir) {
            Ok(content) => {
                write_atomic(&output, &content)?;
                info!("Built {}", output.display());
                report.built.push(output);
            }
            Err(e) => {
                warn!("Skipping {} (could not read: {})", input.display(), e);
                report.skipped.push(input);
            }
        }
    }

    info!("Copying assets...");
    for asset in &config.assets {
        let src = config.source_dir.join(asset);
        if src.is_file() {
            let dest = config.output_dir.join(asset);
            copy_file(&src, &dest)?;
            report.copied.push(dest);
        } else {
            warn!("File not found: {}", src.display());
            report.missing.push(src);
        }
    }

    // Partials are also served for client-side fetches
    if config.copy_includes && includes_dir.is_dir() {
        let dest = config.output_dir.join(&config.includes_dir);
        let copied = copy_dir(&includes_dir, &dest)?;
        info!("Copied {}/ folder ({} files)", config.includes_dir.display(), copied.len());
        report.copied.extend(copied);
    }

    info!(
        "Build complete: {} pages, {} files copied, output in {}",
        report.built.len(),
        report.copied.len(),
        config.output_dir.display()
    );
    Ok(report)
}
