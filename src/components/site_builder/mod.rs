mod build;
pub mod includes;

pub use build::{build_page, build_site, copy_dir, copy_file, render_page, BuildReport};
pub use includes::{missing_include_marker, process_includes, remove_front_matter};
