//! Page path normalization.

/// Index document name stripped from page paths.
const INDEX_SUFFIX: &str = "index.html";

/// Normalize a page identifier so `/blog/post/index.html` and
/// `/blog/post/` group the same comments.
pub fn normalize_path(path: &str) -> String {
    path.strip_suffix(INDEX_SUFFIX).unwrap_or(path).to_string()
}
