//! Re-anchoring relative `url()` references in compiled stylesheets.
//!
//! A compiled stylesheet lives in the output directory, not next to its
//! source. Background images referenced relative to the source must be
//! rewritten so they resolve from the new location:
//!
//! ```text
//! source: /site/www/style.css          background: url(images/x.png)
//! output: /site/www/cache/css/style-….css
//! result:                              background: url(../../images/x.png)
//! ```

use std::path::{Component, Path};
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::utils::path::{collapse_parent_segments, is_external_link};

/// `background` / `background-image` declarations, parenthesized groups kept whole.
static BACKGROUND_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)background(?:-image)?\s*:(?:[^;}(]|\([^)]*\))*").unwrap()
});

/// A single `url(...)` reference inside a declaration.
static URL_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(url\(\s*)(['"]?)([^'")]*?)(['"]?)(\s*\))"#).unwrap()
});

/// Path prefix leading from `destination`'s directory back to `source`'s directory.
///
/// Walks both directory component lists until they diverge, then climbs out
/// of the destination's remaining directories and descends into the source's.
/// Empty when both files share a directory.
pub fn relative_prefix(source: &Path, destination: &Path) -> String {
    let source_dirs = dir_segments(source);
    let dest_dirs = dir_segments(destination);

    let common = source_dirs
        .iter()
        .zip(&dest_dirs)
        .take_while(|(a, b)| a == b)
        .count();

    let mut prefix = "../".repeat(dest_dirs.len() - common);
    for segment in &source_dirs[common..] {
        prefix.push_str(segment);
        prefix.push('/');
    }
    prefix
}

/// Directory components of a file path (its own file name excluded).
fn dir_segments(path: &Path) -> Vec<String> {
    path.parent()
        .map(|dir| {
            dir.components()
                .filter(|c| !matches!(c, Component::CurDir))
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default()
}

/// Whether a `url()` reference is relative to the stylesheet and must move with it.
fn is_relative_reference(reference: &str) -> bool {
    !(reference.is_empty()
        || reference.starts_with('/')
        || reference.starts_with('#')
        || is_external_link(reference))
}

/// Rewrite background `url()` references of `css` (read from `source`) so
/// they stay valid when the stylesheet is written to `destination`.
///
/// Every reference of a multi-layer background is rewritten.
pub fn rewrite_urls(source: &Path, destination: &Path, css: &str) -> String {
    let prefix = relative_prefix(source, destination);

    BACKGROUND_DECL
        .replace_all(css, |decl: &Captures| {
            URL_REF
                .replace_all(&decl[0], |caps: &Captures| {
                    let reference = caps[3].trim();
                    if !is_relative_reference(reference) {
                        return caps[0].to_string();
                    }
                    let rewritten = collapse_parent_segments(&format!("{prefix}{reference}"));
                    format!("{}{}{}{}{}", &caps[1], &caps[2], rewritten, &caps[4], &caps[5])
                })
                .into_owned()
        })
        .into_owned()
}
