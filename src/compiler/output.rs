//! Cache-entry naming and staged writes into the output directory.
//!
//! ```text
//! www/css/site.css   → webtemp/site-3f2a9c0d1e4b5a67.css
//! [site.css, a.css]  → webtemp/_joined-css-screen-9b8c7d6e5f4a3b2c.css
//! ```
//!
//! Presence of a file with the computed name is the whole freshness check,
//! so an entry must never be visible under its final name half-written.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::asset::AssetKind;
use crate::error::{Result, WebHeadError};
use crate::utils::hash::fingerprint;
use crate::utils::path::mtime_nanos;

/// Name of the cache entry for `source` at modification time `mtime`.
///
/// Keeps the original extension: `<stem>-<hash>.<ext>` (or `<stem>-<hash>`).
pub fn cache_file_name(source: &str, mtime: SystemTime) -> String {
    let hash = fingerprint(&[
        source.as_bytes(),
        mtime_nanos(mtime).to_le_bytes().as_slice(),
    ]);
    let file_name = Path::new(source)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
            format!("{stem}-{hash}.{ext}")
        }
        _ => format!("{file_name}-{hash}"),
    }
}

/// Name of a joined bundle.
///
/// Grouped bundles are `_joined-<kind>-<group>-<hash>.<kind>`, with the group
/// reduced to `[A-Za-z0-9_-]` (no brackets, they would need escaping in URLs).
/// Ungrouped bundles are `_joined-<kind>-<hash>.<kind>`.
///
/// The hash covers kind, group and the `(source path, member cache-entry name)`
/// pairs of `members` in join order, not a sorted path list. Reordering members
/// or editing one (its entry name carries the mtime) yields a new bundle name.
pub fn joined_file_name(kind: AssetKind, group: Option<&str>, members: &[(&str, &str)]) -> String {
    let mut parts: Vec<&[u8]> = vec![kind.as_str().as_bytes(), group.unwrap_or("").as_bytes()];
    for (source, entry) in members {
        parts.push(source.as_bytes());
        parts.push(entry.as_bytes());
    }
    let hash = fingerprint(&parts);

    match group {
        Some(group) => format!("_joined-{kind}-{}-{hash}.{kind}", sanitize_group(group)),
        None => format!("_joined-{kind}-{hash}.{kind}"),
    }
}

/// Reduce a group (e.g. a CSS media query) to a filename-safe token.
fn sanitize_group(group: &str) -> String {
    let mut out = String::with_capacity(group.len());
    for c in group.chars() {
        if c.is_ascii_alphanumeric() || c == '-' {
            out.push(c);
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() {
        "group".to_string()
    } else {
        trimmed.to_string()
    }
}

// ============================================================================
// Staged writes
// ============================================================================

/// Output produced by one `compile()` call, held back until every file succeeded.
#[derive(Debug, Default)]
pub struct StagedWrites {
    entries: Vec<(String, String)>,
}

impl StagedWrites {
    pub fn push(&mut self, file_name: String, content: String) {
        self.entries.push((file_name, content));
    }

    /// Content staged under `file_name`, if any.
    pub fn get(&self, file_name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == file_name)
            .map(|(_, content)| content.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write every staged entry into `dir`.
    pub fn commit(self, dir: &Path) -> Result<usize> {
        let count = self.entries.len();
        for (file_name, content) in self.entries {
            write_atomic(dir, &file_name, content.as_bytes())?;
        }
        Ok(count)
    }
}

/// Write `content` to `dir/file_name` through a temp file in `dir` + rename.
///
/// Concurrent writers of the same entry race harmlessly: both produce the same
/// bytes and the rename is atomic.
pub fn write_atomic(dir: &Path, file_name: &str, content: &[u8]) -> Result<PathBuf> {
    let target = dir.join(file_name);

    let mut builder = tempfile::Builder::new();
    builder.prefix(".webhead-").suffix(".tmp");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o644));
    }

    let mut tmp = builder
        .tempfile_in(dir)
        .map_err(|e| WebHeadError::io(dir, e))?;
    tmp.write_all(content)
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| WebHeadError::io(tmp.path(), e))?;
    tmp.persist(&target)
        .map_err(|e| WebHeadError::io(&target, e.error))?;

    Ok(target)
}
