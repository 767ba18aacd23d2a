//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from `start`
///
/// Walks up parent directories until finding `config_name`.
/// An absolute `config_name` is only checked as-is.
///
/// # Example
/// ```text
/// /home/user/site/www/css/    ← start
/// /home/user/site/webhead.toml ← found!
/// ```
pub fn find_config_file(config_name: &Path, start: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.is_file().then(|| config_name.to_path_buf());
    }

    let mut current = start;
    loop {
        let candidate = current.join(config_name);
        if candidate.is_file() {
            return Some(candidate);
        }
        current = current.parent()?;
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_in_parent() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("www/css");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("webhead.toml"), "").unwrap();

        let found = find_config_file(Path::new("webhead.toml"), &nested).unwrap();
        assert_eq!(found, dir.path().join("webhead.toml"));
    }

    #[test]
    fn test_find_config_absolute() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        assert_eq!(find_config_file(&path, dir.path()), None);

        fs::write(&path, "").unwrap();
        assert_eq!(find_config_file(&path, Path::new("/")), Some(path));
    }

    #[test]
    fn test_directory_is_not_a_config() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("webhead.toml")).unwrap();
        let nested = dir.path().join("a");
        fs::create_dir(&nested).unwrap();

        let found = find_config_file(Path::new("webhead.toml"), &nested);
        assert!(found.is_none_or(|p| p != dir.path().join("webhead.toml")));
    }
}
