//! Asset kind definitions.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WebHeadError;

/// Kind of front-end asset handled by the collector and the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    /// Stylesheet (`.css`).
    Css,
    /// Script (`.js`).
    Js,
}

impl AssetKind {
    /// Identifier and file extension (`css` / `js`).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Css => "css",
            Self::Js => "js",
        }
    }

    /// Kind from a bare extension, case-insensitive.
    pub fn from_ext(ext: &str) -> Option<Self> {
        if ext.eq_ignore_ascii_case("css") {
            Some(Self::Css)
        } else if ext.eq_ignore_ascii_case("js") {
            Some(Self::Js)
        } else {
            None
        }
    }

    /// Kind from a file path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_ext)
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetKind {
    type Err = WebHeadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_ext(s).ok_or_else(|| WebHeadError::UnsupportedType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(AssetKind::from_path(Path::new("a/site.CSS")), Some(AssetKind::Css));
        assert_eq!(AssetKind::from_path(Path::new("app.min.js")), Some(AssetKind::Js));
        assert_eq!(AssetKind::from_path(Path::new("feed.rss")), None);
        assert_eq!(AssetKind::from_path(Path::new("Makefile")), None);
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert_eq!("js".parse::<AssetKind>().unwrap(), AssetKind::Js);
        let err = "rss".parse::<AssetKind>().unwrap_err();
        assert!(matches!(err, WebHeadError::UnsupportedType(t) if t == "rss"));
    }
}
