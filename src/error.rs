//! Error types shared by the collector, the compiler and the filters.

use std::path::PathBuf;
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, WebHeadError>;

// ============================================================================
// WebHeadError
// ============================================================================

/// Everything that can go wrong while declaring, compiling or configuring assets.
///
/// No operation retries; every variant propagates straight to the caller.
#[derive(Debug, Error)]
pub enum WebHeadError {
    /// Invalid or missing output directory / public path configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A queued source file does not exist or cannot be read.
    #[error("asset `{}` is missing or unreadable", path.display())]
    MissingAsset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The routine backing a filter cannot be used in this process.
    #[error("filter `{filter}` is unavailable: {reason}")]
    MissingDependency { filter: &'static str, reason: String },

    /// An asset or element type nobody knows how to handle.
    ///
    /// Produced by `AssetKind::from_str` for the rendering layer that turns
    /// untyped identifiers into kinds; the compiler itself skips unknown files.
    #[error("unsupported asset type `{0}`")]
    UnsupportedType(String),

    /// A filter rejected the content it was given.
    #[error("filter `{filter}` failed on `{}`: {message}", path.display())]
    Filter {
        filter: &'static str,
        path: PathBuf,
        message: String,
    },

    /// Output-side I/O (writing cache entries, reading them back for joins).
    #[error("IO error at `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error when reading config `{}`", .0.display())]
    ConfigIo(PathBuf, #[source] std::io::Error),

    #[error("config file parsing error")]
    Toml(#[from] toml::de::Error),
}

impl WebHeadError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn missing_asset(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::MissingAsset {
            path: path.into(),
            source,
        }
    }
}
