//! `[[css]]` / `[[js]]` entries.

use serde::{Deserialize, Serialize};

use crate::asset::{AssetAttrs, coerce_priority};
use crate::utils::FxIndexMap;

// ============================================================================
// Asset Entry
// ============================================================================

/// One declared asset.
///
/// ```toml
/// css = ["www/css/base.css"]             # simple
///
/// [[js]]                                  # full
/// path = "www/js/app.js"
/// priority = 5
/// attrs = { defer = true }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AssetEntry {
    /// Path or URL only.
    Simple(String),
    /// Full format with attributes.
    Full {
        path: String,
        #[serde(default)]
        priority: Option<Priority>,
        #[serde(default)]
        media: Option<String>,
        /// Pass-through attributes; non-string values are stringified.
        #[serde(default)]
        attrs: FxIndexMap<String, toml::Value>,
    },
}

impl AssetEntry {
    pub fn path(&self) -> &str {
        match self {
            Self::Simple(path) | Self::Full { path, .. } => path,
        }
    }

    /// Attributes to declare the asset with.
    pub fn attrs(&self) -> AssetAttrs {
        let Self::Full {
            priority,
            media,
            attrs,
            ..
        } = self
        else {
            return AssetAttrs::default();
        };
        AssetAttrs {
            priority: priority.as_ref().map(Priority::value),
            media: media.clone(),
            extra: attrs
                .iter()
                .map(|(k, v)| (k.clone(), attr_string(v)))
                .collect(),
        }
    }
}

fn attr_string(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ============================================================================
// Priority
// ============================================================================

/// Loosely typed priority: `10`, `2.5` or `"10"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Priority {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Priority {
    /// Integer value; fractions truncate, non-numeric text is 0.
    pub fn value(&self) -> i64 {
        match self {
            Self::Int(n) => *n,
            Self::Float(f) => f.trunc() as i64,
            Self::Text(s) => coerce_priority(s),
        }
    }
}
