//! Registry of declared stylesheets and scripts.
//!
//! Assets are keyed by their file path; declaring the same path again replaces
//! the record. Every read returns assets ordered by descending priority, ties
//! kept in declaration order.
//!
//! [`AssetsCollector::prepare`] hands the declared files to an attached
//! [`FiltersCompiler`] and swaps in the compiled URLs.
//!
//! # Join mode is lossy
//!
//! With join mode on, compiled assets are replaced by one bundle per
//! `(kind, media)` group. Bundles only carry `media` and the highest priority
//! of their members; any other per-file attributes are dropped.

use std::fmt;

use serde::Serialize;

use super::AssetKind;
use crate::compiler::{FiltersCompiler, JoinedFiles};
use crate::error::Result;
use crate::utils::FxIndexMap;
use crate::utils::path::is_external_link;
use crate::utils::sort::{Direction, sort_by_field};

/// Media used for stylesheets declared without one.
pub const DEFAULT_MEDIA: &str = "screen";

/// Extra pass-through attributes of an asset.
pub type Attrs = FxIndexMap<String, String>;

/// Typed link override: `(kind, file, attrs) -> Some(url)` to replace the link.
pub type LinkFormatter = Box<dyn Fn(AssetKind, &str, &Attrs) -> Option<String>>;

// ============================================================================
// Asset
// ============================================================================

/// A declared stylesheet or script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Asset {
    pub kind: AssetKind,
    /// Source path or URL; replaced by the public URL once compiled.
    pub file: String,
    pub priority: i64,
    /// CSS only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<String>,
    pub compiled: bool,
    #[serde(skip_serializing_if = "FxIndexMap::is_empty")]
    pub attrs: Attrs,
}

/// Optional attributes passed when declaring an asset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetAttrs {
    pub priority: Option<i64>,
    pub media: Option<String>,
    pub extra: Attrs,
}

impl AssetAttrs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn priority(mut self, priority: i64) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn media(mut self, media: impl Into<String>) -> Self {
        self.media = Some(media.into());
        self
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Build from loose string pairs, as a template layer hands them over.
    ///
    /// `priority` is coerced to an integer (0 when not numeric), `media` is
    /// picked out, everything else becomes a pass-through attribute.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut attrs = Self::default();
        for (key, value) in pairs {
            let (key, value) = (key.into(), value.into());
            match key.as_str() {
                "priority" => attrs.priority = Some(coerce_priority(&value)),
                "media" => attrs.media = Some(value),
                _ => {
                    attrs.extra.insert(key, value);
                }
            }
        }
        attrs
    }
}

/// Integer value of a loosely typed priority: leading sign and digits, else 0.
///
/// `"10"` → 10, `"-3"` → -3, `"7.9"` → 7, `"12px"` → 12, `"high"` → 0.
pub fn coerce_priority(value: &str) -> i64 {
    let value = value.trim();
    let (sign, digits) = match value.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, value.strip_prefix('+').unwrap_or(value)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().map_or(0, |n| sign * n)
}

// ============================================================================
// AssetsCollector
// ============================================================================

/// Collects stylesheets and scripts for the document head.
#[derive(Default)]
pub struct AssetsCollector {
    assets: FxIndexMap<String, Asset>,
    compiler: Option<FiltersCompiler>,
    link_formatter: Option<LinkFormatter>,
}

impl fmt::Debug for AssetsCollector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetsCollector")
            .field("assets", &self.assets)
            .field("compiler", &self.compiler)
            .field("link_formatter", &self.link_formatter.is_some())
            .finish()
    }
}

impl AssetsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_compiler(compiler: FiltersCompiler) -> Self {
        Self {
            compiler: Some(compiler),
            ..Self::default()
        }
    }

    pub fn attach_compiler(&mut self, compiler: FiltersCompiler) -> &mut Self {
        self.compiler = Some(compiler);
        self
    }

    pub fn compiler(&self) -> Option<&FiltersCompiler> {
        self.compiler.as_ref()
    }

    pub fn compiler_mut(&mut self) -> Option<&mut FiltersCompiler> {
        self.compiler.as_mut()
    }

    /// Declare a stylesheet; `media` defaults to `screen`, priority to 0.
    pub fn add_css(&mut self, path: impl Into<String>, attrs: AssetAttrs) -> &mut Self {
        let media = attrs.media.unwrap_or_else(|| DEFAULT_MEDIA.to_string());
        self.upsert(AssetKind::Css, path.into(), attrs.priority, Some(media), attrs.extra)
    }

    /// Declare a script; priority defaults to 0. `media` is ignored for scripts.
    pub fn add_js(&mut self, path: impl Into<String>, attrs: AssetAttrs) -> &mut Self {
        self.upsert(AssetKind::Js, path.into(), attrs.priority, None, attrs.extra)
    }

    fn upsert(
        &mut self,
        kind: AssetKind,
        file: String,
        priority: Option<i64>,
        media: Option<String>,
        attrs: Attrs,
    ) -> &mut Self {
        let asset = Asset {
            kind,
            file: file.clone(),
            priority: priority.unwrap_or(0),
            media,
            compiled: false,
            attrs,
        };
        self.assets.insert(file, asset);
        self
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Assets of `kind` (or all), highest priority first, ties in declaration order.
    fn sorted(&self, kind: Option<AssetKind>) -> Vec<&Asset> {
        let mut assets: Vec<&Asset> = self
            .assets
            .values()
            .filter(|a| kind.is_none_or(|k| a.kind == k))
            .collect();
        sort_by_field(&mut assets, Direction::Desc, |a| a.priority);
        assets
    }

    /// Stylesheet files grouped by media, groups ordered by their first member.
    pub fn get_css(&self) -> FxIndexMap<String, Vec<String>> {
        let mut groups: FxIndexMap<String, Vec<String>> = FxIndexMap::default();
        for asset in self.sorted(Some(AssetKind::Css)) {
            let media = asset.media.as_deref().unwrap_or(DEFAULT_MEDIA);
            groups
                .entry(media.to_string())
                .or_default()
                .push(asset.file.clone());
        }
        groups
    }

    /// Script files in order.
    pub fn get_js(&self) -> Vec<String> {
        self.sorted(Some(AssetKind::Js))
            .into_iter()
            .map(|a| a.file.clone())
            .collect()
    }

    /// Every asset in order, as full records.
    pub fn get_all(&self) -> Vec<&Asset> {
        self.sorted(None)
    }

    /// Install the link override consulted by [`href`](Self::href).
    pub fn set_link_formatter(
        &mut self,
        formatter: impl Fn(AssetKind, &str, &Attrs) -> Option<String> + 'static,
    ) -> &mut Self {
        self.link_formatter = Some(Box::new(formatter));
        self
    }

    /// Link to emit for `asset`: the formatter's override, or the asset file.
    pub fn href(&self, asset: &Asset) -> String {
        self.link_formatter
            .as_ref()
            .and_then(|format| format(asset.kind, &asset.file, &asset.attrs))
            .unwrap_or_else(|| asset.file.clone())
    }

    /// Compile declared files through the attached compiler and swap in the results.
    ///
    /// No-op without a compiler. External URLs and already compiled assets are
    /// not queued. Call once before reading assets for rendering.
    pub fn prepare(&mut self) -> Result<()> {
        if self.compiler.is_none() {
            return Ok(());
        }
        let pending = |a: &&Asset| !a.compiled && !is_external_link(&a.file);
        let js: Vec<String> = self
            .sorted(Some(AssetKind::Js))
            .into_iter()
            .filter(pending)
            .map(|a| a.file.clone())
            .collect();
        let mut css: FxIndexMap<String, Vec<String>> = FxIndexMap::default();
        for asset in self.sorted(Some(AssetKind::Css)).into_iter().filter(pending) {
            let media = asset.media.clone().unwrap_or_else(|| DEFAULT_MEDIA.into());
            css.entry(media).or_default().push(asset.file.clone());
        }

        let Some(compiler) = self.compiler.as_mut() else {
            return Ok(());
        };
        compiler.add_files(js, None);
        for (media, files) in css {
            compiler.add_files(files, Some(&media));
        }

        if compiler.is_join_files() {
            let files = compiler.get_compiled_files()?.clone();
            let joined = compiler.get_compiled_joined_files()?.clone();
            self.replace_with_joined(&files, &joined);
        } else {
            let files = compiler.get_compiled_files()?;
            for asset in self.assets.values_mut() {
                if let Some(url) = files.get(&asset.file) {
                    asset.file = url.clone();
                    asset.compiled = true;
                }
            }
        }
        Ok(())
    }

    /// Rebuild the collection from joined bundles.
    ///
    /// Each bundle takes the position of its first member in the current
    /// order; assets without a compiled file are carried over unchanged.
    fn replace_with_joined(&mut self, compiled: &FxIndexMap<String, String>, joined: &JoinedFiles) {
        let mut bundle_of: FxIndexMap<&str, (AssetKind, Option<&str>, &str)> =
            FxIndexMap::default();
        for (kind, groups) in joined {
            for (group, bundle) in groups {
                for member in &bundle.members {
                    bundle_of.insert(member.as_str(), (*kind, group.as_deref(), bundle.url.as_str()));
                }
            }
        }

        let mut rebuilt: FxIndexMap<String, Asset> = FxIndexMap::default();
        for asset in self.sorted(None) {
            let bundle = bundle_of.get(asset.file.as_str());
            match bundle {
                Some(&(kind, group, url)) if compiled.contains_key(&asset.file) => {
                    let entry = rebuilt.entry(url.to_string()).or_insert_with(|| Asset {
                        kind,
                        file: url.to_string(),
                        priority: asset.priority,
                        media: (kind == AssetKind::Css)
                            .then(|| group.unwrap_or(DEFAULT_MEDIA).to_string()),
                        compiled: true,
                        attrs: Attrs::default(),
                    });
                    entry.priority = entry.priority.max(asset.priority);
                }
                _ => {
                    rebuilt.insert(asset.file.clone(), asset.clone());
                }
            }
        }
        self.assets = rebuilt;
    }
}
