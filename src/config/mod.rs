//! Head configuration from `webhead.toml`.
//!
//! # Sections
//!
//! | Section      | Purpose                                          |
//! |--------------|--------------------------------------------------|
//! | `[compiler]` | Output dir, public prefix, filters, join mode    |
//! | `[[css]]`    | Stylesheets (path, priority, media, attrs)       |
//! | `[[js]]`     | Scripts (path, priority, attrs)                  |
//!
//! ```toml
//! [compiler]
//! output_dir = "www/webtemp"
//! public_url_prefix = "/webtemp"
//! filters = ["css-minifier", "js-minifier"]
//! join_files = false
//!
//! [[css]]
//! path = "www/css/site.css"
//! priority = 10
//! media = "screen"
//! attrs = { title = "Main" }
//!
//! [[js]]
//! path = "www/js/app.js"
//! ```
//!
//! Relative paths resolve against the directory holding the config file.

mod entry;
mod util;

pub use entry::{AssetEntry, Priority};
pub use util::find_config_file;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::asset::{AssetKind, AssetsCollector};
use crate::compiler::FiltersCompiler;
use crate::debug;
use crate::error::{Result, WebHeadError};
use crate::filter::FilterFactory;
use crate::utils::path::{is_external_link, normalize_path, resolve_path};

/// Default config file name.
pub const CONFIG_FILE: &str = "webhead.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing webhead.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WebHeadConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Directory relative paths resolve against (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Compiler settings; without it assets are served as declared.
    #[serde(default)]
    pub compiler: Option<CompilerSection>,

    #[serde(default)]
    pub css: Vec<AssetEntry>,

    #[serde(default)]
    pub js: Vec<AssetEntry>,
}

/// `[compiler]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompilerSection {
    /// Existing directory compiled files are written to.
    pub output_dir: Option<PathBuf>,

    /// URL prefix the output directory is served under.
    pub public_url_prefix: Option<String>,

    /// Filter identifiers, applied in order.
    #[serde(default)]
    pub filters: Vec<String>,

    #[serde(default)]
    pub join_files: bool,
}

impl WebHeadConfig {
    /// Load and validate configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| WebHeadError::ConfigIo(path.to_path_buf(), err))?;
        let config_path = normalize_path(path);
        let root = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let mut config = Self::from_str(&content, &root)?;
        config.config_path = config_path;
        Ok(config)
    }

    /// Parse configuration from a TOML string, resolving paths against `root`.
    pub fn from_str(content: &str, root: &Path) -> Result<Self> {
        let mut config: Self = toml::from_str(content)?;
        config.root = root.to_path_buf();
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot produce a working head.
    pub fn validate(&self) -> Result<()> {
        if let Some(compiler) = &self.compiler {
            if compiler.output_dir.is_none() {
                return Err(WebHeadError::config("[compiler] is missing `output_dir`"));
            }
            if compiler.public_url_prefix.is_none() {
                return Err(WebHeadError::config(
                    "[compiler] is missing `public_url_prefix`",
                ));
            }
        }
        for (kind, entries) in [(AssetKind::Css, &self.css), (AssetKind::Js, &self.js)] {
            if let Some(idx) = entries.iter().position(|e| e.path().trim().is_empty()) {
                return Err(WebHeadError::config(format!(
                    "[[{kind}]] entry #{} has an empty path",
                    idx + 1
                )));
            }
        }
        Ok(())
    }

    /// Resolve an asset path against the config root; URLs stay verbatim.
    pub fn resolve_asset(&self, path: &str) -> String {
        if is_external_link(path) {
            return path.to_string();
        }
        normalize_path(&resolve_path(Path::new(path), &self.root))
            .to_string_lossy()
            .into_owned()
    }

    /// Build the configured compiler, if any, using the real minifiers.
    pub fn build_compiler(&self) -> Result<Option<FiltersCompiler>> {
        self.build_compiler_with(&FilterFactory::new())
    }

    /// Build the configured compiler, resolving filters through `factory`.
    pub fn build_compiler_with(&self, factory: &FilterFactory) -> Result<Option<FiltersCompiler>> {
        let Some(section) = &self.compiler else {
            return Ok(None);
        };
        let (Some(output_dir), Some(prefix)) = (&section.output_dir, &section.public_url_prefix)
        else {
            return Err(WebHeadError::config(
                "[compiler] needs both `output_dir` and `public_url_prefix`",
            ));
        };

        let mut compiler = FiltersCompiler::new();
        compiler.set_output_dir(resolve_path(output_dir, &self.root), prefix.as_str())?;
        for id in &section.filters {
            compiler.register_filter(factory.create(id)?);
        }
        compiler.set_join_files(section.join_files);
        debug!(
            "config";
            "compiler: {} filter(s), join_files = {}",
            section.filters.len(),
            section.join_files
        );
        Ok(Some(compiler))
    }

    /// Collector holding every declared asset, with the configured compiler attached.
    pub fn into_collector(self) -> Result<AssetsCollector> {
        self.into_collector_with(&FilterFactory::new())
    }

    pub fn into_collector_with(self, factory: &FilterFactory) -> Result<AssetsCollector> {
        let mut collector = match self.build_compiler_with(factory)? {
            Some(compiler) => AssetsCollector::with_compiler(compiler),
            None => AssetsCollector::new(),
        };
        self.declare_assets(&mut collector);
        Ok(collector)
    }

    /// Declare every configured asset on `collector`, stylesheets first.
    pub fn declare_assets(&self, collector: &mut AssetsCollector) {
        for entry in &self.css {
            collector.add_css(self.resolve_asset(entry.path()), entry.attrs());
        }
        for entry in &self.js {
            collector.add_js(self.resolve_asset(entry.path()), entry.attrs());
        }
    }

    /// Declared entries as `(kind, entry)` pairs, stylesheets first.
    pub fn entries(&self) -> impl Iterator<Item = (AssetKind, &AssetEntry)> {
        self.css
            .iter()
            .map(|e| (AssetKind::Css, e))
            .chain(self.js.iter().map(|e| (AssetKind::Js, e)))
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn stub_factory() -> FilterFactory {
        FilterFactory::with_check(|_| Ok(()))
    }

    #[test]
    fn test_empty_config() {
        let config = WebHeadConfig::from_str("", Path::new("/site")).unwrap();
        assert!(config.compiler.is_none());
        assert!(config.css.is_empty());
        assert!(config.js.is_empty());

        let collector = config.into_collector_with(&stub_factory()).unwrap();
        assert!(collector.compiler().is_none());
        assert!(collector.is_empty());
    }

    #[test]
    fn test_parse_entries() {
        let config = WebHeadConfig::from_str(
            r#"
            css = ["plain.css"]

            [[js]]
            path = "app.js"
            priority = "5"
            attrs = { defer = "defer" }
            "#,
            Path::new("/site"),
        )
        .unwrap();

        assert_eq!(config.css[0].path(), "plain.css");
        let js = config.js[0].attrs();
        assert_eq!(js.priority, Some(5));
        assert_eq!(js.extra["defer"], "defer");
    }

    #[test]
    fn test_script_media_not_kept() {
        let config = WebHeadConfig::from_str(
            "[[js]]\npath = \"app.js\"\nmedia = \"print\"",
            Path::new("/site"),
        )
        .unwrap();
        let collector = config.into_collector_with(&stub_factory()).unwrap();
        assert_eq!(collector.get_all()[0].media, None);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = WebHeadConfig::from_str("[compiler]\noutput = \"x\"", Path::new("/")).unwrap_err();
        assert!(matches!(err, WebHeadError::Toml(_)));
    }

    #[test]
    fn test_compiler_requires_output_dir_and_prefix() {
        let err = WebHeadConfig::from_str("[compiler]\npublic_url_prefix = \"/w\"", Path::new("/"))
            .unwrap_err();
        assert!(matches!(err, WebHeadError::Configuration(_)));

        let err = WebHeadConfig::from_str("[compiler]\noutput_dir = \"w\"", Path::new("/"))
            .unwrap_err();
        assert!(matches!(err, WebHeadError::Configuration(_)));
    }

    #[test]
    fn test_empty_path_rejected() {
        let err = WebHeadConfig::from_str("[[css]]\npath = \" \"", Path::new("/")).unwrap_err();
        assert!(err.to_string().contains("[[css]] entry #1"));
    }

    #[test]
    fn test_resolve_asset() {
        let config = WebHeadConfig::from_str("", Path::new("/site")).unwrap();
        assert_eq!(config.resolve_asset("css/a.css"), "/site/css/a.css");
        assert_eq!(config.resolve_asset("/abs/a.css"), "/abs/a.css");
        assert_eq!(
            config.resolve_asset("https://cdn.example.com/a.css"),
            "https://cdn.example.com/a.css"
        );
        assert_eq!(config.resolve_asset("//cdn.example.com/a.js"), "//cdn.example.com/a.js");
    }

    #[test]
    fn test_build_compiler() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("out")).unwrap();
        let config = WebHeadConfig::from_str(
            r#"
            [compiler]
            output_dir = "out"
            public_url_prefix = "/out"
            filters = ["css-minifier", "JsMinifier"]
            join_files = true
            "#,
            dir.path(),
        )
        .unwrap();

        let compiler = config.build_compiler_with(&stub_factory()).unwrap().unwrap();
        let names: Vec<_> = compiler.filters().map(|f| f.name()).collect();
        assert_eq!(names, ["css-minifier", "js-minifier"]);
        assert!(compiler.is_join_files());
        assert_eq!(compiler.public_url_prefix(), Some("/out"));
        assert_eq!(
            compiler.output_dir(),
            Some(normalize_path(&dir.path().join("out")).as_path())
        );
    }

    #[test]
    fn test_unknown_filter_is_configuration_error() {
        let dir = TempDir::new().unwrap();
        let config = WebHeadConfig::from_str(
            "[compiler]\noutput_dir = \".\"\npublic_url_prefix = \"/\"\nfilters = [\"less\"]",
            dir.path(),
        )
        .unwrap();
        let err = config.build_compiler_with(&stub_factory()).unwrap_err();
        assert!(matches!(err, WebHeadError::Configuration(_)));
    }

    #[test]
    fn test_missing_output_dir_on_disk() {
        let dir = TempDir::new().unwrap();
        let config = WebHeadConfig::from_str(
            "[compiler]\noutput_dir = \"nope\"\npublic_url_prefix = \"/\"",
            dir.path(),
        )
        .unwrap();
        let err = config.into_collector_with(&stub_factory()).unwrap_err();
        assert!(matches!(err, WebHeadError::Configuration(_)));
    }

    #[test]
    fn test_load_sets_root() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[[css]]\npath = \"www/site.css\"\nmedia = \"print\"").unwrap();

        let config = WebHeadConfig::load(&path).unwrap();
        let root = normalize_path(dir.path());
        assert_eq!(config.root, root);

        let collector = config.into_collector_with(&stub_factory()).unwrap();
        let css = collector.get_css();
        assert_eq!(
            css["print"],
            [root.join("www/site.css").to_string_lossy().into_owned()]
        );
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = WebHeadConfig::load(&dir.path().join(CONFIG_FILE)).unwrap_err();
        assert!(matches!(err, WebHeadError::ConfigIo(..)));
    }

    #[test]
    fn test_entries_order() {
        let config =
            WebHeadConfig::from_str("js = [\"a.js\"]\ncss = [\"a.css\"]", Path::new("/")).unwrap();
        let kinds: Vec<_> = config.entries().map(|(k, _)| k).collect();
        assert_eq!(kinds, [AssetKind::Css, AssetKind::Js]);
    }
}
