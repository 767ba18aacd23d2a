//! Asset compilation: cached, filtered, optionally joined output files.
//!
//! ```text
//! queue (path, group) ─┬─ cache hit? ── yes ─→ record URL
//!                      └─ no ─→ read → rewrite CSS urls → filters → stage
//!                                                          │
//!                          join mode: group by (kind, group) → stage bundle
//!                                                          │
//!                                      commit staged entries (temp + rename)
//! ```
//!
//! Results are memoized until new files are queued. A failing file aborts the
//! whole call before anything from that batch is written.

pub mod css;
mod join;
pub mod output;

use std::fs;
use std::path::{Path, PathBuf};

use crate::asset::AssetKind;
use crate::debug;
use crate::error::{Result, WebHeadError};
use crate::filter::Filter;
use crate::utils::FxIndexMap;
use crate::utils::path::{get_mtime, is_external_link, normalize_path, public_url};

use output::{StagedWrites, cache_file_name};

pub use join::JoinedBundle;

/// Caller-defined bucket for join mode (CSS media for stylesheets, none for scripts).
pub type Group = Option<String>;

/// Joined bundles by kind, then group.
pub type JoinedFiles = FxIndexMap<AssetKind, FxIndexMap<Group, JoinedBundle>>;

/// Output of one `compile()` pass.
#[derive(Debug, Clone, Default)]
pub struct CompiledResult {
    /// Source path → public URL of its own compiled file.
    pub files: FxIndexMap<String, String>,
    /// Merged bundles (join mode only).
    pub joined: JoinedFiles,
}

/// Where compiled files go and how they are addressed publicly.
#[derive(Debug, Clone)]
struct OutputTarget {
    dir: PathBuf,
    public_prefix: String,
}

/// A queued file that produced (or already had) a cache entry.
#[derive(Debug)]
struct CompiledFile {
    source: String,
    kind: AssetKind,
    group: Group,
    file_name: String,
}

// ============================================================================
// FiltersCompiler
// ============================================================================

/// Compiles queued asset files into the output directory.
///
/// Not meant for concurrent use of one instance; separate processes sharing an
/// output directory are safe since entries only ever appear fully written.
#[derive(Debug, Default)]
pub struct FiltersCompiler {
    output: Option<OutputTarget>,
    queue: FxIndexMap<String, Group>,
    filters: Vec<Box<dyn Filter>>,
    join_files: bool,
    compiled: Option<CompiledResult>,
}

impl FiltersCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output directory and the public URL prefix it is served under.
    ///
    /// Fails with a configuration error if `dir` is not an existing directory.
    pub fn set_output_dir(
        &mut self,
        dir: impl AsRef<Path>,
        public_url_prefix: impl Into<String>,
    ) -> Result<&mut Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(WebHeadError::config(format!(
                "output directory `{}` is not a valid directory",
                dir.display()
            )));
        }
        self.output = Some(OutputTarget {
            dir: normalize_path(dir),
            public_prefix: public_url_prefix.into(),
        });
        self.compiled = None;
        Ok(self)
    }

    pub fn output_dir(&self) -> Option<&Path> {
        self.output.as_ref().map(|o| o.dir.as_path())
    }

    pub fn public_url_prefix(&self) -> Option<&str> {
        self.output.as_ref().map(|o| o.public_prefix.as_str())
    }

    /// Queue `paths` under `group`. Re-queued paths take the new group.
    pub fn add_files<I, S>(&mut self, paths: I, group: Option<&str>) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for path in paths {
            self.queue.insert(path.into(), group.map(str::to_string));
        }
        self.compiled = None;
        self
    }

    /// Queued `(path, group)` pairs in queue order.
    pub fn queued(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.queue.iter().map(|(p, g)| (p.as_str(), g.as_deref()))
    }

    /// Append a filter to the chain.
    pub fn register_filter(&mut self, filter: Box<dyn Filter>) -> &mut Self {
        self.filters.push(filter);
        self.compiled = None;
        self
    }

    pub fn filters(&self) -> impl Iterator<Item = &dyn Filter> {
        self.filters.iter().map(|f| f.as_ref())
    }

    /// Toggle join mode. Changing it drops the memoized result.
    pub fn set_join_files(&mut self, join: bool) -> &mut Self {
        if self.join_files != join {
            self.join_files = join;
            self.compiled = None;
        }
        self
    }

    pub fn is_join_files(&self) -> bool {
        self.join_files
    }

    /// Whether a memoized result is available.
    pub fn is_compiled(&self) -> bool {
        self.compiled.is_some()
    }

    /// Compile every queued file. No-op while the previous result is valid.
    pub fn compile(&mut self) -> Result<()> {
        if self.compiled.is_some() {
            return Ok(());
        }
        let target = self
            .output
            .as_ref()
            .ok_or_else(|| WebHeadError::config("output directory is not set"))?;

        let mut staged = StagedWrites::default();
        let mut compiled = Vec::new();
        for (source, group) in &self.queue {
            if let Some(file) = self.compile_file(target, source, group, &mut staged)? {
                compiled.push(file);
            }
        }

        let mut result = CompiledResult {
            files: compiled
                .iter()
                .map(|f| {
                    (
                        f.source.clone(),
                        public_url(&target.public_prefix, &f.file_name),
                    )
                })
                .collect(),
            joined: JoinedFiles::default(),
        };
        if self.join_files {
            result.joined = join::join_files(target, &compiled, &mut staged)?;
        }

        let written = staged.commit(&target.dir)?;
        debug!(
            "compile";
            "{} queued, {} compiled, {} written",
            self.queue.len(),
            result.files.len(),
            written
        );

        self.compiled = Some(result);
        Ok(())
    }

    /// Compile one queued file; `None` when no step applies to it.
    fn compile_file(
        &self,
        target: &OutputTarget,
        source: &str,
        group: &Group,
        staged: &mut StagedWrites,
    ) -> Result<Option<CompiledFile>> {
        let path = Path::new(source);
        let metadata = fs::metadata(path).map_err(|e| WebHeadError::missing_asset(path, e))?;
        if !metadata.is_file() {
            return Err(WebHeadError::missing_asset(
                path,
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a regular file"),
            ));
        }
        let mtime = get_mtime(path).ok_or_else(|| {
            WebHeadError::missing_asset(
                path,
                std::io::Error::new(std::io::ErrorKind::Unsupported, "modification time unavailable"),
            )
        })?;

        let Some(kind) = AssetKind::from_path(path) else {
            return Ok(None);
        };
        let filters: Vec<&dyn Filter> = self
            .filters
            .iter()
            .map(|f| f.as_ref())
            .filter(|f| f.is_type_supported(kind))
            .collect();
        if kind != AssetKind::Css && filters.is_empty() {
            return Ok(None);
        }

        let file_name = cache_file_name(source, mtime);
        let compiled = CompiledFile {
            source: source.to_string(),
            kind,
            group: group.clone(),
            file_name,
        };
        let destination = target.dir.join(&compiled.file_name);
        if destination.is_file() {
            debug!("cache"; "hit: {} -> {}", source, compiled.file_name);
            return Ok(Some(compiled));
        }

        let mut content =
            fs::read_to_string(path).map_err(|e| WebHeadError::missing_asset(path, e))?;
        if kind == AssetKind::Css {
            content = css::rewrite_urls(&normalize_path(path), &destination, &content);
        }
        for filter in filters {
            content = filter
                .compile(&content)
                .map_err(|e| WebHeadError::Filter {
                    filter: filter.name(),
                    path: path.to_path_buf(),
                    message: e.0,
                })?;
        }

        debug!("compile"; "{} -> {}", source, compiled.file_name);
        staged.push(compiled.file_name.clone(), content);
        Ok(Some(compiled))
    }

    /// Flat `source path → public URL` mapping (compiles first if needed).
    ///
    /// In join mode this still lists each file's own compiled entry.
    pub fn get_compiled_files(&mut self) -> Result<&FxIndexMap<String, String>> {
        Ok(&self.result()?.files)
    }

    /// Joined bundles by kind and group; empty unless join mode is on.
    pub fn get_compiled_joined_files(&mut self) -> Result<&JoinedFiles> {
        Ok(&self.result()?.joined)
    }

    /// Public URL of the compiled file whose source path ends with `request`.
    ///
    /// Returns `None` for external URLs and when nothing matches.
    pub fn get_compiled_file(&mut self, request: &str) -> Result<Option<String>> {
        if is_external_link(request) {
            return Ok(None);
        }
        let suffix = request
            .trim_start_matches("./")
            .trim_start_matches('/')
            .replace('\\', "/");
        if suffix.is_empty() {
            return Ok(None);
        }

        let found = self.result()?.files.iter().find_map(|(source, url)| {
            let source = source.replace('\\', "/");
            let matches = source == suffix
                || source
                    .strip_suffix(suffix.as_str())
                    .is_some_and(|rest| rest.ends_with('/'));
            matches.then(|| url.clone())
        });
        Ok(found)
    }

    fn result(&mut self) -> Result<&CompiledResult> {
        self.compile()?;
        self.compiled
            .as_ref()
            .ok_or_else(|| WebHeadError::config("compilation produced no result"))
    }
}
