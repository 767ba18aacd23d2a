//! Pluggable content filters run by the compiler.
//!
//! A [`Filter`] declares which asset kinds it handles and transforms content.
//! Every registered filter supporting a file's kind runs, in registration
//! order, each consuming the previous one's output.
//!
//! Built-in filters are created through [`FilterFactory`], which checks the
//! backing minifier once per kind before handing out the first instance.

pub mod minify;

use std::cell::OnceCell;
use std::fmt;

use thiserror::Error;

use crate::asset::AssetKind;
use crate::error::{Result, WebHeadError};

pub use minify::{CssMinifier, JsMinifier};

/// Failure reported by a filter; the compiler attaches the file path.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct FilterError(pub String);

/// Content transformer applied to compiled assets.
pub trait Filter {
    /// Identifier used in configuration and error messages.
    fn name(&self) -> &'static str;

    /// Asset kinds this filter accepts.
    fn supported_types(&self) -> &[AssetKind];

    fn is_type_supported(&self, kind: AssetKind) -> bool {
        self.supported_types().contains(&kind)
    }

    /// Transform `content`. Must not depend on anything but its input.
    fn compile(&self, content: &str) -> std::result::Result<String, FilterError>;
}

impl fmt::Debug for dyn Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter")
            .field("name", &self.name())
            .field("supported_types", &self.supported_types())
            .finish()
    }
}

// ============================================================================
// Factory
// ============================================================================

/// Availability check: `Ok` when the minifier for a kind can run.
pub type AvailabilityCheck = Box<dyn Fn(AssetKind) -> std::result::Result<(), String>>;

/// Creates built-in filters from identifiers, checking availability once.
pub struct FilterFactory {
    check: AvailabilityCheck,
    css: OnceCell<std::result::Result<(), String>>,
    js: OnceCell<std::result::Result<(), String>>,
}

impl Default for FilterFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterFactory {
    /// Factory checking the real minifiers.
    pub fn new() -> Self {
        Self::with_check(minify::check_available)
    }

    /// Factory with a custom availability check (stubbed in tests).
    pub fn with_check(check: impl Fn(AssetKind) -> std::result::Result<(), String> + 'static) -> Self {
        Self {
            check: Box::new(check),
            css: OnceCell::new(),
            js: OnceCell::new(),
        }
    }

    /// Check that the minifier backing `kind` is usable.
    ///
    /// The check runs at most once per kind for the lifetime of the factory.
    pub fn check_availability(&self, kind: AssetKind) -> Result<()> {
        let cell = match kind {
            AssetKind::Css => &self.css,
            AssetKind::Js => &self.js,
        };
        cell.get_or_init(|| (self.check)(kind))
            .clone()
            .map_err(|reason| WebHeadError::MissingDependency {
                filter: Self::filter_name(kind),
                reason,
            })
    }

    pub fn css_minifier(&self) -> Result<CssMinifier> {
        self.check_availability(AssetKind::Css)?;
        Ok(CssMinifier)
    }

    pub fn js_minifier(&self) -> Result<JsMinifier> {
        self.check_availability(AssetKind::Js)?;
        Ok(JsMinifier)
    }

    /// Create a filter from its identifier.
    ///
    /// Case, `-` and `_` are ignored, so `css-minifier`, `css_minifier` and
    /// `CssMinifier` all resolve to the same filter.
    pub fn create(&self, id: &str) -> Result<Box<dyn Filter>> {
        let key: String = id
            .chars()
            .filter(|c| !matches!(c, '-' | '_'))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "cssminifier" => Ok(Box::new(self.css_minifier()?)),
            "jsminifier" => Ok(Box::new(self.js_minifier()?)),
            _ => Err(WebHeadError::config(format!("unknown filter `{id}`"))),
        }
    }

    const fn filter_name(kind: AssetKind) -> &'static str {
        match kind {
            AssetKind::Css => CssMinifier::NAME,
            AssetKind::Js => JsMinifier::NAME,
        }
    }
}
