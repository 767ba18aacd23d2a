//! Minifying filters for JS and CSS.
//!
//! Uses oxc for JavaScript and lightningcss for CSS.

use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;

use super::{Filter, FilterError};
use crate::asset::AssetKind;

/// Minify JavaScript source code.
///
/// Parsed as a classic script so top-level names (globals shared between
/// `<script>` tags) are left alone by the mangler.
pub fn minify_js(source: &str) -> Result<String, FilterError> {
    let allocator = Allocator::default();
    let source_type = SourceType::cjs();
    let ret = Parser::new(&allocator, source, source_type).parse();
    if let Some(err) = ret.errors.first() {
        return Err(FilterError(format!(
            "{} parse error(s), first: {}",
            ret.errors.len(),
            err
        )));
    }
    let mut program = ret.program;
    let options = MinifierOptions {
        mangle: Some(MangleOptions::default()),
        compress: Some(CompressOptions::smallest()),
    };
    let ret = Minifier::new(options).minify(&allocator, &mut program);
    let code = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program)
        .code;
    Ok(code)
}

/// Minify CSS source code.
pub fn minify_css(source: &str) -> Result<String, FilterError> {
    let stylesheet = StyleSheet::parse(source, ParserOptions::default())
        .map_err(|e| FilterError(e.to_string()))?;
    let result = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .map_err(|e| FilterError(e.to_string()))?;
    Ok(result.code)
}

/// Default availability check: run the backing minifier on a tiny snippet.
pub fn check_available(kind: AssetKind) -> Result<(), String> {
    let outcome = match kind {
        AssetKind::Css => minify_css("a { color: red; }"),
        AssetKind::Js => minify_js("var answer = 40 + 2;"),
    };
    outcome.map(|_| ()).map_err(|e| e.0)
}

// ============================================================================
// Filters
// ============================================================================

/// Stylesheet minifier backed by lightningcss.
#[derive(Debug, Clone, Copy, Default)]
pub struct CssMinifier;

impl CssMinifier {
    pub const NAME: &'static str = "css-minifier";
}

impl Filter for CssMinifier {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn supported_types(&self) -> &[AssetKind] {
        &[AssetKind::Css]
    }

    fn compile(&self, content: &str) -> Result<String, FilterError> {
        minify_css(content)
    }
}

/// Script minifier backed by oxc.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsMinifier;

impl JsMinifier {
    pub const NAME: &'static str = "js-minifier";
}

impl Filter for JsMinifier {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn supported_types(&self) -> &[AssetKind] {
        &[AssetKind::Js]
    }

    fn compile(&self, content: &str) -> Result<String, FilterError> {
        minify_js(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minify_css() {
        let out = minify_css("body {\n  color: red;\n  margin: 0px;\n}\n").unwrap();
        assert!(!out.contains('\n'));
        assert!(out.starts_with("body{"));
    }

    #[test]
    fn test_minify_css_keeps_urls() {
        let out = minify_css("div { background: url(../img/x.png); }").unwrap();
        assert!(out.contains("../img/x.png"));
    }

    #[test]
    fn test_minify_js() {
        let out = minify_js("function add(first, second) {\n  return first + second;\n}\n").unwrap();
        assert!(out.len() < 40);
        assert!(out.contains("add"));
    }

    #[test]
    fn test_minify_js_rejects_garbage() {
        assert!(minify_js("function (").is_err());
    }

    #[test]
    fn test_minifiers_available() {
        assert!(check_available(AssetKind::Css).is_ok());
        assert!(check_available(AssetKind::Js).is_ok());
    }

    #[test]
    fn test_supported_types() {
        assert!(CssMinifier.is_type_supported(AssetKind::Css));
        assert!(!CssMinifier.is_type_supported(AssetKind::Js));
        assert!(JsMinifier.is_type_supported(AssetKind::Js));
    }
}
