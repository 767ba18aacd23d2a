//! WebHead - document head assets for server-rendered sites.
//!
//! Pages declare stylesheets and scripts on an [`AssetsCollector`]; an
//! attached [`FiltersCompiler`] turns them into cached, filtered (and
//! optionally joined) files under a public output directory.
//!
//! ```no_run
//! use webhead::{AssetAttrs, AssetsCollector, FilterFactory, FiltersCompiler};
//!
//! # fn main() -> webhead::Result<()> {
//! let factory = FilterFactory::new();
//! let mut compiler = FiltersCompiler::new();
//! compiler
//!     .set_output_dir("www/webtemp", "/webtemp")?
//!     .register_filter(factory.create("css-minifier")?);
//!
//! let mut head = AssetsCollector::with_compiler(compiler);
//! head.add_css("www/css/site.css", AssetAttrs::new().priority(10));
//! head.prepare()?;
//!
//! for (media, files) in head.get_css() {
//!     println!("{media}: {files:?}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod asset;
pub mod cli;
pub mod compiler;
pub mod config;
pub mod error;
pub mod filter;
pub mod logger;
pub mod utils;

pub use asset::{Asset, AssetAttrs, AssetKind, AssetsCollector};
pub use compiler::{CompiledResult, FiltersCompiler, JoinedBundle, JoinedFiles};
pub use config::WebHeadConfig;
pub use error::{Result, WebHeadError};
pub use filter::{Filter, FilterError, FilterFactory};
