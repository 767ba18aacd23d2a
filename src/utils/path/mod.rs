//! Path and URL utilities.
//!
//! Pure functions for path manipulation, plus mtime lookup.
//!
//! - [`fs`]: Filesystem paths (`normalize_path`, `resolve_path`, `get_mtime`)
//! - [`route`]: URL utilities (`base_path`, `public_url`, `is_external_link`)

pub mod fs;
pub mod route;

pub use fs::{get_mtime, mtime_nanos, normalize_path, resolve_path};
pub use route::{base_path, collapse_parent_segments, is_external_link, public_url};
