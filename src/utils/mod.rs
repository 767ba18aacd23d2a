//! Shared helpers: ordering, hashing, paths and URLs.

pub mod hash;
pub mod path;
pub mod plural;
pub mod sort;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

/// Insertion-ordered map with the Fx hasher.
pub type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;
