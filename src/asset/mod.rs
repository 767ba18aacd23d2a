//! Declared assets and their kinds.

mod collector;
mod kind;

pub use collector::{
    Asset, AssetAttrs, AssetsCollector, Attrs, DEFAULT_MEDIA, LinkFormatter, coerce_priority,
};
pub use kind::AssetKind;
