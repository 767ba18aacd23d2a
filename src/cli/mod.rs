//! Command-line interface module.

mod args;
pub mod common;
pub mod compile;
pub mod list;

pub use args::{Cli, Commands, OutputArgs};
