//! List command: declared assets in head order, nothing compiled.

use std::io::Write;

use anyhow::Result;

use super::args::OutputArgs;
use super::common::render_assets;
use crate::asset::AssetsCollector;
use crate::config::WebHeadConfig;

/// Print declared assets without touching the output directory.
pub fn run_list(config: &WebHeadConfig, args: &OutputArgs) -> Result<()> {
    let mut collector = AssetsCollector::new();
    config.declare_assets(&mut collector);

    let rendered = render_assets(&collector.get_all(), args.json)?;
    let mut out = std::io::stdout().lock();
    out.write_all(rendered.as_bytes())?;
    out.flush()?;
    Ok(())
}
