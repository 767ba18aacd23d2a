//! Compile command: prepare declared assets and print the head.

use std::io::Write;

use anyhow::Result;

use super::args::OutputArgs;
use super::common::render_assets;
use crate::config::WebHeadConfig;
use crate::log;
use crate::utils::plural::plural_count;

/// Compile every declared asset and print the final ordered list.
pub fn run_compile(config: WebHeadConfig, args: &OutputArgs) -> Result<()> {
    let mut collector = config.into_collector()?;
    if collector.compiler().is_none() && !args.json {
        log!("compile"; "no [compiler] section, assets are served as declared");
    }
    collector.prepare()?;

    let assets = collector.get_all();
    let compiled = assets.iter().filter(|a| a.compiled).count();
    let rendered = render_assets(&assets, args.json)?;

    let mut out = std::io::stdout().lock();
    out.write_all(rendered.as_bytes())?;
    out.flush()?;
    drop(out);

    if !args.json {
        log!(
            "compile";
            "{} in head, {} compiled",
            plural_count(assets.len(), "asset"),
            compiled
        );
    }
    Ok(())
}
