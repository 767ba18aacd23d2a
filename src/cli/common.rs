//! Common utilities shared across CLI commands.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result, bail};

use super::Cli;
use crate::asset::{Asset, AssetKind, DEFAULT_MEDIA};
use crate::config::{WebHeadConfig, find_config_file};
use crate::debug;

/// Locate and load the config named by `-C`, searching upward from cwd.
pub fn load_config(cli: &Cli) -> Result<WebHeadConfig> {
    let cwd = std::env::current_dir().context("Failed to get current working directory")?;
    load_config_from(&cli.config, &cwd)
}

pub fn load_config_from(config_name: &Path, start: &Path) -> Result<WebHeadConfig> {
    let Some(path) = find_config_file(config_name, start) else {
        bail!(
            "Config file '{}' not found in '{}' or any parent directory",
            config_name.display(),
            start.display()
        );
    };
    debug!("config"; "loading {}", path.display());
    Ok(WebHeadConfig::load(&path)?)
}

/// Render assets as JSON (`json`) or as one aligned line per asset.
pub fn render_assets(assets: &[&Asset], json: bool) -> Result<String> {
    if json {
        let mut out = serde_json::to_string_pretty(assets)?;
        out.push('\n');
        return Ok(out);
    }

    let mut out = String::new();
    for asset in assets {
        let media = match asset.media.as_deref() {
            Some(media) => media,
            None if asset.kind == AssetKind::Css => DEFAULT_MEDIA,
            None => "-",
        };
        let marker = if asset.compiled { '*' } else { ' ' };
        writeln!(
            out,
            "{} {:<3} {:>5} {:<8} {}",
            marker,
            asset.kind.as_str(),
            asset.priority,
            media,
            asset.file
        )?;
    }
    Ok(out)
}
