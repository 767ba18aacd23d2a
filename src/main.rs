//! WebHead - compile and inspect document head assets.

use anyhow::Result;
use clap::{ColorChoice, Parser};
use webhead::cli::{self, Cli, Commands};
use webhead::log;
use webhead::logger::set_verbose;

fn main() {
    if let Err(err) = run() {
        log!("error"; "{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    set_verbose(cli.verbose);

    let config = cli::common::load_config(&cli)?;
    match &cli.command {
        Commands::Compile { output } => cli::compile::run_compile(config, output),
        Commands::List { output } => cli::list::run_list(&config, output),
    }
}
