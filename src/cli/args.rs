//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// WebHead - document head assets for server-rendered sites
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path, searched upward from the current directory (default: webhead.toml)
    #[arg(short = 'C', long, global = true, default_value = "webhead.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Compile declared assets and print the resulting head assets
    #[command(visible_alias = "c")]
    Compile {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Print declared assets in head order without compiling
    #[command(visible_alias = "l")]
    List {
        #[command(flatten)]
        output: OutputArgs,
    },
}

/// Shared output arguments.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Print assets as JSON
    #[arg(short, long)]
    pub json: bool,
}

impl Cli {
    pub const fn output(&self) -> &OutputArgs {
        match &self.command {
            Commands::Compile { output } | Commands::List { output } => output,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compile() {
        let cli = Cli::try_parse_from(["webhead", "-v", "compile", "--json"]).unwrap();
        assert!(cli.verbose);
        assert!(cli.output().json);
        assert!(matches!(cli.command, Commands::Compile { .. }));
        assert_eq!(cli.config, PathBuf::from("webhead.toml"));
    }

    #[test]
    fn test_parse_list_with_config() {
        let cli = Cli::try_parse_from(["webhead", "l", "-C", "site/head.toml"]).unwrap();
        assert!(matches!(cli.command, Commands::List { .. }));
        assert!(!cli.output().json);
        assert_eq!(cli.config, PathBuf::from("site/head.toml"));
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["webhead"]).is_err());
    }
}
