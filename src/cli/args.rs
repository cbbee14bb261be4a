//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Register, unify and minify theme assets
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Show debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (default: register.toml)
    #[arg(short = 'C', long, global = true, default_value = "register.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Unify the configured group into one bundle per asset type
    #[command(visible_alias = "u")]
    Unify {
        /// Minify the bundles (overrides `unify.minify`)
        #[arg(short, long)]
        minify: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the bundle fingerprint of the given source filenames
    #[command(visible_alias = "f")]
    Fingerprint {
        /// Source filenames, in registration order
        #[arg(required = true, value_name = "FILENAME")]
        filenames: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_unify() {
        let cli = Cli::try_parse_from(["register", "-C", "site/register.toml", "unify", "--minify"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("site/register.toml"));
        assert!(matches!(cli.command, Commands::Unify { minify: true, json: false }));
    }

    #[test]
    fn test_parse_fingerprint() {
        let cli = Cli::try_parse_from(["register", "--verbose", "fingerprint", "a.css", "b.css"]).unwrap();
        assert!(cli.verbose);
        let Commands::Fingerprint { filenames } = cli.command else {
            panic!("expected fingerprint");
        };
        assert_eq!(filenames, ["a.css", "b.css"]);
        assert!(Cli::try_parse_from(["register", "fingerprint"]).is_err());
    }
}
