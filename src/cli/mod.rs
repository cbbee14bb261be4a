//! Command-line interface module.

mod args;

pub use args::{Cli, Commands};

use std::path::Path;

use anyhow::{Context, Result};

use crate::config::{ConfigError, RegisterConfig, find_config_file};
use crate::host::{MemoryHost, RegistrationHost};
use crate::log;
use crate::unify::{Unifier, UnifyReport};
use crate::utils::hash;
use crate::utils::path::display_relative;

/// Run the parsed command line.
pub fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Unify { minify, json } => {
            let config_path = find_config_file(&cli.config)
                .ok_or_else(|| ConfigError::NotFound(cli.config.clone()))?;
            let report = unify_from_config(&config_path, *minify)?;
            if *json {
                let out = serde_json::to_string_pretty(&report)
                    .context("failed to serialize unify report")?;
                println!("{out}");
            } else {
                print_report(&report, config_path.parent().unwrap_or(Path::new("")));
            }
            Ok(())
        }
        Commands::Fingerprint { filenames } => {
            println!("{}", hash::fingerprint(filenames));
            Ok(())
        }
    }
}

/// Load a config, register its assets on a fresh host and unify its group.
pub fn unify_from_config(config_path: &Path, minify: bool) -> Result<UnifyReport> {
    let config = RegisterConfig::load(config_path)?;
    let root = config.site_root()?;

    let unifier = Unifier::new(MemoryHost::new(root.clone()), root);
    for asset in config.assets() {
        let (kind, name) = (asset.kind(), asset.name.clone());
        if !unifier.host().add(asset) {
            log!("warning"; "{} `{}` rejected: invalid or already registered", kind, name);
        }
    }

    let mut group = config.group();
    group.minify |= minify;
    let report = unifier
        .unify(&group)
        .with_context(|| format!("failed to unify `{}`", group.id))?;
    Ok(report)
}

fn print_report(report: &UnifyReport, base: &Path) {
    for artifact in &report.artifacts {
        println!(
            "{}\t{}\t{}",
            artifact.kind,
            display_relative(&artifact.path, base),
            artifact.url
        );
    }
    for kind in &report.skipped {
        log!("unify"; "no {}s to unify", kind);
    }
    for kind in &report.reverted {
        log!("unify"; "{} reverted", kind);
    }
}
