//! Command-line orchestration: argument parsing, blacklist resolution, and
//! the resolve-then-transpile pipeline.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use semver::Version;

use crate::blacklist::probe::RuntimeProbe;
use crate::blacklist::{self, BlacklistCache, FeatureTable};
use crate::fs_op::mapping;
use crate::transform::CommandTransform;
use crate::transpile::transpile;

/// Backport modern JavaScript for older runtimes.
#[derive(Debug, Parser)]
#[command(name = "js-backport", version, about)]
pub struct Cli {
    /// File, directory, or glob pattern to transpile.
    #[arg(short, long, visible_alias = "in-dir", value_name = "PATH|GLOB")]
    pub input: String,

    /// File or directory to write transpiled output to.
    #[arg(short, long, visible_alias = "out-dir", value_name = "PATH")]
    pub output: PathBuf,

    /// Target runtime version; skips querying the runtime binary.
    #[arg(long, value_name = "VERSION")]
    pub target: Option<Version>,

    /// Probe the runtime for native feature support instead of using the
    /// version table.
    #[arg(long, conflicts_with = "target")]
    pub detect: bool,

    /// Runtime binary used for version queries and feature probes.
    #[arg(long, default_value = "node", value_name = "PROGRAM")]
    pub runtime: PathBuf,

    /// External transformer command invoked per input file.
    #[arg(long, default_value = "babel", value_name = "PROGRAM")]
    pub transformer: PathBuf,
}

/// Resolve the blacklist and the file mapping independently, then feed every
/// mapping through the transformer.
pub fn run(cli: &Cli) -> anyhow::Result<()> {
    let (blacklist, mappings) = rayon::join(
        || resolve_blacklist(cli),
        || mapping::resolve(&cli.input, &cli.output),
    );
    let blacklist = blacklist?;
    let mappings = mappings.with_context(|| {
        format!(
            "resolving `{}` against `{}`",
            cli.input,
            cli.output.display()
        )
    })?;

    if mappings.is_empty() {
        tracing::debug!("input `{}` matched nothing; nothing to do", cli.input);
        return Ok(());
    }
    tracing::debug!(
        "{} file(s) to transpile, {} rule(s) blacklisted",
        mappings.len(),
        blacklist.len()
    );

    let engine = CommandTransform::new(&cli.transformer);
    transpile(&mappings, &blacklist, &engine)?;
    Ok(())
}

fn resolve_blacklist(cli: &Cli) -> anyhow::Result<Vec<String>> {
    if cli.detect {
        let mut cache = BlacklistCache::new();
        let runner = RuntimeProbe::new(&cli.runtime);
        return cache
            .get_or_detect(&runner)
            .with_context(|| format!("probing `{}` for native features", cli.runtime.display()));
    }

    let version = match &cli.target {
        Some(version) => version.clone(),
        None => blacklist::runtime_version(&cli.runtime)
            .with_context(|| format!("querying `{}` for its version", cli.runtime.display()))?,
    };
    Ok(FeatureTable::builtin().blacklist_for(&version))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_dir_flags_are_aliases() {
        let cli = Cli::parse_from([
            "js-backport",
            "--in-dir",
            "lib",
            "--out-dir",
            "dist",
            "--target",
            "4.2.0",
        ]);
        assert_eq!(cli.input, "lib");
        assert_eq!(cli.output, PathBuf::from("dist"));
        assert_eq!(cli.target, Some("4.2.0".parse().unwrap()));
    }

    #[test]
    fn short_flags_parse() {
        let cli = Cli::parse_from(["js-backport", "-i", "src/**/*.js", "-o", "dist"]);
        assert_eq!(cli.input, "src/**/*.js");
        assert!(!cli.detect);
        assert_eq!(cli.runtime, PathBuf::from("node"));
        assert_eq!(cli.transformer, PathBuf::from("babel"));
    }

    #[test]
    fn detect_conflicts_with_target() {
        let res = Cli::try_parse_from([
            "js-backport",
            "-i",
            "a.js",
            "-o",
            "b.js",
            "--detect",
            "--target",
            "4.0.0",
        ]);
        assert!(res.is_err());
    }
}
