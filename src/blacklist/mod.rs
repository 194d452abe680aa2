//! Blacklist construction.
//!
//! A transformation rule is blacklisted when the target runtime already
//! implements the corresponding language feature natively, so the
//! transformer should leave those constructs alone. The blacklist comes
//! either from a version-keyed feature table or from probing the runtime
//! (see [`probe`]).

use std::collections::BTreeMap;
use std::io;
use std::path::Path;
use std::process::Command;

use once_cell::sync::Lazy;
use semver::Version;
use serde::Deserialize;

pub mod probe;

use probe::ProbeRunner;

static FEATURES: Lazy<FeatureTable> = Lazy::new(|| {
    serde_json::from_str(include_str!("features.json"))
        .expect("embedded features table is valid JSON")
});

/// Version-keyed rule table: each entry lists the transformation rules made
/// redundant by the runtime release that first shipped the feature.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct FeatureTable(BTreeMap<Version, Vec<String>>);

impl FeatureTable {
    /// The built-in table embedded at compile time.
    pub fn builtin() -> &'static FeatureTable {
        &FEATURES
    }

    /// Rules for every feature natively available in `version`, in
    /// ascending release order.
    pub fn blacklist_for(&self, version: &Version) -> Vec<String> {
        let mut blacklist = Vec::new();
        for (shipped, rules) in &self.0 {
            if version < shipped {
                break;
            }
            blacklist.extend(rules.iter().cloned());
        }
        blacklist
    }
}

/// Query the runtime binary for its version.
///
/// `node --version` prints a `v`-prefixed semver (`v18.19.0`); the prefix is
/// stripped before parsing.
pub fn runtime_version(program: &Path) -> io::Result<Version> {
    let out = Command::new(program).arg("--version").output()?;
    if !out.status.success() {
        return Err(io::Error::other(format!(
            "{} --version exited with {}",
            program.display(),
            out.status
        )));
    }
    let raw = String::from_utf8_lossy(&out.stdout);
    let trimmed = raw.trim().trim_start_matches('v');
    trimmed.parse().map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("unparseable runtime version `{trimmed}`: {e}"),
        )
    })
}

/// Caller-owned cache for a probed blacklist.
///
/// Probing spawns one runtime process per feature, so callers that resolve
/// the blacklist more than once should hold one of these for the lifetime of
/// the run. `invalidate` drops the cached list, e.g. after switching the
/// target runtime.
#[derive(Debug, Default)]
pub struct BlacklistCache {
    detected: Option<Vec<String>>,
}

impl BlacklistCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the probed blacklist, running the probes only on first use.
    /// Each call hands back a fresh copy.
    pub fn get_or_detect(&mut self, runner: &dyn ProbeRunner) -> io::Result<Vec<String>> {
        if let Some(list) = &self.detected {
            return Ok(list.clone());
        }
        let list = probe::detect_blacklist(runner)?;
        self.detected = Some(list.clone());
        Ok(list)
    }

    pub fn invalidate(&mut self) {
        self.detected = None;
    }
}
