//! Input/output mapping resolution.
//!
//! An input spec (literal path or glob pattern) and an output path are
//! resolved into the list of (input, output) file pairs the transpile stage
//! consumes. The resolver only reads the filesystem; creating output
//! directories is the writer's job.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use globset::GlobBuilder;
use thiserror::Error;
use walkdir::WalkDir;

use crate::fs_op::stat::PathKind;

/// One file to transform and where to write the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMapping {
    /// Absolute path to an existing source file.
    pub input: PathBuf,
    /// Path the transformed output should be written to.
    pub output: PathBuf,
}

/// Errors produced while resolving an input spec against an output path.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The input shape cannot be expressed under the given output shape,
    /// e.g. a directory of files collapsing onto one output file.
    #[error("cannot map input to output: {}", .0.display())]
    Mismatch(PathBuf),
    /// The input spec is not a valid glob pattern.
    #[error("invalid input pattern `{pattern}`")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
    /// Underlying stat or directory-listing failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// A classified glob match.
#[derive(Debug)]
struct PathEntry {
    /// Canonical absolute path.
    path: PathBuf,
    kind: PathKind,
}

/// Result of expanding an input spec.
#[derive(Debug)]
struct Expansion {
    /// Effective root of the pattern, used to preserve relative structure
    /// when fanning matches out under an output directory.
    base: PathBuf,
    matches: Vec<PathEntry>,
}

/// Resolve `input_spec` against `output` into the mapping list to transform.
///
/// The input spec is expanded as a shell-style glob (a literal path is a
/// degenerate glob matching itself or nothing) and the output path is
/// classified; the two lookups touch disjoint paths and run as independent
/// parallel branches joined before the shape analysis.
///
/// Shape rules, in priority order:
/// - zero matches resolve to an empty list, silently;
/// - an output of unrecognised entity type is rejected;
/// - a single matched file maps into an existing output directory under its
///   own name, or directly onto any other output path;
/// - several matches (or one matched directory) cannot collapse onto an
///   existing output file;
/// - a single matched directory expands one level deep, `.js` files only;
/// - any other match set fans out under the output path, preserving each
///   match's position beneath the pattern's effective root.
///
/// Directories and non-`.js` files among expanded matches are skipped
/// silently. The resolver never writes; results are fresh per call.
pub fn resolve(input_spec: &str, output: &Path) -> Result<Vec<FileMapping>, ResolveError> {
    let (out_kind, expansion) = rayon::join(
        || PathKind::classify(output),
        || expand(input_spec),
    );
    let out_kind = out_kind?;
    let Expansion { base, matches } = expansion?;

    if matches.is_empty() {
        return Ok(Vec::new());
    }
    if out_kind == PathKind::Unknown {
        return Err(ResolveError::Mismatch(output.to_path_buf()));
    }

    match (matches.as_slice(), out_kind) {
        // Single file into an existing directory: keep the basename.
        ([only], PathKind::Directory) if only.kind == PathKind::File => {
            let name = file_name(&only.path)?;
            Ok(vec![FileMapping {
                input: only.path.clone(),
                output: output.join(name),
            }])
        }
        // Single file onto a file path, existing or not: rename/overwrite.
        ([only], _) if only.kind == PathKind::File => Ok(vec![FileMapping {
            input: only.path.clone(),
            output: output.to_path_buf(),
        }]),
        // Single directory into a directory that exists or will be created.
        ([only], PathKind::Directory | PathKind::Missing)
            if only.kind == PathKind::Directory =>
        {
            expand_directory(&only.path, output)
        }
        // Several matches, or one matched directory, cannot collapse onto
        // one output file.
        (entries, PathKind::File)
            if entries.len() > 1 || entries[0].kind == PathKind::Directory =>
        {
            Err(ResolveError::Mismatch(output.to_path_buf()))
        }
        _ => fan_out(&matches, &base, output),
    }
}

/// Expand an input spec into classified matches plus the pattern's
/// effective root.
fn expand(spec: &str) -> Result<Expansion, ResolveError> {
    let (base, rest) = split_pattern(spec);

    let rest = match rest {
        Some(rest) => rest,
        // No wildcards: the spec matches itself or nothing.
        None => {
            return match PathKind::classify(&base)? {
                PathKind::Missing => Ok(Expansion {
                    base,
                    matches: Vec::new(),
                }),
                kind => {
                    let path = fs::canonicalize(&base)?;
                    let base = if kind == PathKind::File {
                        match path.parent() {
                            Some(parent) => parent.to_path_buf(),
                            None => path.clone(),
                        }
                    } else {
                        path.clone()
                    };
                    Ok(Expansion {
                        base,
                        matches: vec![PathEntry { path, kind }],
                    })
                }
            };
        }
    };

    let matcher = GlobBuilder::new(&rest)
        .literal_separator(true)
        .build()
        .map_err(|source| ResolveError::Pattern {
            pattern: spec.to_string(),
            source,
        })?
        .compile_matcher();

    // A wildcard pattern whose literal root does not exist matches nothing.
    if PathKind::classify(&base)? == PathKind::Missing {
        return Ok(Expansion {
            base,
            matches: Vec::new(),
        });
    }

    let mut matches = Vec::new();
    for entry in WalkDir::new(&base).min_depth(1) {
        let entry = entry.map_err(io::Error::other)?;
        let rel = entry
            .path()
            .strip_prefix(&base)
            .map_err(io::Error::other)?;
        if !matcher.is_match(rel) {
            continue;
        }
        let kind = PathKind::classify(entry.path())?;
        let path = fs::canonicalize(entry.path())?;
        matches.push(PathEntry { path, kind });
    }

    Ok(Expansion {
        base: fs::canonicalize(&base)?,
        matches,
    })
}

/// Split a pattern into its longest wildcard-free prefix and the remaining
/// sub-pattern. `rest` is `None` for a fully literal path.
fn split_pattern(pattern: &str) -> (PathBuf, Option<String>) {
    let is_meta = |c: char| matches!(c, '*' | '?' | '[' | '{');
    let segments: Vec<&str> = pattern.split('/').collect();

    match segments.iter().position(|s| s.contains(is_meta)) {
        None => (PathBuf::from(pattern), None),
        Some(i) => {
            let literal = segments[..i].join("/");
            let base = if literal.is_empty() {
                if pattern.starts_with('/') {
                    PathBuf::from("/")
                } else {
                    PathBuf::from(".")
                }
            } else {
                PathBuf::from(literal)
            };
            (base, Some(segments[i..].join("/")))
        }
    }
}

/// One-level expansion of a directory input: nested directories are
/// intentionally not descended.
fn expand_directory(dir: &Path, output: &Path) -> Result<Vec<FileMapping>, ResolveError> {
    let mut mappings = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(io::Error::other)?;
        if !entry.file_type().is_file() || !has_js_extension(entry.path()) {
            continue;
        }
        let name = entry.file_name().to_os_string();
        mappings.push(FileMapping {
            input: entry.into_path(),
            output: output.join(name),
        });
    }
    Ok(mappings)
}

/// Map every matched `.js` file under `output`, preserving its position
/// beneath `base`.
fn fan_out(
    matches: &[PathEntry],
    base: &Path,
    output: &Path,
) -> Result<Vec<FileMapping>, ResolveError> {
    let mut mappings = Vec::new();
    for entry in matches {
        if entry.kind != PathKind::File || !has_js_extension(&entry.path) {
            continue;
        }
        let rel = entry.path.strip_prefix(base).map_err(io::Error::other)?;
        mappings.push(FileMapping {
            input: entry.path.clone(),
            output: output.join(rel),
        });
    }
    Ok(mappings)
}

fn has_js_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "js")
}

fn file_name(path: &Path) -> io::Result<&std::ffi::OsStr> {
    path.file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "input path has no filename"))
}
