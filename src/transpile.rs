//! Consumption of a resolved mapping list: read, transform, write.

use std::fs;
use std::io;
use std::path::PathBuf;

use rayon::prelude::*;
use thiserror::Error;

use crate::fs_op::helpers::atomic_write;
use crate::fs_op::mapping::FileMapping;
use crate::transform::{Transform, TransformError};

/// Errors produced while consuming a mapping list.
#[derive(Debug, Error)]
pub enum TranspileError {
    /// Reading an input or writing an output failed.
    #[error("I/O error on `{}`: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The engine rejected an input file.
    #[error("transform failed for `{}`: {}", .input.display(), .source)]
    Transform {
        input: PathBuf,
        #[source]
        source: TransformError,
    },
}

/// Run every mapping through `engine`, writing transformed output atomically.
///
/// Mappings are independent input/output pairs and are processed in
/// parallel; the first failure aborts the run. Output parent directories are
/// created as needed by the writer.
pub fn transpile(
    mappings: &[FileMapping],
    blacklist: &[String],
    engine: &(impl Transform + Sync),
) -> Result<(), TranspileError> {
    mappings.par_iter().try_for_each(|mapping| {
        let source = fs::read_to_string(&mapping.input).map_err(|source| TranspileError::Io {
            path: mapping.input.clone(),
            source,
        })?;
        let transformed =
            engine
                .transform(&source, blacklist)
                .map_err(|source| TranspileError::Transform {
                    input: mapping.input.clone(),
                    source,
                })?;
        atomic_write(&mapping.output, transformed.as_bytes()).map_err(|source| {
            TranspileError::Io {
                path: mapping.output.clone(),
                source,
            }
        })?;
        tracing::debug!(
            "transpiled {} -> {}",
            mapping.input.display(),
            mapping.output.display()
        );
        Ok(())
    })
}
