//! The source-to-source transformation seam.
//!
//! The engine is an opaque collaborator: it receives source text plus the
//! rule names to skip, and returns the transformed text. The production
//! engine drives an external transformer process.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};

use thiserror::Error;

/// Errors produced by a transformation engine.
#[derive(Debug, Error)]
pub enum TransformError {
    /// Spawning or talking to the engine failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The engine rejected the source.
    #[error("transformer `{}` exited with {status}: {stderr}", .program.display())]
    Failed {
        program: PathBuf,
        status: ExitStatus,
        stderr: String,
    },
    /// The engine produced output that is not UTF-8.
    #[error("transformer produced non-UTF-8 output")]
    NonUtf8(#[from] std::string::FromUtf8Error),
}

/// A source-to-source transformer.
pub trait Transform {
    /// Transform `source`, skipping the rules named in `blacklist`.
    fn transform(&self, source: &str, blacklist: &[String]) -> Result<String, TransformError>;
}

/// Engine backed by an external transformer command.
///
/// The source is piped through stdin and the transformed text read from
/// stdout; a non-empty blacklist travels as `--blacklist a,b,c`.
#[derive(Debug, Clone)]
pub struct CommandTransform {
    program: PathBuf,
}

impl CommandTransform {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Transform for CommandTransform {
    fn transform(&self, source: &str, blacklist: &[String]) -> Result<String, TransformError> {
        let mut cmd = Command::new(&self.program);
        if !blacklist.is_empty() {
            cmd.arg("--blacklist").arg(blacklist.join(","));
        }
        let mut child = cmd
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        {
            let mut stdin = child
                .stdin
                .take()
                .ok_or_else(|| io::Error::other("transformer stdin unavailable"))?;
            stdin.write_all(source.as_bytes())?;
            // stdin drops here so the child sees EOF
        }

        let out = child.wait_with_output()?;
        if !out.status.success() {
            return Err(TransformError::Failed {
                program: self.program.clone(),
                status: out.status,
                stderr: String::from_utf8_lossy(&out.stderr).trim_end().to_string(),
            });
        }
        Ok(String::from_utf8(out.stdout)?)
    }
}
