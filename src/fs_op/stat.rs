use std::fs;
use std::io;
use std::path::Path;

/// Lightweight classification of a filesystem path's kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    /// The path does not exist.
    Missing,
    /// The path exists and is a regular file.
    File,
    /// The path exists and is a directory.
    Directory,
    /// The path exists but is neither a regular file nor a directory
    /// (for example: socket, FIFO, block device).
    Unknown,
}

impl PathKind {
    /// Classify `path` with a single metadata lookup.
    ///
    /// "Not found" is a valid classification, not an error: mapping logic
    /// uses `Missing` to recognise an output path that may be freshly
    /// created. Any other lookup failure (permissions, device errors) is
    /// propagated and aborts the calling resolution.
    pub fn classify<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        match fs::metadata(path.as_ref()) {
            Ok(md) if md.is_file() => Ok(PathKind::File),
            Ok(md) if md.is_dir() => Ok(PathKind::Directory),
            Ok(_) => Ok(PathKind::Unknown),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(PathKind::Missing),
            Err(e) => Err(e),
        }
    }
}
