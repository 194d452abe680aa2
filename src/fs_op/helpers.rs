use std::fs;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

// Sequence number keeps temp names unique across concurrent writers in the
// same process; the pid covers concurrent processes.
static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Write `data` to `target` atomically by writing to a temporary file in the
/// same directory and then renaming into place. This avoids partial writes
/// being observed by other processes. Missing parent directories are created.
pub fn atomic_write(target: &Path, data: &[u8]) -> io::Result<()> {
    let dir = match target.parent() {
        Some(dir) => dir,
        // no parent: write directly
        None => return fs::write(target, data),
    };
    fs::create_dir_all(dir)?;

    let seq = TMP_SEQ.fetch_add(1, Ordering::Relaxed);
    let tmp = dir.join(format!(".tmp_write.{}.{}", std::process::id(), seq));

    // Write to the temp file first. If any step fails we remove the temp
    // file so no artifacts are left behind.
    match fs::write(&tmp, data) {
        Ok(()) => match fs::rename(&tmp, target) {
            Ok(()) => Ok(()),
            Err(e) => {
                let _ = fs::remove_file(&tmp);
                Err(e)
            }
        },
        Err(e) => {
            let _ = fs::remove_file(&tmp);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn writes_and_creates_parents() {
        let td = tempdir().unwrap();
        let target = td.path().join("a/b/out.js");
        atomic_write(&target, b"var x = 1;").unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "var x = 1;");

        // Ensure no leftover temp files are present after success.
        let mut leftovers = 0;
        for e in fs::read_dir(target.parent().unwrap()).unwrap().flatten() {
            if let Some(name) = e.file_name().to_str() {
                if name.starts_with(".tmp_write.") {
                    leftovers += 1;
                }
            }
        }
        assert_eq!(leftovers, 0, "found leftover temp files");
    }

    #[test]
    fn overwrites_existing_target() {
        let td = tempdir().unwrap();
        let target = td.path().join("out.js");
        fs::write(&target, "old").unwrap();
        atomic_write(&target, b"new").unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "new");
    }
}
