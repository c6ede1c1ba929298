//! Atomic artifact writes.
//!
//! Every artifact in a run directory is written through here:
//! 1. Write content to `.{filename}.tmp` next to the target
//! 2. fsync the temporary file
//! 3. Rename it over the target
//!
//! A reader of the run directory therefore sees either the previous file or
//! the complete new one, never a truncated record. `std::fs::rename` replaces
//! an existing target on every supported platform, so there is no
//! platform-specific replace path.
//!
//! Failures are reported as [`DelegateError::Persistence`] carrying the path
//! that could not be written.

use crate::error::{DelegateError, Result};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Atomically write bytes to `path`, creating parent directories as needed.
///
/// ```no_run
/// use delegator::fs::atomic_write;
/// use std::path::Path;
///
/// atomic_write(Path::new("output/result.json"), b"{}")?;
/// # Ok::<(), delegator::error::DelegateError>(())
/// ```
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| DelegateError::persistence(parent, e))?;
    }

    let temp_path = temp_path_for(path)?;
    write_and_sync(&temp_path, content).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        DelegateError::persistence(&temp_path, e)
    })?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        DelegateError::persistence(path, e)
    })?;

    sync_parent(path);
    Ok(())
}

/// Atomically write a string to `path`.
pub fn atomic_write_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    atomic_write(path, content.as_bytes())
}

/// Write and fsync `path` in place, without the rename step.
///
/// Used for files whose name is itself the marker of an in-flight operation
/// (the temporary prompt), where the rename would add nothing.
pub fn write_durable<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    let path = path.as_ref();
    write_and_sync(path, content.as_bytes()).map_err(|e| DelegateError::persistence(path, e))
}

/// Remove `path` if it exists. A missing file is not an error.
pub fn remove_if_exists<P: AsRef<Path>>(path: P) -> Result<bool> {
    let path = path.as_ref();
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(DelegateError::persistence(path, e)),
    }
}

fn temp_path_for(target: &Path) -> Result<PathBuf> {
    let parent = target.parent().unwrap_or(Path::new("."));
    let filename = target
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            DelegateError::persistence(
                target,
                io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
            )
        })?;
    Ok(parent.join(format!(".{}.tmp", filename)))
}

fn write_and_sync(path: &Path, content: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content)?;
    file.sync_all()
}

#[cfg(unix)]
fn sync_parent(target: &Path) {
    // Persist the directory entry too; best effort.
    if let Some(parent) = target.parent()
        && let Ok(dir) = File::open(parent)
    {
        let _ = dir.sync_all();
    }
}

#[cfg(not(unix))]
fn sync_parent(_target: &Path) {}
