//! Persisting the recovered file.

use crate::error::{ExtractError, Result};
use crate::FALLBACK_NAME;
use log::{info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Somewhere a recovered file can be written.
pub trait PayloadSink {
    /// Stores `data` under (something derived from) `name` and returns where
    /// it ended up.
    fn persist(&self, name: &str, data: &[u8]) -> Result<PathBuf>;
}

/// Writes into one directory, atomically: the target either holds the full
/// payload or is left as it was.
#[derive(Debug, Clone)]
pub struct DirSink {
    dir: PathBuf,
}

impl DirSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

/// Final path component of `name` with NUL padding removed, so an embedded
/// name can't escape the output directory.
pub fn file_name_for(name: &str) -> String {
    let cleaned: String = name.chars().filter(|&c| c != '\0').collect();
    match Path::new(&cleaned).file_name().and_then(|n| n.to_str()) {
        Some(file) if !file.is_empty() => {
            if file != name {
                warn!("Embedded name '{}' reduced to '{}'", name, file);
            }
            file.to_string()
        }
        _ => {
            warn!("Embedded name '{}' is not a file name; using '{}'", name, FALLBACK_NAME);
            FALLBACK_NAME.to_string()
        }
    }
}

// A dropped temp file is deleted, so every error path leaves the directory
// as it was.
fn write_atomic(dir: &Path, target: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(data)?;
    temp.as_file().sync_all()?;
    temp.persist(target).map_err(|e| e.error)?;
    Ok(())
}

impl PayloadSink for DirSink {
    fn persist(&self, name: &str, data: &[u8]) -> Result<PathBuf> {
        let target = self.dir.join(file_name_for(name));

        if let Err(source) = write_atomic(&self.dir, &target, data) {
            return Err(ExtractError::Sink {
                path: target,
                source,
            });
        }

        info!("Wrote {} bytes to '{}'", data.len(), target.display());
        Ok(target)
    }
}
