//! Filesystem adapter for output naming, mirrored writes and backups
//!
//! Every artifact is written to the input's own directory first and then to
//! each mirror directory. A failure at one destination is recorded and the
//! remaining destinations are still attempted. Mirror directories are never
//! created.

use crate::app::models::ExportFormat;
use crate::constants::{
    ADVANCE_SUFFIX, FILTERED_SUFFIX, NORMAL_SUFFIX, REPORT_EXTENSION, REPORT_SUFFIX,
};
use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Artifact names derived from an input file name
///
/// `CB010101.RET` yields `CB010101_alterado.RET`, `CB010101_normal.RET`,
/// `CB010101_antecipado.RET`, `CB010101.csv` and `CB010101_relatorio.txt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNames {
    stem: String,
    /// Extension including the leading dot, or empty
    extension: String,
}

impl OutputNames {
    pub fn from_input(path: &Path) -> Result<Self> {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::file_not_found(path.display().to_string()))?;
        let extension = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        Ok(Self { stem, extension })
    }

    pub fn stem(&self) -> &str {
        &self.stem
    }

    pub fn filtered(&self) -> String {
        format!("{}{}{}", self.stem, FILTERED_SUFFIX, self.extension)
    }

    pub fn normal(&self) -> String {
        format!("{}{}{}", self.stem, NORMAL_SUFFIX, self.extension)
    }

    pub fn advance(&self) -> String {
        format!("{}{}{}", self.stem, ADVANCE_SUFFIX, self.extension)
    }

    pub fn export(&self, format: ExportFormat) -> String {
        format!("{}.{}", self.stem, format.extension())
    }

    pub fn report(&self) -> String {
        format!("{}{}.{}", self.stem, REPORT_SUFFIX, REPORT_EXTENSION)
    }

    /// Backup name stamped with seconds since the Unix epoch
    pub fn backup(&self, unix_timestamp: i64) -> String {
        format!("{}_{}{}", self.stem, unix_timestamp, self.extension)
    }
}

/// Result of writing one artifact to one directory
#[derive(Debug)]
pub struct DestinationWrite {
    pub path: PathBuf,
    /// Bytes written, or the failure for this destination only
    pub result: Result<u64>,
}

impl DestinationWrite {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    /// Path and size when the write succeeded
    pub fn written(&self) -> Option<(PathBuf, u64)> {
        self.result.as_ref().ok().map(|size| (self.path.clone(), *size))
    }
}

/// Output directories for an input: its parent first, then mirrors, deduplicated
pub fn output_dirs(input: &Path, mirrors: &[PathBuf]) -> Vec<PathBuf> {
    let parent = input
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let mut dirs: Vec<PathBuf> = Vec::with_capacity(mirrors.len() + 1);
    for dir in std::iter::once(parent).chain(mirrors.iter().cloned()) {
        if !dirs.iter().any(|known| same_dir(known, &dir)) {
            dirs.push(dir);
        }
    }
    dirs
}

fn same_dir(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Write `bytes` as `file_name` into every directory
pub fn write_to_dirs(dirs: &[PathBuf], file_name: &str, bytes: &[u8]) -> Vec<DestinationWrite> {
    dirs.iter()
        .map(|dir| {
            let path = dir.join(file_name);
            let result = write_one(dir, &path, bytes);
            match &result {
                Ok(size) => debug!("Wrote {} ({} bytes)", path.display(), size),
                Err(e) => warn!("Could not write {}: {}", path.display(), e),
            }
            DestinationWrite { path, result }
        })
        .collect()
}

fn write_one(dir: &Path, path: &Path, bytes: &[u8]) -> Result<u64> {
    if !dir.is_dir() {
        return Err(Error::file_not_found(dir.display().to_string()));
    }
    fs::write(path, bytes).map_err(|e| Error::io(format!("Failed to write {}", path.display()), e))?;
    Ok(bytes.len() as u64)
}

/// Copy the untouched original into every directory as `<name>_<unix_ts><ext>`
///
/// Destinations where the backup name already exists are left alone and
/// omitted from the result.
pub fn backup_original(
    input: &Path,
    names: &OutputNames,
    dirs: &[PathBuf],
    unix_timestamp: i64,
) -> Vec<DestinationWrite> {
    let backup_name = names.backup(unix_timestamp);

    dirs.iter()
        .filter_map(|dir| {
            let path = dir.join(&backup_name);
            if path.exists() {
                debug!("Backup {} already exists, skipping", path.display());
                return None;
            }
            let result = if !dir.is_dir() {
                Err(Error::file_not_found(dir.display().to_string()))
            } else {
                fs::copy(input, &path)
                    .map_err(|e| Error::io(format!("Failed to back up to {}", path.display()), e))
            };
            if let Err(e) = &result {
                warn!("Could not back up {}: {}", input.display(), e);
            }
            Some(DestinationWrite { path, result })
        })
        .collect()
}
