//! Demultiplexing of a combined workflow run log archive into per-job directories

use crate::types::{DemuxReport, EntryFailure, EntryPath, ExtractedLog};
use log::{debug, warn};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek};
use std::path::{Path, PathBuf};
use thiserror::Error;
use zip::ZipArchive;

/// Errors that abort demultiplexing before any entry is processed
#[derive(Error, Debug)]
pub enum DemuxError {
    #[error("Failed to open log archive {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read ZIP archive {path}: {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
}

/// Errors confined to a single archive entry
///
/// These are reported and collected; the remaining entries are still processed.
#[derive(Error, Debug)]
pub enum EntryError {
    #[error("Entry path escapes the logs directory")]
    UnsafePath,

    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to create log file {path}: {source}")]
    CreateFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to open zipped log: {0}")]
    OpenEntry(#[from] zip::result::ZipError),

    #[error("Failed to extract log file {path}: {source}")]
    Copy {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Extract a workflow run log archive into one directory per job
///
/// Every entry named `<job>/<file>` is written to `<logs_root>/<job>/<file>`
/// unless `should_exclude(job)` returns `true`. Root-level entries and directory
/// entries are skipped.
///
/// Only failing to open or read the archive itself is returned as an error.
/// Failures on individual entries are logged, collected in
/// [`DemuxReport::failures`], and do not stop the remaining entries.
///
/// # Example
///
/// ```no_run
/// # use gh_actions_log_demux::demultiplex;
/// let failed = ["build"];
/// let report = demultiplex("workflow_logs.zip", "logs", |job| {
///     !failed.iter().any(|name| job.contains(name))
/// })?;
/// println!("extracted {} files", report.extracted.len());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn demultiplex<P, Q, F>(
    archive_path: P,
    logs_root: Q,
    should_exclude: F,
) -> Result<DemuxReport, DemuxError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    F: FnMut(&str) -> bool,
{
    let archive_path = archive_path.as_ref();

    let file = File::open(archive_path).map_err(|source| DemuxError::Open {
        path: archive_path.to_path_buf(),
        source,
    })?;

    let archive = ZipArchive::new(file).map_err(|source| DemuxError::Archive {
        path: archive_path.to_path_buf(),
        source,
    })?;

    debug!(
        "Demultiplexing {} ({} entries) into {}",
        archive_path.display(),
        archive.len(),
        logs_root.as_ref().display()
    );

    Ok(demultiplex_archive(archive, logs_root.as_ref(), should_exclude))
}

/// Same as [`demultiplex`] for an archive that is already open
///
/// Useful when the archive lives in memory, e.g. a `Cursor` over downloaded bytes.
pub fn demultiplex_archive<R, F>(
    mut archive: ZipArchive<R>,
    logs_root: &Path,
    mut should_exclude: F,
) -> DemuxReport
where
    R: Read + Seek,
    F: FnMut(&str) -> bool,
{
    let mut report = DemuxReport::default();

    for index in 0..archive.len() {
        let Some(entry_name) = archive.name_for_index(index).map(str::to_owned) else {
            report.skipped += 1;
            continue;
        };

        let Some(entry_path) = EntryPath::parse(&entry_name) else {
            report.skipped += 1;
            continue;
        };

        if should_exclude(entry_path.job_name) {
            debug!("Excluding {}", entry_name);
            report.excluded.push(entry_name);
            continue;
        }

        match extract_entry(&mut archive, index, &entry_path, logs_root) {
            Ok(extracted) => {
                debug!(
                    "Extracted {} ({} bytes)",
                    extracted.path.display(),
                    extracted.bytes
                );
                report.extracted.push(extracted);
            }
            Err(error) => {
                warn!("Skipping {}: {}", entry_name, error);
                report.failures.push(EntryFailure { entry_name, error });
            }
        }
    }

    report
}

/// Write a single entry to its destination.
///
/// The entry stream and the destination file are dropped on every return path.
fn extract_entry<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    index: usize,
    entry_path: &EntryPath<'_>,
    logs_root: &Path,
) -> Result<ExtractedLog, EntryError> {
    if !entry_path.is_enclosed() {
        return Err(EntryError::UnsafePath);
    }

    let job_dir = entry_path.job_dir(logs_root);
    create_dir_all(&job_dir)?;

    let dest_path = entry_path.destination(logs_root);
    if let Some(parent) = dest_path.parent()
        && parent != job_dir
    {
        create_dir_all(parent)?;
    }

    let mut entry = archive.by_index(index)?;
    let mode = entry.unix_mode().filter(|mode| mode & 0o777 != 0);

    let mut out_file =
        create_log_file(&dest_path, mode).map_err(|source| EntryError::CreateFile {
            path: dest_path.clone(),
            source,
        })?;

    let bytes = io::copy(&mut entry, &mut out_file).map_err(|source| EntryError::Copy {
        path: dest_path.clone(),
        source,
    })?;

    Ok(ExtractedLog {
        job_name: entry_path.job_name.to_string(),
        path: dest_path,
        bytes,
    })
}

fn create_dir_all(path: &Path) -> Result<(), EntryError> {
    fs::create_dir_all(path).map_err(|source| EntryError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

/// Create or truncate a destination file.
///
/// The entry's mode only applies when the file is created and is filtered by
/// the process umask, so synthesized modes of DOS-made archives do not widen
/// permissions. A truncated existing file keeps its mode.
fn create_log_file(path: &Path, mode: Option<u32>) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        if let Some(mode) = mode {
            options.mode(mode & 0o7777);
        }
    }
    #[cfg(not(unix))]
    {
        let _ = mode;
    }

    options.open(path)
}
