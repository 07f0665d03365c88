//! Type definitions for GitHub Actions log demultiplexing

use std::path::{Component, Path, PathBuf};

use crate::demux::EntryError;

/// Separator used by ZIP entry names, independent of the host platform
pub const ENTRY_SEPARATOR: char = '/';

/// An archive entry name split into its job and file parts
///
/// GitHub names the entries of a run log archive `<job name>/<step log>`, so the
/// first segment identifies the job and the remainder is the file path inside
/// that job's directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryPath<'a> {
    /// First path segment (e.g. `build (ubuntu-latest)`)
    pub job_name: &'a str,
    /// Everything after the first separator (e.g. `3_Run cargo test.txt`)
    pub file_name: &'a str,
}

impl<'a> EntryPath<'a> {
    /// Split an entry name on its first separator.
    ///
    /// Returns `None` for entries that carry nothing to extract:
    /// root-level entries without a separator or with an empty first segment,
    /// and directory entries whose remainder is empty or ends with a separator.
    pub fn parse(entry_name: &'a str) -> Option<Self> {
        let (job_name, file_name) = entry_name.split_once(ENTRY_SEPARATOR)?;

        if job_name.is_empty() || file_name.is_empty() || file_name.ends_with(ENTRY_SEPARATOR) {
            return None;
        }

        Some(Self {
            job_name,
            file_name,
        })
    }

    /// Whether both parts stay inside the job directory once joined to a root.
    ///
    /// The job name must be exactly one normal component, and the file name may
    /// only contain normal components.
    pub fn is_enclosed(&self) -> bool {
        let mut job = Path::new(self.job_name).components();
        let job_is_single = matches!(job.next(), Some(Component::Normal(_))) && job.next().is_none();

        job_is_single
            && Path::new(self.file_name)
                .components()
                .all(|c| matches!(c, Component::Normal(_)))
    }

    /// Destination directory for this entry's job
    pub fn job_dir(&self, logs_root: &Path) -> PathBuf {
        logs_root.join(self.job_name)
    }

    /// Destination file for this entry
    pub fn destination(&self, logs_root: &Path) -> PathBuf {
        self.job_dir(logs_root).join(self.file_name)
    }
}

/// A log file written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedLog {
    /// Job the file belongs to
    pub job_name: String,
    /// Where the file was written
    pub path: PathBuf,
    /// Number of decompressed bytes copied
    pub bytes: u64,
}

/// An entry that could not be extracted
#[derive(Debug)]
pub struct EntryFailure {
    /// Full entry name as stored in the archive
    pub entry_name: String,
    pub error: EntryError,
}

/// Outcome of demultiplexing one archive
#[derive(Debug, Default)]
pub struct DemuxReport {
    /// Files written, in archive order
    pub extracted: Vec<ExtractedLog>,

    /// Root-level and directory entries that carry no job log
    pub skipped: usize,

    /// Entry names dropped because their job was excluded
    pub excluded: Vec<String>,

    /// Per-entry failures; none of them aborted the run
    pub failures: Vec<EntryFailure>,
}

impl DemuxReport {
    /// Distinct job names that received at least one file, in first-seen order
    pub fn jobs(&self) -> Vec<&str> {
        let mut jobs: Vec<&str> = Vec::new();
        for log in &self.extracted {
            if !jobs.contains(&log.job_name.as_str()) {
                jobs.push(&log.job_name);
            }
        }
        jobs
    }

    /// Total bytes written across all extracted files
    pub fn total_bytes(&self) -> u64 {
        self.extracted.iter().map(|log| log.bytes).sum()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}
