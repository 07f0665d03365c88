//! GitHub Actions Log Demultiplexer
//!
//! Splits the combined log archive of a workflow run into one directory per job.
//! GitHub names the archive entries `<job name>/<step log>`; every entry is written
//! to `<logs root>/<job name>/<step log>` unless the caller excludes its job.
//!
//! # Example
//!
//! ```no_run
//! use gh_actions_log_demux::demultiplex;
//!
//! // Keep only the logs of jobs that failed
//! let failed_jobs = ["test (ubuntu-latest)"];
//! let report = demultiplex("workflow_logs.zip", "logs", |job_name| {
//!     !failed_jobs.iter().any(|failed| job_name.contains(failed))
//! })?;
//!
//! for log in &report.extracted {
//!     println!("{}: {}", log.job_name, log.path.display());
//! }
//! for failure in &report.failures {
//!     eprintln!("{}: {}", failure.entry_name, failure.error);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod demux;
mod types;

pub use demux::{DemuxError, EntryError, demultiplex, demultiplex_archive};
pub use types::*;
