use crate::config::Config;
use clap::Parser;
use std::path::PathBuf;

/// Download the logs of a failed GitHub Actions run, one directory per job
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Args {
    /// Repository owner (user or organization)
    pub owner: String,

    /// Repository name
    pub repo: String,

    /// Workflow run ID (the number in .../actions/runs/<id>)
    pub run_id: u64,

    /// Directory receiving one subdirectory per job
    #[arg(short, long)]
    pub logs_dir: Option<PathBuf>,

    /// Where to store the downloaded log archive
    #[arg(short, long)]
    pub archive: Option<PathBuf>,

    /// Extract every job, and do not require the run to have failed
    #[arg(long)]
    pub all_jobs: bool,

    /// Delete the log archive after extraction
    #[arg(long)]
    pub remove_archive: bool,

    /// Show debug output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Command line flags take precedence over the config file
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(logs_dir) = &self.logs_dir {
            config.logs_dir = logs_dir.clone();
        }
        if let Some(archive) = &self.archive {
            config.archive_file = archive.clone();
        }
        if self.remove_archive {
            config.keep_archive = false;
        }
        config
    }
}
