use anyhow::{Context, Result};
use clap::Parser;
use gh_actions_log_demux::{DemuxReport, demultiplex};
use log::{info, warn};

use crate::cli::Args;
use crate::config::{Config, GitHubConfig};
use crate::filter::JobFilter;
use crate::github::RunClient;

mod cli;
mod config;
mod filter;
mod github;
mod logger;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logger::init_logger(args.verbose);

    let config = args.apply(Config::load());
    let github = GitHubConfig::from_env()?;
    let client = RunClient::new(&github, &args.owner, &args.repo)?;

    fetch_run_logs(&client, &args, &config).await
}

async fn fetch_run_logs(client: &RunClient, args: &Args, config: &Config) -> Result<()> {
    let run = client.workflow_run(args.run_id).await?;
    let run_name = run.name.as_deref().unwrap_or("workflow");

    if !args.all_jobs && !config.is_failed(run.conclusion.as_deref()) {
        info!(
            "Workflow run {} ({}) did not fail, conclusion: {}",
            run.id,
            run_name,
            run.conclusion.as_deref().unwrap_or("in_progress")
        );
        return Ok(());
    }
    info!("Fetching logs of {} run {}", run_name, run.html_url);

    let log_data = client.download_logs(run.id).await?;
    tokio::fs::write(&config.archive_file, &log_data)
        .await
        .with_context(|| format!("Failed to write {}", config.archive_file.display()))?;
    info!(
        "Downloaded workflow logs to {} ({} bytes)",
        config.archive_file.display(),
        log_data.len()
    );

    let filter = if args.all_jobs {
        JobFilter::All
    } else {
        let jobs = client.jobs(run.id).await?;
        let filter = JobFilter::failed_jobs(&jobs, config);
        info!("Failed jobs: {:?}", filter.names());
        filter
    };

    let archive_file = config.archive_file.clone();
    let logs_dir = config.logs_dir.clone();
    let report = tokio::task::spawn_blocking(move || {
        demultiplex(&archive_file, &logs_dir, |job| filter.should_exclude(job))
    })
    .await
    .context("Log extraction task panicked")?
    .context("Error decompressing logs")?;

    log_summary(&report, config);

    if !config.keep_archive {
        tokio::fs::remove_file(&config.archive_file)
            .await
            .with_context(|| format!("Failed to remove {}", config.archive_file.display()))?;
    }

    Ok(())
}

fn log_summary(report: &DemuxReport, config: &Config) {
    info!(
        "Extracted {} log files ({} bytes) for {} jobs into {}",
        report.extracted.len(),
        report.total_bytes(),
        report.jobs().len(),
        config.logs_dir.display()
    );
    if !report.excluded.is_empty() {
        info!("Skipped {} log files of other jobs", report.excluded.len());
    }
    if report.has_failures() {
        warn!(
            "{} log files could not be extracted, see warnings above",
            report.failures.len()
        );
    }
}
