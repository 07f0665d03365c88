use crate::config::GitHubConfig;
use anyhow::{Context, Result};
use bytes::Bytes;
use log::debug;
use octocrab::Octocrab;
use octocrab::models::RunId;
use serde::Deserialize;

/// Jobs requested per page when listing a run's jobs (GitHub maximum)
const JOBS_PER_PAGE: usize = 100;

/// The fields of a workflow run this tool looks at
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowRun {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub conclusion: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowJob {
    pub name: String,
    #[serde(default)]
    pub conclusion: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JobsResponse {
    total_count: usize,
    jobs: Vec<WorkflowJob>,
}

/// GitHub Actions client scoped to one repository
pub struct RunClient {
    octocrab: Octocrab,
    owner: String,
    repo: String,
}

impl RunClient {
    pub fn new(config: &GitHubConfig, owner: &str, repo: &str) -> Result<Self> {
        let octocrab = Octocrab::builder()
            .personal_token(config.token.clone())
            .build()
            .context("Failed to initialize GitHub client")?;
        debug!("Octocrab client initialized successfully");

        Ok(Self {
            octocrab,
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    pub async fn workflow_run(&self, run_id: u64) -> Result<WorkflowRun> {
        let url = format!("/repos/{}/{}/actions/runs/{}", self.owner, self.repo, run_id);
        self.octocrab
            .get(&url, None::<&()>)
            .await
            .with_context(|| format!("Error fetching workflow run {}", run_id))
    }

    /// Download the combined log archive of a run (ZIP bytes)
    pub async fn download_logs(&self, run_id: u64) -> Result<Bytes> {
        self.octocrab
            .actions()
            .download_workflow_run_logs(&self.owner, &self.repo, RunId(run_id))
            .await
            .with_context(|| format!("Error downloading logs of run {}", run_id))
    }

    /// All jobs of a run, following pagination
    pub async fn jobs(&self, run_id: u64) -> Result<Vec<WorkflowJob>> {
        let mut jobs = Vec::new();

        for page in 1.. {
            let url = jobs_page_url(&self.owner, &self.repo, run_id, page);
            let response: JobsResponse = self
                .octocrab
                .get(&url, None::<&()>)
                .await
                .with_context(|| format!("Error listing jobs of run {}", run_id))?;

            let page_len = response.jobs.len();
            jobs.extend(response.jobs);
            debug!(
                "Fetched jobs page {} ({} of {} jobs)",
                page,
                jobs.len(),
                response.total_count
            );

            if page_len < JOBS_PER_PAGE || jobs.len() >= response.total_count {
                break;
            }
        }

        Ok(jobs)
    }
}

fn jobs_page_url(owner: &str, repo: &str, run_id: u64, page: usize) -> String {
    format!(
        "/repos/{}/{}/actions/runs/{}/jobs?per_page={}&page={}",
        owner, repo, run_id, JOBS_PER_PAGE, page
    )
}
