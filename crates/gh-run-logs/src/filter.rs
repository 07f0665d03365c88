use crate::config::Config;
use crate::github::WorkflowJob;

/// Decides which job directories of the log archive are extracted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobFilter {
    /// Extract every job
    All,
    /// Extract only jobs whose directory name contains one of these job names
    Failed(Vec<String>),
}

impl JobFilter {
    pub fn failed_jobs(jobs: &[WorkflowJob], config: &Config) -> Self {
        let names = jobs
            .iter()
            .filter(|job| config.is_failed(job.conclusion.as_deref()))
            .map(|job| job.name.clone())
            .collect();
        JobFilter::Failed(names)
    }

    /// `true` when the job's logs must not be written.
    ///
    /// Archive directory names are not always the exact job names reported by
    /// the API, so a directory matches when it contains a failed job's name.
    pub fn should_exclude(&self, job_dir: &str) -> bool {
        match self {
            JobFilter::All => false,
            JobFilter::Failed(names) => !names.iter().any(|name| job_dir.contains(name.as_str())),
        }
    }

    pub fn names(&self) -> &[String] {
        match self {
            JobFilter::All => &[],
            JobFilter::Failed(names) => names,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(name: &str, conclusion: Option<&str>) -> WorkflowJob {
        WorkflowJob {
            name: name.to_string(),
            conclusion: conclusion.map(str::to_string),
        }
    }

    #[test]
    fn test_only_failed_jobs_are_included() {
        let jobs = vec![
            job("lint", Some("success")),
            job("test (ubuntu-latest)", Some("failure")),
            job("deploy", Some("skipped")),
            job("bench", None),
        ];
        let filter = JobFilter::failed_jobs(&jobs, &Config::default());

        assert_eq!(filter.names(), ["test (ubuntu-latest)".to_string()]);
        assert!(!filter.should_exclude("test (ubuntu-latest)"));
        assert!(filter.should_exclude("lint"));
        assert!(filter.should_exclude("deploy"));
        assert!(filter.should_exclude("bench"));
    }

    #[test]
    fn test_directory_containing_job_name_matches() {
        let filter = JobFilter::Failed(vec!["build".to_string()]);
        assert!(!filter.should_exclude("CI _ build"));
        assert!(!filter.should_exclude("build"));
        assert!(filter.should_exclude("bui"));
    }

    #[test]
    fn test_no_failed_jobs_excludes_everything() {
        let filter = JobFilter::failed_jobs(&[job("lint", Some("success"))], &Config::default());
        assert!(filter.names().is_empty());
        assert!(filter.should_exclude("lint"));
    }

    #[test]
    fn test_all_excludes_nothing() {
        assert!(!JobFilter::All.should_exclude("lint"));
        assert!(!JobFilter::All.should_exclude(""));
        assert!(JobFilter::All.names().is_empty());
    }

    #[test]
    fn test_configured_conclusions() {
        let config = Config {
            failed_conclusions: vec!["failure".to_string(), "timed_out".to_string()],
            ..Config::default()
        };
        let jobs = vec![job("slow", Some("timed_out")), job("broken", Some("failure"))];
        let filter = JobFilter::failed_jobs(&jobs, &config);

        assert_eq!(filter.names().len(), 2);
        assert!(!filter.should_exclude("slow"));
    }
}
