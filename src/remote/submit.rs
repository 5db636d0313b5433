use crate::remote::params::SubmissionParameters;
use crate::remote::transport::BlastTransport;
use crate::{Result, SpotCheckError};
use serde::{Deserialize, Serialize};
use tracing::info;

/// A submitted BLAST search: the request ID (RID) plus NCBI's estimate of
/// the time to completion (RTOE) in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobHandle {
    pub id: String,
    pub estimate_secs: u64,
}

impl JobHandle {
    pub fn new(id: impl Into<String>, estimate_secs: u64) -> Self {
        Self {
            id: id.into(),
            estimate_secs,
        }
    }

    /// Handle for a job submitted earlier; nothing is known about its ETA
    pub fn resume(id: impl Into<String>) -> Self {
        Self::new(id, 0)
    }
}

pub struct SearchSubmitter<'a> {
    transport: &'a dyn BlastTransport,
}

impl<'a> SearchSubmitter<'a> {
    pub fn new(transport: &'a dyn BlastTransport) -> Self {
        Self { transport }
    }

    /// Submit a query and return the job handle NCBI assigns to it
    pub fn submit(&self, query: &str, params: &SubmissionParameters) -> Result<JobHandle> {
        let body = self.transport.post(&params.submit_params(query))?;
        let handle = parse_submission(&body)?;
        info!(
            "Job {} has been given an estimated completion time of {} sec",
            handle.id, handle.estimate_secs
        );
        Ok(handle)
    }
}

/// Extract RID and RTOE from the QBlastInfo block of a submission response
pub fn parse_submission(body: &str) -> Result<JobHandle> {
    let id = marker_value(body, "RID =")
        .ok_or_else(|| SpotCheckError::Parse("submission response has no RID".to_string()))?;
    let estimate = marker_value(body, "RTOE =")
        .ok_or_else(|| SpotCheckError::Parse("submission response has no RTOE".to_string()))?;
    let estimate_secs = estimate.parse::<u64>().map_err(|_| {
        SpotCheckError::Parse(format!("RTOE '{}' is not a whole number of seconds", estimate))
    })?;

    Ok(JobHandle::new(id, estimate_secs))
}

/// Last whitespace-separated token of the first line containing `marker`
fn marker_value<'b>(body: &'b str, marker: &str) -> Option<&'b str> {
    body.lines()
        .find(|line| line.contains(marker))
        .and_then(|line| line.split_whitespace().last())
        .filter(|token| *token != "=")
}
