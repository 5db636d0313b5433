//! Client for the NCBI BLAST URL API: submit, poll, fetch.

pub mod params;
pub mod poll;
pub mod results;
pub mod submit;
pub mod transport;
pub mod xml;

pub use params::{Contact, SubmissionParameters};
pub use poll::{JobPoller, JobStatus, ReadySignal, Sleeper, ThreadSleeper};
pub use results::{DetailFlags, HitRecord, ResultExtractor, ResultSet};
pub use submit::{JobHandle, SearchSubmitter};
pub use transport::{BlastTransport, HttpTransport};

use crate::Result;
use tracing::info;

/// Run the whole remote lifecycle for one query: submit, wait, extract
pub fn run_search(
    transport: &dyn BlastTransport,
    sleeper: &dyn Sleeper,
    query: &str,
    params: &SubmissionParameters,
    flags: &DetailFlags,
) -> Result<ResultSet> {
    let handle = SearchSubmitter::new(transport).submit(query, params)?;
    fetch_results(transport, sleeper, &handle, params.contact(), flags)
}

/// Wait for an already submitted job and extract its results
pub fn fetch_results(
    transport: &dyn BlastTransport,
    sleeper: &dyn Sleeper,
    handle: &JobHandle,
    contact: &Contact,
    flags: &DetailFlags,
) -> Result<ResultSet> {
    let ready = JobPoller::new(transport, contact, sleeper).poll(handle)?;
    let results = ResultExtractor::new(transport, contact).extract(&ready.id, flags)?;
    info!("Retrieved {} results for job {}", results.len(), ready.id);
    Ok(results)
}
