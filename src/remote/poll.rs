use crate::remote::params::{status_params, Contact};
use crate::remote::submit::JobHandle;
use crate::remote::transport::BlastTransport;
use crate::{Result, SpotCheckError};
use std::time::Duration;
use tracing::{debug, info};

/// Shortest wait before the first status check
pub const MIN_WAIT_SECS: f64 = 3.0;
/// Upper bound for the WAITING backoff
pub const MAX_DELAY_SECS: f64 = 120.0;
/// Growth factor applied to the delay after every WAITING answer
pub const BACKOFF_FACTOR: f64 = 1.5;
/// NCBI needs a moment after READY before the report can be fetched
pub const READY_SETTLE_SECS: f64 = 3.0;

/// Source of blocking waits; swapped for a recording fake in tests
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// Sleeps the calling thread
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Status reported by `FORMAT_OBJECT=SearchInfo`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Waiting,
    Ready,
    /// UNKNOWN, FAILED or anything unrecognised
    Failed(String),
}

impl JobStatus {
    pub fn parse(token: &str) -> Self {
        match token.trim() {
            "READY" => JobStatus::Ready,
            "WAITING" => JobStatus::Waiting,
            other => JobStatus::Failed(other.to_string()),
        }
    }
}

/// Proof that a job finished and its report can be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadySignal {
    pub id: String,
    pub status_checks: u32,
}

/// Extract the `Status=` token from a SearchInfo response
pub fn parse_status(body: &str) -> Result<JobStatus> {
    body.lines()
        .find(|line| line.contains("Status="))
        .and_then(|line| line.split('=').last())
        .map(JobStatus::parse)
        .ok_or_else(|| SpotCheckError::Parse("status response has no Status= line".to_string()))
}

/// Next WAITING delay: grow by half, capped at two minutes
pub fn next_delay(current_secs: f64) -> f64 {
    (current_secs * BACKOFF_FACTOR).min(MAX_DELAY_SECS)
}

pub struct JobPoller<'a> {
    transport: &'a dyn BlastTransport,
    contact: &'a Contact,
    sleeper: &'a dyn Sleeper,
}

impl<'a> JobPoller<'a> {
    pub fn new(
        transport: &'a dyn BlastTransport,
        contact: &'a Contact,
        sleeper: &'a dyn Sleeper,
    ) -> Self {
        Self {
            transport,
            contact,
            sleeper,
        }
    }

    /// Block until the job is READY.
    ///
    /// A status other than WAITING or READY is terminal and surfaces as
    /// [`SpotCheckError::TerminalJob`]; the job is not polled again.
    pub fn poll(&self, handle: &JobHandle) -> Result<ReadySignal> {
        let mut delay = (handle.estimate_secs as f64).max(MIN_WAIT_SECS);
        debug!("Waiting {} seconds before the first status check of {}", delay, handle.id);
        self.wait(delay);

        let params = status_params(&handle.id, self.contact);
        let mut status_checks = 0;

        loop {
            status_checks += 1;
            let body = self.transport.get(&params)?;

            match parse_status(&body)? {
                JobStatus::Ready => break,
                JobStatus::Waiting => {
                    info!("Job {} still running, now waiting {} seconds", handle.id, delay);
                    self.wait(delay);
                    delay = next_delay(delay);
                }
                JobStatus::Failed(status) => {
                    return Err(SpotCheckError::TerminalJob(format!(
                        "job {} reported status '{}'",
                        handle.id, status
                    )));
                }
            }
        }

        debug!("Job {} is ready after {} status checks", handle.id, status_checks);
        self.wait(READY_SETTLE_SECS);

        Ok(ReadySignal {
            id: handle.id.clone(),
            status_checks,
        })
    }

    fn wait(&self, secs: f64) {
        self.sleeper.sleep(Duration::from_secs_f64(secs));
    }
}
