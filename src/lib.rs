pub mod bio;
pub mod cli;
pub mod core;
pub mod remote;
pub mod report;
pub mod tools;

pub use crate::core::batch::{PreparedQuery, QuerySource, SequenceBatchBuilder};
pub use crate::remote::{
    DetailFlags, HitRecord, JobHandle, JobPoller, ResultExtractor, ResultSet, SearchSubmitter,
    SubmissionParameters,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpotCheckError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("External tool error: {0}")]
    ExternalTool(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("BLAST job failed: {0}")]
    TerminalJob(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<reqwest::Error> for SpotCheckError {
    fn from(err: reqwest::Error) -> Self {
        SpotCheckError::Network(err.to_string())
    }
}

impl From<quick_xml::Error> for SpotCheckError {
    fn from(err: quick_xml::Error) -> Self {
        SpotCheckError::Parse(format!("malformed result XML: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, SpotCheckError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SpotCheckError::Parse("RID line missing".to_string());
        assert_eq!(err.to_string(), "Parse error: RID line missing");

        let err = SpotCheckError::TerminalJob("status UNKNOWN for job X".to_string());
        assert_eq!(err.to_string(), "BLAST job failed: status UNKNOWN for job X");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "reads.fa");
        let err: SpotCheckError = io_err.into();
        assert!(matches!(err, SpotCheckError::Io(_)));
    }
}
