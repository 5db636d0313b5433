use crate::tools::traits::AlignmentSampler;
use crate::{Result, SpotCheckError};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// samtools integration
pub struct Samtools {
    binary_path: PathBuf,
}

impl Default for Samtools {
    fn default() -> Self {
        Self::new("samtools")
    }
}

impl Samtools {
    /// Create a wrapper around a samtools binary (name on PATH or full path)
    pub fn new<P: Into<PathBuf>>(binary_path: P) -> Self {
        Self {
            binary_path: binary_path.into(),
        }
    }

    pub fn binary_path(&self) -> &Path {
        &self.binary_path
    }

    /// Check if samtools is working
    pub fn check_version(&self) -> Result<String> {
        let stdout = self.run(&[OsStr::new("--version")])?;
        Ok(stdout.lines().next().unwrap_or_default().trim().to_string())
    }

    fn run(&self, args: &[&OsStr]) -> Result<String> {
        let mut cmd = Command::new(&self.binary_path);
        cmd.args(args);
        debug!("Running {:?}", cmd);

        let output = cmd.output().map_err(|e| {
            SpotCheckError::ExternalTool(format!(
                "failed to run {}: {}",
                self.binary_path.display(),
                e
            ))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SpotCheckError::ExternalTool(format!(
                "{} exited with {}: {}",
                self.binary_path.display(),
                output.status,
                stderr.trim()
            )));
        }

        String::from_utf8(output.stdout).map_err(|_| {
            SpotCheckError::ExternalTool(format!(
                "{} produced non UTF-8 output",
                self.binary_path.display()
            ))
        })
    }
}

impl AlignmentSampler for Samtools {
    fn count_records(&self, path: &Path) -> Result<u64> {
        let stdout = self.run(&[OsStr::new("view"), OsStr::new("-c"), path.as_os_str()])?;
        stdout.trim().parse::<u64>().map_err(|_| {
            SpotCheckError::ExternalTool(format!(
                "unexpected record count from samtools: '{}'",
                stdout.trim()
            ))
        })
    }

    fn sample_records(&self, path: &Path, fraction: Option<&str>) -> Result<String> {
        match fraction {
            Some(fraction) => self.run(&[
                OsStr::new("view"),
                OsStr::new("-s"),
                OsStr::new(fraction),
                path.as_os_str(),
            ]),
            None => self.run(&[OsStr::new("view"), path.as_os_str()]),
        }
    }

    fn name(&self) -> &str {
        "samtools"
    }
}
