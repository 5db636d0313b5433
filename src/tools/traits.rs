//! Trait definitions for external tool abstractions
//!
//! Alignment files are never parsed in-process; an external tool counts and
//! subsamples them.

use crate::Result;
use std::path::Path;

/// Common interface for tools that can subsample an alignment file
pub trait AlignmentSampler {
    /// Count the records in an alignment file
    fn count_records(&self, path: &Path) -> Result<u64>;

    /// Emit a random subsample as SAM text, one record per line.
    ///
    /// `fraction` of `None` means every record.
    fn sample_records(&self, path: &Path, fraction: Option<&str>) -> Result<String>;

    /// Get the name of this tool
    fn name(&self) -> &str;
}
