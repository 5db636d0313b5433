use crate::bio::fasta::SequenceReader;
use crate::bio::sequence::SequenceBatch;
use crate::remote::submit::JobHandle;
use crate::tools::traits::AlignmentSampler;
use crate::{Result, SpotCheckError};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Zero-based column of SEQ in SAM text
const SAM_SEQ_COLUMN: usize = 9;

/// What the user asked to spot check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuerySource {
    /// BAM/SAM/CRAM file, subsampled with samtools
    Alignment(PathBuf),
    /// FASTA or FASTQ file, read up to the sample size
    SequenceFile(PathBuf),
    /// Sequence text sent as is
    Sequence(String),
    /// RID of a search submitted earlier
    JobId(String),
}

/// Query ready for the remote service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreparedQuery {
    Batch(SequenceBatch),
    Raw(String),
    /// Nothing to submit; resume polling this job
    Existing(JobHandle),
}

impl PreparedQuery {
    /// Text for the QUERY parameter, if this query needs submitting
    pub fn payload(&self) -> Option<String> {
        match self {
            PreparedQuery::Batch(batch) => Some(batch.to_query()),
            PreparedQuery::Raw(sequence) => Some(sequence.clone()),
            PreparedQuery::Existing(_) => None,
        }
    }
}

pub struct SequenceBatchBuilder<'a> {
    sampler: &'a dyn AlignmentSampler,
    seed: u32,
}

impl<'a> SequenceBatchBuilder<'a> {
    pub fn new(sampler: &'a dyn AlignmentSampler) -> Self {
        Self { sampler, seed: 0 }
    }

    /// Seed passed as the integer part of the subsampling fraction
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn build(&self, source: &QuerySource, sample_count: usize) -> Result<PreparedQuery> {
        if sample_count == 0 {
            return Err(SpotCheckError::InvalidInput(
                "sample count must be at least 1".to_string(),
            ));
        }

        match source {
            QuerySource::Alignment(path) => {
                self.sample_alignment(path, sample_count).map(PreparedQuery::Batch)
            }
            QuerySource::SequenceFile(path) => {
                read_sequence_file(path, sample_count).map(PreparedQuery::Batch)
            }
            QuerySource::Sequence(sequence) => {
                let sequence = sequence.trim();
                if sequence.is_empty() {
                    return Err(SpotCheckError::InvalidInput("sequence is empty".to_string()));
                }
                Ok(PreparedQuery::Raw(sequence.to_string()))
            }
            QuerySource::JobId(rid) => {
                let rid = rid.trim();
                if rid.is_empty() {
                    return Err(SpotCheckError::InvalidInput("job id is empty".to_string()));
                }
                Ok(PreparedQuery::Existing(JobHandle::resume(rid)))
            }
        }
    }

    fn sample_alignment(&self, path: &Path, sample_count: usize) -> Result<SequenceBatch> {
        require_file(path)?;

        let total = self.sampler.count_records(path)?;
        let fraction = sampling_fraction(sample_count, total)?
            .map(|fraction| format_fraction(fraction, self.seed));

        match &fraction {
            Some(fraction) => info!(
                "Subsampling {} of {} records with {} -s {}",
                sample_count,
                total,
                self.sampler.name(),
                fraction
            ),
            None => info!("Using all {} records of {}", total, path.display()),
        }

        let sam = self.sampler.sample_records(path, fraction.as_deref())?;
        let batch: SequenceBatch = sequences_from_sam(&sam, sample_count)?.into_iter().collect();

        if batch.is_empty() {
            return Err(SpotCheckError::InvalidInput(format!(
                "subsample of {} contains no sequences",
                path.display()
            )));
        }
        Ok(batch)
    }
}

/// Read at most `sample_count` records from a FASTA/FASTQ file
pub fn read_sequence_file(path: &Path, sample_count: usize) -> Result<SequenceBatch> {
    require_file(path)?;

    let mut batch = SequenceBatch::new();
    for record in SequenceReader::open(path)? {
        let record = record?;
        if record.is_empty() {
            debug!("Skipping empty record {}", record.id);
            continue;
        }
        batch.push(record.as_string());
        if batch.len() == sample_count {
            break;
        }
    }

    if batch.is_empty() {
        return Err(SpotCheckError::InvalidInput(format!(
            "{} contains no sequences",
            path.display()
        )));
    }
    debug!("Collected {} sequences from {}", batch.len(), path.display());
    Ok(batch)
}

fn require_file(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(SpotCheckError::InvalidInput(format!(
            "{} does not exist or is not a file",
            path.display()
        )))
    }
}

/// Fraction of records to keep, or `None` when every record is needed
pub fn sampling_fraction(sample_count: usize, total: u64) -> Result<Option<f64>> {
    if total == 0 {
        return Err(SpotCheckError::InvalidInput(
            "alignment file contains no records".to_string(),
        ));
    }
    let fraction = sample_count as f64 / total as f64;
    Ok((fraction < 1.0).then_some(fraction))
}

/// Render `SEED.FRACTION` for `samtools view -s`.
///
/// Precision grows with the magnitude of the fraction so that tiny samples
/// of huge files never round to zero.
pub fn format_fraction(fraction: f64, seed: u32) -> String {
    let magnitude = (-fraction.log10()).ceil().max(0.0) as usize;
    let precision = (magnitude + 4).max(6);
    let rendered = format!("{:.*}", precision, fraction);
    let decimals = rendered.split_once('.').map(|(_, d)| d).unwrap_or("0");
    format!("{}.{}", seed, decimals)
}

/// Pull the SEQ column out of SAM text, keeping at most `limit` sequences
pub fn sequences_from_sam(sam: &str, limit: usize) -> Result<Vec<String>> {
    let mut sequences = Vec::new();
    let mut records = 0;

    for (line_number, line) in sam.lines().enumerate() {
        if line.is_empty() || line.starts_with('@') {
            continue;
        }
        records += 1;

        let seq = line.split('\t').nth(SAM_SEQ_COLUMN).ok_or_else(|| {
            SpotCheckError::ExternalTool(format!(
                "SAM line {} has fewer than {} columns",
                line_number + 1,
                SAM_SEQ_COLUMN + 1
            ))
        })?;

        if seq == "*" {
            continue;
        }
        if sequences.len() < limit {
            sequences.push(seq.to_string());
        }
    }

    if records > limit {
        debug!("Subsample returned {} records, keeping {}", records, limit);
    }
    Ok(sequences)
}
