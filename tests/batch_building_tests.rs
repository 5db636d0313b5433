//! Building query batches from sequence files and alignment subsamples

use flate2::write::GzEncoder;
use flate2::Compression;
use proptest::prelude::*;
use spotcheck::core::batch::read_sequence_file;
use spotcheck::tools::AlignmentSampler;
use spotcheck::{PreparedQuery, QuerySource, SequenceBatchBuilder, SpotCheckError};
use std::io::Write;
use std::path::Path;
use tempfile::{Builder, NamedTempFile};

fn write_temp(suffix: &str, contents: &[u8]) -> NamedTempFile {
    let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents).unwrap();
    file.flush().unwrap();
    file
}

fn fastq(records: &[(String, String)]) -> String {
    records
        .iter()
        .enumerate()
        .map(|(i, (seq, quality))| format!("@read{}\n{}\n+\n{}\n", i, seq, quality))
        .collect()
}

/// A read and a quality line of equal length that opens with a header marker
fn fastq_record() -> impl Strategy<Value = (String, String)> {
    (1usize..60).prop_flat_map(|len| {
        (
            proptest::string::string_regex(&format!("[ACGT]{{{}}}", len)).unwrap(),
            proptest::string::string_regex(&format!("[@+][!-~]{{{}}}", len - 1)).unwrap(),
        )
    })
}

fn fasta(sequences: &[String]) -> String {
    sequences
        .iter()
        .enumerate()
        .map(|(i, seq)| format!(">read{} sample\n{}\n", i, seq))
        .collect()
}

#[test]
fn test_fastq_records() {
    let fastq = "@r1\nACGTAC\n+\nIIIIII\n@r2\nggcc\n+r2\n#I#I\n@r3\nTTTT\n+\nIIII\n";
    let file = write_temp(".fq", fastq.as_bytes());

    let batch = read_sequence_file(file.path(), 2).unwrap();
    assert_eq!(batch.sequences(), &["ACGTAC".to_string(), "GGCC".to_string()]);
    assert_eq!(batch.to_query(), ">\nACGTAC\n>\nGGCC");
}

#[test]
fn test_fastq_quality_starting_with_at() {
    let fastq = "@r1\nACGT\n+\n@III\n@r2\nCCCC\n+\nIIII\n";
    let file = write_temp(".fastq", fastq.as_bytes());

    let batch = read_sequence_file(file.path(), 10).unwrap();
    assert_eq!(batch.len(), 2);
    assert_eq!(batch.sequences()[1], "CCCC");
}

#[test]
fn test_wrapped_fasta() {
    let file = write_temp(".fa", b">a\nACGT\nACGT\n\n>b\nTT\n");
    let batch = read_sequence_file(file.path(), 10).unwrap();
    assert_eq!(batch.sequences(), &["ACGTACGT".to_string(), "TT".to_string()]);
}

#[test]
fn test_gzipped_fasta() {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(b">a\nACGT\n>b\nGGGG\n>c\nCCCC\n").unwrap();
    let file = write_temp(".fa.gz", &encoder.finish().unwrap());

    let query = SequenceBatchBuilder::new(&NoSampler)
        .build(&QuerySource::SequenceFile(file.path().to_path_buf()), 2)
        .unwrap();
    assert_eq!(query.payload().unwrap(), ">\nACGT\n>\nGGGG");
}

#[test]
fn test_file_without_sequences() {
    let file = write_temp(".fa", b"\n\n");
    assert!(matches!(
        read_sequence_file(file.path(), 5),
        Err(SpotCheckError::InvalidInput(_))
    ));
}

#[test]
fn test_unrecognised_format() {
    let file = write_temp(".txt", b"just some text\n");
    assert!(matches!(
        read_sequence_file(file.path(), 5),
        Err(SpotCheckError::InvalidInput(_))
    ));
}

#[test]
fn test_zero_samples_rejected() {
    let file = write_temp(".fa", b">a\nACGT\n");
    let result = SequenceBatchBuilder::new(&NoSampler)
        .build(&QuerySource::SequenceFile(file.path().to_path_buf()), 0);
    assert!(matches!(result, Err(SpotCheckError::InvalidInput(_))));
}

#[test]
fn test_alignment_sampler_failure_propagates() {
    let file = write_temp(".bam", b"");
    let result = SequenceBatchBuilder::new(&FailingSampler)
        .build(&QuerySource::Alignment(file.path().to_path_buf()), 10);
    assert!(matches!(result, Err(SpotCheckError::ExternalTool(_))));
}

#[test]
fn test_small_alignment_uses_every_record() {
    let file = write_temp(".bam", b"");
    let sampler = FixedSampler {
        total: 3,
        sam: "@HD\tVN:1.6\nr1\t0\tchr1\t1\t60\t4M\t*\t0\t0\tACGT\tIIII\n\
              r2\t4\t*\t0\t0\t*\t*\t0\t0\tTTGG\tIIII\n",
    };

    let query = SequenceBatchBuilder::new(&sampler)
        .build(&QuerySource::Alignment(file.path().to_path_buf()), 10)
        .unwrap();
    match query {
        PreparedQuery::Batch(batch) => assert_eq!(batch.len(), 2),
        other => panic!("expected a batch, got {:?}", other),
    }
}

struct NoSampler;

impl AlignmentSampler for NoSampler {
    fn count_records(&self, _path: &Path) -> spotcheck::Result<u64> {
        panic!("sequence files must not reach the sampler")
    }

    fn sample_records(&self, _path: &Path, _fraction: Option<&str>) -> spotcheck::Result<String> {
        panic!("sequence files must not reach the sampler")
    }

    fn name(&self) -> &str {
        "none"
    }
}

struct FailingSampler;

impl AlignmentSampler for FailingSampler {
    fn count_records(&self, _path: &Path) -> spotcheck::Result<u64> {
        Err(SpotCheckError::ExternalTool("samtools exited with 1".to_string()))
    }

    fn sample_records(&self, _path: &Path, _fraction: Option<&str>) -> spotcheck::Result<String> {
        unreachable!()
    }

    fn name(&self) -> &str {
        "failing"
    }
}

struct FixedSampler {
    total: u64,
    sam: &'static str,
}

impl AlignmentSampler for FixedSampler {
    fn count_records(&self, _path: &Path) -> spotcheck::Result<u64> {
        Ok(self.total)
    }

    fn sample_records(&self, _path: &Path, fraction: Option<&str>) -> spotcheck::Result<String> {
        assert_eq!(fraction, None);
        Ok(self.sam.to_string())
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_batch_size_is_bounded(
        sequences in prop::collection::vec("[ACGT]{1,80}", 1..40),
        sample_count in 1usize..60,
    ) {
        let file = write_temp(".fa", fasta(&sequences).as_bytes());
        let batch = read_sequence_file(file.path(), sample_count).unwrap();

        prop_assert_eq!(batch.len(), sample_count.min(sequences.len()));
        prop_assert!(batch.sequences().iter().all(|seq| !seq.is_empty()));
        prop_assert_eq!(batch.sequences(), &sequences[..batch.len()]);
    }

    #[test]
    fn prop_fastq_batch_size_is_bounded(
        records in prop::collection::vec(fastq_record(), 1..30),
        sample_count in 1usize..40,
    ) {
        let file = write_temp(".fq", fastq(&records).as_bytes());
        let batch = read_sequence_file(file.path(), sample_count).unwrap();

        prop_assert_eq!(batch.len(), sample_count.min(records.len()));
        for (read, (seq, _)) in batch.sequences().iter().zip(&records) {
            prop_assert_eq!(read, seq);
        }
    }
}
