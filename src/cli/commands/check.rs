use crate::cli::credentials;
use crate::cli::formatter::{print_tip, print_warning};
use crate::core::batch::{PreparedQuery, QuerySource, SequenceBatchBuilder};
use crate::core::config::{load_or_default, Config};
use crate::remote::{
    fetch_results, run_search, DetailFlags, HttpTransport, SubmissionParameters, ThreadSleeper,
};
use crate::report::{Format, ReportGenerator};
use crate::tools::Samtools;
use anyhow::Context;
use clap::{ArgGroup, Args, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Extra columns selectable with `--detail`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Detail {
    /// Full hit description instead of genus and species
    FullName,
    /// Accession of the top hit
    Accession,
    /// Bit score, e-value, coverage and identity
    Scores,
    /// Reserved for a future detail level
    Complete,
}

#[derive(Args)]
#[command(group(
    ArgGroup::new("input")
        .required(true)
        .args(["bam", "fasta", "seq", "rid"])
))]
pub struct CheckArgs {
    /// BAM/SAM/CRAM file to subsample with samtools
    #[arg(short, long, value_name = "FILE")]
    pub bam: Option<PathBuf>,

    /// FASTA or FASTQ file (optionally gzipped)
    #[arg(short, long, value_name = "FILE")]
    pub fasta: Option<PathBuf>,

    /// Single sequence to search as is
    #[arg(short, long, value_name = "SEQUENCE")]
    pub seq: Option<String>,

    /// Request ID of an earlier search to collect
    #[arg(short, long, value_name = "RID")]
    pub rid: Option<String>,

    /// Extra report columns (can be repeated)
    #[arg(short, long = "detail", value_enum, value_name = "LEVEL")]
    pub detail: Vec<Detail>,

    /// Number of reads to sample
    #[arg(short = 'n', long, value_name = "COUNT")]
    pub samples: Option<usize>,

    /// Output format (table, plain, json)
    #[arg(short = 'o', long, default_value = "table")]
    pub format: Format,

    /// BLAST program
    #[arg(long)]
    pub program: Option<String>,

    /// BLAST database
    #[arg(long)]
    pub database: Option<String>,

    /// Disable megablast
    #[arg(long)]
    pub no_megablast: bool,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

impl CheckArgs {
    pub fn source(&self) -> anyhow::Result<QuerySource> {
        if let Some(path) = &self.bam {
            return Ok(QuerySource::Alignment(path.clone()));
        }
        if let Some(path) = &self.fasta {
            return Ok(QuerySource::SequenceFile(path.clone()));
        }
        if let Some(sequence) = &self.seq {
            return Ok(QuerySource::Sequence(sequence.clone()));
        }
        if let Some(rid) = &self.rid {
            return Ok(QuerySource::JobId(rid.clone()));
        }
        anyhow::bail!("one of --bam, --fasta, --seq or --rid is required")
    }

    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(samples) = self.samples {
            config.sampling.sample_count = samples;
        }
        if let Some(program) = &self.program {
            config.search.program = program.clone();
        }
        if let Some(database) = &self.database {
            config.search.database = database.clone();
        }
        if self.no_megablast {
            config.search.megablast = false;
        }
        if let Some(timeout) = self.timeout {
            config.service.timeout_secs = timeout;
        }
    }
}

pub fn detail_flags(details: &[Detail]) -> DetailFlags {
    details.iter().fold(DetailFlags::default(), |mut flags, detail| {
        match detail {
            Detail::FullName => flags.include_full_name = true,
            Detail::Accession => flags.include_accession = true,
            Detail::Scores => flags.include_scores = true,
            Detail::Complete => flags.include_complete = true,
        }
        flags
    })
}

pub fn run(args: CheckArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let mut config = load_or_default(config_path)?;
    args.apply_overrides(&mut config);
    config.validate()?;

    let source = args.source()?;
    let flags = detail_flags(&args.detail);
    debug!("Query source: {:?}, details: {:?}", source, flags);

    let email = credentials::resolve_email(&config, credentials::is_interactive())?;

    let samtools = Samtools::new(&config.tools.samtools);
    if matches!(source, QuerySource::Alignment(_)) {
        let version = samtools
            .check_version()
            .context("samtools is required for --bam input")?;
        debug!("Using {}", version);
    }
    let query = SequenceBatchBuilder::new(&samtools)
        .with_seed(config.sampling.seed)
        .build(&source, config.sampling.sample_count)
        .context("Failed to prepare the query")?;

    if let PreparedQuery::Batch(batch) = &query {
        info!("Submitting {} sequences", batch.len());
    }

    let params = SubmissionParameters::from_config(&config, email);
    let transport = HttpTransport::new(&config.service)?;
    let sleeper = ThreadSleeper;

    let results = match &query {
        PreparedQuery::Existing(handle) => {
            fetch_results(&transport, &sleeper, handle, params.contact(), &flags)?
        }
        PreparedQuery::Batch(batch) => {
            run_search(&transport, &sleeper, &batch.to_query(), &params, &flags)?
        }
        PreparedQuery::Raw(sequence) => {
            run_search(&transport, &sleeper, sequence, &params, &flags)?
        }
    };

    if results.is_empty() {
        print_warning("The result document contained no queries");
        return Ok(());
    }

    let report = ReportGenerator::new(args.format, flags).generate(&results)?;
    println!("{}", report);

    if !flags.include_scores && args.format == Format::Table {
        print_tip("Use --detail scores to see bit scores, e-values, coverage and identity");
    }
    Ok(())
}
