pub mod commands;
pub mod credentials;
pub mod formatter;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "spotcheck",
    version,
    about = "Spot check sequencing data against NCBI BLAST",
    long_about = "Spotcheck draws a handful of reads from a BAM, FASTA or FASTQ file (or takes a \
                  single sequence), submits them to the NCBI BLAST service, waits for the search \
                  to finish and reports the top hit of every query."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (defaults to $SPOTCHECK_HOME/config.toml)
    #[arg(long, value_name = "FILE", env = "SPOTCHECK_CONFIG", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Submit a sample to BLAST and report the top hits
    Check(commands::check::CheckArgs),

    /// Manage the contact email sent with every request
    Email(commands::email::EmailArgs),

    /// Show or initialise the configuration file
    Config(commands::config::ConfigArgs),
}
