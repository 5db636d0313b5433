pub mod fasta;
pub mod sequence;

pub use sequence::{RecordFormat, Sequence, SequenceBatch};
