pub mod samtools;
pub mod traits;

pub use samtools::Samtools;
pub use traits::AlignmentSampler;
