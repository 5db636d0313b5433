use serde::{Deserialize, Serialize};

/// Layout of a single record in a sequence file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordFormat {
    /// `>` header followed by one or more sequence lines
    Fasta,
    /// `@` header, sequence, `+` separator, qualities
    Fastq,
}

impl RecordFormat {
    pub fn from_marker(marker: u8) -> Option<Self> {
        match marker {
            b'>' => Some(RecordFormat::Fasta),
            b'@' => Some(RecordFormat::Fastq),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sequence {
    pub id: String,
    pub description: Option<String>,
    pub sequence: Vec<u8>,
    pub format: RecordFormat,
}

impl Sequence {
    pub fn new(id: String, sequence: Vec<u8>, format: RecordFormat) -> Self {
        Self {
            id,
            description: None,
            sequence,
            format,
        }
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn as_string(&self) -> String {
        String::from_utf8_lossy(&self.sequence).to_string()
    }
}

/// Ordered set of raw sequences destined for a single BLAST submission.
///
/// Serialized as description-free FASTA: every record is a bare `>` line
/// followed by its sequence line. BLAST accepts empty deflines, so the
/// original read names never leave the machine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceBatch {
    sequences: Vec<String>,
}

impl SequenceBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sequence: impl Into<String>) {
        self.sequences.push(sequence.into());
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    pub fn sequences(&self) -> &[String] {
        &self.sequences
    }

    pub fn to_query(&self) -> String {
        self.sequences
            .iter()
            .map(|seq| format!(">\n{}", seq))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl FromIterator<String> for SequenceBatch {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            sequences: iter.into_iter().collect(),
        }
    }
}
