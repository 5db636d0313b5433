use crate::bio::sequence::{RecordFormat, Sequence};
use crate::SpotCheckError;
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Streaming reader over FASTA and FASTQ records.
///
/// The layout is decided per record from the header marker, so a file is
/// never loaded in full. Files mixing both layouts are not supported.
pub struct SequenceReader<R: BufRead> {
    reader: R,
    pending: Option<String>,
    line_number: usize,
}

impl SequenceReader<Box<dyn BufRead>> {
    /// Open a sequence file (supports .gz compression)
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SpotCheckError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            SpotCheckError::InvalidInput(format!("cannot open {}: {}", path.display(), e))
        })?;

        let reader: Box<dyn BufRead> = if path.extension().and_then(|s| s.to_str()) == Some("gz") {
            Box::new(BufReader::new(MultiGzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        };

        Ok(Self::new(reader))
    }
}

impl<R: BufRead> SequenceReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: None,
            line_number: 0,
        }
    }

    fn next_line(&mut self) -> Result<Option<String>, SpotCheckError> {
        if let Some(line) = self.pending.take() {
            return Ok(Some(line));
        }

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        self.line_number += 1;

        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(Some(line))
    }

    fn truncated(&self, id: &str) -> SpotCheckError {
        SpotCheckError::InvalidInput(format!(
            "record '{}' is truncated at line {}",
            id, self.line_number
        ))
    }

    /// Read the next record, or `None` once the input is exhausted
    pub fn read_record(&mut self) -> Result<Option<Sequence>, SpotCheckError> {
        let header = loop {
            match self.next_line()? {
                None => return Ok(None),
                Some(line) if line.trim().is_empty() => continue,
                Some(line) => break line,
            }
        };

        let format = RecordFormat::from_marker(header.as_bytes()[0]).ok_or_else(|| {
            SpotCheckError::InvalidInput(format!(
                "line {}: expected '>' or '@' record header",
                self.line_number
            ))
        })?;

        let (id, description) = split_header(&header[1..]);
        let sequence = match format {
            RecordFormat::Fasta => self.read_fasta_body()?,
            RecordFormat::Fastq => self.read_fastq_body(&id)?,
        };

        let mut record = Sequence::new(id, sequence, format);
        if let Some(desc) = description {
            record = record.with_description(desc);
        }
        Ok(Some(record))
    }

    fn read_fasta_body(&mut self) -> Result<Vec<u8>, SpotCheckError> {
        let mut sequence = Vec::new();

        while let Some(line) = self.next_line()? {
            if line.starts_with('>') || line.starts_with('@') {
                self.pending = Some(line);
                break;
            }
            push_residues(&mut sequence, &line);
        }

        Ok(sequence)
    }

    fn read_fastq_body(&mut self, id: &str) -> Result<Vec<u8>, SpotCheckError> {
        let mut sequence = Vec::new();

        // Sequence lines run up to the '+' separator
        loop {
            match self.next_line()? {
                None => return Err(self.truncated(id)),
                Some(line) if line.starts_with('+') => break,
                Some(line) => push_residues(&mut sequence, &line),
            }
        }

        // Quality lines may begin with '@', so consume by length instead
        let mut quality_len = 0;
        while quality_len < sequence.len() {
            match self.next_line()? {
                None => return Err(self.truncated(id)),
                Some(line) => quality_len += line.trim().len(),
            }
        }

        Ok(sequence)
    }
}

impl<R: BufRead> Iterator for SequenceReader<R> {
    type Item = Result<Sequence, SpotCheckError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_record().transpose()
    }
}

fn split_header(header: &str) -> (String, Option<String>) {
    let header = header.trim();
    match header.split_once(char::is_whitespace) {
        Some((id, desc)) => (id.to_string(), Some(desc.trim().to_string())),
        None => (header.to_string(), None),
    }
}

fn push_residues(sequence: &mut Vec<u8>, line: &str) {
    sequence.extend(
        line.bytes()
            .filter(|c| !c.is_ascii_whitespace())
            .map(|c| c.to_ascii_uppercase()),
    );
}
