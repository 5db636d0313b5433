use crate::remote::params::{result_params, Contact};
use crate::remote::transport::BlastTransport;
use crate::remote::xml::{parse_report, QueryReport, TopHit};
use crate::{Result, SpotCheckError};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

/// Description used when a query has no hit
pub const NO_HIT: &str = "No significant similarity found";
/// Filler for detail columns of a query without a hit
pub const NOT_APPLICABLE: &str = "N/A";

/// Which columns to report for every query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailFlags {
    /// Full hit description instead of genus and species
    pub include_full_name: bool,
    pub include_accession: bool,
    /// Bit score, e-value, coverage and identity
    pub include_scores: bool,
    /// Reserved; accepted but adds no columns yet
    pub include_complete: bool,
}

impl DetailFlags {
    /// Number of columns after the description
    pub fn extra_columns(&self) -> usize {
        let mut columns = 0;
        if self.include_accession {
            columns += 1;
        }
        if self.include_scores {
            columns += 4;
        }
        columns
    }

    /// Column titles matching the fields of every [`HitRecord`]
    pub fn column_headers(&self) -> Vec<&'static str> {
        let mut headers = vec!["Hit"];
        if self.include_accession {
            headers.push("Accession");
        }
        if self.include_scores {
            headers.extend(["Bit score", "E-value", "Coverage %", "Identity %"]);
        }
        headers
    }
}

/// Reported fields for one query, ordered as [`DetailFlags::column_headers`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitRecord {
    fields: Vec<String>,
}

impl HitRecord {
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    /// Placeholder record for a query without a hit
    pub fn no_hit(flags: &DetailFlags) -> Self {
        let mut fields = vec![NO_HIT.to_string()];
        fields.extend(std::iter::repeat(NOT_APPLICABLE.to_string()).take(flags.extra_columns()));
        Self { fields }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn description(&self) -> &str {
        self.fields.first().map(String::as_str).unwrap_or_default()
    }

    pub fn is_no_hit(&self) -> bool {
        self.description() == NO_HIT
    }
}

/// One [`HitRecord`] per submitted query, in submission order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSet {
    records: Vec<HitRecord>,
}

impl ResultSet {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[HitRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HitRecord> {
        self.records.iter()
    }
}

impl FromIterator<HitRecord> for ResultSet {
    fn from_iter<I: IntoIterator<Item = HitRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a HitRecord;
    type IntoIter = std::slice::Iter<'a, HitRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

pub struct ResultExtractor<'a> {
    transport: &'a dyn BlastTransport,
    contact: &'a Contact,
}

impl<'a> ResultExtractor<'a> {
    pub fn new(transport: &'a dyn BlastTransport, contact: &'a Contact) -> Self {
        Self { transport, contact }
    }

    /// Fetch the XML report of a finished job and reduce it to one record per query
    pub fn extract(&self, rid: &str, flags: &DetailFlags) -> Result<ResultSet> {
        let xml = self.transport.get(&result_params(rid, self.contact))?;
        extract_from_xml(&xml, flags)
    }
}

/// Build a [`ResultSet`] from an already fetched XML report
pub fn extract_from_xml(xml: &str, flags: &DetailFlags) -> Result<ResultSet> {
    if flags.include_complete {
        warn!("The 'complete' detail level is reserved and not implemented yet; no columns added");
    }

    let reports = parse_report(xml)?;
    debug!("Result document holds {} query sections", reports.len());

    reports
        .iter()
        .enumerate()
        .map(|(index, report)| record_for(index + 1, report, flags))
        .collect()
}

fn record_for(query: usize, report: &QueryReport, flags: &DetailFlags) -> Result<HitRecord> {
    let Some(hit) = report.top_hit.as_ref() else {
        debug!(
            "Query {} ({}) has no hit: {}",
            query,
            report.query_id.as_deref().unwrap_or("unnamed"),
            report.message.as_deref().unwrap_or("no message")
        );
        return Ok(HitRecord::no_hit(flags));
    };

    trace!("Query {} top hit has rank {}", query, hit.rank.as_deref().unwrap_or("?"));

    let description = require(hit.description.as_deref(), query, "Hit_def")?;
    let mut fields = Vec::with_capacity(1 + flags.extra_columns());
    fields.push(if flags.include_full_name {
        description.trim().to_string()
    } else {
        short_name(description)
    });

    if flags.include_accession {
        fields.push(require(hit.accession.as_deref(), query, "Hit_accession")?.trim().to_string());
    }

    if flags.include_scores {
        fields.extend(score_fields(query, hit)?);
    }

    Ok(HitRecord::new(fields))
}

fn score_fields(query: usize, hit: &TopHit) -> Result<[String; 4]> {
    let hsp = hit.hsp.as_ref().ok_or_else(|| {
        SpotCheckError::Parse(format!("top hit of query {} has no Hsp", query))
    })?;

    let bit_score = require(hsp.bit_score.as_deref(), query, "Hsp_bit-score")?;
    let evalue = require(hsp.evalue.as_deref(), query, "Hsp_evalue")?;
    let align_len = count(hsp.align_len.as_deref(), query, "Hsp_align-len")?;
    let query_to = count(hsp.query_to.as_deref(), query, "Hsp_query-to")?;
    let positive = count(hsp.positive.as_deref(), query, "Hsp_positive")?;

    Ok([
        bit_score.trim().to_string(),
        evalue.trim().to_string(),
        percentage(align_len, query_to, query, "coverage")?,
        percentage(positive, align_len, query, "identity")?,
    ])
}

/// Genus and species: the first two words of a hit description
pub fn short_name(description: &str) -> String {
    description
        .split_whitespace()
        .take(2)
        .collect::<Vec<_>>()
        .join(" ")
}

/// `round(numerator / denominator, 2) * 100` as a whole-number string.
///
/// Coverage divides the alignment length by the query end position, not by
/// the query length.
pub fn percentage(numerator: u64, denominator: u64, query: usize, what: &str) -> Result<String> {
    if denominator == 0 {
        return Err(SpotCheckError::Parse(format!(
            "cannot compute {} of query {}: zero denominator",
            what, query
        )));
    }
    let ratio = numerator as f64 / denominator as f64;
    Ok(format!("{:.0}", (ratio * 100.0).round()))
}

fn require<'r>(value: Option<&'r str>, query: usize, element: &str) -> Result<&'r str> {
    value.filter(|v| !v.trim().is_empty()).ok_or_else(|| {
        SpotCheckError::Parse(format!("top hit of query {} has no {}", query, element))
    })
}

fn count(value: Option<&str>, query: usize, element: &str) -> Result<u64> {
    let raw = require(value, query, element)?;
    raw.trim().parse::<u64>().map_err(|_| {
        SpotCheckError::Parse(format!(
            "{} of query {} is not a count: '{}'",
            element, query, raw
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn flags(accession: bool, scores: bool) -> DetailFlags {
        DetailFlags {
            include_accession: accession,
            include_scores: scores,
            ..DetailFlags::default()
        }
    }

    #[test]
    fn test_no_hit_padding() {
        assert_eq!(HitRecord::no_hit(&DetailFlags::default()).fields(), &[NO_HIT.to_string()]);

        let record = HitRecord::no_hit(&flags(true, true));
        assert_eq!(record.fields().len(), 6);
        assert!(record.fields()[1..].iter().all(|f| f == NOT_APPLICABLE));
        assert!(record.is_no_hit());
    }

    #[test]
    fn test_complete_adds_no_columns() {
        let complete = DetailFlags {
            include_complete: true,
            ..DetailFlags::default()
        };
        assert_eq!(complete.extra_columns(), 0);
        assert_eq!(complete.column_headers(), vec!["Hit"]);
    }

    #[test]
    fn test_short_name() {
        assert_eq!(short_name("Escherichia coli str. K-12"), "Escherichia coli");
        assert_eq!(short_name("  Phage  "), "Phage");
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(100, 200, 1, "coverage").unwrap(), "50");
        assert_eq!(percentage(50, 100, 1, "identity").unwrap(), "50");
        assert_eq!(percentage(148, 150, 1, "identity").unwrap(), "99");
        assert_eq!(percentage(150, 150, 1, "identity").unwrap(), "100");
        assert!(percentage(1, 0, 1, "coverage").is_err());
    }

    #[test]
    fn test_missing_description_is_parse_error() {
        let xml = "<BlastOutput><BlastOutput_iterations><Iteration><Iteration_hits>\
                   <Hit><Hit_accession>X1</Hit_accession></Hit>\
                   </Iteration_hits></Iteration></BlastOutput_iterations></BlastOutput>";
        let err = extract_from_xml(xml, &DetailFlags::default()).unwrap_err();
        assert!(matches!(err, SpotCheckError::Parse(_)));
    }

    #[test]
    fn test_scores_need_hsp() {
        let xml = "<BlastOutput><BlastOutput_iterations><Iteration><Iteration_hits>\
                   <Hit><Hit_def>Bos taurus</Hit_def></Hit>\
                   </Iteration_hits></Iteration></BlastOutput_iterations></BlastOutput>";
        assert!(extract_from_xml(xml, &DetailFlags::default()).is_ok());
        assert!(extract_from_xml(xml, &flags(false, true)).is_err());
    }
}
