//! Streaming reader for BLAST XML reports (`BlastOutput` DTD).
//!
//! Only the fields needed for a spot check are collected: per query, the
//! first `Hit` element and that hit's first `Hsp`. The first hit is located
//! by position rather than by `Hit_num`, because older and newer report
//! layouts disagree on whether a rank is present and where hits are nested.

use crate::{Result, SpotCheckError};
use quick_xml::events::Event;
use quick_xml::reader::Reader;

/// One `Iteration` element, i.e. one submitted query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryReport {
    pub query_id: Option<String>,
    pub message: Option<String>,
    pub top_hit: Option<TopHit>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopHit {
    pub rank: Option<String>,
    pub description: Option<String>,
    pub accession: Option<String>,
    pub hsp: Option<HspSummary>,
}

/// Statistics of the first high-scoring pair of a hit
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HspSummary {
    pub bit_score: Option<String>,
    pub evalue: Option<String>,
    pub query_to: Option<String>,
    pub positive: Option<String>,
    pub align_len: Option<String>,
}

#[derive(Default)]
struct ParseState {
    reports: Vec<QueryReport>,
    current: Option<QueryReport>,
    hits_seen: usize,
    hsps_seen: usize,
    in_top_hit: bool,
    in_top_hsp: bool,
}

impl ParseState {
    fn open(&mut self, name: &str) {
        match name {
            "Iteration" => {
                self.current = Some(QueryReport::default());
                self.hits_seen = 0;
            }
            "Hit" => {
                if let Some(report) = self.current.as_mut() {
                    if self.hits_seen == 0 {
                        report.top_hit = Some(TopHit::default());
                        self.in_top_hit = true;
                        self.hsps_seen = 0;
                    }
                    self.hits_seen += 1;
                }
            }
            "Hsp" if self.in_top_hit => {
                if self.hsps_seen == 0 {
                    if let Some(hit) = self.top_hit_mut() {
                        hit.hsp = Some(HspSummary::default());
                    }
                    self.in_top_hsp = true;
                }
                self.hsps_seen += 1;
            }
            _ => {}
        }
    }

    fn close(&mut self, name: &str) {
        match name {
            "Iteration" => {
                if let Some(report) = self.current.take() {
                    self.reports.push(report);
                }
                self.in_top_hit = false;
                self.in_top_hsp = false;
            }
            "Hit" => {
                self.in_top_hit = false;
                self.in_top_hsp = false;
            }
            "Hsp" => self.in_top_hsp = false,
            _ => {}
        }
    }

    fn top_hit_mut(&mut self) -> Option<&mut TopHit> {
        self.current.as_mut().and_then(|report| report.top_hit.as_mut())
    }

    fn text(&mut self, element: &str, text: &str) {
        let in_top_hit = self.in_top_hit;
        let in_top_hsp = self.in_top_hsp;
        let Some(report) = self.current.as_mut() else {
            return;
        };

        let slot = match element {
            "Iteration_query-ID" => Some(&mut report.query_id),
            "Iteration_message" => Some(&mut report.message),
            _ if in_top_hit => {
                let Some(hit) = report.top_hit.as_mut() else {
                    return;
                };
                match element {
                    "Hit_num" => Some(&mut hit.rank),
                    "Hit_def" => Some(&mut hit.description),
                    "Hit_accession" => Some(&mut hit.accession),
                    _ if in_top_hsp => hit.hsp.as_mut().and_then(|hsp| match element {
                        "Hsp_bit-score" => Some(&mut hsp.bit_score),
                        "Hsp_evalue" => Some(&mut hsp.evalue),
                        "Hsp_query-to" => Some(&mut hsp.query_to),
                        "Hsp_positive" => Some(&mut hsp.positive),
                        "Hsp_align-len" => Some(&mut hsp.align_len),
                        _ => None,
                    }),
                    _ => None,
                }
            }
            _ => None,
        };

        if let Some(slot) = slot {
            slot.get_or_insert_with(String::new).push_str(text);
        }
    }
}

fn element_name(raw: &[u8]) -> Result<String> {
    std::str::from_utf8(raw)
        .map(str::to_string)
        .map_err(|_| SpotCheckError::Parse("element name is not UTF-8".to_string()))
}

/// Parse a BLAST XML report into one [`QueryReport`] per query, in document order
pub fn parse_report(xml: &str) -> Result<Vec<QueryReport>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut state = ParseState::default();
    let mut stack: Vec<String> = Vec::new();
    let mut seen_root = false;
    let mut seen_iterations = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = element_name(e.name().as_ref())?;
                if !seen_root {
                    if name != "BlastOutput" {
                        return Err(SpotCheckError::Parse(format!(
                            "expected a BlastOutput document, found <{}>",
                            name
                        )));
                    }
                    seen_root = true;
                }
                if name == "BlastOutput_iterations" {
                    seen_iterations = true;
                }
                state.open(&name);
                stack.push(name);
            }
            Event::Empty(e) => {
                let name = element_name(e.name().as_ref())?;
                if name == "BlastOutput_iterations" {
                    seen_iterations = true;
                }
                state.open(&name);
                state.close(&name);
            }
            Event::End(_) => {
                if let Some(name) = stack.pop() {
                    state.close(&name);
                }
            }
            Event::Text(t) => {
                if let Some(element) = stack.last() {
                    let text = t.unescape()?;
                    state.text(element, &text);
                }
            }
            Event::CData(c) => {
                if let Some(element) = stack.last() {
                    let text = String::from_utf8_lossy(&c).to_string();
                    state.text(element, &text);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err(SpotCheckError::Parse("result document is empty".to_string()));
    }
    if !stack.is_empty() {
        return Err(SpotCheckError::Parse(format!(
            "result document ends inside <{}>",
            stack.join("/")
        )));
    }
    if !seen_iterations {
        return Err(SpotCheckError::Parse(
            "result document has no BlastOutput_iterations".to_string(),
        ));
    }

    Ok(state.reports)
}
