//! Shared fakes for driving the remote lifecycle without a network or a clock.
//!
//! `FakeService` answers BLAST URL API calls from a script and advances a
//! simulated clock whenever the code under test sleeps, so tests can assert
//! when each call happened.
#![allow(dead_code)]

use spotcheck::remote::{BlastTransport, Sleeper};
use spotcheck::{Result, SpotCheckError};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

/// One recorded request
#[derive(Debug, Clone)]
pub struct Call {
    pub method: &'static str,
    pub params: Vec<(&'static str, String)>,
    /// Simulated seconds elapsed when the call was made
    pub at_secs: f64,
}

impl Call {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Default)]
pub struct FakeService {
    responses: RefCell<VecDeque<String>>,
    calls: RefCell<Vec<Call>>,
    sleeps: RefCell<Vec<f64>>,
    clock: RefCell<f64>,
}

impl FakeService {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: RefCell::new(responses.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn sleeps(&self) -> Vec<f64> {
        self.sleeps.borrow().clone()
    }

    pub fn remaining(&self) -> usize {
        self.responses.borrow().len()
    }

    fn answer(&self, method: &'static str, params: &[(&'static str, String)]) -> Result<String> {
        self.calls.borrow_mut().push(Call {
            method,
            params: params.to_vec(),
            at_secs: *self.clock.borrow(),
        });
        self.responses
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| SpotCheckError::Network("no scripted response left".to_string()))
    }
}

impl BlastTransport for FakeService {
    fn get(&self, params: &[(&'static str, String)]) -> Result<String> {
        self.answer("GET", params)
    }

    fn post(&self, params: &[(&'static str, String)]) -> Result<String> {
        self.answer("POST", params)
    }
}

impl Sleeper for FakeService {
    fn sleep(&self, duration: Duration) {
        let secs = duration.as_secs_f64();
        self.sleeps.borrow_mut().push(secs);
        *self.clock.borrow_mut() += secs;
    }
}

pub fn submission(rid: &str, rtoe: u64) -> String {
    format!(
        "<!--QBlastInfoBegin\n    RID = {}\n    RTOE = {}\nQBlastInfoEnd\n-->",
        rid, rtoe
    )
}

pub fn status(token: &str) -> String {
    format!("<!--\nQBlastInfoBegin\n\tStatus={}\nQBlastInfoEnd\n-->", token)
}

/// An `Iteration` whose first hit carries the given statistics
pub fn iteration_with_hit(
    description: &str,
    accession: &str,
    query_to: u64,
    positive: u64,
    align_len: u64,
) -> String {
    format!(
        "<Iteration><Iteration_hits><Hit>\
         <Hit_num>1</Hit_num><Hit_def>{}</Hit_def><Hit_accession>{}</Hit_accession>\
         <Hit_hsps><Hsp>\
         <Hsp_bit-score>185.3</Hsp_bit-score><Hsp_evalue>2e-44</Hsp_evalue>\
         <Hsp_query-to>{}</Hsp_query-to><Hsp_identity>{}</Hsp_identity>\
         <Hsp_positive>{}</Hsp_positive><Hsp_align-len>{}</Hsp_align-len>\
         </Hsp></Hit_hsps></Hit></Iteration_hits></Iteration>",
        description, accession, query_to, positive, positive, align_len
    )
}

pub fn empty_iteration() -> String {
    "<Iteration><Iteration_hits></Iteration_hits>\
     <Iteration_message>No hits found</Iteration_message></Iteration>"
        .to_string()
}

pub fn report(iterations: &[String]) -> String {
    format!(
        "<?xml version=\"1.0\"?>\n<BlastOutput><BlastOutput_program>blastn</BlastOutput_program>\
         <BlastOutput_iterations>{}</BlastOutput_iterations></BlastOutput>",
        iterations.concat()
    )
}
