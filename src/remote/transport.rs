use crate::core::config::ServiceConfig;
use crate::Result;
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::{debug, trace};

/// Key/value pairs for one BLAST URL API call
pub type Params = Vec<(&'static str, String)>;

/// Minimal request surface of the BLAST URL API.
///
/// Every call is a parameterized request against a single endpoint that
/// answers with a text body.
pub trait BlastTransport {
    /// Issue a query-string request and return the response body
    fn get(&self, params: &[(&'static str, String)]) -> Result<String>;

    /// Issue a form-encoded request and return the response body
    fn post(&self, params: &[(&'static str, String)]) -> Result<String>;
}

/// Blocking HTTP transport backed by reqwest
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("spotcheck/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl BlastTransport for HttpTransport {
    fn get(&self, params: &[(&'static str, String)]) -> Result<String> {
        debug!("GET {} CMD={}", self.base_url, command_of(params));
        let body = self
            .client
            .get(&self.base_url)
            .query(params)
            .send()?
            .error_for_status()?
            .text()?;
        trace!("Response body: {}", body);
        Ok(body)
    }

    fn post(&self, params: &[(&'static str, String)]) -> Result<String> {
        debug!("POST {} CMD={}", self.base_url, command_of(params));
        let body = self
            .client
            .post(&self.base_url)
            .form(params)
            .send()?
            .error_for_status()?
            .text()?;
        trace!("Response body: {}", body);
        Ok(body)
    }
}

fn command_of<'p>(params: &'p [(&'static str, String)]) -> &'p str {
    params
        .iter()
        .find(|(key, _)| *key == "CMD")
        .map(|(_, value)| value.as_str())
        .unwrap_or("?")
}
