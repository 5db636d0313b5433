use crate::core::config::Config;
use crate::remote::transport::Params;

/// Who is asking: NCBI requires an email and a tool name on every call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub email: String,
    pub tool: String,
}

impl Contact {
    pub fn new(email: impl Into<String>, tool: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            tool: tool.into(),
        }
    }

    fn append_to(&self, params: &mut Params) {
        params.push(("EMAIL", self.email.clone()));
        params.push(("TOOL", self.tool.clone()));
    }
}

/// Search settings for a BLAST submission.
///
/// Built once with the `with_*` methods and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionParameters {
    program: String,
    database: String,
    filter: String,
    megablast: bool,
    contact: Contact,
}

impl SubmissionParameters {
    pub fn new(contact: Contact) -> Self {
        Self {
            program: "blastn".to_string(),
            database: "nr".to_string(),
            filter: "L".to_string(),
            megablast: false,
            contact,
        }
    }

    pub fn from_config(config: &Config, email: impl Into<String>) -> Self {
        Self::new(Contact::new(email, config.service.tool_name.clone()))
            .with_program(config.search.program.clone())
            .with_database(config.search.database.clone())
            .with_filter(config.search.filter.clone())
            .with_megablast(config.search.megablast)
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    pub fn with_megablast(mut self, megablast: bool) -> Self {
        self.megablast = megablast;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn megablast(&self) -> bool {
        self.megablast
    }

    pub fn contact(&self) -> &Contact {
        &self.contact
    }

    /// Parameters for `CMD=Put`
    pub fn submit_params(&self, query: &str) -> Params {
        let mut params: Params = vec![
            ("CMD", "Put".to_string()),
            ("QUERY", query.to_string()),
            ("PROGRAM", self.program.clone()),
            ("DATABASE", self.database.clone()),
            ("FILTER", self.filter.clone()),
            ("FORMAT_TYPE", "XML".to_string()),
        ];
        self.contact.append_to(&mut params);
        if self.megablast {
            params.push(("MEGABLAST", "on".to_string()));
        }
        params
    }
}

/// Parameters for a `SearchInfo` status check
pub fn status_params(rid: &str, contact: &Contact) -> Params {
    let mut params: Params = vec![
        ("CMD", "Get".to_string()),
        ("FORMAT_OBJECT", "SearchInfo".to_string()),
        ("RID", rid.to_string()),
    ];
    contact.append_to(&mut params);
    params
}

/// Parameters for fetching the XML report with only the top hit per query
pub fn result_params(rid: &str, contact: &Contact) -> Params {
    let mut params: Params = vec![
        ("CMD", "Get".to_string()),
        ("FORMAT_TYPE", "XML".to_string()),
        ("NCBI_GI", "F".to_string()),
        ("RID", rid.to_string()),
        ("HITLIST_SIZE", "1".to_string()),
    ];
    contact.append_to(&mut params);
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value<'a>(params: &'a Params, key: &str) -> Option<&'a str> {
        params.iter().find(|(k, _)| *k == key).map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_submit_params_defaults() {
        let params = SubmissionParameters::new(Contact::new("me@example.org", "spotcheck"))
            .submit_params(">\nACGT");

        assert_eq!(value(&params, "CMD"), Some("Put"));
        assert_eq!(value(&params, "QUERY"), Some(">\nACGT"));
        assert_eq!(value(&params, "PROGRAM"), Some("blastn"));
        assert_eq!(value(&params, "DATABASE"), Some("nr"));
        assert_eq!(value(&params, "FORMAT_TYPE"), Some("XML"));
        assert_eq!(value(&params, "EMAIL"), Some("me@example.org"));
        assert_eq!(value(&params, "MEGABLAST"), None);
    }

    #[test]
    fn test_megablast_flag() {
        let params = SubmissionParameters::new(Contact::new("me@example.org", "spotcheck"))
            .with_megablast(true)
            .submit_params("ACGT");
        assert_eq!(value(&params, "MEGABLAST"), Some("on"));
    }

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        config.search.database = "nt".to_string();
        let params = SubmissionParameters::from_config(&config, "me@example.org");

        assert_eq!(params.database(), "nt");
        assert!(params.megablast());
        assert_eq!(params.contact().tool, "spotcheck");
    }

    #[test]
    fn test_result_params() {
        let contact = Contact::new("me@example.org", "spotcheck");
        let params = result_params("RID42", &contact);
        assert_eq!(value(&params, "HITLIST_SIZE"), Some("1"));
        assert_eq!(value(&params, "NCBI_GI"), Some("F"));
        assert_eq!(value(&params, "RID"), Some("RID42"));

        let params = status_params("RID42", &contact);
        assert_eq!(value(&params, "FORMAT_OBJECT"), Some("SearchInfo"));
    }
}
