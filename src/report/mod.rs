use crate::remote::results::{DetailFlags, ResultSet};
use anyhow::Result;
use serde::{Deserialize, Serialize};

pub mod json;
pub mod text;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Format {
    #[default]
    Table,
    Plain,
    Json,
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Format::Table),
            "plain" | "text" => Ok(Format::Plain),
            "json" => Ok(Format::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

pub struct ReportGenerator {
    format: Format,
    flags: DetailFlags,
}

impl ReportGenerator {
    pub fn new(format: Format, flags: DetailFlags) -> Self {
        Self { format, flags }
    }

    pub fn generate(&self, results: &ResultSet) -> Result<String> {
        match self.format {
            Format::Table => Ok(text::generate_table(results, &self.flags)),
            Format::Plain => Ok(text::generate_plain(results)),
            Format::Json => json::generate_json(results),
        }
    }
}
