use crate::remote::results::ResultSet;
use anyhow::Result;
use serde::Serialize;

#[derive(Serialize)]
struct JsonRecord<'a> {
    query: usize,
    fields: &'a [String],
}

/// JSON array with one `{query, fields}` object per record
pub fn generate_json(results: &ResultSet) -> Result<String> {
    let records: Vec<JsonRecord> = results
        .iter()
        .enumerate()
        .map(|(index, record)| JsonRecord {
            query: index + 1,
            fields: record.fields(),
        })
        .collect();
    Ok(serde_json::to_string_pretty(&records)?)
}
