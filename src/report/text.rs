use crate::remote::results::{DetailFlags, ResultSet};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color as TableColor, ContentArrangement, Table};

/// Render results as a table with one row per query
pub fn generate_table(results: &ResultSet, flags: &DetailFlags) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![Cell::new("#").add_attribute(Attribute::Bold)];
    header.extend(
        flags
            .column_headers()
            .into_iter()
            .map(|title| Cell::new(title).add_attribute(Attribute::Bold).fg(TableColor::Cyan)),
    );
    table.set_header(header);

    for (index, record) in results.iter().enumerate() {
        let color = if record.is_no_hit() {
            TableColor::Yellow
        } else {
            TableColor::Green
        };

        let mut row = vec![Cell::new(index + 1)];
        row.extend(record.fields().iter().enumerate().map(|(column, field)| {
            if column == 0 {
                Cell::new(field).fg(color)
            } else {
                Cell::new(field)
            }
        }));
        table.add_row(row);
    }

    table.to_string()
}

/// One tab-separated line per query
pub fn generate_plain(results: &ResultSet) -> String {
    results
        .iter()
        .map(|record| record.fields().join("\t"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::results::HitRecord;

    fn sample() -> ResultSet {
        vec![
            HitRecord::new(vec!["Escherichia coli".to_string(), "CP000001".to_string()]),
            HitRecord::no_hit(&DetailFlags {
                include_accession: true,
                ..DetailFlags::default()
            }),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_plain_output() {
        assert_eq!(
            generate_plain(&sample()),
            "Escherichia coli\tCP000001\nNo significant similarity found\tN/A"
        );
    }

    #[test]
    fn test_table_contains_headers_and_rows() {
        let flags = DetailFlags {
            include_accession: true,
            ..DetailFlags::default()
        };
        let table = generate_table(&sample(), &flags);
        assert!(table.contains("Accession"));
        assert!(table.contains("Escherichia coli"));
        assert!(table.contains("No significant similarity found"));
    }
}
