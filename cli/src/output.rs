use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Table};

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

/// Pretty-print a single JSON value.
pub fn print_json(value: &serde_json::Value) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value).map_err(|e| format!("Invalid JSON: {e}"))?;
    println!("{text}");
    Ok(())
}

/// Print tabular data in the requested format.
pub fn print_rows(columns: &[String], rows: &[Vec<String>], format: &OutputFormat) -> Result<(), String> {
    println!("{}", render_rows(columns, rows, format)?);
    Ok(())
}

fn render_rows(columns: &[String], rows: &[Vec<String>], format: &OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Table => {
            let mut table = Table::new();
            table.load_preset(UTF8_FULL_CONDENSED);
            table.set_header(columns);
            for row in rows {
                table.add_row(row);
            }
            Ok(table.to_string())
        }
        OutputFormat::Json => {
            let json_rows: Vec<serde_json::Value> = rows
                .iter()
                .map(|row| {
                    let mut map = serde_json::Map::new();
                    for (i, col) in columns.iter().enumerate() {
                        map.insert(
                            col.clone(),
                            serde_json::Value::String(row.get(i).cloned().unwrap_or_default()),
                        );
                    }
                    serde_json::Value::Object(map)
                })
                .collect();
            serde_json::to_string_pretty(&json_rows).map_err(|e| format!("Invalid JSON: {e}"))
        }
        OutputFormat::Csv => {
            let mut lines = vec![columns.iter().map(|c| csv_field(c)).collect::<Vec<_>>().join(",")];
            for row in rows {
                lines.push(row.iter().map(|c| csv_field(c)).collect::<Vec<_>>().join(","));
            }
            Ok(lines.join("\n"))
        }
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<String> {
        vec!["id".into(), "permalink".into()]
    }

    #[test]
    fn csv_quotes_when_needed() {
        let rows = vec![vec!["1".into(), "/a,b".into()]];
        let out = render_rows(&columns(), &rows, &OutputFormat::Csv).unwrap();
        assert_eq!(out, "id,permalink\n1,\"/a,b\"");
    }

    #[test]
    fn json_rows_are_keyed_by_column() {
        let rows = vec![vec!["1".into(), "/home".into()]];
        let out = render_rows(&columns(), &rows, &OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value, serde_json::json!([{"id": "1", "permalink": "/home"}]));
    }

    #[test]
    fn table_contains_cells() {
        let rows = vec![vec!["7".into(), "/home/about".into()]];
        let out = render_rows(&columns(), &rows, &OutputFormat::Table).unwrap();
        assert!(out.contains("permalink"));
        assert!(out.contains("/home/about"));
    }
}
