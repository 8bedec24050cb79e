//! Raw sheet dump

use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use log::debug;
use serde_json::{Value, json};

use super::output::{OutputArgs, Report, emit};
use crate::cli::ui::with_spinner;
use prodtrack_cli::api::{Query, SheetsClient};
use prodtrack_cli::sheet::{Column, Table};

#[derive(Args)]
pub struct FetchCommands {
    /// Sheet (tab) name
    pub sheet: String,

    /// Column selection passed to the query endpoint, e.g. 'select A, B'
    #[arg(long)]
    pub select: Option<String>,

    /// Number of header rows in the sheet
    #[arg(long, default_value_t = 1)]
    pub headers: usize,

    #[command(flatten)]
    pub output: OutputArgs,
}

pub async fn handle_fetch_command(args: FetchCommands, client: &SheetsClient) -> Result<()> {
    let mut query = Query::new(args.sheet.clone()).headers(args.headers);
    if let Some(select) = &args.select {
        query = query.select(select.clone());
    }

    let result = with_spinner(format!("Fetching '{}'...", args.sheet), client.execute_query(&query))
        .await
        .with_context(|| format!("Failed to fetch sheet '{}'", args.sheet))?;

    debug!(
        "Query for '{}' answered HTTP {} ({})",
        args.sheet,
        result.status_code,
        result
            .headers
            .get("content-type")
            .map(String::as_str)
            .unwrap_or("no content type")
    );
    let table = result.into_table();
    eprintln!(
        "📋 {} rows × {} columns from {}",
        table.row_count().to_string().bright_white().bold(),
        table.column_count(),
        args.sheet.cyan()
    );

    // Filtered results carry positional row numbers, not sheet rows
    let row_numbers = args.select.is_none();
    emit(&args.output, &table_report(&table, row_numbers))
}

/// Every cell as displayed text, headed by the sheet's labels or letters
fn table_report(table: &Table, row_numbers: bool) -> Report {
    let width = table.column_count();
    let headers: Vec<String> = table
        .labels()
        .into_iter()
        .enumerate()
        .map(|(i, label)| if label.is_empty() { Column(i).letters() } else { label })
        .collect();

    let mut rows = Vec::with_capacity(table.rows.len());
    let mut json_rows = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let values: Vec<String> = (0..width)
            .map(|i| row.text(Column(i)).unwrap_or_default())
            .collect();

        let mut object = serde_json::Map::new();
        if row_numbers {
            object.insert("row".to_string(), json!(row.number));
        }
        for (header, value) in headers.iter().zip(&values) {
            object.insert(header.clone(), Value::String(value.clone()));
        }
        json_rows.push(Value::Object(object));

        if row_numbers {
            let mut line = vec![row.number.to_string()];
            line.extend(values);
            rows.push(line);
        } else {
            rows.push(values);
        }
    }

    let mut all_headers = Vec::with_capacity(headers.len() + 1);
    if row_numbers {
        all_headers.push("row".to_string());
    }
    all_headers.extend(headers);
    Report {
        headers: all_headers,
        rows,
        json: Value::Array(json_rows),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prodtrack_cli::api::QueryResponse;

    const BODY: &str = r#"{"status":"ok","table":{"cols":[{"id":"A","label":"Job Card No","type":"string"},{"id":"B","label":"","type":"number"}],"rows":[{"c":[{"v":"JC-1"},{"v":5}]},{"c":[{"v":"JC-2"},null]}],"parsedNumHeaders":1}}"#;

    #[test]
    fn test_report_with_sheet_rows() {
        let table = QueryResponse::from_text(BODY, 1).unwrap();
        let report = table_report(&table, true);

        assert_eq!(report.headers, vec!["row", "Job Card No", "B"]);
        assert_eq!(report.rows[0], vec!["2", "JC-1", "5"]);
        assert_eq!(report.rows[1], vec!["3", "JC-2", ""]);
        assert_eq!(report.json[1]["row"], json!(3));
    }

    #[test]
    fn test_filtered_report_has_no_row_column() {
        let table = QueryResponse::from_text(BODY, 1).unwrap();
        let report = table_report(&table, false);

        assert_eq!(report.headers, vec!["Job Card No", "B"]);
        assert_eq!(report.rows[0], vec!["JC-1", "5"]);
        assert!(report.json[0].get("row").is_none());
    }
}
