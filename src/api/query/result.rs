//! Query result handling
//!
//! The query endpoint answers with JSON wrapped in a JavaScript callback:
//! `/*O_o*/ google.visualization.Query.setResponse({...});`. Columns are
//! positional; each row is an array of `{v, f}` cells where `null` marks an
//! empty cell.

use serde::Deserialize;
use std::collections::HashMap;

use crate::api::constants::RESPONSE_WRAPPER;
use crate::api::error::ApiError;
use crate::sheet::{Cell, ColumnInfo, Row, Table};

#[derive(Debug, Clone)]
pub struct QueryResult {
    pub table: Table,
    pub status_code: u16,
    pub headers: HashMap<String, String>,
}

impl QueryResult {
    pub fn new(table: Table, status_code: u16, headers: HashMap<String, String>) -> Self {
        Self {
            table,
            status_code,
            headers,
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.table.rows
    }

    pub fn len(&self) -> usize {
        self.table.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.rows.is_empty()
    }

    pub fn into_table(self) -> Table {
        self.table
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseEnvelope {
    #[serde(default)]
    status: String,
    #[serde(default)]
    errors: Vec<ResponseError>,
    table: Option<ResponseTable>,
}

#[derive(Debug, Deserialize)]
struct ResponseError {
    #[serde(default)]
    reason: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    detailed_message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseTable {
    #[serde(default)]
    cols: Vec<ResponseColumn>,
    #[serde(default)]
    rows: Vec<ResponseRow>,
    parsed_num_headers: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct ResponseColumn {
    #[serde(default)]
    id: String,
    #[serde(default)]
    label: String,
    #[serde(rename = "type", default)]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct ResponseRow {
    #[serde(default)]
    c: Vec<Option<Cell>>,
}

pub struct QueryResponse;

impl QueryResponse {
    /// Parse a raw endpoint body into a table
    ///
    /// `default_headers` is used when the payload does not report how many
    /// header rows it consumed; sheet row numbers are derived from it.
    pub fn from_text(body: &str, default_headers: usize) -> Result<Table, ApiError> {
        let json = unwrap_payload(body)?;
        let envelope: ResponseEnvelope = serde_json::from_str(json)
            .map_err(|e| ApiError::MalformedResponse(format!("Invalid query payload: {}", e)))?;

        if envelope.status.eq_ignore_ascii_case("error") {
            let first = envelope.errors.into_iter().next();
            return Err(match first {
                Some(err) => ApiError::Query {
                    reason: err.reason,
                    message: err.detailed_message.unwrap_or(err.message),
                },
                None => ApiError::Query {
                    reason: "unknown".to_string(),
                    message: "Endpoint reported an error without details".to_string(),
                },
            });
        }

        let Some(raw) = envelope.table else {
            return Ok(Table {
                header_rows: default_headers,
                ..Table::default()
            });
        };

        let header_rows = raw.parsed_num_headers.unwrap_or(default_headers);
        let columns = raw
            .cols
            .into_iter()
            .map(|c| ColumnInfo {
                id: c.id,
                label: c.label,
                kind: c.kind,
            })
            .collect();

        let rows = raw
            .rows
            .into_iter()
            .enumerate()
            .map(|(index, row)| {
                let cells = row.c.into_iter().map(Option::unwrap_or_default).collect();
                Row::new(index + header_rows + 1, cells)
            })
            .collect();

        Ok(Table {
            columns,
            rows,
            header_rows,
        })
    }
}

/// Strip the JavaScript callback around the JSON payload
fn unwrap_payload(body: &str) -> Result<&str, ApiError> {
    let trimmed = body.trim();
    if trimmed.starts_with('{') {
        return Ok(trimmed);
    }

    let start = trimmed
        .find(RESPONSE_WRAPPER)
        .map(|i| i + RESPONSE_WRAPPER.len())
        .ok_or_else(|| ApiError::MalformedResponse("Missing response wrapper".to_string()))?;
    let end = trimmed
        .rfind(')')
        .filter(|end| *end >= start)
        .ok_or_else(|| ApiError::MalformedResponse("Unterminated response wrapper".to_string()))?;

    Ok(trimmed[start..end].trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::Column;

    const WRAPPED: &str = r#"/*O_o*/
google.visualization.Query.setResponse({"version":"0.6","reqId":"0","status":"ok","sig":"1","table":{"cols":[{"id":"A","label":"Timestamp","type":"datetime","pattern":"dd/MM/yyyy HH:mm:ss"},{"id":"B","label":"Job Card No","type":"string"},{"id":"C","label":"Qty","type":"number","pattern":"General"}],"rows":[{"c":[{"v":"Date(2024,0,15,9,0,0)","f":"15/01/2024 09:00:00"},{"v":"JC-1"},{"v":100.0,"f":"100"}]},{"c":[null,{"v":"JC-2"},null]}],"parsedNumHeaders":1}});"#;

    #[test]
    fn test_parse_wrapped_payload() {
        let table = QueryResponse::from_text(WRAPPED, 1).unwrap();

        assert_eq!(table.column_count(), 3);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.header_rows, 1);
        assert_eq!(table.columns[1].label, "Job Card No");
        assert_eq!(table.columns[2].kind, "number");

        let first = &table.rows[0];
        assert_eq!(first.number, 2);
        assert_eq!(first.text(Column(1)), Some("JC-1".to_string()));
        assert_eq!(first.text(Column(2)), Some("100".to_string()));
        assert!(first.date(Column(0)).is_some());

        let second = &table.rows[1];
        assert_eq!(second.number, 3);
        assert!(second.cell(Column(0)).is_blank());
    }

    #[test]
    fn test_parse_bare_json() {
        let body = r#"{"status":"ok","table":{"cols":[],"rows":[{"c":[{"v":"x"}]}]}}"#;
        let table = QueryResponse::from_text(body, 2).unwrap();
        assert_eq!(table.header_rows, 2);
        assert_eq!(table.rows[0].number, 3);
    }

    #[test]
    fn test_error_status() {
        let body = r#"google.visualization.Query.setResponse({"status":"error","errors":[{"reason":"invalid_query","message":"INVALID_QUERY","detailed_message":"Invalid sheet name"}]});"#;
        match QueryResponse::from_text(body, 1) {
            Err(ApiError::Query { reason, message }) => {
                assert_eq!(reason, "invalid_query");
                assert_eq!(message, "Invalid sheet name");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_missing_table_is_empty() {
        let table = QueryResponse::from_text(r#"{"status":"ok"}"#, 1).unwrap();
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_malformed_payloads() {
        assert!(matches!(
            QueryResponse::from_text("<html>Sign in</html>", 1),
            Err(ApiError::MalformedResponse(_))
        ));
        assert!(matches!(
            QueryResponse::from_text("setResponse({\"status\":", 1),
            Err(ApiError::MalformedResponse(_))
        ));
    }
}
