//! Write operations understood by the web-hook script

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::api::constants::{actions, fields};
use crate::sheet::Column;

/// Cell values to write, keyed by column
pub type CellUpdates = BTreeMap<Column, Value>;

/// A single write against the spreadsheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operation {
    /// Append a full row to the end of a sheet
    Insert {
        sheet: String,
        /// Row values in column order, starting at column A
        row: Vec<Value>,
    },
    /// Overwrite individual cells of one sheet row
    UpdateCells {
        sheet: String,
        /// One-based sheet row number
        row_number: usize,
        cells: CellUpdates,
    },
    /// Overwrite individual cells of the row holding a job card number
    UpdateByJobCard {
        sheet: String,
        job_card_no: String,
        cells: CellUpdates,
    },
}

/// Outcome of executing an Operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationResult {
    pub operation: Operation,
    pub success: bool,
    /// Full response body when the web-hook returned JSON
    pub data: Option<Value>,
    pub error: Option<String>,
    pub status_code: Option<u16>,
}

/// Body returned by the web-hook
#[derive(Debug, Deserialize)]
struct WebhookResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl Operation {
    pub fn insert(sheet: impl Into<String>, row: Vec<Value>) -> Self {
        Self::Insert {
            sheet: sheet.into(),
            row,
        }
    }

    pub fn update_cells(sheet: impl Into<String>, row_number: usize, cells: CellUpdates) -> Self {
        Self::UpdateCells {
            sheet: sheet.into(),
            row_number,
            cells,
        }
    }

    pub fn update_by_job_card(
        sheet: impl Into<String>,
        job_card_no: impl Into<String>,
        cells: CellUpdates,
    ) -> Self {
        Self::UpdateByJobCard {
            sheet: sheet.into(),
            job_card_no: job_card_no.into(),
            cells,
        }
    }

    pub fn sheet(&self) -> &str {
        match self {
            Self::Insert { sheet, .. } => sheet,
            Self::UpdateCells { sheet, .. } => sheet,
            Self::UpdateByJobCard { sheet, .. } => sheet,
        }
    }

    /// Action name sent to the web-hook
    pub fn action(&self) -> &'static str {
        match self {
            Self::Insert { .. } => actions::INSERT,
            Self::UpdateCells { .. } => actions::UPDATE_CELLS,
            Self::UpdateByJobCard { .. } => actions::UPDATE_BY_JOB_CARD,
        }
    }

    /// Form-encoded body fields for the web-hook POST
    pub fn to_form_fields(&self) -> anyhow::Result<Vec<(&'static str, String)>> {
        let mut form = vec![
            (fields::SHEET_NAME, self.sheet().to_string()),
            (fields::ACTION, self.action().to_string()),
        ];

        match self {
            Self::Insert { row, .. } => {
                form.push((fields::ROW_DATA, serde_json::to_string(row)?));
            }
            Self::UpdateCells {
                row_number, cells, ..
            } => {
                form.push((fields::ROW_INDEX, row_number.to_string()));
                form.push((fields::CELL_UPDATES, encode_cell_updates(cells)?));
            }
            Self::UpdateByJobCard {
                job_card_no, cells, ..
            } => {
                form.push((fields::JOB_CARD_NO, job_card_no.clone()));
                form.push((fields::CELL_UPDATES, encode_cell_updates(cells)?));
            }
        }

        Ok(form)
    }
}

/// JSON object keyed by one-based column number, in column order
fn encode_cell_updates(cells: &CellUpdates) -> serde_json::Result<String> {
    let by_number: BTreeMap<usize, &Value> =
        cells.iter().map(|(col, value)| (col.number(), value)).collect();
    serde_json::to_string(&by_number)
}

impl OperationResult {
    pub fn success(operation: Operation, data: Option<Value>) -> Self {
        Self {
            operation,
            success: true,
            data,
            error: None,
            status_code: Some(200),
        }
    }

    pub fn error(operation: Operation, error: String, status_code: Option<u16>) -> Self {
        Self {
            operation,
            success: false,
            data: None,
            error: Some(error),
            status_code,
        }
    }

    /// Interpret a web-hook response body
    ///
    /// Anything other than a JSON body with `success: true` is a failure.
    pub fn from_response(operation: Operation, status_code: u16, body: &str) -> Self {
        if !(200..300).contains(&status_code) {
            let detail = if body.trim().is_empty() {
                format!("HTTP {}", status_code)
            } else {
                format!("HTTP {}: {}", status_code, body.trim())
            };
            return Self::error(operation, detail, Some(status_code));
        }

        let data: Value = match serde_json::from_str(body) {
            Ok(value) => value,
            Err(e) => {
                return Self::error(
                    operation,
                    format!("Web-hook returned a non-JSON body: {}", e),
                    Some(status_code),
                );
            }
        };

        let parsed: WebhookResponse = match serde_json::from_value(data.clone()) {
            Ok(parsed) => parsed,
            Err(e) => {
                return Self::error(
                    operation,
                    format!("Unexpected web-hook response: {}", e),
                    Some(status_code),
                );
            }
        };

        if parsed.success {
            let mut result = Self::success(operation, Some(data));
            result.status_code = Some(status_code);
            result
        } else {
            let message = parsed
                .error
                .or(parsed.message)
                .unwrap_or_else(|| "Web-hook reported failure without a message".to_string());
            Self::error(operation, message, Some(status_code))
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn is_error(&self) -> bool {
        !self.success
    }

    pub fn into_result(self) -> Result<Value, String> {
        if self.success {
            Ok(self.data.unwrap_or(Value::Null))
        } else {
            Err(self.error.unwrap_or_else(|| "Unknown error".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cells() -> CellUpdates {
        let mut cells = CellUpdates::new();
        cells.insert(Column(29), json!("15/01/2024 10:00:00"));
        cells.insert(Column(8), json!("Resin"));
        cells.insert(Column(30), json!("Done"));
        cells
    }

    #[test]
    fn test_actions() {
        assert_eq!(Operation::insert("Job Cards", vec![]).action(), "insert");
        assert_eq!(Operation::update_cells("Production", 4, cells()).action(), "updateCells");
        assert_eq!(
            Operation::update_by_job_card("Production", "JC-1", cells()).action(),
            "updateByJobCard"
        );
    }

    #[test]
    fn test_update_cells_form_uses_one_based_columns_in_order() {
        let op = Operation::update_cells("Production", 7, cells());
        let form = op.to_form_fields().unwrap();

        assert_eq!(form[0], ("sheetName", "Production".to_string()));
        assert_eq!(form[1], ("action", "updateCells".to_string()));
        assert_eq!(form[2], ("rowIndex", "7".to_string()));
        assert_eq!(
            form[3],
            (
                "cellUpdates",
                r#"{"9":"Resin","30":"15/01/2024 10:00:00","31":"Done"}"#.to_string()
            )
        );
    }

    #[test]
    fn test_insert_and_job_card_forms() {
        let op = Operation::insert("Job Cards", vec![json!("JC-9"), json!(12), Value::Null]);
        let form = op.to_form_fields().unwrap();
        assert_eq!(form[2], ("rowData", r#"["JC-9",12,null]"#.to_string()));

        let op = Operation::update_by_job_card("Production", "JC-9", CellUpdates::new());
        let form = op.to_form_fields().unwrap();
        assert_eq!(form[2], ("jobCardNo", "JC-9".to_string()));
        assert_eq!(form[3], ("cellUpdates", "{}".to_string()));
    }

    #[test]
    fn test_response_success() {
        let op = Operation::insert("Job Cards", vec![]);
        let result = OperationResult::from_response(op, 200, r#"{"success":true,"row":12}"#);
        assert!(result.is_success());
        assert_eq!(result.into_result().unwrap()["row"], json!(12));
    }

    #[test]
    fn test_response_failures() {
        let op = Operation::insert("Job Cards", vec![]);

        let result = OperationResult::from_response(
            op.clone(),
            200,
            r#"{"success":false,"error":"Sheet not found"}"#,
        );
        assert!(result.is_error());
        assert_eq!(result.error.as_deref(), Some("Sheet not found"));

        let result = OperationResult::from_response(op.clone(), 500, "boom");
        assert_eq!(result.status_code, Some(500));
        assert_eq!(result.error.as_deref(), Some("HTTP 500: boom"));

        let result = OperationResult::from_response(op, 200, "<html></html>");
        assert!(result.is_error());
    }
}
