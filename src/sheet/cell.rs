//! A single spreadsheet cell as returned by the query endpoint

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::date::{parse_display_date, parse_pseudo_date, parse_sheet_date};

/// Raw value (`v`) and formatted value (`f`) of a cell
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    #[serde(default)]
    pub v: Option<Value>,
    #[serde(default)]
    pub f: Option<String>,
}

impl Cell {
    pub fn new(v: Value) -> Self {
        Self { v: Some(v), f: None }
    }

    pub fn with_formatted(v: Value, f: impl Into<String>) -> Self {
        Self {
            v: Some(v),
            f: Some(f.into()),
        }
    }

    /// Null, missing, or whitespace-only
    pub fn is_blank(&self) -> bool {
        match &self.v {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Trimmed text content, `None` when blank
    pub fn text(&self) -> Option<String> {
        let text = match self.v.as_ref()? {
            Value::Null => return None,
            Value::String(s) => s.trim().to_string(),
            Value::Bool(true) => "TRUE".to_string(),
            Value::Bool(false) => "FALSE".to_string(),
            Value::Number(n) => match &self.f {
                Some(formatted) if !formatted.trim().is_empty() => formatted.trim().to_string(),
                _ => format_number(n),
            },
            other => other.to_string(),
        };

        if text.is_empty() { None } else { Some(text) }
    }

    pub fn number(&self) -> Option<f64> {
        match self.v.as_ref()? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => {
                let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
                cleaned.parse().ok()
            }
            _ => None,
        }
    }

    pub fn date(&self) -> Option<NaiveDateTime> {
        if let Some(Value::String(s)) = &self.v {
            if let Some(dt) = parse_pseudo_date(s) {
                return Some(dt);
            }
        }

        if let Some(formatted) = &self.f {
            if let Some(dt) = parse_display_date(formatted) {
                return Some(dt);
            }
        }

        match &self.v {
            Some(Value::String(s)) => parse_sheet_date(s),
            _ => None,
        }
    }
}

/// Render a JSON number the way a sheet shows it: integers without ".0"
fn format_number(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}
