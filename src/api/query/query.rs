//! Reusable description of a sheet read

use crate::api::constants::QUERY_OUTPUT;

#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// Sheet (tab) name
    pub sheet: String,
    /// Optional query-language statement, e.g. `select A, B where B is not null`
    pub select: Option<String>,
    /// Number of header rows the endpoint should treat as labels
    pub headers: usize,
}

impl Query {
    pub fn new(sheet: impl Into<String>) -> Self {
        Self {
            sheet: sheet.into(),
            select: None,
            headers: 1,
        }
    }

    pub fn select(mut self, statement: impl Into<String>) -> Self {
        self.select = Some(statement.into());
        self
    }

    pub fn headers(mut self, headers: usize) -> Self {
        self.headers = headers;
        self
    }

    /// Query-string parameters for the endpoint
    pub fn to_query_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("tqx".to_string(), QUERY_OUTPUT.to_string()),
            ("sheet".to_string(), self.sheet.clone()),
            ("headers".to_string(), self.headers.to_string()),
        ];

        if let Some(select) = &self.select {
            params.push(("tq".to_string(), select.clone()));
        }

        params
    }
}
