//! Endpoint constants for the spreadsheet query and web-hook APIs

/// Base URL of the public tabular-query endpoint
pub const QUERY_BASE_URL: &str = "https://docs.google.com/spreadsheets/d";

/// Path segment of the query endpoint below the spreadsheet id
pub const QUERY_PATH: &str = "gviz/tq";

/// Output format requested from the query endpoint
pub const QUERY_OUTPUT: &str = "out:json";

/// Prefix the query endpoint wraps its JSON payload in
pub const RESPONSE_WRAPPER: &str = "setResponse(";

pub const USER_AGENT: &str = "prodtrack-cli/0.1";

/// Actions understood by the web-hook script
pub mod actions {
    pub const INSERT: &str = "insert";
    pub const UPDATE_CELLS: &str = "updateCells";
    pub const UPDATE_BY_JOB_CARD: &str = "updateByJobCard";
}

/// Form field names posted to the web-hook script
pub mod fields {
    pub const SHEET_NAME: &str = "sheetName";
    pub const ACTION: &str = "action";
    pub const ROW_DATA: &str = "rowData";
    pub const ROW_INDEX: &str = "rowIndex";
    pub const CELL_UPDATES: &str = "cellUpdates";
    pub const JOB_CARD_NO: &str = "jobCardNo";
}

pub mod headers {
    pub const X_CORRELATION_ID: &str = "X-Correlation-Id";
}

/// Build the query endpoint URL for a spreadsheet
pub fn query_endpoint(base_url: &str, spreadsheet_id: &str) -> String {
    format!(
        "{}/{}/{}",
        base_url.trim_end_matches('/'),
        spreadsheet_id,
        QUERY_PATH
    )
}
