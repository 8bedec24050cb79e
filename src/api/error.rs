use thiserror::Error;

/// Typed failures reported by the spreadsheet endpoints
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Query failed ({reason}): {message}")]
    Query { reason: String, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Write rejected by web-hook: {0}")]
    WriteRejected(String),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = ApiError::Query {
            reason: "invalid_query".to_string(),
            message: "Invalid sheet".to_string(),
        };
        assert_eq!(error.to_string(), "Query failed (invalid_query): Invalid sheet");

        let error = ApiError::HttpStatus { status: 404, body: "Not Found".to_string() };
        assert!(error.to_string().contains("404"));
    }
}
