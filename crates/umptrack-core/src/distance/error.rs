use thiserror::Error;

#[derive(Error, Debug)]
pub enum DistanceError {
    #[error("Request denied: {0}")]
    RequestDenied(String),

    #[error("Over query limit - please wait before retrying")]
    OverQueryLimit,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl DistanceError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 | 403 => DistanceError::RequestDenied(truncated),
            400 | 404 => DistanceError::InvalidRequest(truncated),
            429 => DistanceError::OverQueryLimit,
            500..=599 => DistanceError::ServerError(truncated),
            _ => DistanceError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }

    /// Map a failing top-level Distance Matrix status string
    pub fn from_api_status(status: &str, message: Option<&str>) -> Self {
        let detail = message.unwrap_or(status).to_string();
        match status {
            "REQUEST_DENIED" => DistanceError::RequestDenied(detail),
            "OVER_QUERY_LIMIT" | "OVER_DAILY_LIMIT" => DistanceError::OverQueryLimit,
            "INVALID_REQUEST" | "MAX_ELEMENTS_EXCEEDED" | "MAX_DIMENSIONS_EXCEEDED" => {
                DistanceError::InvalidRequest(detail)
            }
            "UNKNOWN_ERROR" => DistanceError::ServerError(detail),
            _ => DistanceError::InvalidResponse(detail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status() {
        assert!(matches!(
            DistanceError::from_status(reqwest::StatusCode::FORBIDDEN, "nope"),
            DistanceError::RequestDenied(_)
        ));
        assert!(matches!(
            DistanceError::from_status(reqwest::StatusCode::TOO_MANY_REQUESTS, ""),
            DistanceError::OverQueryLimit
        ));
        assert!(matches!(
            DistanceError::from_status(reqwest::StatusCode::BAD_GATEWAY, ""),
            DistanceError::ServerError(_)
        ));
    }

    #[test]
    fn test_long_body_is_truncated() {
        let body = "x".repeat(2000);
        let err = DistanceError::from_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR, &body);
        let message = err.to_string();
        assert!(message.contains("truncated, 2000 total bytes"));
        assert!(message.len() < 600);
    }

    #[test]
    fn test_from_api_status() {
        assert!(matches!(
            DistanceError::from_api_status("REQUEST_DENIED", Some("The provided API key is invalid.")),
            DistanceError::RequestDenied(msg) if msg.contains("API key")
        ));
        assert!(matches!(
            DistanceError::from_api_status("OVER_QUERY_LIMIT", None),
            DistanceError::OverQueryLimit
        ));
    }
}
