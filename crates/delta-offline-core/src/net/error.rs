use thiserror::Error;

#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}: {body}")]
    BadStatus {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Network unavailable: {0}")]
    Unavailable(String),
}

/// Maximum length for response body previews in error messages
const MAX_ERROR_BODY_LENGTH: usize = 200;

impl NetworkError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }

    pub fn from_status(url: &str, status: u16, body: &str) -> Self {
        NetworkError::BadStatus {
            url: url.to_string(),
            status,
            body: Self::truncate_body(body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_keeps_short_body() {
        let err = NetworkError::from_status("https://delta.example/a.html", 404, "Not Found");
        assert_eq!(
            err.to_string(),
            "Unexpected status 404 from https://delta.example/a.html: Not Found"
        );
    }

    #[test]
    fn test_from_status_truncates_on_char_boundary() {
        // Two-byte characters straddle the cut
        let body = "ض".repeat(150);
        match NetworkError::from_status("https://delta.example/", 500, &body) {
            NetworkError::BadStatus { body: preview, .. } => {
                assert!(preview.starts_with(&"ض".repeat(100)));
                assert!(preview.ends_with("(truncated, 300 total bytes)"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
