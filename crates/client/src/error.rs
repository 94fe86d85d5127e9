use bookshelf_kernel::BookId;
use thiserror::Error;

/// Failures surfaced by a [`BookApi`](crate::BookApi) call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure: no response was received, or its body could not
    /// be read to the end.
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("book {0} not found")]
    NotFound(BookId),

    /// A 2xx body that does not have the expected shape.
    #[error("malformed response: {0}")]
    Decode(String),

    #[error("invalid base URL '{0}'")]
    InvalidBaseUrl(String),

    #[error("failed to build HTTP client: {0}")]
    Setup(#[source] reqwest::Error),
}

impl ApiError {
    /// HTTP status carried by the error, if the service responded at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::NotFound(_) => Some(404),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_mentions_status_and_body() {
        let err = ApiError::Http {
            status: 503,
            body: "maintenance".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 503: maintenance");
        assert_eq!(err.status(), Some(503));
    }

    #[test]
    fn not_found_reports_404() {
        let err = ApiError::NotFound(BookId::Number(9));
        assert_eq!(err.to_string(), "book 9 not found");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn decode_has_no_status() {
        assert_eq!(ApiError::Decode("eof".to_string()).status(), None);
    }
}
