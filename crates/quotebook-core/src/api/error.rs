use thiserror::Error;

use crate::cache::CollectionKey;

/// Failures talking to the remote document store. Collection-scoped
/// variants carry which of the four collections the request targeted,
/// plus a capped slice of the response body.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Unauthorized - bearer token missing or expired")]
    Unauthorized,

    #[error("Access denied to {collection}: {detail}")]
    AccessDenied {
        collection: CollectionKey,
        detail: String,
    },

    #[error("Not found in {collection}: {detail}")]
    NotFound {
        collection: CollectionKey,
        detail: String,
    },

    #[error("Rate limited by the document store")]
    RateLimited,

    #[error("Document store error on {collection}: {detail}")]
    ServerError {
        collection: CollectionKey,
        detail: String,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response from {collection} (status {status}): {detail}")]
    InvalidResponse {
        collection: CollectionKey,
        status: u16,
        detail: String,
    },
}

/// Cap on response bodies quoted in error messages; the store returns
/// whole HTML error pages on some faults.
const MAX_DETAIL_BYTES: usize = 500;

impl RemoteError {
    /// Cap a response body for quoting in an error message.
    ///
    /// Bodies are UTF-8 and frequently carry accented text (product
    /// and client names echo back in store errors), so the cut backs
    /// off to a character boundary instead of slicing at a raw byte
    /// offset.
    fn truncate_detail(body: &str) -> String {
        if body.len() <= MAX_DETAIL_BYTES {
            return body.trim().to_string();
        }
        let mut cut = MAX_DETAIL_BYTES;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}... [{} bytes total]", &body[..cut], body.len())
    }

    pub fn from_status(
        collection: CollectionKey,
        status: reqwest::StatusCode,
        body: &str,
    ) -> Self {
        let detail = Self::truncate_detail(body);
        match status.as_u16() {
            401 => RemoteError::Unauthorized,
            403 => RemoteError::AccessDenied { collection, detail },
            404 => RemoteError::NotFound { collection, detail },
            429 => RemoteError::RateLimited,
            500..=599 => RemoteError::ServerError { collection, detail },
            code => RemoteError::InvalidResponse {
                collection,
                status: code,
                detail,
            },
        }
    }

    /// True for the 404 case, which document reads treat as absence
    /// rather than failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RemoteError::NotFound { .. })
    }
}
