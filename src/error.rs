// Error type shared by every layer of the library. The CLI wraps these in
// `anyhow::Error` and prints them on exit.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read cookie file {}", .path.display())]
    CookieFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cookie file {} is not a JSON array of {{name, value}} objects", .path.display())]
    CookieFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A cookie the API cannot work without is absent from the cookie file.
    #[error("required cookie `{name}` is missing from the cookie file")]
    MissingCredential { name: &'static str },

    #[error("invalid value for header `{name}`")]
    InvalidHeader {
        name: &'static str,
        #[source]
        source: reqwest::header::InvalidHeaderValue,
    },

    /// The server redirected to the login page or rejected the cookies.
    #[error(
        "LinkedIn API returned {status}. Cookies may be expired, \
         export fresh browser cookies and try again."
    )]
    ExpiredSession { status: u16 },

    #[error("LinkedIn API returned {status}: {body}")]
    Http { status: u16, body: String },

    #[error(transparent)]
    Request(#[from] reqwest::Error),

    #[error("failed to decode response body")]
    Decode(#[from] serde_json::Error),

    #[error("unexpected response shape: {0}")]
    UnexpectedResponse(String),

    /// Raised by `delete_posts` when a delete fails partway through a batch.
    #[error("failed to delete {urn} after deleting {deleted} post(s): {source}")]
    PartialDelete {
        deleted: usize,
        urn: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// True when the session cookies need to be refreshed outside this tool.
    pub fn is_expired_session(&self) -> bool {
        match self {
            Error::ExpiredSession { .. } => true,
            Error::PartialDelete { source, .. } => source.is_expired_session(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expired_session_message_mentions_status_and_remedy() {
        let msg = Error::ExpiredSession { status: 401 }.to_string();
        assert!(msg.contains("401"));
        assert!(msg.contains("fresh browser cookies"));
    }

    #[test]
    fn partial_delete_leads_with_the_underlying_failure() {
        let err = Error::PartialDelete {
            deleted: 1,
            urn: "urn:li:share:2".into(),
            source: Box::new(Error::ExpiredSession { status: 403 }),
        };
        assert!(err.is_expired_session());

        let msg = err.to_string();
        assert!(msg.starts_with("failed to delete urn:li:share:2 after deleting 1 post(s): "));
        assert!(msg.contains("LinkedIn API returned 403"));
        assert!(msg.contains("fresh browser cookies"));
    }
}
