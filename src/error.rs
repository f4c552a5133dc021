use std::fmt::{self, Debug, Display, Formatter};

use derive_more::Display;
use http::StatusCode;

/// A boxed error, as accepted from body streams and decoders.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A set of errors that can occur while collecting, verifying and decoding a
/// form body.
#[derive(Display)]
#[non_exhaustive]
pub enum Error {
    /// The `Content-MD5` header doesn't match the digest computed over the
    /// received bytes.
    #[display(fmt = "Content-MD5 '{}' didn't match '{}'", declared, computed)]
    BadDigest { declared: String, computed: String },

    /// The body text couldn't be decoded as form data.
    #[display(fmt = "{}", _0)]
    InvalidContent(String),

    /// The incoming body size exceeded the maximum limit.
    #[display(fmt = "Request body size exceeds {} bytes (received {} bytes)", limit, received)]
    RequestEntityTooLarge { limit: u64, received: u64 },

    /// Stream read failed.
    #[display(fmt = "stream read failed: {}", _0)]
    StreamReadFailed(BoxError),
}

/// The category of an [`Error`], stable across message changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadDigest,
    InvalidContent,
    RequestEntityTooLarge,
    TransportError,
}

impl Error {
    /// Returns the kind tag of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::BadDigest { .. } => ErrorKind::BadDigest,
            Error::InvalidContent(_) => ErrorKind::InvalidContent,
            Error::RequestEntityTooLarge { .. } => ErrorKind::RequestEntityTooLarge,
            Error::StreamReadFailed(_) => ErrorKind::TransportError,
        }
    }

    /// The HTTP status a server would normally answer with for this error.
    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::RequestEntityTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ErrorKind::BadDigest | ErrorKind::InvalidContent | ErrorKind::TransportError => StatusCode::BAD_REQUEST,
        }
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::StreamReadFailed(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string().eq(&other.to_string())
    }
}

impl Eq for Error {}
