use http::header::{self, HeaderMap};

use crate::constants;
use crate::params::Params;

/// The parts of an incoming request this crate reads and writes.
///
/// `params` holds the parameters already collected by earlier stages (route or
/// query params). On success the decoded form is merged into it, or, with
/// [`map_params`](crate::ParsingConfig::map_params) disabled, stored in `body`
/// with the raw text in `raw_body`. Form keys that lost against an existing
/// param are listed in `ignored_params`.
#[derive(Debug, Clone, Default)]
pub struct FormRequest {
    pub headers: HeaderMap,
    pub params: Params,
    pub body: Option<Params>,
    pub raw_body: Option<String>,
    pub ignored_params: Vec<String>,
}

impl FormRequest {
    pub fn new(headers: HeaderMap) -> FormRequest {
        FormRequest {
            headers,
            ..FormRequest::default()
        }
    }

    pub fn with_params(headers: HeaderMap, params: Params) -> FormRequest {
        FormRequest {
            headers,
            params,
            ..FormRequest::default()
        }
    }

    /// The media type of the `Content-Type` header, without its parameters.
    pub fn mime_type(&self) -> Option<&str> {
        self.content_type()
            .map(|val| val.split(';').next().unwrap_or(val).trim())
    }

    /// The raw `Content-Type` header value.
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(header::CONTENT_TYPE)
            .and_then(|val| val.to_str().ok())
    }

    /// The declared `Content-Length`, `None` when absent or not a number.
    pub fn content_length(&self) -> Option<u64> {
        self.headers
            .get(header::CONTENT_LENGTH)
            .and_then(|val| val.to_str().ok())
            .and_then(|val| val.trim().parse::<u64>().ok())
    }

    /// Whether the body is sent with chunked transfer coding.
    pub fn is_chunked(&self) -> bool {
        self.headers
            .get_all(header::TRANSFER_ENCODING)
            .iter()
            .filter_map(|val| val.to_str().ok())
            .flat_map(|val| val.split(','))
            .last()
            .map_or(false, |coding| coding.trim().eq_ignore_ascii_case(constants::CHUNKED))
    }

    /// The declared `Content-MD5` digest. An empty header declares nothing.
    pub fn content_md5(&self) -> Option<String> {
        self.headers
            .get(constants::CONTENT_MD5)
            .filter(|val| !val.is_empty())
            .map(|val| String::from_utf8_lossy(val.as_bytes()).into_owned())
    }
}
