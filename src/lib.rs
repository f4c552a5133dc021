//! An async parser for `application/x-www-form-urlencoded` request bodies,
//! meant to sit in an HTTP middleware pipeline.
//!
//! It accepts a [`Stream`](futures_util::stream::Stream) of
//! [`Bytes`](bytes::Bytes) as the request body, so it works with any async
//! HTTP server. The body is collected under an optional size limit, checked
//! against the `Content-MD5` header while the bytes arrive, decoded and merged
//! into the request params.
//!
//! # Examples
//!
//! ```
//! use urlform::{FormBodyParser, FormRequest, Outcome, Params, ParsingConfig};
//! use bytes::Bytes;
//! use http::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
//! use std::convert::Infallible;
//! use futures_util::stream::once;
//!
//! # async fn run() {
//! let parser = FormBodyParser::new(ParsingConfig::new().max_body_size(1024));
//!
//! let mut headers = HeaderMap::new();
//! headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/x-www-form-urlencoded"));
//!
//! // Route params set by an earlier stage win over the form values.
//! let mut params = Params::new();
//! params.insert("id", "42");
//! let mut req = FormRequest::with_params(headers, params);
//!
//! let body = once(async move { Result::<Bytes, Infallible>::Ok(Bytes::from("id=7&name=ferris")) });
//!
//! assert_eq!(parser.parse(&mut req, body).await, Ok(Outcome::Continue));
//! assert_eq!(req.params.get("id").unwrap(), "42");
//! assert_eq!(req.params.get("name").unwrap(), "ferris");
//! # }
//! # tokio::runtime::Runtime::new().unwrap().block_on(run());
//! ```
//!
//! ## Optional features
//!
//! * `log`: emits diagnostics through the [`log`](https://docs.rs/log) facade.
//! * `serde`: `Deserialize` for [`ParsingConfig`], serde support for [`Params`].
//! * `tokio-io`: `FormBodyParser::parse_reader` for `tokio::io::AsyncRead` bodies.

pub use bytes;
pub use config::ParsingConfig;
pub use decoder::{FormDecoder, UrlEncodedDecoder};
pub use error::{BoxError, Error, ErrorKind};
pub use params::{DecodedParams, Params, Value};
pub use parser::{FormBodyParser, Outcome, ParseBody};
pub use request::FormRequest;

mod buffer;
mod config;
mod constants;
mod decoder;
mod digest;
mod error;
mod params;
mod parser;
mod request;
mod state;

/// A Result type often returned from methods that can have `urlform` errors.
pub type Result<T> = std::result::Result<T, Error>;

/// Checks whether a `Content-Type` value denotes form data, ignoring case and
/// parameters such as `charset`.
pub fn is_form_urlencoded<T: AsRef<str>>(content_type: T) -> bool {
    content_type
        .as_ref()
        .parse::<mime::Mime>()
        .map_or(false, |m| {
            let expected = &mime::APPLICATION_WWW_FORM_URLENCODED;
            m.type_().as_str().eq_ignore_ascii_case(expected.type_().as_str())
                && m.subtype().as_str().eq_ignore_ascii_case(expected.subtype().as_str())
        })
}
