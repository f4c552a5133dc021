use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_util::future::FusedFuture;
use futures_util::stream::{Stream, TryStreamExt};
#[cfg(feature = "tokio-io")]
use tokio::io::AsyncRead;
#[cfg(feature = "tokio-io")]
use tokio_util::io::ReaderStream;

use crate::buffer;
use crate::config::ParsingConfig;
use crate::constants;
use crate::decoder::{FormDecoder, UrlEncodedDecoder};
use crate::error::BoxError;
use crate::request::FormRequest;
use crate::state::{RequestContext, Stage};

/// How a request left the parser when no error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Outcome {
    /// The body was consumed and the decoded form applied to the request.
    Continue,
    /// The request is not a form request; nothing was read or changed.
    Skip,
}

/// Parses `application/x-www-form-urlencoded` request bodies.
///
/// A parser is built once with a [`ParsingConfig`] and then shared by every
/// request; each call to [`parse`](FormBodyParser::parse) gets its own state.
///
/// # Examples
///
/// ```
/// use urlform::{FormBodyParser, FormRequest, Outcome, ParsingConfig};
/// use bytes::Bytes;
/// use http::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
/// use std::convert::Infallible;
/// use futures_util::stream::once;
///
/// # async fn run() {
/// let parser = FormBodyParser::new(ParsingConfig::new().max_body_size(1024));
///
/// let mut headers = HeaderMap::new();
/// headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/x-www-form-urlencoded"));
/// let mut req = FormRequest::new(headers);
///
/// let body = once(async move { Result::<Bytes, Infallible>::Ok(Bytes::from("name=ferris&lang=rust")) });
///
/// assert_eq!(parser.parse(&mut req, body).await, Ok(Outcome::Continue));
/// assert_eq!(req.params.get("lang").unwrap(), "rust");
/// # }
/// # tokio::runtime::Runtime::new().unwrap().block_on(run());
/// ```
#[derive(Debug, Clone)]
pub struct FormBodyParser<D = UrlEncodedDecoder> {
    config: ParsingConfig,
    decoder: D,
}

impl FormBodyParser {
    /// Creates a parser using the built-in [`UrlEncodedDecoder`].
    pub fn new(config: ParsingConfig) -> FormBodyParser {
        FormBodyParser::with_decoder(config, UrlEncodedDecoder::default())
    }
}

impl<D> FormBodyParser<D> {
    /// Creates a parser with a custom decoder.
    pub fn with_decoder(config: ParsingConfig, decoder: D) -> FormBodyParser<D> {
        FormBodyParser { config, decoder }
    }

    /// The configuration shared by every request this parser handles.
    pub fn config(&self) -> &ParsingConfig {
        &self.config
    }

    /// Checks whether the request carries a form body this parser handles.
    pub fn applies_to(&self, req: &FormRequest) -> bool {
        let is_form = if self.config.strict_content_type {
            req.mime_type() == Some(constants::FORM_URLENCODED)
        } else {
            req.content_type().map_or(false, |ct| crate::is_form_urlencoded(ct))
        };

        is_form && (req.content_length() != Some(0) || req.is_chunked())
    }
}

impl<D: FormDecoder> FormBodyParser<D> {
    /// Reads the request body from `stream` and applies it to `req`.
    ///
    /// The returned future resolves exactly once. Requests that aren't form
    /// requests resolve to [`Outcome::Skip`] without polling the stream.
    pub fn parse<'a, S, O, E>(&'a self, req: &'a mut FormRequest, stream: S) -> ParseBody<'a, D>
    where
        S: Stream<Item = Result<O, E>> + Send + 'a,
        O: Into<Bytes> + 'a,
        E: Into<BoxError> + 'a,
    {
        let stream = stream
            .map_ok(|chunk| -> Bytes { chunk.into() })
            .map_err(|err| crate::Error::StreamReadFailed(err.into()));

        ParseBody {
            parser: self,
            req,
            stream: Box::pin(stream),
            stage: Stage::Idle,
        }
    }

    /// Reads the request body from an [`AsyncRead`](tokio::io::AsyncRead) and
    /// applies it to `req`.
    ///
    /// # Optional
    ///
    /// This requires the optional `tokio-io` feature to be enabled.
    #[cfg(feature = "tokio-io")]
    pub fn parse_reader<'a, R>(&'a self, req: &'a mut FormRequest, reader: R) -> ParseBody<'a, D>
    where
        R: AsyncRead + Send + 'a,
    {
        self.parse(req, ReaderStream::new(reader))
    }
}

/// Future returned by [`FormBodyParser::parse`].
#[must_use = "futures do nothing unless polled"]
pub struct ParseBody<'a, D> {
    parser: &'a FormBodyParser<D>,
    req: &'a mut FormRequest,
    stream: Pin<Box<dyn Stream<Item = crate::Result<Bytes>> + Send + 'a>>,
    stage: Stage,
}

impl<'a, D: FormDecoder> ParseBody<'a, D> {
    fn finalize(&mut self, ctx: RequestContext) -> crate::Result<Outcome> {
        let config = &self.parser.config;
        let RequestContext { collector, digest } = ctx;

        if collector.is_exceeded() {
            return Err(crate::Error::RequestEntityTooLarge {
                limit: config.max_body_size,
                received: collector.bytes_received,
            });
        }

        if collector.is_empty() {
            return Ok(Outcome::Continue);
        }

        if let Some(digest) = digest {
            digest.verify()?;
        }

        let text = buffer::decode_text(&collector.into_bytes());

        let decoded = self
            .parser
            .decoder
            .decode(&text)
            .map_err(|err| crate::Error::InvalidContent(err.to_string()))?;

        if config.map_params {
            self.req.ignored_params = self.req.params.merge(decoded, config.override_params);

            #[cfg(feature = "log")]
            log::trace!("req.params now: {:?}", self.req.params);
        } else {
            self.req.raw_body = Some(text);
            self.req.body = Some(decoded);
        }

        Ok(Outcome::Continue)
    }
}

impl<'a, D: FormDecoder> Future for ParseBody<'a, D> {
    type Output = crate::Result<Outcome>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        loop {
            match std::mem::replace(&mut this.stage, Stage::Done) {
                Stage::Idle => {
                    if !this.parser.applies_to(this.req) {
                        return Poll::Ready(Ok(Outcome::Skip));
                    }

                    #[cfg(feature = "log")]
                    log::trace!("collecting form body");

                    let ctx = RequestContext::new(this.parser.config.body_size_limit(), this.req.content_md5());
                    this.stage = Stage::Collecting(ctx);
                }
                Stage::Collecting(mut ctx) => match this.stream.as_mut().poll_next(cx) {
                    Poll::Ready(Some(Ok(chunk))) => {
                        ctx.push(&chunk);
                        this.stage = Stage::Collecting(ctx);
                    }
                    Poll::Ready(Some(Err(err))) => {
                        #[cfg(feature = "log")]
                        log::debug!("form body stream failed: {}", err);

                        return Poll::Ready(Err(err));
                    }
                    Poll::Ready(None) => {
                        this.stage = Stage::Finalizing(ctx);
                    }
                    Poll::Pending => {
                        this.stage = Stage::Collecting(ctx);
                        return Poll::Pending;
                    }
                },
                Stage::Finalizing(ctx) => {
                    let result = this.finalize(ctx);

                    #[cfg(feature = "log")]
                    {
                        if let Err(ref err) = result {
                            log::debug!("form body rejected: {}", err);
                        }
                    }

                    return Poll::Ready(result);
                }
                // Already resolved, never report a second outcome.
                Stage::Done => return Poll::Pending,
            }
        }
    }
}

impl<'a, D: FormDecoder> FusedFuture for ParseBody<'a, D> {
    fn is_terminated(&self) -> bool {
        matches!(self.stage, Stage::Done)
    }
}
