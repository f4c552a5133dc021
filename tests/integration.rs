use std::task::Poll;

use bytes::Bytes;
use futures_util::future::FusedFuture;
use futures_util::{poll, stream};
use http::header::{HeaderMap, HeaderValue, CONTENT_LENGTH, CONTENT_TYPE, TRANSFER_ENCODING};
use urlform::{
    BoxError, Error, ErrorKind, FormBodyParser, FormDecoder, FormRequest, Outcome, Params, ParsingConfig,
    UrlEncodedDecoder, Value,
};

const FORM: &str = "application/x-www-form-urlencoded";
const BODY_MD5: &str = "7QTJHPb2q1oBoxwClcXaNA==";

fn headers(content_type: &'static str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    headers
}

fn form_request() -> FormRequest {
    FormRequest::new(headers(FORM))
}

fn byte_stream(data: &str) -> impl stream::Stream<Item = urlform::Result<Bytes>> {
    let bytes = data.as_bytes().to_vec();
    stream::iter(
        bytes
            .into_iter()
            .map(|b| urlform::Result::Ok(Bytes::copy_from_slice(&[b]))),
    )
}

fn params(pairs: &[(&str, &str)]) -> Params {
    pairs.iter().map(|(k, v)| (*k, *v)).collect()
}

#[tokio::test]
async fn test_form_basic() {
    let parser = FormBodyParser::new(ParsingConfig::default());
    let mut req = form_request();

    let outcome = parser.parse(&mut req, byte_stream("a=1&b=2")).await;

    assert_eq!(outcome, Ok(Outcome::Continue));
    assert_eq!(req.params, params(&[("a", "1"), ("b", "2")]));
}

#[tokio::test]
async fn test_form_existing_param_wins() {
    let parser = FormBodyParser::new(ParsingConfig::default());
    let mut req = FormRequest::with_params(headers(FORM), params(&[("a", "x")]));

    let outcome = parser.parse(&mut req, byte_stream("a=1&b=2")).await;

    assert_eq!(outcome, Ok(Outcome::Continue));
    assert_eq!(req.params, params(&[("a", "x"), ("b", "2")]));
    assert_eq!(req.ignored_params, vec!["a".to_owned()]);
}

#[tokio::test]
async fn test_form_override_params() {
    let parser = FormBodyParser::new(ParsingConfig::new().override_params(true));
    let mut req = FormRequest::with_params(headers(FORM), params(&[("a", "x")]));

    let outcome = parser.parse(&mut req, byte_stream("a=1&b=2")).await;

    assert_eq!(outcome, Ok(Outcome::Continue));
    assert_eq!(req.params, params(&[("a", "1"), ("b", "2")]));
    assert!(req.ignored_params.is_empty());
}

#[tokio::test]
async fn test_form_keeps_stray_percent() {
    let parser = FormBodyParser::new(ParsingConfig::default());
    let mut req = form_request();

    let outcome = parser.parse(&mut req, byte_stream("discount=100%&q=50%+off")).await;

    assert_eq!(outcome, Ok(Outcome::Continue));
    assert_eq!(req.params, params(&[("discount", "100%"), ("q", "50% off")]));
}

#[tokio::test]
async fn test_form_without_map_params() {
    let parser = FormBodyParser::new(ParsingConfig::new().map_params(false));
    let mut req = FormRequest::with_params(headers(FORM), params(&[("a", "x")]));

    let outcome = parser.parse(&mut req, byte_stream("a=1&a=2&b=2")).await;

    assert_eq!(outcome, Ok(Outcome::Continue));
    assert_eq!(req.params, params(&[("a", "x")]));
    assert_eq!(req.raw_body.as_deref(), Some("a=1&a=2&b=2"));

    let body = req.body.expect("decoded body");
    assert_eq!(body.get("a"), Some(&Value::List(vec!["1".to_owned(), "2".to_owned()])));
    assert_eq!(body.get("b").unwrap(), "2");
}

#[tokio::test]
async fn test_skip_other_content_type() {
    let parser = FormBodyParser::new(ParsingConfig::default());
    let mut req = FormRequest::with_params(headers("application/json"), params(&[("a", "x")]));

    let untouched = stream::poll_fn(|_| -> Poll<Option<urlform::Result<Bytes>>> {
        panic!("the body must not be read");
    });

    assert_eq!(parser.parse(&mut req, untouched).await, Ok(Outcome::Skip));
    assert_eq!(req.params, params(&[("a", "x")]));
    assert!(req.body.is_none());
}

#[tokio::test]
async fn test_skip_empty_content_length() {
    let parser = FormBodyParser::new(ParsingConfig::default());
    let mut h = headers(FORM);
    h.insert(CONTENT_LENGTH, HeaderValue::from_static("0"));
    let mut req = FormRequest::new(h);

    assert_eq!(parser.parse(&mut req, byte_stream("a=1")).await, Ok(Outcome::Skip));
    assert!(req.params.is_empty());
}

#[tokio::test]
async fn test_chunked_with_zero_length_is_parsed() {
    let parser = FormBodyParser::new(ParsingConfig::default());
    let mut h = headers(FORM);
    h.insert(CONTENT_LENGTH, HeaderValue::from_static("0"));
    h.insert(TRANSFER_ENCODING, HeaderValue::from_static("chunked"));
    let mut req = FormRequest::new(h);

    assert_eq!(parser.parse(&mut req, byte_stream("a=1")).await, Ok(Outcome::Continue));
    assert_eq!(req.params.get("a").unwrap(), "1");
}

#[tokio::test]
async fn test_empty_body_continues() {
    let parser = FormBodyParser::new(ParsingConfig::default());
    let mut h = headers(FORM);
    h.insert("content-md5", HeaderValue::from_static("bogus"));
    let mut req = FormRequest::with_params(h, params(&[("a", "x")]));

    assert_eq!(parser.parse(&mut req, byte_stream("")).await, Ok(Outcome::Continue));
    assert_eq!(req.params, params(&[("a", "x")]));
}

#[tokio::test]
async fn test_content_md5_match() {
    let parser = FormBodyParser::new(ParsingConfig::default());
    let mut h = headers(FORM);
    h.insert("content-md5", HeaderValue::from_static(BODY_MD5));
    let mut req = FormRequest::new(h);

    assert_eq!(parser.parse(&mut req, byte_stream("a=1&b=2")).await, Ok(Outcome::Continue));
    assert_eq!(req.params, params(&[("a", "1"), ("b", "2")]));
}

#[tokio::test]
async fn test_empty_content_md5_is_ignored() {
    let parser = FormBodyParser::new(ParsingConfig::default());
    let mut h = headers(FORM);
    h.insert("content-md5", HeaderValue::from_static(""));
    let mut req = FormRequest::new(h);

    assert_eq!(parser.parse(&mut req, byte_stream("a=1")).await, Ok(Outcome::Continue));
    assert_eq!(req.params, params(&[("a", "1")]));
}

#[tokio::test]
async fn test_content_md5_mismatch() {
    let parser = FormBodyParser::new(ParsingConfig::default());
    let mut h = headers(FORM);
    h.insert("content-md5", HeaderValue::from_static("AAAAAAAAAAAAAAAAAAAAAA=="));
    let mut req = FormRequest::new(h);

    let err = parser.parse(&mut req, byte_stream("a=1&b=2")).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::BadDigest);
    let message = err.to_string();
    assert!(message.contains("AAAAAAAAAAAAAAAAAAAAAA=="));
    assert!(message.contains(BODY_MD5));
    assert!(req.params.is_empty());
}

#[tokio::test]
async fn test_body_too_large() {
    let parser = FormBodyParser::new(ParsingConfig::new().max_body_size(10));
    let mut req = form_request();

    let outcome = parser.parse(&mut req, byte_stream("a=1&b=2&c=")).await;
    assert_eq!(outcome, Ok(Outcome::Continue));

    let mut req = form_request();
    let err = parser.parse(&mut req, byte_stream("a=1&b=2&c=3")).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RequestEntityTooLarge);
    assert!(err.to_string().contains("10"));
    assert_eq!(err, Error::RequestEntityTooLarge { limit: 10, received: 11 });
    assert!(req.params.is_empty());
}

#[tokio::test]
async fn test_body_too_large_counts_every_byte() {
    let parser = FormBodyParser::new(ParsingConfig::new().max_body_size(4));
    let mut h = headers(FORM);
    h.insert("content-md5", HeaderValue::from_static(BODY_MD5));
    let mut req = FormRequest::new(h);

    let chunks = vec!["a=1", "&b=", "2"]
        .into_iter()
        .map(|part| urlform::Result::Ok(Bytes::from(part)));

    match parser.parse(&mut req, stream::iter(chunks)).await {
        Err(Error::RequestEntityTooLarge { limit, received }) => {
            assert_eq!(limit, 4);
            assert_eq!(received, 7);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn test_invalid_content_leaves_params() {
    let flat = |body: &str| -> Result<Params, BoxError> {
        let decoded = UrlEncodedDecoder::new().decode(body)?;
        match decoded.iter().find(|(key, _)| key.contains('[')) {
            Some((key, _)) => Err(format!("nested key '{}' is not supported", key).into()),
            None => Ok(decoded),
        }
    };
    let parser = FormBodyParser::with_decoder(ParsingConfig::default(), flat);
    let mut req = FormRequest::with_params(headers(FORM), params(&[("z", "0")]));

    let err = parser.parse(&mut req, byte_stream("a=1&b[c]=2")).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidContent);
    assert!(err.to_string().contains("b[c]"));
    assert_eq!(req.params, params(&[("z", "0")]));
    assert!(req.ignored_params.is_empty());
}

#[tokio::test]
async fn test_custom_decoder_error() {
    let decoder = |_: &str| -> Result<Params, BoxError> { Err("unsupported nesting".into()) };
    let parser = FormBodyParser::with_decoder(ParsingConfig::default(), decoder);
    let mut req = form_request();

    let err = parser.parse(&mut req, byte_stream("a[b]=1")).await.unwrap_err();

    assert_eq!(err, Error::InvalidContent("unsupported nesting".to_owned()));
}

#[tokio::test]
async fn test_stream_error() {
    let parser = FormBodyParser::new(ParsingConfig::default());
    let mut req = form_request();

    let chunks: Vec<Result<Bytes, std::io::Error>> = vec![
        Ok(Bytes::from("a=1")),
        Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "connection reset")),
        Ok(Bytes::from("&b=2")),
    ];

    let mut fut = parser.parse(&mut req, stream::iter(chunks));
    let err = (&mut fut).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::TransportError);
    assert!(err.to_string().contains("connection reset"));
    assert!(fut.is_terminated());
    assert_eq!(poll!(&mut fut), Poll::Pending);

    drop(fut);
    assert!(req.params.is_empty());
}

#[tokio::test]
async fn test_resolves_once() {
    let parser = FormBodyParser::new(ParsingConfig::default());
    let mut req = form_request();

    let mut fut = parser.parse(&mut req, byte_stream("a=1"));
    assert!(!fut.is_terminated());
    assert_eq!((&mut fut).await, Ok(Outcome::Continue));
    assert!(fut.is_terminated());
    assert_eq!(poll!(&mut fut), Poll::Pending);
}

#[tokio::test]
async fn test_utf8_split_across_chunks() {
    let parser = FormBodyParser::new(ParsingConfig::default());
    let mut req = form_request();

    assert_eq!(
        parser.parse(&mut req, byte_stream("greeting=你好&name=%E2%9C%93")).await,
        Ok(Outcome::Continue)
    );
    assert_eq!(req.params.get("greeting").unwrap(), "你好");
    assert_eq!(req.params.get("name").unwrap(), "✓");
}

#[tokio::test]
async fn test_replay_is_identical() {
    let parser = FormBodyParser::new(ParsingConfig::new().max_body_size(64));
    let data = "a=1&b=2&b=3&c";

    let mut first = FormRequest::with_params(headers(FORM), params(&[("a", "x")]));
    let mut second = FormRequest::with_params(headers(FORM), params(&[("a", "x")]));

    let first_outcome = parser.parse(&mut first, byte_stream(data)).await;
    let second_outcome = parser.parse(&mut second, byte_stream(data)).await;

    assert_eq!(first_outcome, second_outcome);
    assert_eq!(first.params, second.params);
}

#[cfg(feature = "tokio-io")]
#[tokio::test]
async fn test_parse_reader() {
    let parser = FormBodyParser::new(ParsingConfig::default());
    let mut req = form_request();

    let reader = "a=1&b=2".as_bytes();
    assert_eq!(parser.parse_reader(&mut req, reader).await, Ok(Outcome::Continue));
    assert_eq!(req.params, params(&[("a", "1"), ("b", "2")]));
}
