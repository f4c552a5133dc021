#![no_main]

use std::convert::Infallible;

use futures_util::stream::iter;
use http::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use libfuzzer_sys::fuzz_target;
use tokio::runtime;
use urlform::bytes::Bytes;
use urlform::{FormBodyParser, FormRequest, ParsingConfig};

fuzz_target!(|data: &[u8]| {
    // The first byte decides where the body gets split into two chunks.
    let (split, body) = match data.split_first() {
        Some((split, body)) => (*split as usize % (body.len() + 1), body),
        None => return,
    };
    let chunks = vec![
        Result::<Bytes, Infallible>::Ok(Bytes::copy_from_slice(&body[..split])),
        Ok(Bytes::copy_from_slice(&body[split..])),
    ];

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/x-www-form-urlencoded"));
    let mut req = FormRequest::new(headers);

    let parser = FormBodyParser::new(ParsingConfig::new().max_body_size(4096));

    let rt = runtime::Builder::new_current_thread().build().expect("runtime");
    rt.block_on(async {
        let _ = parser.parse(&mut req, iter(chunks)).await;
    })
});
