use std::{convert::Infallible, net::SocketAddr, sync::Arc};

use bytes::Bytes;
use futures_util::StreamExt;
use http_body_util::{BodyStream, Full};
use hyper::{body::Incoming, Request, Response, StatusCode};
// Import the urlform types.
use urlform::{FormBodyParser, FormRequest, Outcome, ParsingConfig};

// A handler for incoming requests.
async fn handle(parser: Arc<FormBodyParser>, req: Request<Incoming>) -> Result<Response<Full<Bytes>>, Infallible> {
    let (parts, body) = req.into_parts();

    // Params collected by earlier stages, e.g. the router, would go here.
    let mut form_req = FormRequest::new(parts.headers);

    // Convert the body into a stream of data frames.
    let body_stream =
        BodyStream::new(body).filter_map(|result| async move { result.map(|frame| frame.into_data().ok()).transpose() });

    match parser.parse(&mut form_req, body_stream).await {
        Ok(Outcome::Skip) => Ok(respond(StatusCode::UNSUPPORTED_MEDIA_TYPE, "expected a form body".to_owned())),
        Ok(Outcome::Continue) => {
            let mut lines = form_req
                .params
                .iter()
                .map(|(name, value)| format!("{} = {:?}", name, value))
                .collect::<Vec<_>>();
            lines.sort();

            Ok(respond(StatusCode::OK, lines.join("\n")))
        }
        Err(err) => Ok(respond(err.status_code(), err.to_string())),
    }
}

fn respond(status: StatusCode, body: String) -> Response<Full<Bytes>> {
    let mut res = Response::new(Full::from(body));
    *res.status_mut() = status;
    res
}

#[tokio::main]
async fn main() {
    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    println!("Server running at: {}", addr);

    let parser = Arc::new(FormBodyParser::new(ParsingConfig::new().max_body_size(64 * 1024)));

    loop {
        let (socket, _remote_addr) = listener.accept().await.unwrap();
        let socket = hyper_util::rt::TokioIo::new(socket);
        let parser = Arc::clone(&parser);

        tokio::spawn(async move {
            let service = hyper::service::service_fn(move |req| handle(Arc::clone(&parser), req));

            if let Err(e) = hyper::server::conn::http1::Builder::new()
                .serve_connection(socket, service)
                .await
            {
                eprintln!("server error: {}", e);
            }
        });
    }
}
