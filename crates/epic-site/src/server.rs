use std::convert::Infallible;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::header::{CONTENT_TYPE, HeaderValue};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};

use crate::route::Route;
use crate::site::Site;

/// Default port for `epic serve`.
pub const DEFAULT_PORT: u16 = 4000;

/// The server could not start or stopped accepting connections.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listening socket could not be bound.
    #[error("failed to listen on {addr}: {source}")]
    Bind {
        /// Address the server tried to bind.
        addr: SocketAddr,
        /// Why binding failed.
        #[source]
        source: io::Error,
    },
    /// The listener failed while waiting for a connection.
    #[error("failed to accept connection: {0}")]
    Accept(#[source] io::Error),
}

/// Bind the listening socket on every interface.
///
/// # Errors
///
/// [`ServerError::Bind`] if the port is taken or not permitted.
pub async fn bind(port: u16) -> Result<TcpListener, ServerError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })
}

/// Accept connections until the listener fails, one task per connection.
///
/// # Errors
///
/// [`ServerError::Accept`] if the listener stops working. Errors on single
/// connections are logged and do not stop the server.
pub async fn serve(site: Arc<Site>, listener: TcpListener) -> Result<(), ServerError> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, root = %site.config().root().display(), "listening");
    }

    loop {
        let (stream, remote_addr) = listener.accept().await.map_err(ServerError::Accept)?;
        let site = Arc::clone(&site);

        drop(tokio::task::spawn(async move {
            if let Err(err) = handle_connection(stream, site).await {
                tracing::warn!(%remote_addr, "error serving connection: {err}");
            }
        }));
    }
}

async fn handle_connection(stream: TcpStream, site: Arc<Site>) -> Result<(), hyper::Error> {
    let io = TokioIo::new(stream);
    let service = service_fn(move |request: Request<Incoming>| {
        let site = Arc::clone(&site);
        async move { Ok::<_, Infallible>(handle_request(site, request).await) }
    });

    http1::Builder::new().serve_connection(io, service).await
}

async fn handle_request(site: Arc<Site>, request: Request<Incoming>) -> Response<Full<Bytes>> {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    // Page rendering reads files and runs the tokenizer, both blocking.
    let response = {
        let path = path.clone();
        tokio::task::spawn_blocking(move || respond(&site, &path)).await
    };
    let response = response.unwrap_or_else(|err| {
        tracing::error!(path, "request handler panicked: {err}");
        plain_text(
            StatusCode::INTERNAL_SERVER_ERROR,
            "500 Internal Server Error".to_string(),
        )
    });

    tracing::info!(
        %method,
        path,
        status = response.status().as_u16(),
        "request"
    );
    response
}

/// Build the response for a request path.
///
/// - a page renders to 200 `text/html`; if rendering fails the raw error
///   text is sent back with a 500
/// - otherwise a static file is sent with a type guessed from its extension
/// - otherwise 404 `404 page not found`
#[must_use]
pub fn respond(site: &Site, request_path: &str) -> Response<Full<Bytes>> {
    match site.resolve(request_path) {
        Route::Page(page) => match site.render_page(&page) {
            Ok(html) => with_content_type(
                StatusCode::OK,
                "text/html; charset=utf-8",
                Bytes::from(html),
            ),
            Err(err) => {
                tracing::error!(page = %page.display(), "{err}");
                plain_text(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        },
        Route::Static(cleaned) => match site.open_static(&cleaned) {
            Ok(Some(file)) => {
                let content_type = file.content_type().to_string();
                with_content_type(
                    StatusCode::OK,
                    &content_type,
                    Bytes::from(file.into_contents()),
                )
            }
            Ok(None) => plain_text(StatusCode::NOT_FOUND, "404 page not found".to_string()),
            Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
                plain_text(StatusCode::FORBIDDEN, "403 Forbidden".to_string())
            }
            Err(err) => {
                tracing::error!(path = cleaned, "{err}");
                plain_text(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "500 Internal Server Error".to_string(),
                )
            }
        },
    }
}

fn plain_text(status: StatusCode, body: String) -> Response<Full<Bytes>> {
    with_content_type(status, "text/plain; charset=utf-8", Bytes::from(body))
}

fn with_content_type(status: StatusCode, content_type: &str, body: Bytes) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(body));
    *response.status_mut() = status;
    let value = HeaderValue::from_str(content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
    let _ = response.headers_mut().insert(CONTENT_TYPE, value);
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_response() {
        let response = plain_text(StatusCode::NOT_FOUND, "404 page not found".to_string());
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers()[CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
    }
}
