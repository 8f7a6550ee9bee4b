// API module entry
// Routes requests to endpoint handlers, reading POST bodies and applying
// the per-route input adapter before any handler runs.

mod extract;
mod handlers;
mod response;
mod types;

use http_body_util::{BodyExt, Full};
use hyper::body::{Body as _, Bytes};
use hyper::header::HeaderValue;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use crate::config::AppState;
use crate::logger::{self, AccessLogEntry};

/// Main entry point for HTTP request handling.
///
/// Generic over the request body so tests can drive the route table with
/// `Full<Bytes>` requests; the server always passes `hyper::body::Incoming`.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: hyper::body::Body,
    B::Error: std::fmt::Display,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(ToString::to_string);

    let mut resp = dispatch(req, &state, &method, &path, query.as_deref()).await;

    if state.config.http.enable_cors {
        resp.headers_mut().insert(
            "Access-Control-Allow-Origin",
            HeaderValue::from_static("*"),
        );
    }
    if let Ok(name) = HeaderValue::from_str(&state.config.http.server_name) {
        resp.headers_mut().insert("Server", name);
    }

    if state.cached_access_log.load(Ordering::Relaxed) {
        let mut entry = AccessLogEntry::new(
            peer_addr.ip().to_string(),
            method.to_string(),
            path,
        );
        entry.query = query;
        entry.status = resp.status().as_u16();
        entry.body_bytes = resp
            .body()
            .size_hint()
            .exact()
            .unwrap_or(0)
            .try_into()
            .unwrap_or(usize::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(resp)
}

async fn dispatch<B>(
    req: Request<B>,
    state: &AppState,
    method: &Method,
    path: &str,
    query: Option<&str>,
) -> Response<Full<Bytes>>
where
    B: hyper::body::Body,
    B::Error: std::fmt::Display,
{
    if *method == Method::OPTIONS {
        return response::options_response(state.config.http.enable_cors);
    }

    if let Some(resp) = check_body_size(&req, state.config.http.max_body_size) {
        return resp;
    }

    // POST bodies are read here, once, so handlers only see bytes
    let body = if *method == Method::POST {
        match req.collect().await {
            Ok(collected) => Some(collected.to_bytes()),
            Err(e) => {
                logger::log_warning(&format!("Failed to read request body: {e}"));
                return response::bad_request("failed to read request body");
            }
        }
    } else {
        None
    };
    let body = body.as_deref().unwrap_or(&[]);

    match (method, path) {
        (&Method::GET, "/") => handlers::handle_root(),
        (&Method::GET, "/health") => handlers::handle_health(),
        (&Method::GET, "/api/schema") => handlers::handle_schema(state).await,
        (&Method::GET, "/api/data") => handlers::handle_list(state).await,
        (&Method::POST, "/api/data") => handlers::handle_insert(state, body).await,
        (&Method::GET, "/api/get-data") => {
            handlers::handle_lookup(state, extract::id_from_query(query)).await
        }
        (&Method::POST, "/api/get-data" | "/api/query") => {
            handlers::handle_lookup(state, extract::id_from_body(body)).await
        }
        // Known paths reached with the wrong method
        (_, "/api/data" | "/api/get-data") => response::method_not_allowed("GET, POST, OPTIONS"),
        (_, "/api/query") => response::method_not_allowed("POST, OPTIONS"),
        (_, "/" | "/health" | "/api/schema") => response::method_not_allowed("GET, OPTIONS"),
        (&Method::GET, p) => match p.strip_prefix("/api/data/") {
            Some(tail) => handlers::handle_lookup(state, extract::id_from_path(tail)).await,
            None => handlers::handle_unknown(),
        },
        _ => {
            logger::log_warning(&format!("Unhandled request: {method} {path}"));
            handlers::handle_unknown()
        }
    }
}

/// Validate Content-Length against the configured limit before reading
fn check_body_size<B>(
    req: &Request<B>,
    max_body_size: u64,
) -> Option<Response<Full<Bytes>>> {
    let declared = req
        .headers()
        .get("content-length")?
        .to_str()
        .ok()?
        .parse::<u64>()
        .ok()?;

    if declared > max_body_size {
        logger::log_warning(&format!(
            "Request body too large: {declared} bytes (max: {max_body_size})"
        ));
        return Some(response::payload_too_large(max_body_size));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::store::Store;

    fn test_state() -> Arc<AppState> {
        let config = Config::load_from("no-such-config-file").unwrap();
        Arc::new(AppState::new(config, Store::seeded()))
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:4242".parse().unwrap()
    }

    fn request(method: Method, uri: &str, body: &[u8]) -> Request<Full<Bytes>> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Full::new(Bytes::copy_from_slice(body)))
            .unwrap()
    }

    async fn body_json(resp: Response<Full<Bytes>>) -> serde_json::Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_dispatch_lookup_by_path() {
        let resp = handle_request(request(Method::GET, "/api/data/1", b""), test_state(), peer())
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        // CORS is on by default, so every response carries the origin header
        assert_eq!(resp.headers()["Access-Control-Allow-Origin"], "*");

        let json = body_json(resp).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], "Alice");
    }

    #[tokio::test]
    async fn test_dispatch_lookup_by_query() {
        let resp = handle_request(
            request(Method::GET, "/api/get-data?id=2", b""),
            test_state(),
            peer(),
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(body_json(resp).await["data"], "Bob");
    }

    #[tokio::test]
    async fn test_dispatch_lookup_by_body() {
        let resp = handle_request(
            request(Method::POST, "/api/query", br#"{"id": 3}"#),
            test_state(),
            peer(),
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(body_json(resp).await["data"], "Charlie");
    }

    #[tokio::test]
    async fn test_dispatch_oversized_body_rejected() {
        let req = Request::builder()
            .method(Method::POST)
            .uri("/api/data")
            .header("content-length", "10000000")
            .body(Full::new(Bytes::new()))
            .unwrap();

        let resp = handle_request(req, test_state(), peer()).await.unwrap();
        assert_eq!(resp.status(), 413);
        assert_eq!(body_json(resp).await["error"], "payload_too_large");
    }

    #[tokio::test]
    async fn test_dispatch_wrong_method_is_405() {
        let resp = handle_request(request(Method::DELETE, "/api/data", b""), test_state(), peer())
            .await
            .unwrap();
        assert_eq!(resp.status(), 405);
        assert_eq!(resp.headers()["Allow"], "GET, POST, OPTIONS");
    }

    #[tokio::test]
    async fn test_dispatch_unknown_path_is_json_404() {
        let resp = handle_request(request(Method::GET, "/nope", b""), test_state(), peer())
            .await
            .unwrap();
        assert_eq!(resp.status(), 404);

        let json = body_json(resp).await;
        assert_eq!(json["error"], "not_found");
        assert!(json["available_endpoints"].is_array());
    }

    #[tokio::test]
    async fn test_dispatch_options_preflight() {
        let resp = handle_request(request(Method::OPTIONS, "/api/data", b""), test_state(), peer())
            .await
            .unwrap();
        assert_eq!(resp.status(), 204);
        assert_eq!(
            resp.headers()["Access-Control-Allow-Methods"],
            "GET, POST, OPTIONS"
        );
    }
}
