// API response builders
// Success envelopes are serialized from typed structs; failures share one
// {success:false, error, message} shape with the error kind named in the body.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::logger;

/// Build a JSON response from any serializable body
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    let json = match serde_json::to_string(body) {
        Ok(j) => j,
        Err(e) => {
            logger::log_error(&format!("Failed to serialize response: {e}"));
            return build(
                StatusCode::INTERNAL_SERVER_ERROR,
                r#"{"success":false,"error":"internal","message":"serialization failed"}"#
                    .to_string(),
            );
        }
    };

    build(status, json)
}

/// Uniform failure envelope
fn error_response(status: StatusCode, kind: &str, message: &str) -> Response<Full<Bytes>> {
    let body = serde_json::json!({
        "success": false,
        "error": kind,
        "message": message,
    });
    build(status, body.to_string())
}

/// 400 Bad Request (malformed or missing id/body)
pub fn bad_request(message: &str) -> Response<Full<Bytes>> {
    error_response(StatusCode::BAD_REQUEST, "bad_request", message)
}

/// 404 Not Found for an absent id
pub fn not_found_id(id: i64) -> Response<Full<Bytes>> {
    error_response(
        StatusCode::NOT_FOUND,
        "not_found",
        &format!("data with id {id} not found"),
    )
}

/// Duplicate insert. The body names the conflict; the status stays 400 to
/// match the original wire contract.
pub fn conflict(id: i64) -> Response<Full<Bytes>> {
    error_response(
        StatusCode::BAD_REQUEST,
        "conflict",
        &format!("data with id {id} already exists"),
    )
}

/// 500 for a failed flush to disk; the insert was rolled back
pub fn storage_failure(message: &str) -> Response<Full<Bytes>> {
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "storage_failure", message)
}

/// 404 for an unknown route, listing what is available
pub fn not_found_route() -> Response<Full<Bytes>> {
    let body = serde_json::json!({
        "success": false,
        "error": "not_found",
        "message": "unknown endpoint",
        "available_endpoints": [
            "/health",
            "/api/schema",
            "/api/data",
            "/api/data/{id}",
            "/api/get-data",
            "/api/query",
        ],
    });
    build(StatusCode::NOT_FOUND, body.to_string())
}

/// 405 with an Allow header naming the accepted methods for the path
pub fn method_not_allowed(allow: &str) -> Response<Full<Bytes>> {
    let body = serde_json::json!({
        "success": false,
        "error": "method_not_allowed",
        "message": format!("allowed methods: {allow}"),
    });
    Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header("Content-Type", "application/json")
        .header("Allow", allow)
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap_or_else(|e| {
            logger::log_error(&format!("Failed to build 405 response: {e}"));
            Response::new(Full::new(Bytes::from("Method Not Allowed")))
        })
}

/// 413 for a declared body larger than the configured limit
pub fn payload_too_large(max: u64) -> Response<Full<Bytes>> {
    error_response(
        StatusCode::PAYLOAD_TOO_LARGE,
        "payload_too_large",
        &format!("request body exceeds {max} bytes"),
    )
}

/// 204 preflight response
pub fn options_response(enable_cors: bool) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Allow", "GET, POST, OPTIONS");

    if enable_cors {
        builder = builder
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", "GET, POST, OPTIONS")
            .header("Access-Control-Allow-Headers", "Content-Type")
            .header("Access-Control-Max-Age", "86400");
    }

    builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
        logger::log_error(&format!("Failed to build OPTIONS response: {e}"));
        Response::new(Full::new(Bytes::new()))
    })
}

fn build(status: StatusCode, json: String) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(json)))
        .unwrap_or_else(|e| {
            logger::log_error(&format!("Failed to build response: {e}"));
            Response::new(Full::new(Bytes::from("Error")))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(resp: Response<Full<Bytes>>) -> serde_json::Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_id_body() {
        let resp = not_found_id(99);
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let json = body_json(resp).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "not_found");
        assert_eq!(json["message"], "data with id 99 not found");
    }

    #[tokio::test]
    async fn test_conflict_is_400_naming_conflict() {
        let resp = conflict(1);
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert_eq!(json["error"], "conflict");
    }

    #[test]
    fn test_method_not_allowed_sets_allow_header() {
        let resp = method_not_allowed("GET, POST");
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers()["Allow"], "GET, POST");
    }

    #[test]
    fn test_options_with_cors() {
        let resp = options_response(true);
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_eq!(resp.headers()["Access-Control-Allow-Origin"], "*");
    }

    #[test]
    fn test_options_without_cors() {
        let resp = options_response(false);
        assert!(!resp.headers().contains_key("Access-Control-Allow-Origin"));
    }
}
