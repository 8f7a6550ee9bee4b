// Endpoint handlers
// Each handler takes already-adapted input (see extract.rs) plus the shared
// state, and returns a complete JSON response. Request parsing and routing
// live in mod.rs, so everything here is directly testable.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

use super::response::{
    bad_request, conflict, json_response, not_found_id, storage_failure,
};
use super::types::{ApiError, DataResponse, InsertResponse, ListResponse};
use super::{extract, response};
use crate::config::AppState;
use crate::logger;
use crate::store::StoreError;

/// GET / — liveness plus a pointer at the main endpoint
pub fn handle_root() -> Response<Full<Bytes>> {
    json_response(
        StatusCode::OK,
        &serde_json::json!({
            "status": "running",
            "message": "Server is ready",
            "endpoint": "/api/data/{id}",
        }),
    )
}

/// GET /health
pub fn handle_health() -> Response<Full<Bytes>> {
    json_response(StatusCode::OK, &serde_json::json!({ "status": "ok" }))
}

/// GET /api/schema — the accepted request shape plus the live id set
pub async fn handle_schema(state: &AppState) -> Response<Full<Bytes>> {
    let available_ids = state.store.ids().await;
    json_response(
        StatusCode::OK,
        &serde_json::json!({
            "endpoint": "/api/get-data",
            "method": "GET or POST",
            "request_format": {
                "id": "integer",
            },
            "response_format": {
                "success": "boolean",
                "id": "integer",
                "data": "string",
            },
            "available_ids": available_ids,
        }),
    )
}

/// GET /api/data — all records with a count; an empty store is not an error
pub async fn handle_list(state: &AppState) -> Response<Full<Bytes>> {
    let data = state.store.all().await;
    let count = data.len();
    json_response(
        StatusCode::OK,
        &ListResponse {
            success: true,
            data,
            count,
        },
    )
}

/// Single-record lookup, shared by all three id adapters
pub async fn handle_lookup(
    state: &AppState,
    id: Result<i64, ApiError>,
) -> Response<Full<Bytes>> {
    let id = match id {
        Ok(id) => id,
        Err(e) => return bad_request(&e.to_string()),
    };

    match state.store.get(id).await {
        Some(data) => json_response(
            StatusCode::OK,
            &DataResponse {
                success: true,
                id,
                data,
            },
        ),
        None => not_found_id(id),
    }
}

/// POST /api/data — insert a new record from a JSON body
pub async fn handle_insert(state: &AppState, body: &[u8]) -> Response<Full<Bytes>> {
    let (id, data) = match extract::record_from_body(body) {
        Ok(parsed) => parsed,
        Err(e) => return bad_request(&e.to_string()),
    };

    match state.store.insert(id, data.clone()).await {
        Ok(()) => json_response(
            StatusCode::OK,
            &InsertResponse {
                success: true,
                id,
                data,
                message: "Data added successfully".to_string(),
            },
        ),
        Err(StoreError::AlreadyExists(id)) => conflict(id),
        Err(e) => {
            logger::log_error(&format!("Insert flush failed: {e}"));
            storage_failure(&e.to_string())
        }
    }
}

/// Fallback for unknown paths
pub fn handle_unknown() -> Response<Full<Bytes>> {
    response::not_found_route()
}
