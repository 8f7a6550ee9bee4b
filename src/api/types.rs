// API request/response types
// Every data endpoint answers with a {success, ...} envelope.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::Record;

/// Lookup request body: `{"id": 1}`
#[derive(Debug, Deserialize)]
pub struct LookupRequest {
    pub id: i64,
}

/// Insert request body: `{"id": 3, "data": "Carol"}`
#[derive(Debug, Deserialize)]
pub struct InsertRequest {
    pub id: i64,
    pub data: String,
}

/// Successful single-record lookup: `{success, id, data}`
#[derive(Debug, Serialize)]
pub struct DataResponse {
    pub success: bool,
    pub id: i64,
    pub data: String,
}

/// Successful insert: `{success, id, data, message}`
#[derive(Debug, Serialize)]
pub struct InsertResponse {
    pub success: bool,
    pub id: i64,
    pub data: String,
    pub message: String,
}

/// Full listing: `{success, data: [{id, data}...], count}`
#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub success: bool,
    pub data: Vec<Record>,
    pub count: usize,
}

/// Request-side validation failures; all render as HTTP 400
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("missing required parameter 'id'")]
    MissingId,

    #[error("id must be an integer, got '{0}'")]
    InvalidId(String),

    #[error("invalid request body: {0}")]
    InvalidBody(String),
}
