// Request input adapters
// The id reaches the service three ways: query string, path segment, or JSON
// body. Each adapter validates its own shape and produces the same i64, so
// handlers never see a raw, uncoerced id.

use super::types::{ApiError, InsertRequest, LookupRequest};

/// Parse `id=` out of a raw query string (`id=1&other=x`).
pub fn id_from_query(query: Option<&str>) -> Result<i64, ApiError> {
    let query = query.ok_or(ApiError::MissingId)?;

    let raw = query
        .split('&')
        .find_map(|pair| pair.strip_prefix("id="))
        .ok_or(ApiError::MissingId)?;

    parse_id(raw)
}

/// Parse the trailing segment of `/api/data/{id}`.
pub fn id_from_path(tail: &str) -> Result<i64, ApiError> {
    if tail.is_empty() || tail.contains('/') {
        return Err(ApiError::InvalidId(tail.to_string()));
    }
    parse_id(tail)
}

/// Deserialize `{"id": <integer>}` from a request body.
pub fn id_from_body(body: &[u8]) -> Result<i64, ApiError> {
    let req: LookupRequest =
        serde_json::from_slice(body).map_err(|e| ApiError::InvalidBody(e.to_string()))?;
    Ok(req.id)
}

/// Deserialize `{"id": <integer>, "data": <string>}` from a request body.
pub fn record_from_body(body: &[u8]) -> Result<(i64, String), ApiError> {
    let req: InsertRequest =
        serde_json::from_slice(body).map_err(|e| ApiError::InvalidBody(e.to_string()))?;
    Ok((req.id, req.data))
}

fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .map_err(|_| ApiError::InvalidId(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_from_query() {
        assert_eq!(id_from_query(Some("id=1")), Ok(1));
        assert_eq!(id_from_query(Some("other=x&id=42")), Ok(42));
        assert_eq!(id_from_query(Some("id=-7")), Ok(-7));
    }

    #[test]
    fn test_id_from_query_missing() {
        assert_eq!(id_from_query(None), Err(ApiError::MissingId));
        assert_eq!(id_from_query(Some("other=x")), Err(ApiError::MissingId));
        assert_eq!(id_from_query(Some("")), Err(ApiError::MissingId));
    }

    #[test]
    fn test_id_from_query_not_integer() {
        assert_eq!(
            id_from_query(Some("id=abc")),
            Err(ApiError::InvalidId("abc".to_string()))
        );
        assert_eq!(
            id_from_query(Some("id=1.5")),
            Err(ApiError::InvalidId("1.5".to_string()))
        );
    }

    #[test]
    fn test_id_from_path() {
        assert_eq!(id_from_path("42"), Ok(42));
        assert!(id_from_path("").is_err());
        assert!(id_from_path("42/extra").is_err());
        assert!(id_from_path("abc").is_err());
    }

    #[test]
    fn test_id_from_body() {
        assert_eq!(id_from_body(br#"{"id": 3}"#), Ok(3));
        // Extra fields are tolerated
        assert_eq!(id_from_body(br#"{"id": 3, "junk": true}"#), Ok(3));
    }

    #[test]
    fn test_id_from_body_rejects_bad_shapes() {
        assert!(id_from_body(b"not json").is_err());
        assert!(id_from_body(br"{}").is_err());
        // A string-typed id is a type error, not coerced
        assert!(id_from_body(br#"{"id": "3"}"#).is_err());
    }

    #[test]
    fn test_record_from_body() {
        let (id, data) = record_from_body(br#"{"id": 3, "data": "Carol"}"#).unwrap();
        assert_eq!(id, 3);
        assert_eq!(data, "Carol");

        assert!(record_from_body(br#"{"id": 3}"#).is_err());
        assert!(record_from_body(br#"{"data": "Carol"}"#).is_err());
    }
}
