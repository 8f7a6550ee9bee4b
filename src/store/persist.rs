// Store persistence module
// The on-disk layout is a single JSON object mapping string-encoded ids to
// values: {"1": "Alice", "2": "Bob"}. The whole file is rewritten on every
// successful insert; there is no append log.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::error::StoreError;
use super::Record;

/// Load all records from a store file.
///
/// Records come back ordered by ascending id: a JSON object carries no
/// reliable key order, so numeric order is the stable choice.
/// Missing file and unparseable content are distinct errors; both are
/// fatal at startup in persistent mode.
pub fn load_file(path: &Path) -> Result<Vec<Record>, StoreError> {
    if !path.exists() {
        return Err(StoreError::Missing {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path).map_err(|e| StoreError::Corrupt {
        path: path.to_path_buf(),
        reason: format!("unreadable: {e}"),
    })?;

    // serde_json accepts integer map keys serialized as JSON strings,
    // so a non-integer key surfaces here as a parse error.
    let map: BTreeMap<i64, String> =
        serde_json::from_str(&content).map_err(|e| StoreError::Corrupt {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    Ok(map
        .into_iter()
        .map(|(id, data)| Record { id, data })
        .collect())
}

/// Rewrite the store file with the full record set.
pub fn write_file(path: &Path, records: &[Record]) -> Result<(), StoreError> {
    let map: BTreeMap<i64, &str> = records
        .iter()
        .map(|r| (r.id, r.data.as_str()))
        .collect();

    let content = serde_json::to_string_pretty(&map).map_err(|e| StoreError::Persistence {
        path: path.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
    })?;

    fs::write(path, content).map_err(|e| StoreError::Persistence {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("lookupd-persist-{name}-{}", std::process::id()))
    }

    #[test]
    fn test_round_trip() {
        let path = temp_path("roundtrip");
        let records = vec![
            Record {
                id: 1,
                data: "Alice".to_string(),
            },
            Record {
                id: 2,
                data: "Bob".to_string(),
            },
        ];

        write_file(&path, &records).unwrap();
        let loaded = load_file(&path).unwrap();
        assert_eq!(loaded, records);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_orders_by_id() {
        let path = temp_path("order");
        // Keys deliberately out of numeric order; "10" sorts before "2" lexically
        std::fs::write(&path, r#"{"10": "ten", "2": "two"}"#).unwrap();

        let loaded = load_file(&path).unwrap();
        assert_eq!(loaded[0].id, 2);
        assert_eq!(loaded[1].id, 10);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_missing_file() {
        let path = temp_path("missing-never-created");
        let err = load_file(&path).unwrap_err();
        assert!(matches!(err, StoreError::Missing { .. }));
    }

    #[test]
    fn test_load_malformed_json() {
        let path = temp_path("malformed");
        std::fs::write(&path, "{not json at all").unwrap();

        let err = load_file(&path).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_non_integer_key() {
        let path = temp_path("badkey");
        std::fs::write(&path, r#"{"abc": "value"}"#).unwrap();

        let err = load_file(&path).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_empty_store() {
        let path = temp_path("empty");
        write_file(&path, &[]).unwrap();
        assert_eq!(load_file(&path).unwrap(), vec![]);
        std::fs::remove_file(&path).unwrap();
    }
}
