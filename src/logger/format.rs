//! Access log format module
//!
//! Supports three log formats:
//! - `plain` (timestamp | IP | request | status, the service's native format)
//! - `common` (Common Log Format - CLF)
//! - `json` (JSON structured logging)

use chrono::Local;

/// Access log entry containing request/response information
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    /// Client IP address
    pub remote_addr: String,
    /// Request timestamp
    pub time: chrono::DateTime<Local>,
    /// HTTP method (GET, POST)
    pub method: String,
    /// Request URI path
    pub path: String,
    /// Query string (without leading ?)
    pub query: Option<String>,
    /// Response status code
    pub status: u16,
    /// Response body size in bytes
    pub body_bytes: usize,
}

impl AccessLogEntry {
    /// Create a new access log entry with current timestamp
    pub fn new(remote_addr: String, method: String, path: String) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            method,
            path,
            query: None,
            status: 200,
            body_bytes: 0,
        }
    }

    /// Format the log entry according to the configured format.
    /// Unknown format names fall back to `plain`.
    pub fn format(&self, format: &str) -> String {
        match format {
            "common" => self.format_common(),
            "json" => self.format_json(),
            _ => self.format_plain(),
        }
    }

    /// Native format:
    /// `2026-01-01 12:00:00 | IP: 10.0.0.1 | GET /api/data?id=1 | 200 | 57B`
    fn format_plain(&self) -> String {
        format!(
            "{} | IP: {} | {} {}{} | {} | {}B",
            self.time.format("%Y-%m-%d %H:%M:%S"),
            self.remote_addr,
            self.method,
            self.path,
            self.query
                .as_ref()
                .map(|q| format!("?{q}"))
                .unwrap_or_default(),
            self.status,
            self.body_bytes,
        )
    }

    /// Common Log Format (CLF)
    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`
    fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{} {}{} HTTP/1.1\" {} {}",
            self.remote_addr,
            self.time.format("%d/%b/%Y:%H:%M:%S %z"),
            self.method,
            self.path,
            self.query
                .as_ref()
                .map(|q| format!("?{q}"))
                .unwrap_or_default(),
            self.status,
            self.body_bytes,
        )
    }

    /// JSON structured log format
    fn format_json(&self) -> String {
        serde_json::json!({
            "time": self.time.to_rfc3339(),
            "remote_addr": &self.remote_addr,
            "method": &self.method,
            "path": &self.path,
            "query": &self.query,
            "status": self.status,
            "body_bytes": self.body_bytes,
        })
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry() -> AccessLogEntry {
        let mut entry = AccessLogEntry::new(
            "10.0.0.1".to_string(),
            "GET".to_string(),
            "/api/data".to_string(),
        );
        entry.query = Some("id=1".to_string());
        entry.status = 200;
        entry.body_bytes = 42;
        entry
    }

    #[test]
    fn test_format_plain() {
        let line = sample_entry().format("plain");
        assert!(line.contains("IP: 10.0.0.1"));
        assert!(line.contains("GET /api/data?id=1"));
        assert!(line.contains("| 200 |"));
        assert!(line.ends_with("42B"));
    }

    #[test]
    fn test_format_common() {
        let line = sample_entry().format("common");
        assert!(line.starts_with("10.0.0.1 - - ["));
        assert!(line.contains("\"GET /api/data?id=1 HTTP/1.1\""));
        assert!(line.ends_with("200 42"));
    }

    #[test]
    fn test_format_json() {
        let line = sample_entry().format("json");
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["remote_addr"], "10.0.0.1");
        assert_eq!(parsed["status"], 200);
        assert_eq!(parsed["query"], "id=1");
    }

    #[test]
    fn test_unknown_format_falls_back_to_plain() {
        let entry = sample_entry();
        assert_eq!(entry.format("nonsense"), entry.format("plain"));
    }

    #[test]
    fn test_no_query() {
        let mut entry = sample_entry();
        entry.query = None;
        let line = entry.format("plain");
        assert!(line.contains("GET /api/data |"));
    }
}
