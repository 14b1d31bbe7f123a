/// API module for querying the task server
///
/// This module provides the two read-only queries the status report needs:
/// the task summary and the error breakdown. Both return the HTTP status and
/// reason next to the body; deciding what a non-200 answer means is left to
/// the caller.
use crate::error::{Result, StatusError};
use log::debug;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const USER_AGENT: &str = concat!("task-status/", env!("CARGO_PKG_VERSION"));

/// A parsed response body together with its HTTP status
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResponse {
    pub body: Value,
    pub status: u16,
    pub reason: String,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// The queries the status command issues
pub trait StatusClient {
    fn fetch_task_summary(&self, task: &str) -> Result<FetchResponse>;

    fn fetch_error_breakdown(&self, task: &str, short_format: bool) -> Result<FetchResponse>;
}

/// Build a REST endpoint URL: `<server>/<api>/<resource>`
pub fn endpoint_url(server: &str, api: &str, resource: &str) -> String {
    let server = server.trim_end_matches('/');
    let server = if server.contains("://") { server.to_string() } else { format!("https://{}", server) };
    format!("{}/{}/{}", server, api.trim_matches('/'), resource)
}

/// Parse a body as JSON, keeping it as a plain string when it is not
fn parse_body(text: String) -> Value {
    serde_json::from_str(&text).unwrap_or(Value::String(text))
}

/// Client talking to the task server over HTTPS
pub struct HttpStatusClient {
    agent: ureq::Agent,
    server: String,
    api: String,
}

impl HttpStatusClient {
    pub fn new(server: &str, api: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).user_agent(USER_AGENT).build();
        HttpStatusClient { agent, server: server.to_string(), api: api.to_string() }
    }

    fn get(&self, resource: &str, query: &[(&str, &str)]) -> Result<FetchResponse> {
        let url = endpoint_url(&self.server, &self.api, resource);
        debug!("GET {} {:?}", url, query);

        let mut request = self.agent.get(&url).set("Accept", "application/json");
        for (key, value) in query {
            request = request.query(key, value);
        }

        let response = match request.call() {
            Ok(resp) => resp,
            Err(ureq::Error::Status(_, resp)) => resp,
            Err(ureq::Error::Transport(t)) => {
                return Err(StatusError::Transport { url, message: t.to_string() });
            }
        };

        let status = response.status();
        let reason = response.status_text().to_string();
        let text = response.into_string()?;
        debug!("{} answered {} {}", url, status, reason);

        Ok(FetchResponse { body: parse_body(text), status, reason })
    }
}

impl StatusClient for HttpStatusClient {
    fn fetch_task_summary(&self, task: &str) -> Result<FetchResponse> {
        self.get("campaign", &[("campaign", task)])
    }

    fn fetch_error_breakdown(&self, task: &str, short_format: bool) -> Result<FetchResponse> {
        let short = if short_format { "1" } else { "0" };
        self.get("workflow", &[("workflow", task), ("subresource", "errors"), ("shortformat", short)])
    }
}

/// Client answering from saved response bodies
pub struct FileStatusClient {
    summary: PathBuf,
    errors: Option<PathBuf>,
}

impl FileStatusClient {
    pub fn new(summary: PathBuf, errors: Option<PathBuf>) -> Self {
        FileStatusClient { summary, errors }
    }

    fn read(path: &Path) -> Result<FetchResponse> {
        debug!("reading saved response {}", path.display());
        let text = fs::read_to_string(path)?;
        Ok(FetchResponse { body: parse_body(text), status: 200, reason: "OK".to_string() })
    }
}

impl StatusClient for FileStatusClient {
    fn fetch_task_summary(&self, _task: &str) -> Result<FetchResponse> {
        Self::read(&self.summary)
    }

    fn fetch_error_breakdown(&self, _task: &str, _short_format: bool) -> Result<FetchResponse> {
        match &self.errors {
            Some(path) => Self::read(path),
            None => Err(StatusError::Config("error details requested but no --errors-file given".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url() {
        assert_eq!(
            endpoint_url("cmsweb.cern.ch", "crabserver/prod", "campaign"),
            "https://cmsweb.cern.ch/crabserver/prod/campaign"
        );
        assert_eq!(endpoint_url("http://localhost:8080/", "/api/", "workflow"), "http://localhost:8080/api/workflow");
    }

    #[test]
    fn test_parse_body_keeps_non_json_text() {
        assert_eq!(parse_body("{\"result\": []}".to_string()), serde_json::json!({"result": []}));
        assert_eq!(parse_body("Service Unavailable".to_string()), Value::String("Service Unavailable".to_string()));
    }

    #[test]
    fn test_file_client_reads_saved_bodies() {
        let dir = tempfile::tempdir().unwrap();
        let summary = dir.path().join("summary.json");
        std::fs::write(&summary, "{\"result\": [\"c\", \"NEW\", {}, {}, {}]}").unwrap();

        let client = FileStatusClient::new(summary, None);
        let resp = client.fetch_task_summary("ignored").unwrap();
        assert!(resp.is_success());
        assert_eq!(resp.body["result"][1], "NEW");

        assert!(matches!(client.fetch_error_breakdown("ignored", true), Err(StatusError::Config(_))));
    }

    #[test]
    #[ignore] // Requires network access
    fn test_http_client_reports_status_of_unreachable_server() {
        let client = HttpStatusClient::new("http://127.0.0.1:9", "api", Duration::from_millis(200));
        assert!(matches!(client.fetch_task_summary("t"), Err(StatusError::Transport { .. })));
    }
}
