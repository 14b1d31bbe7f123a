/// Tests for the status command pipeline
#[cfg(test)]
mod tests {
    use crate::api::{FetchResponse, StatusClient};
    use crate::error::{Result, StatusError};
    use crate::status::{fetch_and_render, fetch_report};
    use crate::types::DetailFlags;
    use serde_json::{Value, json};
    use std::cell::RefCell;

    /// Canned answers, recording every call made
    struct MockClient {
        summary: FetchResponse,
        errors: FetchResponse,
        calls: RefCell<Vec<String>>,
    }

    fn ok(body: Value) -> FetchResponse {
        FetchResponse { body, status: 200, reason: "OK".to_string() }
    }

    impl MockClient {
        fn new(summary: FetchResponse, errors: FetchResponse) -> Self {
            MockClient { summary, errors, calls: RefCell::new(Vec::new()) }
        }
    }

    impl StatusClient for MockClient {
        fn fetch_task_summary(&self, task: &str) -> Result<FetchResponse> {
            self.calls.borrow_mut().push(format!("summary:{}", task));
            Ok(self.summary.clone())
        }

        fn fetch_error_breakdown(&self, task: &str, short_format: bool) -> Result<FetchResponse> {
            self.calls.borrow_mut().push(format!("errors:{}:{}", task, short_format));
            Ok(self.errors.clone())
        }
    }

    fn summary_body() -> Value {
        json!({
            "result": [
                "task_1",
                "SUBMITTED",
                {"total": 10, "submitted": 2, "failure": 1, "queued": 3, "success": 4},
                {"failure": {"first": 1, "retry": 1, "exit": 1}},
                {"T2_CH_CERN": [{"failure": 1, "success": 4}]}
            ]
        })
    }

    fn errors_body() -> Value {
        json!({"result": [[{"key": ["task_1", 1, 8021, ["FileReadError"], "T2_CH_CERN"], "value": 1}]]})
    }

    #[test]
    fn test_errors_not_fetched_without_detail() {
        let client = MockClient::new(ok(summary_body()), ok(errors_body()));
        let lines = fetch_and_render(&client, "task_1", &DetailFlags::default()).unwrap();

        assert_eq!(*client.calls.borrow(), vec!["summary:task_1"]);
        assert_eq!(lines[0].text, "SUBMITTED");
        assert!(lines.iter().any(|l| l.text == "10.0% using the automatic resubmission"));
    }

    #[test]
    fn test_failure_detail_fetches_short_format() {
        let client = MockClient::new(ok(summary_body()), ok(errors_body()));
        let flags = DetailFlags { failure: true, ..Default::default() };
        let summary = fetch_report(&client, "task_1", &flags).unwrap();

        assert_eq!(*client.calls.borrow(), vec!["summary:task_1", "errors:task_1:true"]);
        let errors = summary.errors.expect("Should list errors");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].exit_code, "8021");
        assert_eq!(errors[0].percent, 10.0);
    }

    #[test]
    fn test_site_detail_fetches_full_format() {
        let client = MockClient::new(ok(summary_body()), ok(errors_body()));
        let flags = DetailFlags { site: true, ..Default::default() };
        let lines = fetch_and_render(&client, "task_1", &flags).unwrap();

        assert_eq!(*client.calls.borrow(), vec!["summary:task_1", "errors:task_1:false"]);
        assert!(lines.iter().any(|l| l.text == "10.0% with exit code 8021. Error list: [\"FileReadError\"]"));
    }

    #[test]
    fn test_server_messages_follow_the_report() {
        let mut body = summary_body();
        body["requestDetails"] = json!({"RequestStatus": "failed", "RequestMessages": [["No sites available"]]});
        let client = MockClient::new(ok(body), ok(errors_body()));
        let lines = fetch_and_render(&client, "task_1", &DetailFlags::default()).unwrap();

        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts[1], "submitted 20.0%");
        assert_eq!(texts[texts.len() - 2..], ["Server Messages:", "No sites available"]);
    }

    #[test]
    fn test_request_details_not_failed_add_no_lines() {
        let plain = MockClient::new(ok(summary_body()), ok(errors_body()));
        let expected = fetch_and_render(&plain, "task_1", &DetailFlags::default()).unwrap();

        let mut body = summary_body();
        body["requestDetails"] = json!({"RequestStatus": "SUBMITTED", "RequestMessages": [["queued for submission"]]});
        let client = MockClient::new(ok(body), ok(errors_body()));
        let lines = fetch_and_render(&client, "task_1", &DetailFlags::default()).unwrap();

        assert_eq!(lines, expected);
    }

    #[test]
    fn test_summary_failure_is_communication_error() {
        let failed = FetchResponse {
            body: json!({"error": "Task not found"}),
            status: 404,
            reason: "Not Found".to_string(),
        };
        let client = MockClient::new(failed, ok(errors_body()));
        let flags = DetailFlags { failure: true, site: true, ..Default::default() };

        match fetch_and_render(&client, "task_1", &flags) {
            Err(StatusError::Communication { task, status, body, reason }) => {
                assert_eq!(task, "task_1");
                assert_eq!(status, 404);
                assert!(body.contains("Task not found"));
                assert_eq!(reason, "Not Found");
            }
            other => panic!("expected communication error, got {:?}", other),
        }
        assert_eq!(*client.calls.borrow(), vec!["summary:task_1"]);
    }

    #[test]
    fn test_error_breakdown_failure_is_communication_error() {
        let failed = FetchResponse { body: Value::String("oops".to_string()), status: 500, reason: "Server Error".to_string() };
        let client = MockClient::new(ok(summary_body()), failed);
        let flags = DetailFlags { site: true, ..Default::default() };

        let err = fetch_and_render(&client, "task_1", &flags).unwrap_err();
        assert!(matches!(err, StatusError::Communication { status: 500, .. }));
    }

    #[test]
    fn test_failed_summary_with_garbage_body_does_not_panic() {
        let failed = FetchResponse { body: json!([1, 2]), status: 503, reason: "Unavailable".to_string() };
        let client = MockClient::new(failed, ok(json!({})));
        assert!(fetch_and_render(&client, "t", &DetailFlags::default()).is_err());
    }

    #[test]
    fn test_malformed_success_body_is_reported() {
        let client = MockClient::new(ok(json!({"result": "nope"})), ok(json!({})));
        let err = fetch_and_render(&client, "t", &DetailFlags::default()).unwrap_err();
        assert!(matches!(err, StatusError::Malformed(_)));
    }
}
