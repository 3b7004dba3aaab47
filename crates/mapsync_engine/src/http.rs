//! HTTP client abstraction.
//!
//! The engine talks to the network through the [`HttpClient`] trait so
//! that transports can be swapped; [`ReqwestClient`] is the production
//! implementation and [`MockHttpClient`] serves tests.

use crate::error::{SyncError, SyncResult};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// Blocking HTTP client abstraction.
///
/// Errors are transport messages; the engine wraps them into
/// [`SyncError::Network`].
pub trait HttpClient: Send + Sync {
    /// Issues a GET request and returns the response body.
    fn get(&self, url: &str) -> Result<String, String>;

    /// Issues a POST request with a URL-encoded form body and returns the
    /// response body.
    fn post_form(&self, url: &str, body: &str) -> Result<String, String>;
}

/// HTTP client backed by `reqwest::blocking`.
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Creates a client with the given request timeout.
    pub fn new(timeout: Duration) -> SyncResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SyncError::network(e.to_string()))?;
        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<String, String> {
        self.client
            .get(url)
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.text())
            .map_err(|e| e.to_string())
    }

    fn post_form(&self, url: &str, body: &str) -> Result<String, String> {
        self.client
            .post(url)
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(body.to_string())
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.text())
            .map_err(|e| e.to_string())
    }
}

/// A request observed by [`MockHttpClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockRequest {
    /// A GET request.
    Get {
        /// Requested URL.
        url: String,
    },
    /// A POST request with a form body.
    PostForm {
        /// Requested URL.
        url: String,
        /// Submitted form body.
        body: String,
    },
}

/// A mock HTTP client for testing.
///
/// Responses are queued per method and consumed in order; every request
/// is recorded for assertions.
#[derive(Default)]
pub struct MockHttpClient {
    get_responses: Mutex<VecDeque<Result<String, String>>>,
    post_responses: Mutex<VecDeque<Result<String, String>>>,
    requests: Mutex<Vec<MockRequest>>,
}

impl MockHttpClient {
    /// Creates a mock with no queued responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response for the next unanswered GET request.
    pub fn queue_get_response(&self, response: Result<String, String>) {
        self.get_responses.lock().unwrap().push_back(response);
    }

    /// Queues a response for the next unanswered POST request.
    pub fn queue_post_response(&self, response: Result<String, String>) {
        self.post_responses.lock().unwrap().push_back(response);
    }

    /// All requests observed so far, in order.
    pub fn requests(&self) -> Vec<MockRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpClient for MockHttpClient {
    fn get(&self, url: &str) -> Result<String, String> {
        self.requests.lock().unwrap().push(MockRequest::Get {
            url: url.to_string(),
        });
        self.get_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err("no mock GET response queued".into()))
    }

    fn post_form(&self, url: &str, body: &str) -> Result<String, String> {
        self.requests.lock().unwrap().push(MockRequest::PostForm {
            url: url.to_string(),
            body: body.to_string(),
        });
        self.post_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err("no mock POST response queued".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_replays_responses_in_order() {
        let client = MockHttpClient::new();
        client.queue_get_response(Ok("first".into()));
        client.queue_get_response(Err("boom".into()));

        assert_eq!(client.get("http://a"), Ok("first".into()));
        assert_eq!(client.get("http://b"), Err("boom".into()));
    }

    #[test]
    fn mock_records_requests() {
        let client = MockHttpClient::new();
        client.queue_get_response(Ok("ok".into()));
        client.queue_post_response(Ok("ok".into()));

        client.get("http://a").unwrap();
        client.post_form("http://b", "k=v").unwrap();

        assert_eq!(
            client.requests(),
            vec![
                MockRequest::Get {
                    url: "http://a".into()
                },
                MockRequest::PostForm {
                    url: "http://b".into(),
                    body: "k=v".into()
                },
            ]
        );
    }

    #[test]
    fn exhausted_mock_reports_error() {
        let client = MockHttpClient::new();
        let err = client.get("http://a").unwrap_err();
        assert!(err.contains("no mock GET response"));
    }
}
