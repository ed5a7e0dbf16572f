//! Scripted HTTP transport for testing.

use crate::error::{Result, TemplatingError};
use crate::request::HttpRequest;
use crate::response::HttpResponse;
use crate::transport::HttpTransport;
use indexmap::IndexMap;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

/// Mock HTTP response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: IndexMap<String, String>,
    /// Response body.
    pub body: Vec<u8>,
}

impl MockResponse {
    /// Create a successful response with body.
    pub fn ok_with_body(body: impl Into<Vec<u8>>) -> Self {
        Self::error(200, body)
    }

    /// Create a successful token endpoint response.
    pub fn token(access_token: &str) -> Self {
        let body = serde_json::json!({
            "access_token": access_token,
            "expires_in": 300,
            "token_type": "Bearer",
        });
        Self::ok_with_body(body.to_string())
    }

    /// Create a response with the given status.
    pub fn error(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: IndexMap::new(),
            body: body.into(),
        }
    }

    /// Add a header to the response. Names are lowercased as a real transport reports them.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .insert(key.into().to_ascii_lowercase(), value.into());
        self
    }
}

#[derive(Debug)]
enum Reply {
    Respond(MockResponse),
    Fail(String),
}

/// Mock HTTP transport returning queued replies in order and recording every request.
#[derive(Debug, Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<HttpRequest>>,
    default_response: Option<MockResponse>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockTransport {
    /// Create a new mock transport with no replies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock transport with queued responses.
    pub fn with_responses(responses: Vec<MockResponse>) -> Self {
        let transport = Self::new();
        for response in responses {
            transport.queue_response(response);
        }
        transport
    }

    /// Create a mock transport answering every request with `response`
    /// once the queue is empty.
    pub fn with_default(response: MockResponse) -> Self {
        Self {
            default_response: Some(response),
            ..Self::default()
        }
    }

    /// Queue a response to return.
    pub fn queue_response(&self, response: MockResponse) {
        lock(&self.replies).push_back(Reply::Respond(response));
    }

    /// Queue a network-level failure.
    pub fn queue_failure(&self, message: impl Into<String>) {
        lock(&self.replies).push_back(Reply::Fail(message.into()));
    }

    /// Get all recorded requests.
    pub fn requests(&self) -> Vec<HttpRequest> {
        lock(&self.requests).clone()
    }

    /// Get the number of requests made.
    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// Get the last request made.
    pub fn last_request(&self) -> Option<HttpRequest> {
        lock(&self.requests).last().cloned()
    }
}

impl HttpTransport for MockTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        lock(&self.requests).push(request.clone());

        let reply = lock(&self.replies)
            .pop_front()
            .or_else(|| self.default_response.clone().map(Reply::Respond));

        match reply {
            Some(Reply::Respond(mock)) => Ok(HttpResponse {
                status: mock.status,
                headers: mock.headers,
                body: mock.body,
            }),
            Some(Reply::Fail(message)) => Err(TemplatingError::transport(
                message.clone(),
                Some(message.into()),
            )),
            None => Err(TemplatingError::transport(
                "no mock response available",
                None,
            )),
        }
    }
}
