//! HTTP transport abstraction.
//!
//! The client talks to the network only through [`HttpTransport`], so tests
//! can substitute a scripted transport such as [`crate::mock::MockTransport`].

use crate::client::create_http_client;
use crate::error::{Result, TemplatingError};
use crate::request::{HttpRequest, Method};
use crate::response::HttpResponse;
use reqwest::blocking::Client;
use std::sync::Arc;
use std::time::Duration;

/// Blocking HTTP transport.
///
/// Implementations return `Ok` for every HTTP response regardless of status
/// and reserve `Err(TemplatingError::Transport)` for network-level failures.
pub trait HttpTransport: Send + Sync {
    /// Send a request and wait for the full response
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

impl<T: HttpTransport + ?Sized> HttpTransport for Arc<T> {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        (**self).send(request)
    }
}

impl<T: HttpTransport + ?Sized> HttpTransport for Box<T> {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        (**self).send(request)
    }
}

/// Default transport backed by `reqwest::blocking`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport applying `timeout` to every request and connection attempt
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(ReqwestTransport {
            client: create_http_client(timeout)?,
        })
    }

    /// Wrap an already configured reqwest client
    pub fn from_client(client: Client) -> Self {
        ReqwestTransport { client }
    }
}

impl HttpTransport for ReqwestTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(ref body) = request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().map_err(map_reqwest_error)?;
        let status = response.status().as_u16();

        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
            .collect();

        let body = response.bytes().map_err(map_reqwest_error)?;

        Ok(HttpResponse {
            status,
            headers,
            body: body.to_vec(),
        })
    }
}

fn map_reqwest_error(e: reqwest::Error) -> TemplatingError {
    let message = if e.is_timeout() {
        "request timed out".to_string()
    } else if e.is_connect() {
        "connection failed".to_string()
    } else {
        "failed to send or receive request through HTTP client".to_string()
    };
    TemplatingError::transport(message, Some(Box::new(e)))
}
