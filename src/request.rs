use crate::error::{Result, TemplatingError};
use indexmap::IndexMap;
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Ordered header map. Keys are case-sensitive and the last write wins.
pub type Headers = IndexMap<String, String>;

pub const ACCEPT: &str = "Accept";
pub const AUTHORIZATION: &str = "Authorization";
pub const CONTENT_TYPE: &str = "Content-Type";

/// HTTP methods the templating service uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = TemplatingError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            _ => Err(TemplatingError::Configuration(format!(
                "HTTP request method not recognized: {}",
                s
            ))),
        }
    }
}

/// A transport-ready request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub method: Method,
    pub headers: Headers,
    /// Always `None` for GET, always `Some` for POST
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Build a request from its parts.
    ///
    /// Only the given headers are applied. A POST without a body carries an
    /// empty entity; a GET with a body is rejected.
    pub fn build(
        url: &str,
        headers: &Headers,
        method: Method,
        body: Option<&[u8]>,
    ) -> Result<Self> {
        Url::parse(url)
            .map_err(|e| TemplatingError::Configuration(format!("invalid URL {}: {}", url, e)))?;

        let body = match method {
            Method::Get => {
                if body.is_some() {
                    return Err(TemplatingError::Configuration(
                        "GET requests cannot carry a body".to_string(),
                    ));
                }
                None
            }
            Method::Post => Some(body.map(<[u8]>::to_vec).unwrap_or_default()),
        };

        Ok(HttpRequest {
            url: url.to_string(),
            method,
            headers: headers.clone(),
            body,
        })
    }

    /// Get a header value by exact name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Body as UTF-8 text, if any
    pub fn body_text(&self) -> Option<String> {
        self.body
            .as_ref()
            .map(|b| String::from_utf8_lossy(b).into_owned())
    }
}
