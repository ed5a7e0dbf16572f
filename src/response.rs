use indexmap::IndexMap;
use serde::de::DeserializeOwned;

/// HttpResponse is a status code, headers and raw body as received from the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,

    /// Response headers, names lowercased
    pub headers: IndexMap<String, String>,

    /// Response body
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Create a response with no headers
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        HttpResponse {
            status,
            headers: IndexMap::new(),
            body: body.into(),
        }
    }

    /// The only status the service treats as success
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Get a header value by name (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Body as text, replacing invalid UTF-8
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Consume the response and return the raw body
    pub fn into_bytes(self) -> Vec<u8> {
        self.body
    }

    /// Consume the response and return the body as text
    pub fn into_text(self) -> String {
        match String::from_utf8(self.body) {
            Ok(text) => text,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        }
    }

    /// Deserialize the body as JSON
    pub fn json<T>(&self) -> Result<T, crate::error::TemplatingError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_slice(&self.body).map_err(|e| e.into())
    }
}
