use serde::{Deserialize, Serialize};
use std::sync::RwLock;

/// TokenResponse is the JSON document returned by the OAuth2 token endpoint.
/// Only `access_token` is used; the rest is kept for callers that inspect it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Access token for API requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// Token type (usually "Bearer")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,

    /// Token lifetime in seconds, informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<serde_json::Value>,

    /// Granted scope
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl TokenResponse {
    /// The access token, if present and non-empty
    pub fn usable_token(&self) -> Option<&str> {
        self.access_token.as_deref().filter(|t| !t.is_empty())
    }
}

/// TokenStore holds the current bearer token of one client instance.
///
/// There is no expiry tracking: a rejected request is what marks the token
/// stale. Concurrent refreshes are not coordinated and the last write wins.
#[derive(Debug, Default)]
pub struct TokenStore {
    current: RwLock<Option<String>>,
}

impl TokenStore {
    /// Create an empty store
    pub fn new() -> Self {
        TokenStore::default()
    }

    /// Current token, if one has been obtained
    pub fn get(&self) -> Option<String> {
        match self.current.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Replace the current token
    pub fn set(&self, token: String) {
        match self.current.write() {
            Ok(mut guard) => *guard = Some(token),
            Err(poisoned) => *poisoned.into_inner() = Some(token),
        }
    }

    /// Check if we have a token available
    pub fn has_token(&self) -> bool {
        self.get().is_some()
    }

    /// Value for the `Authorization` header
    pub fn bearer(&self) -> Option<String> {
        self.get().map(|t| format!("Bearer {}", t))
    }
}
