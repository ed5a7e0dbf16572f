use crate::error::{Result, TemplatingError};
use reqwest::blocking::{Client, ClientBuilder};
use secrecy::SecretString;
use std::time::Duration;
use url::Url;

/// Default per-attempt request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Create the HTTP client for templating requests.
/// The timeout applies both to connecting and to each whole request.
pub fn create_http_client(timeout: Duration) -> Result<Client> {
    ClientBuilder::new()
        .pool_max_idle_per_host(10)
        .timeout(timeout)
        .connect_timeout(timeout)
        .build()
        .map_err(|e| TemplatingError::Configuration(format!("failed to create HTTP client: {}", e)))
}

/// Configuration for the templating service client
#[derive(Debug, Clone)]
pub struct Config {
    /// Service base URL, without trailing slash
    pub base_url: String,
    /// OAuth2 token endpoint
    pub token_url: String,
    /// OAuth2 client id
    pub client_id: String,
    /// OAuth2 client secret
    pub client_secret: SecretString,
    /// Optional OAuth2 scope sent with the token request
    pub scope: Option<String>,
    /// Per-attempt timeout
    pub timeout: Duration,
    /// Fetch the token when the client is constructed instead of on first call
    pub eager_auth: bool,
    /// Log every send
    pub debug: bool,
}

impl Config {
    /// Create a new configuration. Authentication is lazy and the timeout is 15 seconds.
    pub fn new(
        base_url: impl Into<String>,
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Config {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: SecretString::new(client_secret.into()),
            scope: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            eager_auth: false,
            debug: false,
        }
    }

    /// Load configuration from `TEMPLATING_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| TemplatingError::Configuration(format!("{} must be set", key)))
        };

        let mut config = Config::new(
            required("TEMPLATING_BASE_URL")?,
            required("TEMPLATING_TOKEN_URL")?,
            required("TEMPLATING_CLIENT_ID")?,
            required("TEMPLATING_CLIENT_SECRET")?,
        );

        if let Some(scope) = lookup("TEMPLATING_SCOPE").filter(|v| !v.is_empty()) {
            config.scope = Some(scope);
        }

        if let Some(secs) = lookup("TEMPLATING_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                TemplatingError::Configuration(format!(
                    "TEMPLATING_TIMEOUT_SECS must be a whole number of seconds, got {:?}",
                    secs
                ))
            })?;
            if secs == 0 {
                return Err(TemplatingError::Configuration(
                    "TEMPLATING_TIMEOUT_SECS must be greater than zero".to_string(),
                ));
            }
            config.timeout = Duration::from_secs(secs);
        }

        if let Some(eager) = lookup("TEMPLATING_EAGER_AUTH") {
            config.eager_auth = match eager.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" | "" => false,
                other => {
                    return Err(TemplatingError::Configuration(format!(
                        "TEMPLATING_EAGER_AUTH must be a boolean, got {:?}",
                        other
                    )))
                }
            };
        }

        Ok(config)
    }

    /// Set the OAuth2 scope
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Set the per-attempt timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Choose eager or lazy authentication
    pub fn with_eager_auth(mut self, eager_auth: bool) -> Self {
        self.eager_auth = eager_auth;
        self
    }

    /// Set debug mode
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// URL of an API path relative to the base URL
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// URL of `{base}/template/{template_id}/{action}`, with the id encoded as one path segment
    pub fn template_endpoint(&self, template_id: &str, action: &str) -> Result<String> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            TemplatingError::Configuration(format!("invalid base URL {}: {}", self.base_url, e))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                TemplatingError::Configuration(format!(
                    "base URL cannot carry a path: {}",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(["template", template_id, action]);

        Ok(url.into())
    }
}
