use crate::auth::Authenticator;
use crate::client::Config;
use crate::error::{Result, TemplatingError};
use crate::media_type::MediaType;
use crate::request::{Headers, HttpRequest, Method, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use crate::response::HttpResponse;
use crate::transport::{HttpTransport, ReqwestTransport};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Instant;

/// Client for the templating service
pub struct TemplatingClient {
    config: Config,
    transport: Box<dyn HttpTransport>,
    auth: Authenticator,
}

impl TemplatingClient {
    /// Create a client using the default reqwest transport
    pub fn new(config: Config) -> Result<Self> {
        let transport = ReqwestTransport::new(config.timeout)?;
        Self::with_transport(config, transport)
    }

    /// Create a client from `TEMPLATING_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(Config::from_env()?)
    }

    /// Create a client sending through the given transport.
    ///
    /// With `eager_auth` set the token exchange happens here and its failure
    /// fails construction.
    pub fn with_transport<T>(config: Config, transport: T) -> Result<Self>
    where
        T: HttpTransport + 'static,
    {
        let client = TemplatingClient {
            auth: Authenticator::new(&config),
            config,
            transport: Box::new(transport),
        };

        if client.config.eager_auth {
            client.auth.refresh_token(&*client.transport)?;
        }

        Ok(client)
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Check if a token has been obtained
    pub fn is_authenticated(&self) -> bool {
        self.auth.store().has_token()
    }

    /// Get an example artifact of a template rendered as `media_type`
    pub fn fetch_example(&self, template_id: &str, media_type: MediaType) -> Result<Vec<u8>> {
        let url = self.config.template_endpoint(template_id, "example")?;

        let mut headers = Headers::new();
        headers.insert(ACCEPT.to_string(), media_type.mime().to_string());

        let response = self.execute(&url, &headers, Method::Get, None)?;
        Ok(response.into_bytes())
    }

    /// List the templates known to the service
    pub fn list_templates(&self) -> Result<String> {
        let url = self.config.endpoint("templates/");
        let response = self.execute(&url, &Headers::new(), Method::Get, None)?;
        Ok(response.into_text())
    }

    /// List the templates and unmarshal the listing into the target type
    pub fn list_templates_json<T>(&self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let listing = self.list_templates()?;
        serde_json::from_str(&listing).map_err(|e| e.into())
    }

    /// Compose an artifact from a template and JSON data.
    ///
    /// `payload` is sent verbatim; the service validates it against the template schema.
    pub fn compose(
        &self,
        template_id: &str,
        media_type: MediaType,
        payload: &str,
    ) -> Result<Vec<u8>> {
        let url = self.config.template_endpoint(template_id, "compose")?;

        let mut headers = Headers::new();
        headers.insert(ACCEPT.to_string(), media_type.mime().to_string());
        headers.insert(CONTENT_TYPE.to_string(), "application/json".to_string());

        let response = self.execute(&url, &headers, Method::Post, Some(payload.as_bytes()))?;
        Ok(response.into_bytes())
    }

    /// Compose an artifact from a serializable payload
    pub fn compose_json<P>(
        &self,
        template_id: &str,
        media_type: MediaType,
        payload: &P,
    ) -> Result<Vec<u8>>
    where
        P: Serialize + ?Sized,
    {
        let payload = serde_json::to_string(payload)?;
        self.compose(template_id, media_type, &payload)
    }

    /// Send an authenticated request.
    ///
    /// A token is obtained first if none is held. Any non-200 answer triggers
    /// one token refresh and one retry; a second non-200 answer fails with
    /// [`TemplatingError::Service`]. Network failures are not retried.
    pub fn execute(
        &self,
        url: &str,
        headers: &Headers,
        method: Method,
        body: Option<&[u8]>,
    ) -> Result<HttpResponse> {
        if !self.auth.store().has_token() {
            self.auth.refresh_token(&*self.transport)?;
        }

        let response = self.send(url, headers, method, body)?;
        if response.is_ok() {
            return Ok(response);
        }

        tracing::warn!(
            method = %method,
            url = %url,
            status = response.status,
            "request rejected, refreshing token and retrying once"
        );
        self.auth.refresh_token(&*self.transport)?;

        let response = self.send(url, headers, method, body)?;
        if response.is_ok() {
            return Ok(response);
        }

        let status = response.status;
        Err(TemplatingError::service(status, response.into_text()))
    }

    /// Build the request with the current token attached and send it once
    fn send(
        &self,
        url: &str,
        headers: &Headers,
        method: Method,
        body: Option<&[u8]>,
    ) -> Result<HttpResponse> {
        let bearer = self
            .auth
            .store()
            .bearer()
            .ok_or_else(|| TemplatingError::authentication("no token available"))?;

        let mut headers = headers.clone();
        headers.insert(AUTHORIZATION.to_string(), bearer);
        let request = HttpRequest::build(url, &headers, method, body)?;

        let start = Instant::now();
        let response = self.transport.send(&request)?;

        if self.config.debug {
            tracing::debug!(
                method = %method,
                url = %url,
                status = response.status,
                elapsed = ?start.elapsed(),
                "templating request"
            );
        }

        Ok(response)
    }
}

impl std::fmt::Debug for TemplatingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplatingClient")
            .field("config", &self.config)
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
