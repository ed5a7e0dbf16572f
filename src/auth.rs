use crate::client::Config;
use crate::error::{Result, TemplatingError};
use crate::request::{Headers, HttpRequest, Method, ACCEPT, CONTENT_TYPE};
use crate::token::{TokenResponse, TokenStore};
use crate::transport::HttpTransport;
use secrecy::{ExposeSecret, SecretString};
use url::form_urlencoded;

/// Authenticator performs the OAuth2 client-credentials exchange and keeps
/// the resulting bearer token in its [`TokenStore`].
#[derive(Debug)]
pub struct Authenticator {
    token_url: String,
    client_id: String,
    client_secret: SecretString,
    scope: Option<String>,
    store: TokenStore,
}

impl Authenticator {
    pub fn new(config: &Config) -> Self {
        Authenticator {
            token_url: config.token_url.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            scope: config.scope.clone(),
            store: TokenStore::new(),
        }
    }

    /// The store holding the current token
    pub fn store(&self) -> &TokenStore {
        &self.store
    }

    /// Form-encoded body of the token request
    fn form_body(&self) -> String {
        let mut form = form_urlencoded::Serializer::new(String::new());
        form.append_pair("client_id", &self.client_id)
            .append_pair("client_secret", self.client_secret.expose_secret())
            .append_pair("grant_type", "client_credentials");
        if let Some(ref scope) = self.scope {
            form.append_pair("scope", scope);
        }
        form.finish()
    }

    /// Obtain a new token and replace the stored one.
    ///
    /// Fails when the endpoint cannot be reached, answers with an empty body,
    /// or answers without an `access_token`.
    pub fn refresh_token(&self, transport: &dyn HttpTransport) -> Result<()> {
        let mut headers = Headers::new();
        headers.insert(ACCEPT.to_string(), "application/json".to_string());
        headers.insert(
            CONTENT_TYPE.to_string(),
            "application/x-www-form-urlencoded".to_string(),
        );

        let body = self.form_body();
        let request =
            HttpRequest::build(&self.token_url, &headers, Method::Post, Some(body.as_bytes()))?;

        let response = transport.send(&request).map_err(|e| {
            TemplatingError::authentication_with(
                "error while trying to get auth token for templating service",
                e,
            )
        })?;

        if response.body.iter().all(u8::is_ascii_whitespace) {
            return Err(TemplatingError::authentication(
                "no token obtainable from token endpoint",
            ));
        }

        let token: TokenResponse = response.json().map_err(|e| {
            TemplatingError::authentication_with(
                format!("invalid token response (http status {})", response.status),
                e,
            )
        })?;

        let access_token = token.usable_token().ok_or_else(|| {
            TemplatingError::authentication(format!(
                "token response contained no access_token (http status {})",
                response.status
            ))
        })?;

        self.store.set(access_token.to_string());
        tracing::info!(token_url = %self.token_url, "obtained access token");

        Ok(())
    }
}
