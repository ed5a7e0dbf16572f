//! # templating-client
//!
//! A blocking Rust client for a templating/document-composition service.
//! The client authenticates with an OAuth2 client-credentials grant, caches
//! the bearer token in memory and transparently refreshes it once when a
//! request is rejected.
//!
//! ## Features
//!
//! - Fetch example artifacts, list templates, compose artifacts from data
//! - Lazy or eager token acquisition
//! - One refresh-and-retry per call, then a typed error
//! - Pluggable transport, with a scripted [`mock::MockTransport`] for tests
//!
//! ## Basic Usage
//!
//! ```no_run
//! use templating_client::{Config, MediaType, TemplatingClient};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::new(
//!         "https://templating.example.com",
//!         "https://auth.example.com/realms/main/protocol/openid-connect/token",
//!         "template-client-id",
//!         "client-secret",
//!     )
//!     .with_scope("content-provider-scope");
//!
//!     let client = TemplatingClient::new(config)?;
//!
//!     println!("{}", client.list_templates()?);
//!
//!     let pdf = client.compose(
//!         "certificate",
//!         MediaType::Pdf,
//!         r#"{"recipient_name": "Subject 37"}"#,
//!     )?;
//!     std::fs::write("certificate.pdf", pdf)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Testing
//!
//! ```
//! use templating_client::mock::{MockResponse, MockTransport};
//! use templating_client::{Config, TemplatingClient};
//!
//! let transport = MockTransport::with_responses(vec![
//!     MockResponse::token("abc"),
//!     MockResponse::ok_with_body("[]"),
//! ]);
//! let config = Config::new("http://localhost", "http://localhost/token", "id", "secret");
//! let client = TemplatingClient::with_transport(config, transport)?;
//!
//! assert_eq!(client.list_templates()?, "[]");
//! # Ok::<(), templating_client::TemplatingError>(())
//! ```

pub mod auth;
pub mod client;
pub mod error;
pub mod media_type;
pub mod mock;
pub mod request;
pub mod response;
pub mod rest;
pub mod token;
pub mod transport;

// Re-export main types for convenience
pub use auth::Authenticator;
pub use client::Config;
pub use error::{Result, TemplatingError};
pub use media_type::MediaType;
pub use request::{Headers, HttpRequest, Method};
pub use response::HttpResponse;
pub use rest::TemplatingClient;
pub use token::{TokenResponse, TokenStore};
pub use transport::{HttpTransport, ReqwestTransport};
