//! Transport abstraction
//!
//! The client never talks to the network directly. It hands a fully built
//! [`GatewayRequest`] to a [`Transport`] and gets back the raw reply, or a
//! [`TransportError`] when the call did not complete (connect failure,
//! timeout, broken stream). Application-level failures reported by the
//! gateway inside a reply are not transport errors.
//!
//! # Implementations
//!
//! - [`HttpTransport`]: `reqwest` over HTTPS
//! - [`mock::ScriptedTransport`]: replays queued replies, for tests

use async_trait::async_trait;
use thiserror::Error;

pub mod http;
pub mod mock;

pub use http::HttpTransport;
pub use mock::ScriptedTransport;

/// Ordered request parameters (name, value).
pub type Params = Vec<(String, String)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// Parameters in the query string
    Get,
    /// Parameters in a form-urlencoded body
    Post,
}

/// A request ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayRequest {
    pub method: HttpMethod,
    pub url: String,
    pub params: Params,
}

impl GatewayRequest {
    /// First value of the named parameter.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_param(&self, name: &str) -> bool {
        self.param(name).is_some()
    }
}

/// Raw reply as received from the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("request timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("connection failed: {message}")]
    Connect { message: String },

    #[error("request failed: {message}")]
    Request { message: String },
}

impl TransportError {
    pub fn connect(message: impl Into<String>) -> Self {
        Self::Connect {
            message: message.into(),
        }
    }

    pub fn request(message: impl Into<String>) -> Self {
        Self::Request {
            message: message.into(),
        }
    }
}

impl From<TransportError> for crate::error::IpaymuError {
    fn from(err: TransportError) -> Self {
        crate::error::IpaymuError::transport(err.to_string())
    }
}

/// Performs one gateway call.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn call(&self, request: &GatewayRequest) -> Result<TransportResponse, TransportError>;
}
