//! Error types for the iPaymu client
//!
//! Every public operation returns an [`IpaymuResult`]. Failures are also
//! appended to the client's [`ErrorLog`] so callers can inspect what went
//! wrong across a sequence of calls.

use std::collections::BTreeMap;
use thiserror::Error;

pub type IpaymuResult<T> = Result<T, IpaymuError>;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum IpaymuError {
    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Gateway error {code}: {message}")]
    Gateway { code: String, message: String },

    #[error("Malformed gateway response: {message}")]
    MalformedResponse { message: String },

    #[error("Missing field '{field}' in {endpoint} response")]
    MissingField { field: String, endpoint: String },

    #[error("Invalid value for field '{field}': {value}")]
    InvalidField { field: String, value: String },

    #[error("Undocumented account status code: {code}")]
    UnknownAccountStatus { code: i64 },

    #[error("Undocumented transaction status code: {code}")]
    UnknownTransactionStatus { code: i64 },

    #[error("Invalid gateway timestamp: {value}")]
    InvalidTimestamp { value: String },

    #[error("Product '{product}' has no alternate currency price")]
    MissingAltCurrencyPrice { product: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl IpaymuError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn gateway(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Gateway {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn malformed_response(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
            endpoint: endpoint.into(),
        }
    }

    pub fn invalid_field(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn invalid_timestamp(value: impl Into<String>) -> Self {
        Self::InvalidTimestamp {
            value: value.into(),
        }
    }

    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Key under which this error is recorded in an [`ErrorLog`].
    ///
    /// Gateway errors use the gateway's own status marker.
    pub fn code(&self) -> &str {
        match self {
            Self::Transport { .. } => "transport",
            Self::Gateway { code, .. } => code,
            Self::MalformedResponse { .. } => "malformed_response",
            Self::MissingField { .. } => "missing_field",
            Self::InvalidField { .. } => "invalid_field",
            Self::UnknownAccountStatus { .. } => "unknown_account_status",
            Self::UnknownTransactionStatus { .. } => "unknown_transaction_status",
            Self::InvalidTimestamp { .. } => "invalid_timestamp",
            Self::MissingAltCurrencyPrice { .. } => "missing_alt_currency_price",
            Self::Config { .. } => "config",
        }
    }

    /// Message recorded alongside [`IpaymuError::code`].
    pub fn message(&self) -> String {
        match self {
            Self::Transport { message } => message.clone(),
            Self::Gateway { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    pub fn is_gateway(&self) -> bool {
        matches!(self, Self::Gateway { .. })
    }
}

impl From<serde_json::Error> for IpaymuError {
    fn from(err: serde_json::Error) -> Self {
        IpaymuError::malformed_response(format!("JSON error: {}", err))
    }
}

/// One recorded failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorEntry {
    pub code: String,
    pub message: String,
}

/// Ordered log of failures recorded by a client instance.
///
/// Never cleared implicitly; see `IpaymuClient::clear_errors`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorLog {
    entries: Vec<ErrorEntry>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, error: &IpaymuError) {
        self.entries.push(ErrorEntry {
            code: error.code().to_string(),
            message: error.message(),
        });
    }

    pub fn entries(&self) -> &[ErrorEntry] {
        &self.entries
    }

    /// Code to message view. A later entry with the same code wins.
    pub fn as_map(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|entry| (entry.code.clone(), entry.message.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
