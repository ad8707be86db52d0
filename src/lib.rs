//! Client library for the iPaymu payment gateway
//!
//! ```rust,no_run
//! use ipaymu_client::{IpaymuClient, IpaymuConfig, PaymentGateway};
//!
//! # async fn example() -> ipaymu_client::IpaymuResult<()> {
//! let client = IpaymuClient::new(IpaymuConfig::new("api-key"))?;
//! let account = client.get_account().await?;
//! println!("{} has {}", account.username, account.balance);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod payments;
pub mod transport;

pub use config::{CallbackUrls, IpaymuConfig};
pub use error::{ErrorEntry, ErrorLog, IpaymuError, IpaymuResult};
pub use payments::providers::IpaymuClient;
pub use payments::traits::PaymentGateway;
pub use payments::types::{
    Account, AccountStatus, LineItems, PaymentSession, Product, TransactionRecord,
    TransactionRequest, TransactionStatus,
};
