//! Payment gateway trait definitions
//!
//! Defines the operations a gateway client offers to the rest of an
//! application.

use crate::error::IpaymuResult;
use crate::payments::types::{
    Account, AccountStatus, PaymentSession, TransactionRecord, TransactionRequest,
};
use async_trait::async_trait;

/// Trait for payment gateway clients
///
/// Every operation reports failure through its result. Implementations
/// also keep a log of failures so callers can inspect them after a
/// sequence of calls.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Fetch the account behind the configured API key
    ///
    /// Queries the balance first, then the verification status of the
    /// username it returned. The second query is skipped when the first
    /// fails.
    async fn get_account(&self) -> IpaymuResult<Account>;

    /// Current balance, as an integer amount
    async fn check_account_balance(&self) -> IpaymuResult<i64>;

    /// Verification level of an account
    ///
    /// # Arguments
    /// * `username` - Gateway account username
    async fn check_account_status(&self, username: &str) -> IpaymuResult<AccountStatus>;

    /// Look up a transaction
    ///
    /// # Arguments
    /// * `transaction_id` - Gateway transaction id
    ///
    /// # Returns
    /// * `TransactionRecord` - Status label, parties, amount, normalized
    ///   timestamp and uppercase type
    async fn check_transaction(&self, transaction_id: &str) -> IpaymuResult<TransactionRecord>;

    /// Create a payment for one or more products
    ///
    /// # Arguments
    /// * `request` - Invoice number and line items
    /// * `alt_payment_account` - Account on the alternate payment method
    ///   (e.g. a PayPal email). When given, every product must carry a
    ///   price in the alternate currency.
    async fn add_transaction(
        &self,
        request: &TransactionRequest,
        alt_payment_account: Option<&str>,
    ) -> IpaymuResult<PaymentSession>;
}
