//! iPaymu payment gateway client
//!
//! Account balance and verification queries, transaction lookups and
//! payment creation against the iPaymu v1 API.

pub mod request;
pub mod response;

use crate::config::{CallbackUrls, IpaymuConfig};
use crate::error::{ErrorLog, IpaymuError, IpaymuResult};
use crate::payments::traits::PaymentGateway;
use crate::payments::types::{
    Account, AccountStatus, PaymentSession, RawFields, TransactionRecord, TransactionRequest,
    TransactionStatus,
};
use crate::transport::{HttpTransport, Params, Transport, TransportResponse};
use async_trait::async_trait;
use request::{payment_params, Endpoint, RequestBuilder};
use response::{
    interpret, parse_gateway_timestamp, AccountStatusReply, BalanceReply, PaymentReply,
    TransactionReply,
};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, error, info, warn};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// iPaymu client
///
/// Calls within one operation are sequential. The error log and the last
/// reply are shared by all operations on an instance; give each concurrent
/// caller its own client if it needs isolated error history.
pub struct IpaymuClient {
    config: IpaymuConfig,
    transport: Arc<dyn Transport>,
    errors: Mutex<ErrorLog>,
    last_response: Mutex<Option<TransportResponse>>,
}

impl IpaymuClient {
    /// Create a client that talks HTTPS to the configured gateway
    pub fn new(config: IpaymuConfig) -> IpaymuResult<Self> {
        let transport = HttpTransport::new(config.request_timeout())?;

        info!("iPaymu client initialized with URL: {}", config.base_url);

        Self::with_transport(config, Arc::new(transport))
    }

    /// Create a client over a caller-supplied transport
    pub fn with_transport(config: IpaymuConfig, transport: Arc<dyn Transport>) -> IpaymuResult<Self> {
        config
            .validate()
            .map_err(|e| IpaymuError::config_error(e.to_string()))?;

        Ok(Self {
            config,
            transport,
            errors: Mutex::new(ErrorLog::new()),
            last_response: Mutex::new(None),
        })
    }

    /// Create client from environment variables
    pub fn from_env() -> IpaymuResult<Self> {
        let config =
            IpaymuConfig::from_env().map_err(|e| IpaymuError::config_error(format!("{:#}", e)))?;
        Self::new(config)
    }

    pub fn config(&self) -> &IpaymuConfig {
        &self.config
    }

    pub fn set_api_key(&mut self, api_key: impl Into<String>) {
        self.config.api_key = api_key.into();
    }

    pub fn set_callback_urls(&mut self, urls: CallbackUrls) {
        self.config.urls = urls;
    }

    /// Last reply received from the gateway, if the last call got one
    pub fn last_response(&self) -> Option<TransportResponse> {
        lock(&self.last_response).clone()
    }

    /// Snapshot of every failure recorded on this client
    pub fn errors(&self) -> ErrorLog {
        lock(&self.errors).clone()
    }

    pub fn clear_errors(&self) {
        lock(&self.errors).clear();
    }

    fn track<T>(&self, result: IpaymuResult<T>) -> IpaymuResult<T> {
        if let Err(e) = &result {
            lock(&self.errors).record(e);
        }
        result
    }

    /// Dispatch one call and classify the reply.
    ///
    /// Transport failures win over anything in the body: the body is not
    /// read when the call did not complete.
    async fn request(&self, endpoint: Endpoint, params: Params) -> IpaymuResult<RawFields> {
        let request = RequestBuilder::new(&self.config).build(endpoint, params);

        debug!("Calling iPaymu {} endpoint: {}", endpoint.name(), request.url);

        let reply = match self.transport.call(&request).await {
            Ok(reply) => reply,
            Err(e) => {
                error!("iPaymu {} request failed: {}", endpoint.name(), e);
                *lock(&self.last_response) = None;
                return Err(e.into());
            }
        };

        *lock(&self.last_response) = Some(reply.clone());

        interpret(endpoint, &reply).map_err(|e| {
            warn!("iPaymu {} call rejected: {}", endpoint.name(), e);
            e
        })
    }

    async fn fetch_balance(&self) -> IpaymuResult<BalanceReply> {
        let fields = self.request(Endpoint::Balance, Params::new()).await?;
        BalanceReply::try_from(&fields)
    }

    async fn fetch_account_status(&self, username: &str) -> IpaymuResult<AccountStatus> {
        let params = vec![("user".to_string(), username.to_string())];
        let fields = self.request(Endpoint::AccountStatus, params).await?;
        let reply = AccountStatusReply::try_from(&fields)?;
        AccountStatus::try_from(reply.status_code)
    }

    async fn fetch_account(&self) -> IpaymuResult<Account> {
        let balance = self.fetch_balance().await?;
        let status = self.fetch_account_status(&balance.username).await?;

        Ok(Account {
            username: balance.username,
            balance: balance.balance,
            status,
        })
    }

    async fn fetch_transaction(&self, transaction_id: &str) -> IpaymuResult<TransactionRecord> {
        let params = vec![("id".to_string(), transaction_id.to_string())];
        let fields = self.request(Endpoint::Transaction, params).await?;
        let reply = TransactionReply::try_from(&fields)?;

        Ok(TransactionRecord {
            id: transaction_id.to_string(),
            status: TransactionStatus::try_from(reply.status_code)?,
            description: reply.description,
            sender: reply.sender,
            receiver: reply.receiver,
            amount: reply.amount,
            timestamp: parse_gateway_timestamp(&reply.time)?,
            kind: reply.kind.to_uppercase(),
        })
    }

    async fn submit_payment(
        &self,
        request: &TransactionRequest,
        alt_payment_account: Option<&str>,
    ) -> IpaymuResult<PaymentSession> {
        let params = payment_params(request, alt_payment_account, &self.config.urls)?;
        let fields = self.request(Endpoint::Payment, params).await?;
        let reply = PaymentReply::try_from(&fields)?;

        Ok(PaymentSession {
            session_id: reply.session_id,
            fields,
        })
    }
}

#[async_trait]
impl PaymentGateway for IpaymuClient {
    async fn get_account(&self) -> IpaymuResult<Account> {
        info!("Fetching iPaymu account");

        let account = self.track(self.fetch_account().await)?;

        info!(
            "iPaymu account fetched: username={}, status={}",
            account.username, account.status
        );
        Ok(account)
    }

    async fn check_account_balance(&self) -> IpaymuResult<i64> {
        let balance = self.track(self.fetch_balance().await)?;
        Ok(balance.balance)
    }

    async fn check_account_status(&self, username: &str) -> IpaymuResult<AccountStatus> {
        debug!("Checking iPaymu account status: username={}", username);
        self.track(self.fetch_account_status(username).await)
    }

    async fn check_transaction(&self, transaction_id: &str) -> IpaymuResult<TransactionRecord> {
        info!("Checking iPaymu transaction: id={}", transaction_id);

        let record = self.track(self.fetch_transaction(transaction_id).await)?;

        info!(
            "iPaymu transaction checked: id={}, status={}",
            record.id, record.status
        );
        Ok(record)
    }

    async fn add_transaction(
        &self,
        request: &TransactionRequest,
        alt_payment_account: Option<&str>,
    ) -> IpaymuResult<PaymentSession> {
        info!(
            "Creating iPaymu payment: invoice={}, items={}",
            request.id,
            request.items.products().len()
        );

        let session = self.track(self.submit_payment(request, alt_payment_account).await)?;

        info!(
            "iPaymu payment created: invoice={}, session={}",
            request.id,
            session.session_id.as_deref().unwrap_or("none")
        );
        Ok(session)
    }
}
