//! Gateway status codes
//!
//! Fixed tables mapping the gateway's integer codes to labels. Codes outside
//! the tables fail the lookup instead of falling back to a default, so a
//! change in the gateway contract surfaces as an error.

use crate::error::IpaymuError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Verification level of a gateway account (`StatusUser`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    Unverified,
    Verified,
    Certified,
    CertifiedPremium,
}

impl AccountStatus {
    pub fn code(self) -> i64 {
        match self {
            AccountStatus::Unverified => 0,
            AccountStatus::Verified => 1,
            AccountStatus::Certified => 2,
            AccountStatus::CertifiedPremium => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AccountStatus::Unverified => "UNVERIFIED",
            AccountStatus::Verified => "VERIFIED",
            AccountStatus::Certified => "CERTIFIED",
            AccountStatus::CertifiedPremium => "CERTIFIED_PREMIUM",
        }
    }
}

impl TryFrom<i64> for AccountStatus {
    type Error = IpaymuError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(AccountStatus::Unverified),
            1 => Ok(AccountStatus::Verified),
            2 => Ok(AccountStatus::Certified),
            3 => Ok(AccountStatus::CertifiedPremium),
            _ => Err(IpaymuError::UnknownAccountStatus { code }),
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a gateway transaction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    /// Still being processed by the gateway (-1)
    Processed,
    Pending,
    Success,
    Canceled,
    Refund,
}

impl TransactionStatus {
    pub fn code(self) -> i64 {
        match self {
            TransactionStatus::Processed => -1,
            TransactionStatus::Pending => 0,
            TransactionStatus::Success => 1,
            TransactionStatus::Canceled => 2,
            TransactionStatus::Refund => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransactionStatus::Processed => "PROCESSED",
            TransactionStatus::Pending => "PENDING",
            TransactionStatus::Success => "SUCCESS",
            TransactionStatus::Canceled => "CANCELED",
            TransactionStatus::Refund => "REFUND",
        }
    }

    /// True once the gateway will no longer change this transaction.
    pub fn is_final(self) -> bool {
        matches!(
            self,
            TransactionStatus::Success | TransactionStatus::Canceled | TransactionStatus::Refund
        )
    }
}

impl TryFrom<i64> for TransactionStatus {
    type Error = IpaymuError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            -1 => Ok(TransactionStatus::Processed),
            0 => Ok(TransactionStatus::Pending),
            1 => Ok(TransactionStatus::Success),
            2 => Ok(TransactionStatus::Canceled),
            3 => Ok(TransactionStatus::Refund),
            _ => Err(IpaymuError::UnknownTransactionStatus { code }),
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
