//! Payment gateway types and data structures
//!
//! Value objects returned by the domain operations and the inputs for
//! creating a payment.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

pub use crate::payments::status::{AccountStatus, TransactionStatus};

/// Raw field mapping of a gateway reply.
pub type RawFields = serde_json::Map<String, serde_json::Value>;

/// Gateway account summary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    pub username: String,
    /// Balance in whole rupiah
    pub balance: i64,
    pub status: AccountStatus,
}

/// Transaction as reported by the gateway
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionRecord {
    pub id: String,
    pub status: TransactionStatus,
    pub description: String,
    pub sender: String,
    pub receiver: String,
    pub amount: f64,
    pub timestamp: DateTime<FixedOffset>,
    /// Transaction type, always uppercase
    #[serde(rename = "type")]
    pub kind: String,
}

/// A purchasable line item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub name: String,
    pub price: f64,
    pub quantity: u32,
    #[serde(default)]
    pub description: Option<String>,
    /// Price in the alternate payment method's currency (e.g. USD for PayPal)
    #[serde(default)]
    pub price_in_alt_currency: Option<f64>,
}

impl Product {
    pub fn new(name: impl Into<String>, price: f64, quantity: u32) -> Self {
        Self {
            name: name.into(),
            price,
            quantity,
            description: None,
            price_in_alt_currency: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_alt_currency_price(mut self, price: f64) -> Self {
        self.price_in_alt_currency = Some(price);
        self
    }
}

/// Line items of a payment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum LineItems {
    /// Sent as scalar `product`/`price`/`quantity` fields
    Single(Product),
    /// Sent as indexed `product[i]`/`price[i]`/... fields, in order
    Multiple(Vec<Product>),
}

impl LineItems {
    pub fn products(&self) -> &[Product] {
        match self {
            LineItems::Single(product) => std::slice::from_ref(product),
            LineItems::Multiple(products) => products,
        }
    }
}

/// Request for creating a payment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionRequest {
    /// Invoice number
    pub id: String,
    pub items: LineItems,
}

impl TransactionRequest {
    pub fn single(id: impl Into<String>, product: Product) -> Self {
        Self {
            id: id.into(),
            items: LineItems::Single(product),
        }
    }

    pub fn multiple(id: impl Into<String>, products: Vec<Product>) -> Self {
        Self {
            id: id.into(),
            items: LineItems::Multiple(products),
        }
    }
}

/// Successful reply to a payment submission
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentSession {
    /// Session the buyer completes the payment in, when the gateway returns one
    pub session_id: Option<String>,
    /// Unmodified reply fields
    pub fields: RawFields,
}
