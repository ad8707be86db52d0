//! Payment gateway implementations
//!
//! Concrete implementations of the PaymentGateway trait.

pub mod ipaymu;

pub use ipaymu::IpaymuClient;
