//! Payment gateway integration module
//!
//! Domain types, status tables and the gateway client implementations.

pub mod providers;
pub mod status;
pub mod traits;
pub mod types;
