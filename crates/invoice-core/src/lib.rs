//! Core domain types, text parsers, and pricing engine for the invoice bot.
//!
//! This crate is pure: no I/O, no async, no database. It defines:
//!
//! - [`Stage`] - the conversation stages of the invoice dialogue
//! - [`InvoiceDraft`] - the accumulating draft carried between messages
//! - [`parse`] - heuristic parsers for the operator's free-text input
//! - [`pricing`] - deterministic totals computation over a draft
//! - [`currency`] - taka formatting with Indian-style digit grouping
//!
//! # Example
//!
//! ```rust
//! use invoice_core::parse::parse_customer_info;
//!
//! let info = parse_customer_info("Rahul Ahmed, Dhanmondi Road 27, Dhaka 1209, 01712345678")
//!     .expect("valid customer info");
//! assert_eq!(info.name, "Rahul Ahmed");
//! assert_eq!(info.address, "Dhanmondi Road 27, Dhaka 1209");
//! assert_eq!(info.phone, "01712345678");
//! ```

mod draft;
mod error;

pub mod currency;
pub mod parse;
pub mod pricing;

pub use draft::{CustomerInfo, FoundProduct, InvoiceDraft, QuantityEntry, Stage};
pub use error::{ParseStageError, PricingError};
pub use pricing::{compute_totals, LineComputation, Totals};

/// Delivery tariff for addresses inside Dhaka.
pub const DELIVERY_INSIDE_DHAKA: f64 = 60.0;

/// Delivery tariff for addresses outside Dhaka.
pub const DELIVERY_OUTSIDE_DHAKA: f64 = 120.0;
