//! Client for the external invoice PDF rendering service.
//!
//! The service accepts a flat JSON payload describing one invoice and
//! answers with raw PDF bytes. Layout and formatting live entirely on
//! the service side; this crate only speaks the wire contract.
//!
//! # Example
//!
//! ```no_run
//! use pdf_render::{InvoicePayload, PayloadItem, RenderClient, RenderConfig};
//!
//! # async fn example() -> Result<(), pdf_render::RenderError> {
//! let client = RenderClient::new(RenderConfig::new("http://localhost:3000/api/generate-invoice-pdf"))?;
//!
//! let payload = InvoicePayload {
//!     invoice_number: "202508001".to_string(),
//!     date: "15-08-2025".to_string(),
//!     customer_name: "Rahim".to_string(),
//!     customer_address: "Dhanmondi, Dhaka".to_string(),
//!     customer_phone: "01712345678".to_string(),
//!     items: vec![],
//!     net_total: 0.0,
//!     discount_net: 0.0,
//!     delivery_charge: 0.0,
//!     grand_total: 0.0,
//! };
//!
//! let pdf = client.render(&payload).await?;
//! std::fs::write("202508001.pdf", pdf).ok();
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::RenderClient;
pub use config::RenderConfig;
pub use error::RenderError;
pub use types::{ErrorBody, InvoicePayload, PayloadItem};
