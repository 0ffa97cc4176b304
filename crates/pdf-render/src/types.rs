//! Wire types for the rendering service.
//!
//! The service takes a flat invoice-shaped JSON document and returns raw
//! PDF bytes on success, or a JSON error body on failure.

use serde::{Deserialize, Serialize};

/// The full invoice payload sent to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoicePayload {
    /// Assigned invoice number, printed verbatim on the document.
    pub invoice_number: String,
    /// Issue date, formatted `DD-MM-YYYY`.
    pub date: String,
    pub customer_name: String,
    pub customer_address: String,
    pub customer_phone: String,
    pub items: Vec<PayloadItem>,
    /// Sum of line amounts after per-row discounts.
    pub net_total: f64,
    /// Flat invoice-level discount.
    pub discount_net: f64,
    pub delivery_charge: f64,
    pub grand_total: f64,
}

/// One line on the printed invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadItem {
    /// 1-based serial number.
    pub sl_no: u32,
    pub item_name: String,
    pub quantity: u32,
    /// Unit price charged.
    pub rate: f64,
    /// Row discount as an amount, not a percentage.
    pub discount_row: f64,
    pub amount: f64,
}

/// JSON error body returned by the service on failure.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    /// Short error message.
    pub error: String,
    /// Extra context, when the service has any.
    #[serde(default)]
    pub details: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_serializes_to_wire_names() {
        let payload = InvoicePayload {
            invoice_number: "202508001".to_string(),
            date: "15-08-2025".to_string(),
            customer_name: "Rahim".to_string(),
            customer_address: "Dhanmondi, Dhaka".to_string(),
            customer_phone: "01712345678".to_string(),
            items: vec![PayloadItem {
                sl_no: 1,
                item_name: "iPhone 15 Pro".to_string(),
                quantity: 2,
                rate: 129900.0,
                discount_row: 12990.0,
                amount: 246810.0,
            }],
            net_total: 246810.0,
            discount_net: 0.0,
            delivery_charge: 60.0,
            grand_total: 246870.0,
        };

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["invoiceNumber"], "202508001");
        assert_eq!(value["netTotal"], 246810.0);
        assert_eq!(value["items"][0]["slNo"], 1);
        assert_eq!(value["items"][0]["itemName"], "iPhone 15 Pro");
        assert_eq!(value["items"][0]["discountRow"], 12990.0);
        assert_eq!(value["grandTotal"], 246870.0);
    }

    #[test]
    fn test_error_body_decodes_with_and_without_details() {
        let short: ErrorBody = serde_json::from_str(r#"{"error": "Missing required fields"}"#).unwrap();
        assert_eq!(short.error, "Missing required fields");
        assert!(short.details.is_none());

        let full: ErrorBody = serde_json::from_str(
            r#"{"error": "Failed to generate PDF", "details": "font not found"}"#,
        )
        .unwrap();
        assert_eq!(full.details.as_deref(), Some("font not found"));
    }
}
