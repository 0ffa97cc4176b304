//! Conversation stages and the accumulating invoice draft.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseStageError;

/// The position of a conversation in the invoice dialogue.
///
/// Stages advance linearly; invalid input re-prompts without advancing.
/// The string encoding (`awaiting_customer_info`, ...) is stored in the
/// database and must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Waiting for name, address, and phone.
    AwaitingCustomerInfo,
    /// Waiting for product names to search the catalog.
    AwaitingProducts,
    /// Waiting for per-product quantities (and optional row discounts).
    AwaitingQuantity,
    /// Waiting for the delivery zone choice.
    AwaitingDeliveryCharge,
    /// Waiting for the flat invoice-level discount amount.
    AwaitingDiscount,
    /// Waiting for final confirmation or a price edit.
    AwaitingConfirmation,
}

impl Stage {
    /// Stable string encoding used for storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::AwaitingCustomerInfo => "awaiting_customer_info",
            Stage::AwaitingProducts => "awaiting_products",
            Stage::AwaitingQuantity => "awaiting_quantity",
            Stage::AwaitingDeliveryCharge => "awaiting_delivery_charge",
            Stage::AwaitingDiscount => "awaiting_discount",
            Stage::AwaitingConfirmation => "awaiting_confirmation",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = ParseStageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "awaiting_customer_info" => Ok(Stage::AwaitingCustomerInfo),
            "awaiting_products" => Ok(Stage::AwaitingProducts),
            "awaiting_quantity" => Ok(Stage::AwaitingQuantity),
            "awaiting_delivery_charge" => Ok(Stage::AwaitingDeliveryCharge),
            "awaiting_discount" => Ok(Stage::AwaitingDiscount),
            "awaiting_confirmation" => Ok(Stage::AwaitingConfirmation),
            other => Err(ParseStageError(other.to_string())),
        }
    }
}

/// Parsed customer details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    /// Customer name.
    pub name: String,
    /// Delivery address.
    pub address: String,
    /// Phone, normalized to the local 11-digit form (no prefix, no dashes).
    pub phone: String,
}

/// A catalog snapshot captured into the draft at search time.
///
/// The draft owns this copy; a price edit during confirmation changes the
/// copy only, never the catalog row it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoundProduct {
    /// Catalog row id.
    pub id: i64,
    /// Product name.
    pub name: String,
    /// Color variant.
    pub color: String,
    /// Warranty terms.
    pub warranty: String,
    /// Unit price at search time (or as overridden by a price edit).
    pub selling_price: f64,
}

/// One quantity directive: which found product, how many, what row discount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantityEntry {
    /// 0-based index into the draft's `found_products`.
    pub product_index: usize,
    /// Units ordered.
    pub quantity: u32,
    /// Row-level percentage discount (0 when not given).
    #[serde(default)]
    pub discount_percent: f64,
}

/// The accumulating, not-yet-finalized invoice data attached to a
/// conversation.
///
/// Fields fill in as stages advance; each stage handler validates the
/// fields it needs and fails closed when they are absent. The whole draft
/// is stored as one JSON document and always carried forward wholesale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceDraft {
    /// Set once customer info is accepted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_info: Option<CustomerInfo>,
    /// Catalog snapshots in search-result order; duplicates preserved.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub found_products: Vec<FoundProduct>,
    /// Quantity directives referencing `found_products` by position.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub quantities: Vec<QuantityEntry>,
    /// Flat delivery charge once the zone is chosen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_charge: Option<f64>,
    /// Flat invoice-level discount once given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_net: Option<f64>,
    /// Last computed subtotal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<f64>,
    /// Last computed grand total.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_round_trips_through_storage_encoding() {
        let stages = [
            Stage::AwaitingCustomerInfo,
            Stage::AwaitingProducts,
            Stage::AwaitingQuantity,
            Stage::AwaitingDeliveryCharge,
            Stage::AwaitingDiscount,
            Stage::AwaitingConfirmation,
        ];
        for stage in stages {
            assert_eq!(stage.as_str().parse::<Stage>().unwrap(), stage);
        }
        assert!("awaiting_pizza".parse::<Stage>().is_err());
    }

    #[test]
    fn draft_json_round_trip_preserves_fields() {
        let draft = InvoiceDraft {
            customer_info: Some(CustomerInfo {
                name: "Rahim".to_string(),
                address: "Mirpur 10".to_string(),
                phone: "01812345678".to_string(),
            }),
            found_products: vec![FoundProduct {
                id: 7,
                name: "iPhone 15 Pro".to_string(),
                color: "Space Black".to_string(),
                warranty: "1 Year".to_string(),
                selling_price: 129900.0,
            }],
            quantities: vec![QuantityEntry {
                product_index: 0,
                quantity: 2,
                discount_percent: 5.0,
            }],
            delivery_charge: Some(60.0),
            discount_net: Some(0.0),
            subtotal: None,
            total: None,
        };

        let json = serde_json::to_string(&draft).unwrap();
        let back: InvoiceDraft = serde_json::from_str(&json).unwrap();
        assert_eq!(back, draft);
    }

    #[test]
    fn empty_draft_deserializes_from_empty_object() {
        let draft: InvoiceDraft = serde_json::from_str("{}").unwrap();
        assert_eq!(draft, InvoiceDraft::default());
    }
}
