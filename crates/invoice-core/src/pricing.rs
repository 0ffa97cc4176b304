//! Deterministic totals computation over a draft.
//!
//! Always recomputes from scratch. Price edits and repeated invocations
//! never patch previous totals incrementally, so there is no drift across
//! edits: same inputs, same outputs.

use crate::draft::{FoundProduct, QuantityEntry};
use crate::error::PricingError;

/// Per-line amounts derived from one quantity entry.
#[derive(Debug, Clone, PartialEq)]
pub struct LineComputation {
    /// Index into the draft's found products.
    pub product_index: usize,
    /// Units ordered.
    pub quantity: u32,
    /// Unit price used (draft copy, including any price edit).
    pub unit_price: f64,
    /// Row discount percentage.
    pub discount_percent: f64,
    /// `unit_price * quantity` before discount.
    pub gross: f64,
    /// Row discount amount.
    pub discount: f64,
    /// `gross - discount`.
    pub net: f64,
}

/// Invoice-level totals plus the per-line breakdown they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Totals {
    /// One computation per quantity entry, in entry order.
    pub lines: Vec<LineComputation>,
    /// Sum of line nets.
    pub subtotal: f64,
    /// Delivery charge applied, echoed from the input.
    pub delivery_charge: f64,
    /// Flat invoice discount applied, echoed from the input.
    pub discount_net: f64,
    /// `subtotal + delivery_charge - discount_net`. May go negative when
    /// the flat discount exceeds everything else; that is accepted input.
    pub grand_total: f64,
}

/// Compute line amounts and invoice totals.
///
/// Every quantity entry must reference a valid position in `products`;
/// a reference past the end means the draft is corrupt (for example a
/// record swept and recreated mid-flow) and yields
/// [`PricingError::InvalidProductIndex`] so the caller can abort the
/// conversation instead of inventing numbers.
pub fn compute_totals(
    products: &[FoundProduct],
    quantities: &[QuantityEntry],
    delivery_charge: f64,
    discount_net: f64,
) -> Result<Totals, PricingError> {
    let mut lines = Vec::with_capacity(quantities.len());
    let mut subtotal = 0.0;

    for entry in quantities {
        let product =
            products
                .get(entry.product_index)
                .ok_or(PricingError::InvalidProductIndex {
                    index: entry.product_index,
                    count: products.len(),
                })?;

        let gross = product.selling_price * f64::from(entry.quantity);
        let discount = gross * entry.discount_percent / 100.0;
        let net = gross - discount;
        subtotal += net;

        lines.push(LineComputation {
            product_index: entry.product_index,
            quantity: entry.quantity,
            unit_price: product.selling_price,
            discount_percent: entry.discount_percent,
            gross,
            discount,
            net,
        });
    }

    let grand_total = subtotal + delivery_charge - discount_net;

    Ok(Totals {
        lines,
        subtotal,
        delivery_charge,
        discount_net,
        grand_total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, price: f64) -> FoundProduct {
        FoundProduct {
            id,
            name: format!("Product {id}"),
            color: "Black".to_string(),
            warranty: "1 Year".to_string(),
            selling_price: price,
        }
    }

    fn entry(index: usize, quantity: u32, discount_percent: f64) -> QuantityEntry {
        QuantityEntry {
            product_index: index,
            quantity,
            discount_percent,
        }
    }

    #[test]
    fn totals_sum_lines_then_delivery_then_discount() {
        let products = vec![product(1, 129900.0), product(2, 24900.0)];
        let quantities = vec![entry(0, 1, 0.0), entry(1, 2, 0.0)];

        let totals = compute_totals(&products, &quantities, 60.0, 0.0).unwrap();
        assert_eq!(totals.subtotal, 129900.0 + 2.0 * 24900.0);
        assert_eq!(totals.grand_total, totals.subtotal + 60.0);
        assert_eq!(totals.lines.len(), 2);
        assert_eq!(totals.lines[1].gross, 49800.0);
    }

    #[test]
    fn row_discount_reduces_line_net() {
        let products = vec![product(1, 1000.0)];
        let quantities = vec![entry(0, 2, 10.0)];

        let totals = compute_totals(&products, &quantities, 0.0, 0.0).unwrap();
        assert_eq!(totals.lines[0].gross, 2000.0);
        assert_eq!(totals.lines[0].discount, 200.0);
        assert_eq!(totals.lines[0].net, 1800.0);
        assert_eq!(totals.subtotal, 1800.0);
    }

    #[test]
    fn recomputation_is_idempotent() {
        let products = vec![product(1, 129900.0), product(2, 24900.0)];
        let quantities = vec![entry(0, 1, 5.0), entry(1, 3, 0.0)];

        let first = compute_totals(&products, &quantities, 120.0, 500.0).unwrap();
        let second = compute_totals(&products, &quantities, 120.0, 500.0).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn flat_discount_may_push_total_negative() {
        let products = vec![product(1, 100.0)];
        let quantities = vec![entry(0, 1, 0.0)];

        let totals = compute_totals(&products, &quantities, 60.0, 500.0).unwrap();
        assert_eq!(totals.grand_total, -340.0);
    }

    #[test]
    fn out_of_range_index_fails_closed() {
        let products = vec![product(1, 100.0)];
        let quantities = vec![entry(0, 1, 0.0), entry(5, 1, 0.0)];

        let err = compute_totals(&products, &quantities, 0.0, 0.0).unwrap_err();
        assert_eq!(err, PricingError::InvalidProductIndex { index: 5, count: 1 });
    }

    #[test]
    fn empty_quantities_yield_zero_subtotal() {
        let totals = compute_totals(&[], &[], 60.0, 0.0).unwrap();
        assert_eq!(totals.subtotal, 0.0);
        assert_eq!(totals.grand_total, 60.0);
    }
}
