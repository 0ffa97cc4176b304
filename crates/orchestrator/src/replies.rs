//! User-facing reply texts.
//!
//! All chat copy lives here so the stage handlers stay readable. Amounts
//! are shown with the taka sign and Indian-style digit grouping.

use invoice_core::currency::format_taka;
use invoice_core::{
    CustomerInfo, FoundProduct, Totals, DELIVERY_INSIDE_DHAKA, DELIVERY_OUTSIDE_DHAKA,
};

/// Greeting and format instructions shown on `/start` and `/new`.
pub const WELCOME: &str = "👋 Welcome to the Invoice Generator Bot!\n\n\
Please provide customer information in one of these formats:\n\n\
Format 1 (comma-separated):\n\
Customer Name, Address, Phone Number\n\n\
Format 2 (line-separated):\n\
Customer Name\n\
Address\n\
Phone Number\n\n\
Example: Rahul Ahmed, Dhanmondi Road 27, Dhaka 1209, 01712345678";

/// Help text shown on `/help`.
pub const HELP_TEXT: &str = "📖 *Help*\n\n\
/start or /new - Start a new invoice\n\
/cancel - Cancel current invoice\n\
/help - Show this help message\n\n\
Phone number format: 01XXXXXXXXX (11 digits starting with 01)";

pub const CANCELLED: &str = "❌ Invoice cancelled. Type /start to create a new invoice.";

pub const UNAUTHORIZED: &str = "❌ You are not authorized to use this bot.";

pub const INVALID_CUSTOMER_FORMAT: &str = "❌ Invalid format. Please use one of these formats:\n\n\
Format 1 (comma-separated):\n\
Customer Name, Address, Phone Number\n\n\
Format 2 (line-separated):\n\
Customer Name\n\
Address\n\
Phone Number";

pub const INVALID_PHONE: &str =
    "❌ Invalid phone number. Please use Bangladesh format: 01XXXXXXXXX (11 digits starting with 01)";

pub const EMPTY_PRODUCT_QUERY: &str = "❌ Please provide at least one product name.";

pub const NO_PRODUCTS_FOUND: &str = "❌ No products found. Please check spelling and try again.";

pub const SEARCH_FAILED: &str = "❌ Error searching products. Please try again.";

pub const INVALID_QUANTITY: &str = "❌ Invalid format. Use: 1=2, 2=1 (product number = quantity)\n\
Add a discount with D: 1=2 D5 (5% off item 1)\n\
Or just 'OK' for 1 unit each";

pub const INVALID_DELIVERY_CHOICE: &str =
    "❌ Invalid choice. Reply 1 for inside Dhaka (৳60) or 2 for outside Dhaka (৳120).";

pub const DISCOUNT_PROMPT: &str =
    "💸 Any discount? Send the discount amount in taka, or 0 for none.";

pub const INVALID_DISCOUNT: &str = "❌ Invalid amount. Send a non-negative number, or 0 for none.";

pub const GENERATING: &str = "⏳ Generating invoice...";

pub const CREATE_FAILED: &str = "❌ Error creating invoice. Please try again.";

pub const INVALID_ITEM_NUMBER: &str = "❌ Invalid item number. Please try again.";

pub const INVALID_CONFIRMATION: &str = "❌ Invalid input. Reply 'OK' to generate invoice\n\
Or edit price: '1 125000' (changes item 1 price to ৳1,25,000)";

/// Sent when a later stage finds earlier-stage data missing, right
/// before the conversation is reset.
pub const START_OVER: &str =
    "❌ Something went wrong with your invoice session. Please type /start to begin again.";

/// Confirmation after customer details parse and validate.
pub fn customer_saved(info: &CustomerInfo) -> String {
    format!(
        "✅ Customer details saved!\n\
         👤 Name: {}\n\
         📍 Address: {}\n\
         📞 Phone: {}\n\n\
         Now send me the product names (one per line or comma-separated)",
        info.name, info.address, info.phone
    )
}

/// Numbered listing of catalog hits plus quantity instructions.
pub fn products_found(products: &[FoundProduct]) -> String {
    let mut message = String::from("Found products:\n\n");
    for (index, product) in products.iter().enumerate() {
        message.push_str(&format!("{}️⃣ {}\n", index + 1, product.name));
        message.push_str(&format!("   Color: {}\n", product.color));
        message.push_str(&format!("   Warranty: {}\n", product.warranty));
        message.push_str(&format!(
            "   Price: {}\n\n",
            format_taka(product.selling_price)
        ));
    }
    message.push_str(
        "Reply with quantity for each:\n\
         Format: 1=2, 2=1 (product number = quantity)\n\
         Add a discount with D: 1=2 D5 (5% off item 1)\n\
         Or just 'OK' for 1 unit each",
    );
    message
}

pub fn invalid_product_number(position: usize, count: usize) -> String {
    format!("❌ Invalid product number: {position}. Please use numbers 1-{count}.")
}

pub fn delivery_prompt() -> String {
    format!(
        "🚚 Delivery charge:\n\n\
         1 - Inside Dhaka ({})\n\
         2 - Outside Dhaka ({})\n\n\
         Reply with 1 or 2",
        format_taka(DELIVERY_INSIDE_DHAKA),
        format_taka(DELIVERY_OUTSIDE_DHAKA)
    )
}

/// Invoice summary shown at the confirmation stage.
///
/// `updated` switches the header used after an in-place price edit.
pub fn summary(products: &[FoundProduct], totals: &Totals, updated: bool) -> String {
    let mut text = if updated {
        String::from("✅ Price updated!\n\n📋 *Updated Invoice Summary*\n━━━━━━━━━━━━━━━━━━\n")
    } else {
        String::from("📋 *Invoice Summary*\n━━━━━━━━━━━━━━━━━━\n")
    };

    for (index, line) in totals.lines.iter().enumerate() {
        let name = &products[line.product_index].name;
        let discount_tag = if line.discount_percent > 0.0 {
            format!(" (D{}%)", trim_percent(line.discount_percent))
        } else {
            String::new()
        };
        text.push_str(&format!(
            "{}. {} x{}{} — {}\n",
            index + 1,
            name,
            line.quantity,
            discount_tag,
            format_taka(line.net)
        ));
    }

    text.push_str(&format!("\nSubtotal: {}\n", format_taka(totals.subtotal)));
    text.push_str(&format!("Delivery: {}\n", format_taka(totals.delivery_charge)));
    text.push_str(&format!("Discount: {}\n", format_taka(totals.discount_net)));
    text.push_str("━━━━━━━━━━━━━━━━━━\n");
    text.push_str(&format!("💰 Total: {}\n\n", format_taka(totals.grand_total)));

    if updated {
        text.push_str("Reply 'OK' to confirm");
    } else {
        text.push_str(
            "Reply 'OK' to generate invoice\n\
             Or edit price: '1 125000' (changes item 1 price to ৳1,25,000)",
        );
    }

    text
}

/// Caption attached to the delivered PDF.
pub fn pdf_caption(invoice_number: &str, date: &str, total: f64) -> String {
    format!(
        "✅ Invoice generated successfully!\n\
         📄 Invoice Number: {}\n\
         📅 Date: {}\n\
         💰 Total: {}",
        invoice_number,
        date,
        format_taka(total)
    )
}

/// Sent when the invoice row exists but the PDF could not be produced
/// or delivered.
pub fn saved_but_no_pdf(invoice_number: &str) -> String {
    format!(
        "❌ Invoice {invoice_number} was saved, but the PDF could not be generated. Please try again."
    )
}

fn trim_percent(pct: f64) -> String {
    if pct.fract() == 0.0 {
        format!("{pct:.0}")
    } else {
        format!("{pct}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use invoice_core::{compute_totals, QuantityEntry};

    fn sample_products() -> Vec<FoundProduct> {
        vec![
            FoundProduct {
                id: 1,
                name: "iPhone 15 Pro".to_string(),
                color: "Space Black".to_string(),
                warranty: "1 Year".to_string(),
                selling_price: 129900.0,
            },
            FoundProduct {
                id: 2,
                name: "AirPods Pro (2nd Gen)".to_string(),
                color: "White".to_string(),
                warranty: "1 Year".to_string(),
                selling_price: 24900.0,
            },
        ]
    }

    #[test]
    fn test_products_found_lists_details() {
        let text = products_found(&sample_products());

        assert!(text.starts_with("Found products:"));
        assert!(text.contains("1️⃣ iPhone 15 Pro"));
        assert!(text.contains("   Price: ৳1,29,900"));
        assert!(text.contains("2️⃣ AirPods Pro (2nd Gen)"));
        assert!(text.contains("Or just 'OK' for 1 unit each"));
    }

    #[test]
    fn test_summary_shows_all_totals_lines() {
        let products = sample_products();
        let quantities = vec![
            QuantityEntry {
                product_index: 0,
                quantity: 2,
                discount_percent: 0.0,
            },
            QuantityEntry {
                product_index: 1,
                quantity: 1,
                discount_percent: 10.0,
            },
        ];
        let totals = compute_totals(&products, &quantities, 60.0, 500.0).unwrap();

        let text = summary(&products, &totals, false);
        assert!(text.contains("📋 *Invoice Summary*"));
        assert!(text.contains("1. iPhone 15 Pro x2 — ৳2,59,800"));
        assert!(text.contains("2. AirPods Pro (2nd Gen) x1 (D10%) — ৳22,410"));
        assert!(text.contains("Subtotal: ৳2,82,210"));
        assert!(text.contains("Delivery: ৳60"));
        assert!(text.contains("Discount: ৳500"));
        assert!(text.contains("💰 Total: ৳2,81,770"));
        assert!(text.contains("Reply 'OK' to generate invoice"));
    }

    #[test]
    fn test_updated_summary_switches_header_and_footer() {
        let products = sample_products();
        let quantities = vec![QuantityEntry {
            product_index: 0,
            quantity: 1,
            discount_percent: 0.0,
        }];
        let totals = compute_totals(&products, &quantities, 60.0, 0.0).unwrap();

        let text = summary(&products, &totals, true);
        assert!(text.starts_with("✅ Price updated!"));
        assert!(text.contains("*Updated Invoice Summary*"));
        assert!(text.ends_with("Reply 'OK' to confirm"));
    }

    #[test]
    fn test_pdf_caption() {
        let caption = pdf_caption("202508001", "15-08-2025", 282270.0);
        assert!(caption.contains("📄 Invoice Number: 202508001"));
        assert!(caption.contains("📅 Date: 15-08-2025"));
        assert!(caption.contains("💰 Total: ৳2,82,270"));
    }
}
