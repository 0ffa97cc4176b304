//! Heuristic parsers for the operator's free-text input.
//!
//! These encode deliberate, tested policy for ambiguous input (especially
//! the address/phone split). The fallback order inside
//! [`parse_customer_info`] is load-bearing: reordering it changes which
//! interpretation wins for inputs that several phases could match.

use std::sync::LazyLock;

use regex::Regex;

use crate::draft::{CustomerInfo, QuantityEntry};
use crate::{DELIVERY_INSIDE_DHAKA, DELIVERY_OUTSIDE_DHAKA};

/// Phone match tolerating a dash between any two digits.
static PHONE_DASHED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\+?88)?0?1(?:-?[0-9]){9}").unwrap());

/// Phone match on plain digits only.
static PHONE_PLAIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\+?88)?0?1[0-9]{9}").unwrap());

/// Full-token phone match, applied after dash stripping.
static PHONE_EXACT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\+?88)?0?1[0-9]{9}$").unwrap());

/// Normalized local phone: exactly 11 digits starting with 01.
static PHONE_VALID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^01[0-9]{9}$").unwrap());

/// Quantity directive: `<position>=<quantity>`.
static QTY_DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)\s*=\s*(\d+)").unwrap());

/// Row discount directive: `D<percent>`.
static ROW_DISCOUNT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bd\s*(\d+)").unwrap());

/// Price edit directive: `<item> <new price>`.
static PRICE_EDIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)\s+(\d+)").unwrap());

/// A parsed price-edit directive. `item_number` is 1-based as typed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceEdit {
    /// 1-based position into the draft's quantity list.
    pub item_number: usize,
    /// Replacement unit price.
    pub new_price: f64,
}

/// Parse customer details out of free text.
///
/// Accepted shapes:
///
/// 1. Comma-separated: everything before the first comma is the name, and
///    the phone is located inside the remainder by a four-phase cascade:
///    a dash-tolerant pattern match anywhere, then a plain-digit match,
///    then splitting at the last period, then taking the final
///    whitespace/comma-delimited token when it is exactly a phone.
///    Whatever precedes the phone, trailing punctuation trimmed, is the
///    address.
/// 2. Three or more non-empty lines: `Name\nAddress\nPhone`.
///
/// With two or more commas the comma shape wins outright. With a single
/// comma the line shape takes precedence, so a comma inside an address
/// line is not pulled up into the name.
///
/// The returned phone is normalized (dashes, whitespace, and a `+88`/`88`
/// country prefix stripped) but not yet validated; run [`is_valid_phone`]
/// on it before accepting the result.
///
/// Returns `None` when no shape matches, so the caller re-prompts instead
/// of guessing.
pub fn parse_customer_info(text: &str) -> Option<CustomerInfo> {
    let comma = parse_comma_shape(text);
    if comma.is_some() && text.matches(',').count() >= 2 {
        return comma;
    }

    let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    if lines.len() >= 3 {
        return Some(CustomerInfo {
            name: lines[0].to_string(),
            address: lines[1].to_string(),
            phone: normalize_phone(lines[2]),
        });
    }

    comma
}

fn parse_comma_shape(text: &str) -> Option<CustomerInfo> {
    let comma = text.find(',')?;
    let name = text[..comma].trim();
    let remainder = text[comma + 1..].trim();
    if name.is_empty() || remainder.is_empty() {
        return None;
    }

    let (address_part, phone) = split_address_phone(remainder)?;
    let address = trim_address(address_part);
    if address.is_empty() {
        return None;
    }

    Some(CustomerInfo {
        name: name.to_string(),
        address: address.to_string(),
        phone: normalize_phone(&phone),
    })
}

/// Locate the phone inside the post-name remainder.
///
/// Phases run in order; the first hit wins. Returns the text before the
/// phone (untrimmed) and the phone as matched.
fn split_address_phone(remainder: &str) -> Option<(&str, String)> {
    // Phase 1: dash-tolerant match anywhere.
    if let Some(m) = PHONE_DASHED.find(remainder) {
        return Some((&remainder[..m.start()], m.as_str().to_string()));
    }

    // Phase 2: plain digits anywhere.
    if let Some(m) = PHONE_PLAIN.find(remainder) {
        return Some((&remainder[..m.start()], m.as_str().to_string()));
    }

    // Phase 3: everything before the last period is address, the rest is
    // the phone candidate (validation happens later).
    if let Some(dot) = remainder.rfind('.') {
        let candidate = remainder[dot + 1..].trim();
        if !candidate.is_empty() {
            return Some((&remainder[..dot], candidate.to_string()));
        }
    }

    // Phase 4: final whitespace/comma-delimited token, accepted only when
    // it is exactly a phone once dashes are stripped.
    let token_start = remainder
        .char_indices()
        .filter(|(_, c)| c.is_whitespace() || *c == ',')
        .map(|(i, c)| i + c.len_utf8())
        .last()
        .unwrap_or(0);
    let token = remainder[token_start..].trim();
    if !token.is_empty() && PHONE_EXACT.is_match(&token.replace('-', "")) {
        return Some((&remainder[..token_start], token.to_string()));
    }

    None
}

fn trim_address(s: &str) -> &str {
    s.trim_end_matches(|c: char| c.is_whitespace() || c == ',' || c == '.')
        .trim_start()
}

/// Strip whitespace, dashes, and a leading `+88`/`88` country prefix.
pub fn normalize_phone(raw: &str) -> String {
    let stripped: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();
    if let Some(rest) = stripped.strip_prefix("+88") {
        rest.to_string()
    } else if let Some(rest) = stripped.strip_prefix("88") {
        rest.to_string()
    } else {
        stripped
    }
}

/// Whether the input normalizes to a valid local phone (11 digits, `01`
/// prefix).
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_VALID.is_match(&normalize_phone(phone))
}

/// Split a product query message into individual search terms.
///
/// Splits on commas and newlines, trims, and drops empties. Each term
/// becomes one catalog search.
pub fn tokenize_product_query(text: &str) -> Vec<String> {
    text.split([',', '\n'])
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse quantity directives against `product_count` found products.
///
/// `ok` (any case) means one unit of every product in catalog order with
/// no discount. Otherwise every `<n>=<qty>` directive adds an entry
/// (positions are 1-based as displayed), whether or not commas separate
/// them, and a `D<pct>` token sets the row discount of the most recent
/// entry. Text matching neither pattern is skipped; if nothing matches at
/// all the input is rejected.
///
/// Positions are not range-checked here; the caller validates them against
/// the draft before accepting.
pub fn parse_quantities(text: &str, product_count: usize) -> Option<Vec<QuantityEntry>> {
    if text.trim().eq_ignore_ascii_case("ok") {
        return Some(
            (0..product_count)
                .map(|i| QuantityEntry {
                    product_index: i,
                    quantity: 1,
                    discount_percent: 0.0,
                })
                .collect(),
        );
    }

    let mut entries = Vec::new();
    for token in text.split(',') {
        // A token may carry several directives ("1=2 3=4"); take them all.
        for caps in QTY_DIRECTIVE.captures_iter(token) {
            if let (Ok(position), Ok(quantity)) =
                (caps[1].parse::<usize>(), caps[2].parse::<u32>())
            {
                if position >= 1 {
                    entries.push(QuantityEntry {
                        product_index: position - 1,
                        quantity,
                        discount_percent: 0.0,
                    });
                }
            }
        }
        if let Some(caps) = ROW_DISCOUNT.captures(token) {
            if let (Ok(percent), Some(last)) = (caps[1].parse::<u32>(), entries.last_mut()) {
                last.discount_percent = f64::from(percent);
            }
        }
    }

    if entries.is_empty() {
        None
    } else {
        Some(entries)
    }
}

/// Parse a price-edit directive: two whitespace-separated integers,
/// `<item> <new price>`. The item position is returned as typed (1-based);
/// the caller range-checks it against the quantity list.
pub fn parse_price_edit(text: &str) -> Option<PriceEdit> {
    let caps = PRICE_EDIT.captures(text)?;
    let item_number: usize = caps[1].parse().ok()?;
    let new_price: u64 = caps[2].parse().ok()?;
    Some(PriceEdit {
        item_number,
        new_price: new_price as f64,
    })
}

/// Map a delivery zone choice to its tariff.
///
/// `1` or anything mentioning "inside" selects the inside-Dhaka rate, `2`
/// or "outside" the outside rate. Case-insensitive.
pub fn parse_delivery_choice(text: &str) -> Option<f64> {
    let t = text.trim().to_lowercase();
    if t == "1" || t.contains("inside") {
        return Some(DELIVERY_INSIDE_DHAKA);
    }
    if t == "2" || t.contains("outside") {
        return Some(DELIVERY_OUTSIDE_DHAKA);
    }
    None
}

/// Parse a flat discount amount: any non-negative numeric literal.
pub fn parse_flat_discount(text: &str) -> Option<f64> {
    let amount: f64 = text.trim().parse().ok()?;
    if amount.is_finite() && amount >= 0.0 {
        Some(amount)
    } else {
        None
    }
}
