//! Taka formatting with Indian-style digit grouping.
//!
//! Chat replies show amounts like `৳1,29,900`: the last three digits form
//! one group, every group above that has two. Fractions appear only when
//! present, to at most two places.

/// Format an amount with the taka sign and Indian-style grouping.
pub fn format_taka(amount: f64) -> String {
    format!("৳{}", format_amount(amount))
}

fn format_amount(amount: f64) -> String {
    let rounded = (amount * 100.0).round() / 100.0;
    let negative = rounded < 0.0;
    let cents = (rounded.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let fraction = cents % 100;

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&group_indian(whole));
    if fraction != 0 {
        if fraction % 10 == 0 {
            out.push_str(&format!(".{}", fraction / 10));
        } else {
            out.push_str(&format!(".{fraction:02}"));
        }
    }
    out
}

fn group_indian(n: u64) -> String {
    let digits = n.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}
