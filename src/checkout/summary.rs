//! Order message formatting
//!
//! Produces the text handed to the notification sink when an order is
//! placed. Amounts are whole rupees printed with Indian digit grouping.

use super::models::FulfillmentChoice;
use super::validation::ShippingDetails;
use crate::cart::models::CartItem;
use std::fmt::Write;

/// Formats `amount` the way `en-IN` does: `1,00,000`.
pub fn format_inr(amount: u64) -> String {
    let digits = amount.to_string();
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

/// One bullet line: `• Name (1g) x2 - ₹998`.
fn item_line(item: &CartItem) -> String {
    let weight = item
        .weight
        .as_deref()
        .filter(|w| !w.trim().is_empty())
        .map(|w| format!(" ({})", w))
        .unwrap_or_default();
    format!(
        "• {}{} x{} - ₹{}",
        item.name,
        weight,
        item.quantity,
        format_inr(item.subtotal())
    )
}

/// Builds the order message for `items`.
pub fn format_order_summary(
    store_name: &str,
    items: &[CartItem],
    total: u64,
    details: &ShippingDetails,
    choice: FulfillmentChoice,
) -> String {
    let item_lines = items.iter().map(item_line).collect::<Vec<_>>().join("\n");

    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, "🛒 *New Order from {}*", store_name);
    let _ = writeln!(out);
    let _ = writeln!(out, "📋 *Order Details*");
    let _ = writeln!(out, "{}", item_lines);
    let _ = writeln!(out, "*Total: ₹{}*", format_inr(total));
    let _ = writeln!(out);
    let _ = writeln!(out, "👤 *Customer Information*");
    let _ = writeln!(out, "Name: {}", details.full_name);
    let _ = writeln!(out, "Phone: {}", details.phone);
    let _ = writeln!(out, "Email: {}", details.email);
    let _ = writeln!(out);
    let _ = writeln!(out, "📍 *Shipping Address*");
    let _ = writeln!(out, "{}", details.address_line1);
    if let Some(line2) = details.address_line2() {
        let _ = writeln!(out, "{}", line2);
    }
    let _ = writeln!(
        out,
        "{}, {} - {}",
        details.city, details.state, details.pin_code
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "💳 *Payment Method*");
    out.push_str(choice.label());
    out
}
