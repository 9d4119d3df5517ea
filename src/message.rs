//! Chat deep-link message templates.
//!
//! Checkout hands the customer off to the support chat with a pre-filled
//! order summary; ambassadors use a similar link to request withdrawals. The
//! chat application itself is external - this module only builds the text and
//! the percent-encoded link.

use crate::core::currency::format_amount;
use crate::entities::{order, user};

/// Pre-filled chat text summarizing a fresh order: customer, phone, payment
/// reference, itemized cart and total.
#[must_use]
pub fn order_message(order: &order::Model) -> String {
    let mut message = String::from("*NEW ORDER*\n\n");
    message.push_str(&format!("Customer: {}\n", order.name));
    message.push_str(&format!("Phone: {}\n", order.phone));
    message.push_str(&format!(
        "Payment ref: {} ({})\n",
        order.payment_ref,
        order.method.as_str().to_uppercase()
    ));
    message.push_str("\nITEMS:\n");
    for item in &order.items.0 {
        message.push_str(&format!(
            "- {} : {}\n",
            item.name,
            format_amount(item.unit_price)
        ));
    }
    message.push_str(&format!("\nTOTAL: {}\n", format_amount(order.amount)));
    message.push_str("I confirm the payment has been made.");
    message
}

/// Pre-filled chat text for an ambassador withdrawal request.
#[must_use]
pub fn withdrawal_message(user: &user::Model) -> String {
    format!(
        "Hello, I am ambassador {} and I would like to withdraw from my balance of {}.",
        user.name,
        format_amount(user.balance)
    )
}

/// Appends a pre-filled `text` parameter to a chat deep-link base.
#[must_use]
pub fn chat_deep_link(base: &str, text: &str) -> String {
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{base}{separator}text={}", percent_encode(text))
}

/// Minimal RFC 3986 percent-encoding: unreserved characters pass through,
/// everything else is encoded byte-wise.
fn percent_encode(input: &str) -> String {
    let mut encoded = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char);
            }
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}
