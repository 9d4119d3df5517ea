//! Currency display helpers.
//!
//! Amounts are carried as integers in the smallest currency unit; formatting
//! groups thousands with spaces the way local receipts print them.

/// Formats an amount with thousands grouping and the currency tag.
///
/// `15000` becomes `"15 000 F"`.
#[must_use]
pub fn format_amount(amount: i64) -> String {
    format!("{} F", group_thousands(amount))
}

fn group_thousands(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if amount < 0 {
        grouped.push('-');
    }
    let offset = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - offset) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount_groups_thousands() {
        assert_eq!(format_amount(0), "0 F");
        assert_eq!(format_amount(500), "500 F");
        assert_eq!(format_amount(5000), "5 000 F");
        assert_eq!(format_amount(15000), "15 000 F");
        assert_eq!(format_amount(1_234_567), "1 234 567 F");
    }

    #[test]
    fn test_format_amount_negative() {
        assert_eq!(format_amount(-1000), "-1 000 F");
    }
}
