//! Warehouse slot codes
//!
//! A slot code is the two-character bin a package sits in, derived from the
//! trailing digits of its tracking number: the penultimate digit followed by
//! a letter bucket for the last digit.

/// Slot code used when a tracking number carries fewer than two digits
pub const FALLBACK_SLOT_CODE: &str = "0A";

/// Derive the warehouse slot code for a tracking number.
///
/// Non-digit characters are ignored. The last digit maps to a letter:
/// `0..=2` → `A`, `3..=5` → `B`, anything else → `C`.
///
/// ```
/// use shared::slot::derive_slot_code;
///
/// assert_eq!(derive_slot_code("WEX123456789"), "8C");
/// assert_eq!(derive_slot_code("AB"), "0A");
/// ```
pub fn derive_slot_code(tracking_number: &str) -> String {
    let digits: Vec<char> = tracking_number
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();

    let [.., penultimate, last] = digits.as_slice() else {
        return FALLBACK_SLOT_CODE.to_string();
    };

    let mut code = String::with_capacity(2);
    code.push(*penultimate);
    code.push(slot_letter(last.to_digit(10)));
    code
}

/// Letter bucket for the last digit of a tracking number
fn slot_letter(last_digit: Option<u32>) -> char {
    match last_digit {
        Some(0..=2) => 'A',
        Some(3..=5) => 'B',
        _ => 'C',
    }
}
