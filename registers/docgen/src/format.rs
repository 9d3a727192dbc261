// Licensed under the Apache-2.0 license

//! Fixed-width hexadecimal rendering for addresses, reset values and sizes.
//!
//! Values are carried as `u128` so registers up to 128 bits wide render
//! without loss.

/// Formats `value` as a Verilog-style sized hex literal.
///
/// The digit count is `ceil(width_bits / 4)`, zero padded, uppercase and
/// grouped by four with underscores. A value that does not fit in the width
/// is rendered in full rather than truncated.
///
/// # Examples
/// ```
/// use mcu_registers_docgen::format::format_number;
/// assert_eq!(format_number(0x10, 32), "32'h0000_0010");
/// assert_eq!(format_number(0xA5, 8), "8'hA5");
/// assert_eq!(format_number(0x3, 10), "10'h003");
/// assert_eq!(format_number(1 << 100, 128), "128'h0000_0010_0000_0000_0000_0000_0000_0000");
/// ```
pub fn format_number(value: u128, width_bits: u32) -> String {
    let nibbles = (width_bits.max(1) as usize).div_ceil(4);
    let digits = format!("{value:0nibbles$X}");
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 4);
    for (i, c) in digits.chars().rev().enumerate() {
        if i % 4 == 0 && i != 0 {
            grouped.push('_');
        }
        grouped.push(c);
    }
    format!(
        "{width_bits}'h{}",
        grouped.chars().rev().collect::<String>()
    )
}

/// Parses a literal produced by [`format_number`] back into `(width, value)`.
pub fn parse_number(literal: &str) -> Option<(u32, u128)> {
    let (width, digits) = literal.split_once("'h")?;
    let width = width.parse().ok()?;
    let digits: String = digits.chars().filter(|c| *c != '_').collect();
    if digits.is_empty() {
        return None;
    }
    let value = u128::from_str_radix(&digits, 16).ok()?;
    Some((width, value))
}

/// Formats a size the way the summary headers show it (`0x40`).
pub fn format_size(value: u64) -> String {
    format!("{value:#x}")
}
