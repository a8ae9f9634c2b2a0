//! Rupiah formatting for the table's money columns.

/// Format an amount as Indonesian Rupiah with no decimals: `Rp1.000.000`.
///
/// The amount is rounded half away from zero. Non-finite input formats as
/// `Rp0`; negative amounts keep a leading minus (`-Rp500`) even though
/// validated documents never contain them.
pub fn format_rupiah(amount: f64) -> String {
    if !amount.is_finite() {
        return "Rp0".to_string();
    }
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());
    let grouped = group_thousands(&digits, '.');
    if rounded < 0.0 {
        format!("-Rp{grouped}")
    } else {
        format!("Rp{grouped}")
    }
}

/// Insert `separator` between every group of three digits, from the right.
fn group_thousands(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(format_rupiah(1_000_000.0), "Rp1.000.000");
        assert_eq!(format_rupiah(1000.0), "Rp1.000");
        assert_eq!(format_rupiah(999.0), "Rp999");
        assert_eq!(format_rupiah(12_345_678.0), "Rp12.345.678");
    }

    #[test]
    fn zero_and_rounding() {
        assert_eq!(format_rupiah(0.0), "Rp0");
        assert_eq!(format_rupiah(1499.5), "Rp1.500");
        assert_eq!(format_rupiah(0.4), "Rp0");
        assert_eq!(format_rupiah(-0.4), "Rp0");
    }

    #[test]
    fn negative_and_non_finite() {
        assert_eq!(format_rupiah(-2500.0), "-Rp2.500");
        assert_eq!(format_rupiah(f64::NAN), "Rp0");
        assert_eq!(format_rupiah(f64::INFINITY), "Rp0");
    }
}
