//! Minor-unit money helpers
//!
//! Runway stores every amount as an i64 in pence. These helpers convert
//! between that representation and human-facing decimal strings.

use crate::error::{Error, Result};

/// Format a minor-unit amount as pounds, e.g. `1234567 -> "£12,345.67"`.
pub fn fmt_minor(amount: i64) -> String {
    let negative = amount < 0;
    let abs = amount.unsigned_abs();
    let pounds = abs / 100;
    let pence = abs % 100;

    // Group the pound digits with commas, right to left
    let digits = pounds.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if negative {
        format!("-£{}.{:02}", grouped, pence)
    } else {
        format!("£{}.{:02}", grouped, pence)
    }
}

/// Parse a decimal major-unit string (as found in CSV exports) into minor
/// units. Accepts an optional leading sign, commas as thousands separators,
/// and up to two decimal places: `"1,234.5" -> 123450`.
pub fn parse_minor(s: &str) -> Result<i64> {
    let cleaned: String = s
        .trim()
        .trim_start_matches('£')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    if cleaned.is_empty() {
        return Err(Error::InvalidData("empty amount".to_string()));
    }

    let (sign, body) = match cleaned.strip_prefix('-') {
        Some(rest) => (-1i64, rest),
        None => (1i64, cleaned.as_str()),
    };

    let (whole, frac) = match body.split_once('.') {
        Some((w, f)) => (w, f),
        None => (body, ""),
    };
    if frac.len() > 2 {
        return Err(Error::InvalidData(format!(
            "amount has more than two decimal places: {}",
            s
        )));
    }
    if whole.is_empty() && frac.is_empty() {
        return Err(Error::InvalidData(format!("invalid amount: {}", s)));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::InvalidData(format!("invalid amount: {}", s)));
    }

    let pounds: i64 = if whole.is_empty() {
        0
    } else {
        whole
            .parse()
            .map_err(|_| Error::InvalidData(format!("amount out of range: {}", s)))?
    };
    let mut pence: i64 = if frac.is_empty() { 0 } else { frac.parse().unwrap_or(0) };
    if frac.len() == 1 {
        pence *= 10;
    }

    pounds
        .checked_mul(100)
        .and_then(|p| p.checked_add(pence))
        .and_then(|p| p.checked_mul(sign))
        .ok_or_else(|| Error::InvalidData(format!("amount out of range: {}", s)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_minor() {
        assert_eq!(fmt_minor(0), "£0.00");
        assert_eq!(fmt_minor(5), "£0.05");
        assert_eq!(fmt_minor(123_456), "£1,234.56");
        assert_eq!(fmt_minor(2_500_000), "£25,000.00");
        assert_eq!(fmt_minor(-98_700), "-£987.00");
        assert_eq!(fmt_minor(1_000_000_000), "£10,000,000.00");
    }

    #[test]
    fn test_parse_minor() {
        assert_eq!(parse_minor("1234.56").unwrap(), 123_456);
        assert_eq!(parse_minor("1,234.5").unwrap(), 123_450);
        assert_eq!(parse_minor("£25,000").unwrap(), 2_500_000);
        assert_eq!(parse_minor("-987").unwrap(), -98_700);
        assert_eq!(parse_minor("0.07").unwrap(), 7);
        assert!(parse_minor("").is_err());
        assert!(parse_minor("12.345").is_err());
        assert!(parse_minor("abc").is_err());
    }
}
