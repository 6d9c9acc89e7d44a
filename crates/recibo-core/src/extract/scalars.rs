//! Scalar normalizers: locale-tolerant amounts and day-first dates.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::{DATE_DMY_FULL, DATE_ISO_FULL};

/// Parse a receipt amount ("12,50", "1 234,56", "1234.56") into a decimal.
///
/// Whitespace (including non-breaking spaces) is stripped and the first
/// comma becomes the decimal point, the comma-as-decimal convention of the
/// target locales. Returns `None` for empty or unparseable input. Values
/// are not rounded here; rounding to two decimal places happens at final
/// selection.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return None;
    }

    let normalized = cleaned.replacen(',', ".", 1);
    Decimal::from_str(&normalized).ok()
}

/// Normalize a date string to zero-padded `YYYY-MM-DD`.
///
/// Accepts ISO-shaped input (`2025-8-7`) and day-first input (`7/8/25`,
/// `07.08.2025`); two-digit years land in the 2000s. Month must be 1-12
/// and day 1-31; the day is deliberately not checked against month length.
pub fn parse_date_iso(raw: &str) -> Option<String> {
    let s = raw.trim();

    if let Some(caps) = DATE_ISO_FULL.captures(s) {
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let day: u32 = caps[3].parse().ok()?;
        return format_iso(year, month, day);
    }

    if let Some(caps) = DATE_DMY_FULL.captures(s) {
        let day: u32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let year: i32 = expand_year(caps[3].parse().ok()?);
        return format_iso(year, month, day);
    }

    None
}

/// Two-digit years are always this century; receipts are not archives.
fn expand_year(year: i32) -> i32 {
    if year < 100 { year + 2000 } else { year }
}

fn format_iso(year: i32, month: u32, day: u32) -> Option<String> {
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }
    Some(format!("{:04}-{:02}-{:02}", year, month, day))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1 234,56"), Decimal::from_str("1234.56").ok());
        assert_eq!(parse_amount("12,50"), Decimal::from_str("12.50").ok());
        assert_eq!(parse_amount("1234.56"), Decimal::from_str("1234.56").ok());
        assert_eq!(parse_amount("45"), Decimal::from_str("45").ok());
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("   "), None);
        assert_eq!(parse_amount("abc"), None);
    }

    #[test]
    fn test_parse_amount_nbsp() {
        assert_eq!(
            parse_amount("1\u{a0}234,56"),
            Decimal::from_str("1234.56").ok()
        );
    }

    #[test]
    fn test_parse_date_day_first() {
        assert_eq!(parse_date_iso("07/08/2025"), Some("2025-08-07".to_string()));
        assert_eq!(parse_date_iso("7.8.25"), Some("2025-08-07".to_string()));
        assert_eq!(parse_date_iso("31-12-2024"), Some("2024-12-31".to_string()));
    }

    #[test]
    fn test_parse_date_iso_passthrough_is_padded() {
        assert_eq!(parse_date_iso("2025-8-7"), Some("2025-08-07".to_string()));
        assert_eq!(parse_date_iso("2025-08-07"), Some("2025-08-07".to_string()));
    }

    #[test]
    fn test_parse_date_rejects_bad_ranges() {
        assert_eq!(parse_date_iso("07/13/2025"), None);
        assert_eq!(parse_date_iso("32/08/2025"), None);
        assert_eq!(parse_date_iso("00/08/2025"), None);
        assert_eq!(parse_date_iso("receipt"), None);
        assert_eq!(parse_date_iso(""), None);
    }

    #[test]
    fn test_date_round_trip() {
        // Day length is deliberately not cross-checked against the month,
        // so every (d, m) pair in range must normalize.
        for day in 1..=31u32 {
            for month in 1..=12u32 {
                let expected = format!("2025-{:02}-{:02}", month, day);
                assert_eq!(
                    parse_date_iso(&format!("{}/{}/25", day, month)),
                    Some(expected.clone())
                );
                assert_eq!(
                    parse_date_iso(&format!("{}/{}/2025", day, month)),
                    Some(expected)
                );
            }
        }
    }
}
