//! Text-scan fallback over the flattened response tree.
//!
//! When direct field lookups come up empty, plausible values are harvested
//! from free text anywhere in the response: name-keyed leaves for the
//! supplier, date-shaped substrings for the date, and decimal substrings
//! plus total-keyed numeric leaves for the amount.

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use tracing::debug;

use crate::models::config::AmountBounds;
use super::flatten::{FlatEntry, FlatLeaf};
use super::locate::acceptable_supplier;
use super::patterns::{AMOUNT_TEXT, DATE_DMY_TEXT, DATE_ISO_TEXT, NAME_KEY, TOTAL_PATH_KEY};
use super::scalars::{parse_amount, parse_date_iso};
use super::score::AmountCandidate;

/// Scan name-keyed string leaves for a plausible supplier name.
pub fn scan_supplier(entries: &[FlatEntry]) -> Option<String> {
    let mut seen: Vec<String> = Vec::new();
    for entry in entries {
        let FlatLeaf::Text(text) = &entry.leaf else {
            continue;
        };
        if !NAME_KEY.is_match(&entry.path) {
            continue;
        }
        let trimmed = text.trim();
        if trimmed.is_empty() || seen.iter().any(|s| s == trimmed) {
            continue;
        }
        seen.push(trimmed.to_string());
    }

    seen.into_iter().find(|name| acceptable_supplier(name))
}

/// Scan every string leaf for date-like substrings; the first one that
/// normalizes wins.
pub fn scan_date(entries: &[FlatEntry]) -> Option<String> {
    let mut found: Vec<String> = Vec::new();
    for entry in entries {
        let FlatLeaf::Text(text) = &entry.leaf else {
            continue;
        };
        for m in DATE_ISO_TEXT
            .find_iter(text)
            .chain(DATE_DMY_TEXT.find_iter(text))
        {
            let raw = m.as_str().to_string();
            if !found.contains(&raw) {
                found.push(raw);
            }
        }
    }

    found.iter().find_map(|raw| parse_date_iso(raw))
}

/// Harvest plausible amount candidates from string and numeric leaves.
///
/// Values outside the plausibility window are discarded at collection
/// time; everything else carries its path and a context snippet into
/// scoring.
pub fn scan_amounts(entries: &[FlatEntry], bounds: &AmountBounds) -> Vec<AmountCandidate> {
    let mut candidates = Vec::new();

    for entry in entries {
        match &entry.leaf {
            FlatLeaf::Text(text) => {
                for m in AMOUNT_TEXT.find_iter(text) {
                    let Some(value) = parse_amount(m.as_str()) else {
                        continue;
                    };
                    if !bounds.contains(value) {
                        continue;
                    }
                    candidates.push(AmountCandidate::new(
                        value,
                        m.as_str(),
                        &entry.path,
                        snippet(text, m.start(), m.end()),
                    ));
                }
            }
            FlatLeaf::Number(n) => {
                if !TOTAL_PATH_KEY.is_match(&entry.path) {
                    continue;
                }
                let Some(value) = Decimal::from_f64(*n) else {
                    continue;
                };
                if !bounds.contains(value) {
                    continue;
                }
                candidates.push(AmountCandidate::new(
                    value,
                    &n.to_string(),
                    &entry.path,
                    entry.path.clone(),
                ));
            }
            _ => {}
        }
    }

    debug!("harvested {} amount candidate(s)", candidates.len());
    candidates
}

/// A short window of text around a match, used for keyword classification.
fn snippet(text: &str, start: usize, end: usize) -> String {
    let from = text[..start]
        .char_indices()
        .rev()
        .nth(39)
        .map(|(i, _)| i)
        .unwrap_or(0);
    let to = text[end..]
        .char_indices()
        .nth(20)
        .map(|(i, _)| end + i)
        .unwrap_or(text.len());
    text[from..to].to_string()
}
