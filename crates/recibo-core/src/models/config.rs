//! Configuration structures for the normalization pipeline.
//!
//! The scoring weights are hand-tuned against real receipts and carry no
//! authority beyond "worked on the corpus so far"; they live here as data
//! so they can be adjusted from a config file without touching the
//! selection algorithm.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Main configuration for the recibo pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReciboConfig {
    /// Amount candidate scoring weights.
    pub scoring: ScoringConfig,

    /// Plausibility bounds for amount candidates.
    pub bounds: AmountBounds,

    /// Minimum accepted base64 image payload length.
    pub min_image_base64_len: usize,
}

impl Default for ReciboConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            bounds: AmountBounds::default(),
            min_image_base64_len: recibo_recognition::DEFAULT_MIN_IMAGE_BASE64_LEN,
        }
    }
}

/// Score weights for amount candidate classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Penalty for reservation/pre-authorization vocabulary.
    pub reservation_penalty: f64,

    /// Bonus for fuel-supply total vocabulary.
    pub supply_total_bonus: f64,

    /// Bonus for amount-to-pay vocabulary.
    pub payment_bonus: f64,

    /// Bonus for a currency symbol or code near the value.
    pub currency_bonus: f64,

    /// Bonus for generic total vocabulary with no more specific signal.
    pub generic_total_bonus: f64,

    /// Penalty for pre-tax subtotal vocabulary.
    pub tax_base_penalty: f64,

    /// Penalty for tax/VAT amount vocabulary.
    pub tax_amount_penalty: f64,

    /// Bonus when a candidate equals some net + tax pair.
    pub sum_match_bonus: f64,

    /// Tolerance for the net + tax cross-check.
    pub sum_tolerance: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            reservation_penalty: -12.0,
            supply_total_bonus: 10.0,
            payment_bonus: 8.0,
            currency_bonus: 3.0,
            generic_total_bonus: 1.0,
            tax_base_penalty: -6.0,
            tax_amount_penalty: -6.0,
            sum_match_bonus: 5.0,
            sum_tolerance: 0.02,
        }
    }
}

/// Plausibility bounds for believable receipt totals.
///
/// Stray numbers outside this window (card numbers, reference numbers,
/// quantities) are discarded before scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AmountBounds {
    /// Exclusive lower bound.
    pub min: f64,

    /// Exclusive upper bound.
    pub max: f64,
}

impl Default for AmountBounds {
    fn default() -> Self {
        Self {
            min: 0.2,
            max: 20000.0,
        }
    }
}

impl AmountBounds {
    /// Whether a value falls strictly inside the window.
    pub fn contains(&self, value: Decimal) -> bool {
        value
            .to_f64()
            .map(|v| v > self.min && v < self.max)
            .unwrap_or(false)
    }
}

impl ReciboConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_bounds_are_exclusive() {
        let bounds = AmountBounds::default();
        assert!(bounds.contains(Decimal::from_str("0.21").unwrap()));
        assert!(bounds.contains(Decimal::from_str("19999.99").unwrap()));
        assert!(!bounds.contains(Decimal::from_str("0.2").unwrap()));
        assert!(!bounds.contains(Decimal::from_str("20000").unwrap()));
        assert!(!bounds.contains(Decimal::from_str("-5.00").unwrap()));
    }

    #[test]
    fn test_config_round_trip() {
        let config = ReciboConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: ReciboConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.scoring.reservation_penalty, -12.0);
        assert_eq!(parsed.min_image_base64_len, 100);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: ReciboConfig =
            serde_json::from_str(r#"{"scoring": {"payment_bonus": 9.5}}"#).unwrap();
        assert_eq!(parsed.scoring.payment_bonus, 9.5);
        assert_eq!(parsed.scoring.supply_total_bonus, 10.0);
        assert_eq!(parsed.bounds.max, 20000.0);
    }
}
