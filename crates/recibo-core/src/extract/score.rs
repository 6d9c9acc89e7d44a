//! Amount candidate classification, scoring, and selection.
//!
//! Harvested amounts are classified by the vocabulary around them, scored
//! with the configured weights, cross-checked for net + tax arithmetic
//! consistency, and the best survivor becomes the receipt total.

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::Serialize;
use tracing::debug;

use crate::models::config::ScoringConfig;
use super::patterns::{
    CURRENCY_VOCAB, GENERIC_TOTAL_VOCAB, PAYMENT_VOCAB, RESERVATION_VOCAB, SUPPLY_TOTAL_VOCAB,
    TAX_AMOUNT_VOCAB, TAX_BASE_VOCAB,
};

/// Classification flags for one amount candidate.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct AmountFlags {
    /// Reservation/pre-authorization vocabulary nearby.
    pub reservation_like: bool,
    /// Fuel-supply total vocabulary nearby.
    pub supply_total_like: bool,
    /// Amount-to-pay vocabulary nearby.
    pub payment_like: bool,
    /// Generic total vocabulary with no more specific signal.
    pub generic_total_like: bool,
    /// Pre-tax subtotal vocabulary nearby.
    pub tax_base_like: bool,
    /// Tax/VAT vocabulary nearby.
    pub tax_amount_like: bool,
    /// A currency symbol or code near the value.
    pub has_currency_marker: bool,
}

/// One hypothesis for the receipt total.
#[derive(Debug, Clone, Serialize)]
pub struct AmountCandidate {
    /// Parsed value (not yet rounded).
    pub value: Decimal,

    /// The matched source text.
    pub raw: String,

    /// Path of the owning leaf in the response tree.
    pub path: String,

    /// Text surrounding the match.
    pub context: String,

    /// Keyword classification of path + context.
    pub flags: AmountFlags,

    /// Plausibility score, filled in by [`score_candidates`].
    pub score: f64,
}

impl AmountCandidate {
    pub fn new(value: Decimal, raw: &str, path: &str, context: String) -> Self {
        let flags = classify(path, &context);
        Self {
            value,
            raw: raw.to_string(),
            path: path.to_string(),
            context,
            flags,
            score: 0.0,
        }
    }
}

/// Classify a candidate's path and surrounding text into scoring flags.
pub fn classify(path: &str, context: &str) -> AmountFlags {
    let haystack = format!("{} {}", path, context);

    let reservation_like = RESERVATION_VOCAB.is_match(&haystack);
    let supply_total_like = SUPPLY_TOTAL_VOCAB.is_match(&haystack);
    let payment_like = PAYMENT_VOCAB.is_match(&haystack);
    let tax_base_like = TAX_BASE_VOCAB.is_match(&haystack);
    let tax_amount_like = TAX_AMOUNT_VOCAB.is_match(&haystack);
    let has_currency_marker = CURRENCY_VOCAB.is_match(&haystack);

    // Generic vocabulary only counts when nothing sharper claimed the line.
    let generic_total_like = GENERIC_TOTAL_VOCAB.is_match(&haystack)
        && !supply_total_like
        && !payment_like
        && !tax_base_like
        && !tax_amount_like;

    AmountFlags {
        reservation_like,
        supply_total_like,
        payment_like,
        generic_total_like,
        tax_base_like,
        tax_amount_like,
        has_currency_marker,
    }
}

/// Score all candidates and apply the net + tax cross-check bonus.
pub fn score_candidates(candidates: &mut [AmountCandidate], config: &ScoringConfig) {
    for cand in candidates.iter_mut() {
        let f = cand.flags;
        let mut score = 0.0;
        if f.reservation_like {
            score += config.reservation_penalty;
        }
        if f.supply_total_like {
            score += config.supply_total_bonus;
        }
        if f.payment_like {
            score += config.payment_bonus;
        }
        if f.has_currency_marker {
            score += config.currency_bonus;
        }
        if f.generic_total_like {
            score += config.generic_total_bonus;
        }
        if f.tax_base_like {
            score += config.tax_base_penalty;
        }
        if f.tax_amount_like {
            score += config.tax_amount_penalty;
        }
        cand.score = score;
    }

    // "net + tax = total" arithmetic consistency: every (base, tax) pair
    // whose sum lands on a third candidate's value vouches for it.
    let tolerance =
        Decimal::from_f64(config.sum_tolerance).unwrap_or_else(|| Decimal::new(2, 2));
    let n = candidates.len();
    let mut matched_pairs = vec![0u32; n];

    for i in 0..n {
        if !candidates[i].flags.tax_base_like {
            continue;
        }
        for j in 0..n {
            if j == i || !candidates[j].flags.tax_amount_like {
                continue;
            }
            let sum = (candidates[i].value + candidates[j].value).round_dp(2);
            for (k, hits) in matched_pairs.iter_mut().enumerate() {
                if k == i || k == j {
                    continue;
                }
                if (candidates[k].value - sum).abs() <= tolerance {
                    *hits += 1;
                }
            }
        }
    }

    for (cand, hits) in candidates.iter_mut().zip(matched_pairs) {
        if hits > 0 {
            cand.score += config.sum_match_bonus * f64::from(hits);
            debug!(
                "sum cross-check: {} gains {} bonus(es)",
                cand.value, hits
            );
        }
    }
}

/// Pick the best total from scored candidates.
///
/// Non-reservation candidates are always preferred; among them supply
/// totals outrank explicit payment amounts, which outrank the rest. Ties
/// on score go to values with a non-zero fractional part (round numbers
/// are often card or reference digits), then to the larger value.
pub fn select_total(candidates: &[AmountCandidate]) -> Option<&AmountCandidate> {
    if candidates.is_empty() {
        return None;
    }

    let non_reservation: Vec<&AmountCandidate> = candidates
        .iter()
        .filter(|c| !c.flags.reservation_like)
        .collect();
    let supply: Vec<&AmountCandidate> = non_reservation
        .iter()
        .copied()
        .filter(|c| c.flags.supply_total_like)
        .collect();
    let payment: Vec<&AmountCandidate> = non_reservation
        .iter()
        .copied()
        .filter(|c| c.flags.payment_like)
        .collect();

    let pool: Vec<&AmountCandidate> = if !supply.is_empty() {
        supply
    } else if !payment.is_empty() {
        payment
    } else if !non_reservation.is_empty() {
        non_reservation
    } else {
        candidates.iter().collect()
    };

    pool.into_iter().max_by(|a, b| {
        a.score
            .partial_cmp(&b.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| has_cents(a).cmp(&has_cents(b)))
            .then_with(|| a.value.cmp(&b.value))
    })
}

fn has_cents(candidate: &AmountCandidate) -> bool {
    !candidate.value.fract().is_zero()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn candidate(value: &str, context: &str) -> AmountCandidate {
        AmountCandidate::new(
            Decimal::from_str(value).unwrap(),
            value,
            "ocr.text",
            context.to_string(),
        )
    }

    fn best(mut candidates: Vec<AmountCandidate>) -> Decimal {
        score_candidates(&mut candidates, &ScoringConfig::default());
        select_total(&candidates).unwrap().value
    }

    #[test]
    fn test_classify_payment_with_currency() {
        let flags = classify("ocr.text", "TOTAL À PAYER 45,90 €");
        assert!(flags.payment_like);
        assert!(flags.has_currency_marker);
        assert!(!flags.generic_total_like);
        assert!(!flags.reservation_like);
    }

    #[test]
    fn test_classify_generic_only_without_sharper_signal() {
        let flags = classify("ocr.text", "TOTAL 19,90");
        assert!(flags.generic_total_like);

        let flags = classify("ocr.text", "TOTAL TVA 3,32");
        assert!(flags.tax_amount_like);
        assert!(!flags.generic_total_like);
    }

    #[test]
    fn test_reservation_never_beats_a_clean_candidate() {
        // Regardless of magnitude or extra markers on the reservation.
        let value = best(vec![
            candidate("120.00", "Montant réservé 120,00 €"),
            candidate("45.90", "45,90"),
        ]);
        assert_eq!(value, Decimal::from_str("45.90").unwrap());
    }

    #[test]
    fn test_payment_outranks_reservation_scenario() {
        let value = best(vec![
            candidate("45.90", "Total à payer 45,90 €"),
            candidate("120.00", "Montant réservé 120,00"),
        ]);
        assert_eq!(value, Decimal::from_str("45.90").unwrap());
    }

    #[test]
    fn test_supply_total_outranks_payment() {
        let value = best(vec![
            candidate("60.01", "TOTAL SUMINISTRO 60,01"),
            candidate("80.00", "A PAGAR 80,00"),
        ]);
        assert_eq!(value, Decimal::from_str("60.01").unwrap());
    }

    #[test]
    fn test_net_plus_tax_bonus_selects_consistent_total() {
        let value = best(vec![
            candidate("64.77", "BASE IMPOSABLE 64,77"),
            candidate("2.91", "IGI 2,91"),
            candidate("67.68", "TOTAL 67,68"),
            candidate("99.00", "TOTAL 99,00"),
        ]);
        assert_eq!(value, Decimal::from_str("67.68").unwrap());
    }

    #[test]
    fn test_tie_breaks_prefer_cents_then_magnitude() {
        let value = best(vec![
            candidate("50.00", "TOTAL 50,00"),
            candidate("49.95", "TOTAL 49,95"),
        ]);
        assert_eq!(value, Decimal::from_str("49.95").unwrap());

        let value = best(vec![
            candidate("20.00", "TOTAL 20,00"),
            candidate("30.00", "TOTAL 30,00"),
        ]);
        assert_eq!(value, Decimal::from_str("30.00").unwrap());
    }

    #[test]
    fn test_all_reservation_still_yields_a_value() {
        let value = best(vec![candidate("75.00", "Montant réservé 75,00")]);
        assert_eq!(value, Decimal::from_str("75.00").unwrap());
    }

    #[test]
    fn test_empty_candidates_yield_none() {
        assert!(select_total(&[]).is_none());
    }
}
