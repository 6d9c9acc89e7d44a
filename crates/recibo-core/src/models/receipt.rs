//! Output models for normalized receipts.

use serde::{Deserialize, Serialize};

use crate::extract::score::AmountCandidate;

/// The stable output contract: one normalized triple per receipt.
///
/// Serializes to exactly `{"supplier": string, "dateISO": string|null,
/// "total": number|null}` regardless of which recognition model produced
/// the underlying response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedReceipt {
    /// Merchant name, or empty when nothing usable was found.
    pub supplier: String,

    /// Purchase date as zero-padded `YYYY-MM-DD`.
    #[serde(rename = "dateISO")]
    pub date_iso: Option<String>,

    /// Total amount, rounded to two decimal places.
    pub total: Option<f64>,
}

impl NormalizedReceipt {
    /// An all-empty result, used when nothing in the response is usable.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Diagnostic companion to a normalization run.
///
/// A read-only inspection aid for tuning the heuristics against captured
/// responses; the `receipt` field is the only part of the contract.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NormalizeReport {
    /// The normalized triple.
    pub receipt: NormalizedReceipt,

    /// Keys discovered on the prediction object, in document order.
    pub prediction_keys: Vec<String>,

    /// Scored amount candidates considered for the total (fallback path
    /// only; empty when a direct field lookup resolved the total).
    pub amount_candidates: Vec<AmountCandidate>,

    /// Internal note, e.g. when no prediction section was found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
