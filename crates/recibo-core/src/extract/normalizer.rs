//! The normalization pipeline: raw response tree in, stable triple out.

use rust_decimal::prelude::ToPrimitive;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{ReciboError, Result};
use crate::models::config::ReciboConfig;
use crate::models::receipt::{NormalizeReport, NormalizedReceipt};
use recibo_recognition::RecognitionBackend;

use super::{flatten, locate, patterns, scalars, scan, score};

/// Receipt response normalizer.
///
/// Converts raw recognition-service responses, whatever their shape, into
/// the `{supplier, dateISO, total}` contract. Pure and stateless: the same
/// tree always yields the same triple, and nothing is kept across calls.
pub struct ReceiptNormalizer {
    config: ReciboConfig,
}

impl ReceiptNormalizer {
    /// Create a normalizer with default configuration.
    pub fn new() -> Self {
        Self {
            config: ReciboConfig::default(),
        }
    }

    /// Create a normalizer with explicit configuration.
    pub fn with_config(config: ReciboConfig) -> Self {
        Self { config }
    }

    /// Normalize a raw response tree into the output triple.
    ///
    /// Field-level misses resolve to `None`/empty — never an error. The
    /// only propagating condition is a response root that is not a JSON
    /// object at all.
    pub fn normalize(&self, tree: &Value) -> Result<NormalizedReceipt> {
        self.normalize_with_report(tree).map(|r| r.receipt)
    }

    /// Normalize and keep the diagnostic report.
    pub fn normalize_with_report(&self, tree: &Value) -> Result<NormalizeReport> {
        if !tree.is_object() {
            return Err(ReciboError::UnusablePayload(
                "response root is not an object".to_string(),
            ));
        }

        let mut report = NormalizeReport::default();

        let roots = locate::prediction_roots(tree);
        match roots.first().and_then(|p| p.as_object()) {
            Some(pred) => {
                report.prediction_keys = pred.keys().cloned().collect();
                debug!("prediction object with {} key(s)", pred.len());
            }
            None => {
                report.note = Some("prediction not found".to_string());
                debug!("no prediction section at any known path");
            }
        }

        // Direct lookups first; each field resolves independently.
        let mut supplier =
            locate::locate(tree, &roots, locate::SUPPLIER_ALIASES, &patterns::SUPPLIER_KEY)
                .filter(|s| locate::acceptable_supplier(s));
        let mut date_iso =
            locate::locate(tree, &roots, locate::DATE_ALIASES, &patterns::DATE_KEY)
                .and_then(|raw| scalars::parse_date_iso(&raw));
        let mut total =
            locate::locate(tree, &roots, locate::TOTAL_ALIASES, &patterns::TOTAL_KEY)
                .and_then(|raw| scalars::parse_amount(&raw))
                .filter(|v| self.config.bounds.contains(*v));

        // Whatever is still unresolved goes through the free-text scan.
        if supplier.is_none() || date_iso.is_none() || total.is_none() {
            let entries = flatten::flatten(tree);
            debug!("flattened response into {} leaves", entries.len());

            if supplier.is_none() {
                supplier = scan::scan_supplier(&entries);
            }
            if date_iso.is_none() {
                date_iso = scan::scan_date(&entries);
            }
            if total.is_none() {
                let mut candidates = scan::scan_amounts(&entries, &self.config.bounds);
                score::score_candidates(&mut candidates, &self.config.scoring);
                total = score::select_total(&candidates).map(|c| c.value);
                report.amount_candidates = candidates;
            }
        }

        let receipt = NormalizedReceipt {
            supplier: supplier.unwrap_or_default(),
            date_iso,
            total: total.and_then(|v| v.round_dp(2).to_f64()),
        };

        info!(
            "normalized receipt: supplier={:?} date={:?} total={:?}",
            receipt.supplier, receipt.date_iso, receipt.total
        );

        report.receipt = receipt;
        Ok(report)
    }
}

impl Default for ReceiptNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// End-to-end pipeline: one recognition call followed by normalization.
///
/// The backend owns all polling and retrying; a recognition failure
/// propagates here untouched and is never retried.
pub struct ReceiptPipeline<B: RecognitionBackend> {
    backend: B,
    normalizer: ReceiptNormalizer,
}

impl<B: RecognitionBackend> ReceiptPipeline<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            normalizer: ReceiptNormalizer::new(),
        }
    }

    pub fn with_config(backend: B, config: ReciboConfig) -> Self {
        Self {
            backend,
            normalizer: ReceiptNormalizer::with_config(config),
        }
    }

    /// Run one receipt image through recognition and normalization.
    pub fn process(&self, image: &[u8]) -> Result<NormalizedReceipt> {
        let tree = self.backend.recognize(image)?;
        self.normalizer.normalize(&tree)
    }

    /// As [`process`](Self::process), but also returns the diagnostic
    /// report and the raw response tree for offline tuning.
    pub fn process_with_report(&self, image: &[u8]) -> Result<(NormalizeReport, Value)> {
        let tree = self.backend.recognize(image)?;
        let report = self.normalizer.normalize_with_report(&tree)?;
        Ok((report, tree))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn normalize(tree: &Value) -> NormalizedReceipt {
        ReceiptNormalizer::new().normalize(tree).unwrap()
    }

    #[test]
    fn test_structured_prediction() {
        // Scenario: a well-behaved model response with direct fields.
        let tree = json!({"prediction": {
            "supplier_name": {"value": "Carrefour"},
            "date": {"value": "07/08/2025"},
            "total_amount": {"value": "12,50"}
        }});

        let receipt = normalize(&tree);
        assert_eq!(receipt.supplier, "Carrefour");
        assert_eq!(receipt.date_iso, Some("2025-08-07".to_string()));
        assert_eq!(receipt.total, Some(12.5));
    }

    #[test]
    fn test_deeply_nested_prediction() {
        let tree = json!({"document": {"inference": {"pages": [{"prediction": {
            "merchant_name": [{"content": "E.Leclerc"}],
            "purchase_date": "2025-8-7",
            "amount_total": "45,90"
        }}]}}});

        let receipt = normalize(&tree);
        assert_eq!(receipt.supplier, "E.Leclerc");
        assert_eq!(receipt.date_iso, Some("2025-08-07".to_string()));
        assert_eq!(receipt.total, Some(45.9));
    }

    #[test]
    fn test_no_prediction_anywhere() {
        // Scenario: service replied, but with nothing recognizable. Empty
        // triple plus a note; never an error.
        let tree = json!({"status": "done", "id": "abc123"});

        let report = ReceiptNormalizer::new().normalize_with_report(&tree).unwrap();
        assert_eq!(report.receipt, NormalizedReceipt::empty());
        assert_eq!(report.note, Some("prediction not found".to_string()));
    }

    #[test]
    fn test_free_text_only_prefers_payment_over_reservation() {
        // Scenario: OCR text with a pre-authorization larger than the
        // actual total.
        let tree = json!({"ocr": {"text": [
            "Total à payer 45,90 €",
            "Montant réservé 120,00"
        ]}});

        let receipt = normalize(&tree);
        assert_eq!(receipt.total, Some(45.9));
    }

    #[test]
    fn test_root_must_be_an_object() {
        let err = ReceiptNormalizer::new().normalize(&json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, ReciboError::UnusablePayload(_)));

        let err = ReceiptNormalizer::new().normalize(&json!("text")).unwrap_err();
        assert!(matches!(err, ReciboError::UnusablePayload(_)));
    }

    #[test]
    fn test_idempotent() {
        let tree = json!({"prediction": {
            "supplier_name": {"value": "Lidl"},
            "date": {"value": "1/2/24"},
            "total_amount": {"value": "8,20"}
        }});

        let normalizer = ReceiptNormalizer::new();
        let first = normalizer.normalize(&tree).unwrap();
        let second = normalizer.normalize(&tree).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_fields_resolve_independently() {
        let tree = json!({"prediction": {
            "total_amount": {"value": "19,90"}
        }});

        let receipt = normalize(&tree);
        assert_eq!(receipt.supplier, "");
        assert_eq!(receipt.date_iso, None);
        assert_eq!(receipt.total, Some(19.9));
    }

    #[test]
    fn test_filename_supplier_rejected_for_real_name() {
        let tree = json!({
            "prediction": {"supplier_name": {"value": "IMG_2024.jpg"}},
            "meta": {"store_name": "Carrefour Market"}
        });

        let receipt = normalize(&tree);
        assert_eq!(receipt.supplier, "Carrefour Market");
    }

    #[test]
    fn test_filename_supplier_alone_yields_empty() {
        let tree = json!({"prediction": {"supplier_name": {"value": "IMG_2024.jpg"}}});

        let receipt = normalize(&tree);
        assert_eq!(receipt.supplier, "");
    }

    #[test]
    fn test_out_of_bounds_direct_total_falls_back() {
        // A direct hit outside the plausibility window is not trusted.
        let tree = json!({"prediction": {
            "total_amount": {"value": "99999,00"},
            "notes": "montant payé 45,90"
        }});

        let receipt = normalize(&tree);
        assert_eq!(receipt.total, Some(45.9));
    }

    #[test]
    fn test_net_tax_consistency_end_to_end() {
        let tree = json!({"ocr": {"lines": [
            "BASE IMPOSABLE 64,77",
            "IGI 2,91",
            "TOTAL 67,68",
            "TOTAL 99,00"
        ]}});

        let receipt = normalize(&tree);
        assert_eq!(receipt.total, Some(67.68));
    }

    #[test]
    fn test_output_contract_shape() {
        let tree = json!({"prediction": {
            "supplier_name": {"value": "Carrefour"},
            "date": {"value": "07/08/2025"},
            "total_amount": {"value": "12,50"}
        }});

        let receipt = normalize(&tree);
        let wire = serde_json::to_value(&receipt).unwrap();
        assert_eq!(
            wire,
            json!({"supplier": "Carrefour", "dateISO": "2025-08-07", "total": 12.5})
        );
    }

    #[test]
    fn test_malformed_leaves_are_skipped() {
        // Mixed junk around a usable field must not abort normalization.
        let tree = json!({
            "prediction": {"total_amount": null, "weird": [[[true]]], "n": 1e300},
            "text": "A PAGAR 10,00"
        });

        let receipt = normalize(&tree);
        assert_eq!(receipt.total, Some(10.0));
    }
}
