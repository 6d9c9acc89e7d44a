//! Core library for receipt normalization.
//!
//! This crate provides:
//! - scalar normalizers for locale-ambiguous amounts and day-first dates
//! - a field locator over raw recognition-service responses
//! - a text-scan fallback with keyword-scored amount selection
//! - the stable `{supplier, dateISO, total}` output contract

pub mod error;
pub mod extract;
pub mod models;

pub use error::{ReciboError, Result};
pub use extract::{
    AmountCandidate, AmountFlags, ReceiptNormalizer, ReceiptPipeline, parse_amount,
    parse_date_iso,
};
pub use models::config::{AmountBounds, ReciboConfig, ScoringConfig};
pub use models::receipt::{NormalizeReport, NormalizedReceipt};

/// Re-export recognition backend types.
pub use recibo_recognition::{RecognitionBackend, RecognitionError};
