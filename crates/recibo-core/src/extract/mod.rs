//! Receipt field extraction module.

mod normalizer;

pub mod flatten;
pub mod locate;
pub mod patterns;
pub mod scalars;
pub mod scan;
pub mod score;

pub use normalizer::{ReceiptNormalizer, ReceiptPipeline};
pub use scalars::{parse_amount, parse_date_iso};
pub use score::{AmountCandidate, AmountFlags};
