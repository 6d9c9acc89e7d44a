//! Common regex patterns for receipt field extraction.
//!
//! The keyword classes reflect the receipt vocabulary of the target
//! locales (French, Spanish, Catalan) plus the English field names the
//! recognition models emit.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Date shapes: full-string (field values) and substring (free text)
    pub static ref DATE_ISO_FULL: Regex = Regex::new(
        r"^(\d{4})-(\d{1,2})-(\d{1,2})$"
    ).unwrap();

    pub static ref DATE_DMY_FULL: Regex = Regex::new(
        r"^(\d{1,2})[./\-](\d{1,2})[./\-](\d{4}|\d{2})$"
    ).unwrap();

    pub static ref DATE_ISO_TEXT: Regex = Regex::new(
        r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b"
    ).unwrap();

    pub static ref DATE_DMY_TEXT: Regex = Regex::new(
        r"\b(\d{1,2})[./\-](\d{1,2})[./\-](\d{4}|\d{2})\b"
    ).unwrap();

    // Amount shape: digit run with optional space-grouped thousands and
    // exactly two decimals. Integers are deliberately not harvested from
    // free text.
    pub static ref AMOUNT_TEXT: Regex = Regex::new(
        r"(\d+(?:[\s\u{00a0}]\d{3})*[,.]\d{2})\b"
    ).unwrap();

    // Numeric leaves are only considered totals when their path says so.
    pub static ref TOTAL_PATH_KEY: Regex = Regex::new(
        r"(?i)total|amount|sum|grand"
    ).unwrap();

    // Key classes for the recursive fallback search
    pub static ref SUPPLIER_KEY: Regex = Regex::new(
        r"(?i)supplier|merchant|store|vendor|company|retailer"
    ).unwrap();

    pub static ref DATE_KEY: Regex = Regex::new(
        r"(?i)^(date|purchase_date)$"
    ).unwrap();

    pub static ref TOTAL_KEY: Regex = Regex::new(
        r"(?i)^(total_amount|amount_total|total_ttc|grand_total|total)$"
    ).unwrap();

    // Name-like path keys for the text-scan supplier fallback
    pub static ref NAME_KEY: Regex = Regex::new(
        r"(?i)supplier|merchant|store|vendor|company|retailer|enseigne|name"
    ).unwrap();

    // Supplier filtering
    pub static ref NUMERIC_ONLY: Regex = Regex::new(
        r"^[0-9\s.,:/\-]+$"
    ).unwrap();

    pub static ref FILENAME_LIKE: Regex = Regex::new(
        r"(?i)\.(jpe?g|png|gif|bmp|tiff?|webp|heic|pdf)\b|[/\\]|^(img|dsc|dscn|scan|pxl|image|photo)[-_ ]?\d"
    ).unwrap();

    // Amount candidate vocabulary
    pub static ref RESERVATION_VOCAB: Regex = Regex::new(
        r"(?i)r[eé]serv|pre[ \-]?auth|pr[eé][ \-]?autoris|empreinte|caution|deposit|d[eé]p[oô]t|dep[oó]sito|fian[zç]a|\bhold\b"
    ).unwrap();

    pub static ref SUPPLY_TOTAL_VOCAB: Regex = Regex::new(
        r"(?i)suminist|subminist|carburant|combustible|\bfuel\b"
    ).unwrap();

    pub static ref PAYMENT_VOCAB: Regex = Regex::new(
        r"(?i)[aà]\s*payer|a\s*pagar|pagad[oa]|\bpaid\b|pay[eé]|net\s*payable|amount\s*due|total\s*cb|paiement"
    ).unwrap();

    pub static ref CURRENCY_VOCAB: Regex = Regex::new(
        r"(?i)[€$£]|\beur\b|\busd\b|\bgbp\b|\bchf\b"
    ).unwrap();

    pub static ref GENERIC_TOTAL_VOCAB: Regex = Regex::new(
        r"(?i)total|montant|\bimporte?\b|amount|somme|\bsuma?\b|grand"
    ).unwrap();

    pub static ref TAX_BASE_VOCAB: Regex = Regex::new(
        r"(?i)base\s*impo|imposable|imponible|hors\s*taxe|\bh\.?t\b|sous[ \-]?total|sub[ \-]?total|\bneto\b"
    ).unwrap();

    pub static ref TAX_AMOUNT_VOCAB: Regex = Regex::new(
        r"(?i)\btva\b|\biva\b|\bvat\b|\bigi\b|\btaxe?s?\b|impuesto|\bimpost\b"
    ).unwrap();
}
