use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating mobile numbers after separators are stripped
    /// Optional leading '+', then up to 16 digits not starting with 0
    /// - Valid: "+15551234567", "5551234567", "447911123456"
    /// - Invalid: "0551234567", "+", "555-CALL", ""
    pub static ref MOBILE_REGEX: Regex = Regex::new(r"^\+?[1-9]\d{0,15}$").unwrap();
}

/// Strip spaces, dashes, dots and parentheses from a mobile number
pub fn normalize_mobile(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
        .collect()
}

/// Whether a mobile number is well formed once separators are removed
pub fn is_valid_mobile(raw: &str) -> bool {
    MOBILE_REGEX.is_match(&normalize_mobile(raw))
}
