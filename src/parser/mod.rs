pub mod fields;
pub mod risk;

use crate::record::DraftRecord;

/// Inputs starting with this marker are OCR diagnostics ("no text available"),
/// not customer text. They still flow through extraction so the raw string is
/// preserved in `raw_comments`.
pub const DIAGNOSTIC_PREFIX: &str = "LOG:";

/// Does the text look like an OCR diagnostic placeholder rather than content?
pub fn is_diagnostic(text: &str) -> bool {
    text.trim_start().starts_with(DIAGNOSTIC_PREFIX)
}

/// Heuristic extraction pass: free text → draft record.
///
/// Unmatched fields stay empty; nothing here fails. `raw_comments` always
/// carries the input verbatim so a reviewer can recover anything the
/// heuristics missed. Empty input yields an empty draft.
pub fn parse_messy_text(text: &str) -> DraftRecord {
    if text.is_empty() {
        return DraftRecord::default();
    }

    DraftRecord {
        email: fields::extract_email(text),
        phone: fields::extract_phone(text),
        street_address: fields::extract_potential_address(text),
        risk_flags: risk::extract_risk_warnings(text),
        customer_name: fields::extract_label_value(text, &fields::NAME_LABEL_RE),
        initial_contact_datetime: fields::extract_label_value(text, &fields::DATE_LABEL_RE),
        raw_comments: Some(text.to_string()),
        ..Default::default()
    }
}
