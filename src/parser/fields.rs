use std::sync::LazyLock;

use regex::Regex;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\+?1[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}").unwrap());

// Labeled address: "Service Address: ...", "Site Address: ...", "Location: ..."
static LABELED_ADDRESS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:service|site|location)\s*(?:address)?\s*:\s*(.*?)(?:\n|$)").unwrap()
});

// Relaxed street pattern: house number + street-type token, optional unit,
// optional city/state fragments. Deliberately permissive (no ZIP check) so
// OCR-noisy input still matches; do not tighten without new requirements.
static STREET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\d+\s+[A-Za-z0-9\s]+(?:Street|St|Avenue|Ave|Drive|Dr|Road|Rd|Boulevard|Blvd|Lane|Ln|Trail|Trl|Circle|Cir|Court|Ct|Way|Place|Pl|Apartment|Apt|Unit|Suite|Ste)\s*(?:#?\w+)?(?:\s*,\s*[A-Za-z\s]+)?(?:\s*,\s*[A-Z]{2})?",
    )
    .unwrap()
});

pub static NAME_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)(?:property owner|customer name|name)\s*:\s*(.*?)(?:\n|$)").unwrap()
});

pub static DATE_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)date\s*:\s*(.*?)(?:\n|$)").unwrap());

/// A labeled value shorter than this is treated as noise (e.g. a bare "Location:"
/// line with a stray character) and the street-pattern fallback runs instead.
const MIN_LABELED_ADDRESS_LEN: usize = 5;

/// First email address in the text, if any.
pub fn extract_email(text: &str) -> Option<String> {
    EMAIL_RE.find(text).map(|m| m.as_str().to_string())
}

/// First North-American phone number in the text, separators and optional
/// country code tolerated.
pub fn extract_phone(text: &str) -> Option<String> {
    PHONE_RE.find(text).map(|m| m.as_str().to_string())
}

type AddressRule = fn(&str) -> Option<String>;

// Priority-ordered: an explicit label always beats the generic street pattern.
const ADDRESS_RULES: &[AddressRule] = &[labeled_address, street_pattern_address];

/// Best-effort service address. Rules run in order; first match wins.
pub fn extract_potential_address(text: &str) -> Option<String> {
    ADDRESS_RULES.iter().find_map(|rule| rule(text))
}

fn labeled_address(text: &str) -> Option<String> {
    let value = LABELED_ADDRESS_RE
        .captures(text)
        .map(|caps| caps[1].trim().to_string())?;
    if value.len() > MIN_LABELED_ADDRESS_LEN {
        Some(value)
    } else {
        None
    }
}

fn street_pattern_address(text: &str) -> Option<String> {
    STREET_RE.find(text).map(|m| m.as_str().to_string())
}

/// Generic label scan: match `label_re` case-insensitively, capture up to the
/// next line break, trim, and keep only the first line of a multi-line span.
pub fn extract_label_value(text: &str, label_re: &Regex) -> Option<String> {
    let caps = label_re.captures(text)?;
    let value = caps[1].trim();
    let first_line = value.lines().next().unwrap_or("").trim();
    if first_line.is_empty() {
        None
    } else {
        Some(first_line.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_basic() {
        assert_eq!(
            extract_email("reach me at jane@example.com thanks").as_deref(),
            Some("jane@example.com")
        );
    }

    #[test]
    fn email_first_match_only() {
        assert_eq!(
            extract_email("a@b.com then c@d.org").as_deref(),
            Some("a@b.com")
        );
    }

    #[test]
    fn email_none() {
        assert_eq!(extract_email("no address here"), None);
    }

    #[test]
    fn phone_variants() {
        assert_eq!(
            extract_phone("call 555-123-4567").as_deref(),
            Some("555-123-4567")
        );
        assert_eq!(
            extract_phone("call (555) 123 4567").as_deref(),
            Some("(555) 123 4567")
        );
        assert_eq!(
            extract_phone("call +1-555-123-4567").as_deref(),
            Some("+1-555-123-4567")
        );
        assert_eq!(
            extract_phone("call 555.123.4567").as_deref(),
            Some("555.123.4567")
        );
    }

    #[test]
    fn phone_none() {
        assert_eq!(extract_phone("only 1234 digits"), None);
    }

    #[test]
    fn labeled_address_wins_over_street_pattern() {
        let text = "Meter at 10 Elm St is fine.\nService Address: 42 Oak Street, Springfield, IL";
        assert_eq!(
            extract_potential_address(text).as_deref(),
            Some("42 Oak Street, Springfield, IL")
        );
    }

    #[test]
    fn short_labeled_value_falls_through() {
        // "x" after the label is below the length floor; fallback finds the street.
        let text = "Location: x\ncrew saw damage at 42 Oak Street yesterday";
        let addr = extract_potential_address(text).unwrap();
        assert!(addr.starts_with("42 Oak Street"));
    }

    #[test]
    fn street_pattern_fallback() {
        let addr = extract_potential_address("tree down near 1200 Maple Ave, Dayton, OH").unwrap();
        assert!(addr.starts_with("1200 Maple Ave"));
    }

    #[test]
    fn street_pattern_suffix_vocabulary() {
        for text in [
            "123 Pine Blvd",
            "9 Cedar Ln",
            "777 Lake Trl",
            "14 Birch Cir",
            "2 Elm Ct",
            "600 Sunset Way",
        ] {
            assert!(extract_potential_address(text).is_some(), "missed: {}", text);
        }
    }

    #[test]
    fn no_address_anywhere() {
        assert_eq!(extract_potential_address("please call back tomorrow"), None);
    }

    #[test]
    fn label_value_customer_name() {
        let text = "Property Owner: Jane Doe\nDate: 02/15/2026";
        assert_eq!(
            extract_label_value(text, &NAME_LABEL_RE).as_deref(),
            Some("Jane Doe")
        );
    }

    #[test]
    fn label_value_case_insensitive() {
        assert_eq!(
            extract_label_value("CUSTOMER NAME: bob smith", &NAME_LABEL_RE).as_deref(),
            Some("bob smith")
        );
    }

    #[test]
    fn label_value_first_line_only() {
        let text = "Name: Jane\nDoe";
        assert_eq!(
            extract_label_value(text, &NAME_LABEL_RE).as_deref(),
            Some("Jane")
        );
    }

    #[test]
    fn label_value_date() {
        assert_eq!(
            extract_label_value("Date: 02/15/2026\nNotes: none", &DATE_LABEL_RE).as_deref(),
            Some("02/15/2026")
        );
    }

    #[test]
    fn label_value_missing() {
        assert_eq!(extract_label_value("nothing labeled", &NAME_LABEL_RE), None);
    }
}
