use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

const OUTPUT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// Ordered parse attempts. Datetime forms first so a time component is never
// silently dropped, then date-only forms (midnight assumed).
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M %p",
    "%B %d, %Y %I:%M %p",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%m/%d/%y",
    "%m-%d-%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    // Email headers: "Monday, February 15, 2026"
    "%A, %B %d, %Y",
];

/// Best-effort date normalization to `YYYY-MM-DD HH:MM:SS`. Unparsable or
/// missing input falls back to the current local time in the same format, so
/// the output shape is guaranteed for any input.
pub fn standardize_date(raw: Option<&str>) -> String {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(parse_flexible)
        .map(|dt| dt.format(OUTPUT_FORMAT).to_string())
        .unwrap_or_else(|| Local::now().format(OUTPUT_FORMAT).to_string())
}

/// Render an already-typed datetime in the standard format, no reparsing.
pub fn render_datetime(dt: DateTime<Local>) -> String {
    dt.format(OUTPUT_FORMAT).to_string()
}

fn parse_flexible(s: &str) -> Option<NaiveDateTime> {
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Normalize a phone number to `DDD-DDD-DDDD`. Ten digits format directly;
/// eleven with a leading 1 drop the country code; anything else is returned
/// unchanged ("format unclear" is a fallback, not an error).
pub fn standardize_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    match digits.len() {
        10 => format!("{}-{}-{}", &digits[..3], &digits[3..6], &digits[6..]),
        11 if digits.starts_with('1') => {
            format!("{}-{}-{}", &digits[1..4], &digits[4..7], &digits[7..])
        }
        _ => phone.to_string(),
    }
}

/// Collapse whitespace runs to single spaces, trim, and title-case. Empty
/// input yields an empty string.
pub fn normalize_text(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    title_case(&collapsed)
}

// Capitalize each letter that does not follow another letter, lowercase the
// rest. Handles "o'brien" → "O'Brien" the same way Python's str.title() does.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

/// Deterministic case ID: `RPC-<YYYYMMDD>-<counter>` with the counter
/// zero-padded to three digits. Generated exactly once per record.
pub fn generate_case_id(counter: u32) -> String {
    format!("RPC-{}-{:03}", Local::now().format("%Y%m%d"), counter)
}

/// Recommended PDF filename from the case ID and the raw address components.
/// Each component keeps only ASCII letters and digits; a missing or
/// fully-stripped component becomes `UNKNOWN`.
pub fn generate_filename(
    case_id: &str,
    street_address: Option<&str>,
    city: Option<&str>,
    state: Option<&str>,
) -> String {
    format!(
        "{}_{}_{}_{}.pdf",
        case_id,
        clean_component(street_address),
        clean_component(city),
        clean_component(state)
    )
}

fn clean_component(component: Option<&str>) -> String {
    let cleaned: String = component
        .unwrap_or("")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    if cleaned.is_empty() {
        "UNKNOWN".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn output_shape() -> Regex {
        Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}$").unwrap()
    }

    #[test]
    fn phone_ten_digits() {
        assert_eq!(standardize_phone("5551234567"), "555-123-4567");
        assert_eq!(standardize_phone("(555) 123 4567"), "555-123-4567");
        assert_eq!(standardize_phone("555.123.4567"), "555-123-4567");
    }

    #[test]
    fn phone_country_code_stripped() {
        assert_eq!(standardize_phone("15551234567"), "555-123-4567");
        assert_eq!(standardize_phone("+1-555-123-4567"), "555-123-4567");
    }

    #[test]
    fn phone_unclear_returned_as_is() {
        assert_eq!(standardize_phone("123"), "123");
        assert_eq!(standardize_phone("25551234567"), "25551234567");
        assert_eq!(standardize_phone(""), "");
    }

    #[test]
    fn phone_idempotent() {
        let once = standardize_phone("555-123-4567");
        assert_eq!(standardize_phone(&once), once);
    }

    #[test]
    fn date_us_slash() {
        assert_eq!(
            standardize_date(Some("02/15/2026")),
            "2026-02-15 00:00:00"
        );
    }

    #[test]
    fn date_iso_and_month_name() {
        assert_eq!(standardize_date(Some("2026-02-15")), "2026-02-15 00:00:00");
        assert_eq!(
            standardize_date(Some("February 15, 2026")),
            "2026-02-15 00:00:00"
        );
        assert_eq!(
            standardize_date(Some("Sunday, February 15, 2026")),
            "2026-02-15 00:00:00"
        );
    }

    #[test]
    fn date_with_time_preserved() {
        assert_eq!(
            standardize_date(Some("02/15/2026 14:30")),
            "2026-02-15 14:30:00"
        );
    }

    #[test]
    fn date_garbage_falls_back_to_now_shape() {
        assert!(output_shape().is_match(&standardize_date(Some("not a date at all"))));
    }

    #[test]
    fn date_empty_falls_back_to_now_shape() {
        assert!(output_shape().is_match(&standardize_date(None)));
        assert!(output_shape().is_match(&standardize_date(Some("  "))));
    }

    #[test]
    fn render_typed_datetime() {
        assert!(output_shape().is_match(&render_datetime(Local::now())));
    }

    #[test]
    fn name_collapse_and_title_case() {
        assert_eq!(normalize_text("  jane   q.   doe "), "Jane Q. Doe");
        assert_eq!(normalize_text("o'brien"), "O'Brien");
        assert_eq!(normalize_text("JANE DOE"), "Jane Doe");
    }

    #[test]
    fn name_empty() {
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text("   "), "");
    }

    #[test]
    fn case_id_shape() {
        let re = Regex::new(r"^RPC-\d{8}-007$").unwrap();
        assert!(re.is_match(&generate_case_id(7)));
    }

    #[test]
    fn case_id_injective_within_a_day() {
        assert_ne!(generate_case_id(1), generate_case_id(2));
        // Padding widens past 999 rather than wrapping.
        assert!(generate_case_id(1234).ends_with("-1234"));
    }

    #[test]
    fn filename_scenario() {
        assert_eq!(
            generate_filename(
                "RPC-20260215-001",
                Some("42 Oak St."),
                Some("Springfield!"),
                Some("IL"),
            ),
            "RPC-20260215-001_42OakSt_Springfield_IL.pdf"
        );
    }

    #[test]
    fn filename_unknown_components() {
        assert_eq!(
            generate_filename("RPC-20260215-002", None, Some("!!!"), Some("IL")),
            "RPC-20260215-002_UNKNOWN_UNKNOWN_IL.pdf"
        );
    }
}
