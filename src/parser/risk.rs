/// Hazard vocabulary, in reporting order. Deliberately overlapping ("line" is
/// matched independently of "power lines"): reviewers treat the flags as a
/// prompt list, not a deduplicated taxonomy.
pub const RISK_KEYWORDS: &[&str] = &[
    "power lines",
    "line",
    "primary",
    "near wires",
    "high voltage",
    "pole",
    "electric",
    "spark",
];

/// Case-insensitive substring scan against the fixed vocabulary. Output keeps
/// vocabulary order with each keyword at most once; no match yields an empty
/// vec, never an error.
pub fn extract_risk_warnings(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    RISK_KEYWORDS
        .iter()
        .filter(|keyword| lower.contains(*keyword))
        .map(|keyword| keyword.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_in_vocabulary_order() {
        let flags = extract_risk_warnings("spark seen near the pole by the power lines");
        assert_eq!(flags, vec!["power lines", "line", "pole", "spark"]);
    }

    #[test]
    fn overlapping_terms_both_flag() {
        let flags = extract_risk_warnings("tree near power lines");
        assert_eq!(flags, vec!["power lines", "line"]);
    }

    #[test]
    fn case_insensitive() {
        let flags = extract_risk_warnings("HIGH VOLTAGE warning posted");
        assert_eq!(flags, vec!["high voltage"]);
    }

    #[test]
    fn repeated_keyword_collapses() {
        let flags = extract_risk_warnings("pole leaning into other pole");
        assert_eq!(flags, vec!["pole"]);
    }

    #[test]
    fn no_match_is_empty() {
        assert!(extract_risk_warnings("routine trimming request").is_empty());
    }

    #[test]
    fn output_is_subsequence_of_vocabulary() {
        let flags =
            extract_risk_warnings("electric primary line sparked near wires by a pole, high voltage");
        let mut cursor = 0usize;
        for flag in &flags {
            let pos = RISK_KEYWORDS[cursor..]
                .iter()
                .position(|k| k == flag)
                .expect("flag not in vocabulary order");
            cursor += pos + 1;
        }
    }
}
