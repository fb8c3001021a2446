// 📚 COICOP Level 1 catalogue
//
// Classification of Individual Consumption According to Purpose, top level.
// Codes are compared as trimmed text so "01" and "1" resolve to the same label.

const COICOP_LEVEL_1: [(&str, &str); 12] = [
    ("1", "FOOD AND NON-ALCOHOLIC BEVERAGES"),
    ("2", "ALCOHOLIC BEVERAGES, TOBACCO AND NARCOTICS"),
    ("3", "CLOTHING AND FOOTWEAR"),
    ("4", "HOUSING, WATER, ELECTRICITY, GAS AND OTHER FUELS"),
    (
        "5",
        "FURNISHINGS, HOUSEHOLD EQUIPMENT AND ROUTINE HOUSEHOLD MAINTENANCE",
    ),
    ("6", "HEALTH"),
    ("7", "TRANSPORT"),
    ("8", "COMMUNICATION"),
    ("9", "RECREATION AND CULTURE"),
    ("10", "EDUCATION"),
    ("11", "RESTAURANTS AND HOTELS"),
    ("12", "MISCELLANEOUS GOODS AND SERVICES"),
];

/// Normalise a raw code: trim, drop leading zeros, drop a trailing ".0"
/// (codes exported through spreadsheets often arrive as "1.0")
pub fn normalize_code(code: &str) -> String {
    let trimmed = code.trim();
    let trimmed = trimmed.strip_suffix(".0").unwrap_or(trimmed);
    let stripped = trimmed.trim_start_matches('0');

    if stripped.is_empty() && !trimmed.is_empty() {
        "0".to_string()
    } else {
        stripped.to_string()
    }
}

/// Label of a COICOP Level 1 code, if it is one of the twelve divisions
pub fn label(code: &str) -> Option<&'static str> {
    let code = normalize_code(code);
    COICOP_LEVEL_1
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, label)| *label)
}

/// Label for display; unknown codes stay visible instead of being dropped
pub fn label_or_unclassified(code: &str) -> String {
    match label(code) {
        Some(l) => l.to_string(),
        None => format!("UNCLASSIFIED ({})", code.trim()),
    }
}

pub fn is_known(code: &str) -> bool {
    label(code).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_labels() {
        assert_eq!(label("1"), Some("FOOD AND NON-ALCOHOLIC BEVERAGES"));
        assert_eq!(label("12"), Some("MISCELLANEOUS GOODS AND SERVICES"));
    }

    #[test]
    fn test_code_normalisation() {
        assert_eq!(normalize_code(" 07 "), "7");
        assert_eq!(normalize_code("4.0"), "4");
        assert_eq!(normalize_code("10"), "10");
        assert_eq!(label("01"), label("1"));
    }

    #[test]
    fn test_unknown_code_is_kept_visible() {
        assert!(!is_known("13"));
        assert_eq!(label_or_unclassified("13"), "UNCLASSIFIED (13)");
    }
}
