use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for subcategory slugs attached to tickets
    /// Must be lowercase alphanumeric with hyphens
    /// - Valid: "wifi-outage", "mess-food", "plumbing"
    /// - Invalid: "-wifi", "wifi-", "wifi--outage", "WiFi", "wifi_outage"
    pub static ref SUBCATEGORY_REGEX: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();

    /// Regex for location identifiers used in admin scope assignments
    /// Uppercase block/room style codes: letters, digits, optional hyphenated parts
    /// - Valid: "BLOCK-A", "H7", "MAIN-GATE-2"
    /// - Invalid: "block-a", "-H7", "A--1", "A B"
    pub static ref LOCATION_CODE_REGEX: Regex = Regex::new(r"^[A-Z0-9]+(?:-[A-Z0-9]+)*$").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subcategory_regex_valid() {
        assert!(SUBCATEGORY_REGEX.is_match("wifi-outage"));
        assert!(SUBCATEGORY_REGEX.is_match("mess-food"));
        assert!(SUBCATEGORY_REGEX.is_match("plumbing"));
        assert!(SUBCATEGORY_REGEX.is_match("a"));
        assert!(SUBCATEGORY_REGEX.is_match("room-101"));
    }

    #[test]
    fn test_subcategory_regex_invalid() {
        assert!(!SUBCATEGORY_REGEX.is_match("-wifi")); // starts with hyphen
        assert!(!SUBCATEGORY_REGEX.is_match("wifi-")); // ends with hyphen
        assert!(!SUBCATEGORY_REGEX.is_match("wifi--outage")); // double hyphen
        assert!(!SUBCATEGORY_REGEX.is_match("WiFi")); // uppercase
        assert!(!SUBCATEGORY_REGEX.is_match("wifi_outage")); // underscore
        assert!(!SUBCATEGORY_REGEX.is_match("")); // empty
        assert!(!SUBCATEGORY_REGEX.is_match("wifi outage")); // space
    }

    #[test]
    fn test_location_code_regex() {
        assert!(LOCATION_CODE_REGEX.is_match("BLOCK-A"));
        assert!(LOCATION_CODE_REGEX.is_match("H7"));
        assert!(LOCATION_CODE_REGEX.is_match("MAIN-GATE-2"));
        assert!(!LOCATION_CODE_REGEX.is_match("block-a"));
        assert!(!LOCATION_CODE_REGEX.is_match("-H7"));
        assert!(!LOCATION_CODE_REGEX.is_match("A--1"));
        assert!(!LOCATION_CODE_REGEX.is_match("A B"));
    }
}
