//! Enumerated value sets accepted by request validators.

/// Address types; stored uppercase.
pub const ADDRESS_TYPES: &[&str] = &["HOME", "WORK", "BILLING", "SHIPPING", "OFFICE", "WAREHOUSE"];

/// Lead pipeline statuses, matched exactly.
pub const LEAD_STATUSES: &[&str] = &[
    "Attempted To Contact",
    "Lost Lead",
    "Not Contacted",
    "Contact In Future",
    "Contacted",
    "Re Qualified",
    "Junk Lead",
    "Not Qualified",
];

/// Product conditions, matched case-insensitively and stored as listed.
pub const PRODUCT_CONDITIONS: &[&str] = &["New", "Used", "Refurbished", "Open Box"];

/// Normalize an address type to its stored form, if it is a known type.
pub fn normalize_address_type(raw: &str) -> Option<&'static str> {
    let upper = raw.trim().to_ascii_uppercase();
    ADDRESS_TYPES.iter().copied().find(|t| *t == upper)
}

pub fn is_lead_status(raw: &str) -> bool {
    LEAD_STATUSES.contains(&raw.trim())
}

pub fn normalize_product_condition(raw: &str) -> Option<&'static str> {
    PRODUCT_CONDITIONS
        .iter()
        .copied()
        .find(|c| c.eq_ignore_ascii_case(raw.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_type_is_case_insensitive() {
        assert_eq!(normalize_address_type(" warehouse "), Some("WAREHOUSE"));
        assert_eq!(normalize_address_type("garage"), None);
    }

    #[test]
    fn test_lead_status_is_exact() {
        assert!(is_lead_status("Contact In Future"));
        assert!(!is_lead_status("contact in future"));
        assert!(!is_lead_status("New"));
    }

    #[test]
    fn test_product_condition_normalizes_case() {
        assert_eq!(normalize_product_condition("open box"), Some("Open Box"));
        assert_eq!(normalize_product_condition("mint"), None);
    }
}
