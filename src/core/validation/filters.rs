//! Reusable field filters
//!
//! These filters transform string fields before validation

/// A string transformation applied to a field
pub type Filter = fn(&str) -> String;

/// Filter: trim whitespace from string
pub fn trim(value: &str) -> String {
    value.trim().to_string()
}

/// Filter: convert string to uppercase
pub fn uppercase(value: &str) -> String {
    value.to_uppercase()
}

/// Filter: convert string to lowercase
pub fn lowercase(value: &str) -> String {
    value.to_lowercase()
}

/// Run `filters` over a field, in order
pub fn apply(value: &mut String, filters: &[Filter]) {
    for filter in filters {
        *value = filter(value);
    }
}

/// Run `filters` over an optional field when present
pub fn apply_opt(value: &mut Option<String>, filters: &[Filter]) {
    if let Some(v) = value.as_mut() {
        apply(v, filters);
    }
}
