//! Identifier case conversion for query parameters that name fields (camelCase from clients, snake_case columns).

/// Convert a single identifier from camelCase to snake_case.
/// e.g. "captureRate" -> "capture_rate", "baseExperience" -> "base_experience"
pub fn to_snake_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
