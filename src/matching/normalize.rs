/// Canonical imprint: uppercase ASCII letters and digits only.
///
/// "L 484", "L-484" and "l484" all become "L484".
pub fn normalize_imprint(text: &str) -> String {
    text.to_uppercase()
        .chars()
        .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        .collect()
}

/// Canonical color/shape filter value.
///
/// Lowercased and trimmed, internal whitespace collapsed to one space, and no
/// spaces around the `/` of compound names ("Capsule / Oblong" → "capsule/oblong").
pub fn normalize_filter_value(text: &str) -> String {
    text.to_lowercase()
        .trim()
        .split('/')
        .map(|segment| segment.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("/")
}
