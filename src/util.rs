//! Small string helpers shared by converters and parsers.

/// True when the string is empty or whitespace only.
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// True when the value is absent, empty, or whitespace only.
pub fn is_blank_opt(s: Option<&str>) -> bool {
    s.map_or(true, is_blank)
}
