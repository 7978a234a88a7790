use lazy_static::lazy_static;
use regex::Regex;

/// Collapses runs of whitespace (including non-breaking spaces) into one space and trims.
pub fn normalize_whitespace(s: &str) -> String {
    lazy_static! {
        static ref WS_RE: Regex = Regex::new(r"[\s\u{00A0}]+").unwrap();
    }
    WS_RE.replace_all(s, " ").trim().to_string()
}

/// Upper-cases the first character and lower-cases the rest.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
    }
}

#[cfg(test)]
mod text_tests {
    use super::*;

    #[test]
    fn capitalize_lowercases_tail() {
        assert_eq!(capitalize("indian"), "Indian");
        assert_eq!(capitalize("NORTH Indian"), "North indian");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn normalize_whitespace_collapses_runs() {
        assert_eq!(normalize_whitespace("  1 \n\t cup\u{00A0} rice "), "1 cup rice");
        assert_eq!(normalize_whitespace("   "), "");
    }
}
