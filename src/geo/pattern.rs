use once_cell::sync::Lazy;
use regex::Regex;

static UK_POSTCODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z]{1,2}[0-9][A-Za-z0-9]?[0-9][A-Za-z]{2}$").expect("valid postcode regex")
});

/// Whether `input` looks like a full UK postcode. Whitespace is ignored.
pub fn is_uk_postcode(input: &str) -> bool {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    UK_POSTCODE.is_match(&compact)
}

/// Upper-case with a single space before the inward code, e.g. `sw1a1aa` -> `SW1A 1AA`
pub fn normalize_postcode(input: &str) -> String {
    let compact: String = input
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect();
    match compact.char_indices().rev().nth(2) {
        Some((split, _)) if split > 0 => {
            let (outward, inward) = compact.split_at(split);
            format!("{outward} {inward}")
        }
        _ => compact,
    }
}
