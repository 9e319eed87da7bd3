//! Text canonicalization used before any answer comparison.

use unicode_normalization::UnicodeNormalization;

/// Normalize free text for comparison.
///
/// Lowercases, decomposes (NFKD) and drops everything outside ASCII, removes
/// characters other than `[a-z0-9]` and whitespace, then collapses whitespace
/// runs to single spaces and trims. `"República  Democrática!"` becomes
/// `"republica democratica"`.
///
/// The output is a fixed point: `normalize(&normalize(s)) == normalize(s)`.
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .to_lowercase()
        .nfkd()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalized form with every space removed ("Costa Rica" -> "costarica").
pub fn compact(text: &str) -> String {
    strip_spaces(&normalize(text))
}

/// Remove the single spaces left in an already normalized string.
pub(crate) fn strip_spaces(normalized: &str) -> String {
    normalized.chars().filter(|c| *c != ' ').collect()
}
