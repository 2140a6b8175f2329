//! Text normalization for matching
//!
//! Both sides of a comparison (query and knowledge record) go through the
//! same function so that "Cinética", "cinetica" and "CINÉTICA!" compare equal.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Canonicalize text for comparison.
///
/// Performs:
/// - Lowercase conversion
/// - Unicode NFKD decomposition with combining marks removed
/// - Removal of everything that is neither a word character nor whitespace
/// - Whitespace collapsing and trimming
///
/// The result is stable under repeated application.
///
/// # Examples
///
/// ```
/// use starlight_kiosk::text::normalize;
///
/// assert_eq!(normalize("O que é  Energia Cinética?"), "o que e energia cinetica");
/// assert_eq!(normalize("É"), "e");
/// ```
#[must_use]
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .to_lowercase()
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        // compatibility decomposition can surface capitals (e.g. "ℌ" -> "H")
        .flat_map(char::to_lowercase)
        .filter(|c| is_word_char(*c) || c.is_whitespace())
        .collect();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
