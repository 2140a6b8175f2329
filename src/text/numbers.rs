//! Spoken-word expansion for numeric keywords
//!
//! Speech recognizers transcribe "21" as either "21" or "vinte e um", so a
//! record keyworded with a number should match both.

use std::collections::HashSet;

const UNITS: [&str; 10] = [
    "zero", "um", "dois", "três", "quatro", "cinco", "seis", "sete", "oito", "nove",
];

const TEENS: [&str; 10] = [
    "dez",
    "onze",
    "doze",
    "treze",
    "quatorze",
    "quinze",
    "dezesseis",
    "dezessete",
    "dezoito",
    "dezenove",
];

const TENS: [&str; 10] = [
    "", "", "vinte", "trinta", "quarenta", "cinquenta", "sessenta", "setenta", "oitenta",
    "noventa",
];

/// Largest value pronounced as a whole number; anything above is read digit by digit
const MAX_HOLISTIC: u32 = 100;

/// Convert a numeric token to its spoken Portuguese form.
///
/// Thousands and decimal separators (`.` and `,`) are ignored. Values up to
/// 100 are converted holistically; larger values are pronounced one digit at
/// a time ("150" -> "um cinco zero"). Returns `None` for non-numeric input.
#[must_use]
pub fn number_to_words(token: &str) -> Option<String> {
    let digits: String = token.chars().filter(|c| *c != '.' && *c != ',').collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    match digits.parse::<u32>() {
        Ok(n) if n <= MAX_HOLISTIC => Some(small_number(n)),
        _ => Some(
            digits
                .bytes()
                .map(|b| UNITS[usize::from(b - b'0')])
                .collect::<Vec<_>>()
                .join(" "),
        ),
    }
}

fn small_number(n: u32) -> String {
    // n <= 100, indices below are in range
    let idx = |v: u32| usize::try_from(v).unwrap_or_default();
    match n {
        0..=9 => UNITS[idx(n)].to_string(),
        10..=19 => TEENS[idx(n - 10)].to_string(),
        100 => "cem".to_string(),
        _ => {
            let (tens, unit) = (n / 10, n % 10);
            if unit == 0 {
                TENS[idx(tens)].to_string()
            } else {
                format!("{} e {}", TENS[idx(tens)], UNITS[idx(unit)])
            }
        }
    }
}

/// Expand a keyword list with spoken forms of its numeric entries.
///
/// Numeric keywords are emitted as `[spoken, original]`; everything else
/// passes through. Entries are trimmed, blanks dropped, and duplicates
/// removed keeping the first occurrence.
#[must_use]
pub fn expand_keywords<S: AsRef<str>>(keywords: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut expanded = Vec::with_capacity(keywords.len());

    let mut push = |value: String| {
        if seen.insert(value.clone()) {
            expanded.push(value);
        }
    };

    for keyword in keywords {
        let keyword = keyword.as_ref().trim();
        if keyword.is_empty() {
            continue;
        }
        if let Some(spoken) = number_to_words(keyword) {
            push(spoken);
        }
        push(keyword.to_string());
    }

    expanded
}
