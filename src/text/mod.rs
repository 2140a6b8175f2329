//! Text canonicalization shared by the knowledge store and the matcher
//!
//! - **normalize**: lower-case, strip diacritics and punctuation, collapse whitespace
//! - **numbers**: add spoken-word forms for numeric keywords

mod normalize;
mod numbers;

pub use normalize::normalize;
pub use numbers::{expand_keywords, number_to_words};
