//! Query/record relevance scoring
//!
//! Score = keyword overlap + phrase bonus + word-order bonus + question bonus.
//! The phrase bonus tolerates one missing word per phrase so a single
//! misrecognized word doesn't sink an otherwise good match.

use std::collections::HashSet;

use crate::knowledge::Record;
use crate::text::normalize;

/// Added per keyword phrase with at most one word missing from the query
const PHRASE_BONUS: u32 = 3;

/// Added per keyword phrase appearing verbatim, in order, in the query
const ORDER_BONUS: u32 = 2;

/// Added when the whole query is contained in the record's question
const QUESTION_CONTAINS_QUERY_BONUS: u32 = 3;

/// Added when a long query word appears in the record's question
const QUESTION_WORD_BONUS: u32 = 1;

/// Query words must be longer than this to earn the question word bonus
const QUESTION_WORD_MIN_CHARS: usize = 3;

/// Portuguese function words that carry no topical meaning
const STOP_WORDS: &[&str] = &[
    "a", "o", "as", "os", "um", "uma", "uns", "umas", "de", "do", "da", "dos", "das", "em",
    "no", "na", "nos", "nas", "por", "para", "com", "sem", "sob", "sobre", "que", "qual",
    "quem", "cujo", "onde", "como", "quando", "e", "ou", "mas", "se", "me", "te", "lhe",
    "vos", "lhes", "eu", "tu", "ele", "ela", "nós", "vós", "eles", "elas", "é", "são", "foi",
    "era", "fale", "diga", "explique", "oque", "qualé", "quemé", "comoé",
];

/// Closed set of words dropped from queries before matching
#[derive(Debug, Clone)]
pub struct StopWords(HashSet<String>);

impl StopWords {
    /// Build from a word list; entries are normalized so accented forms
    /// match normalized query tokens
    #[must_use]
    pub fn new<S: AsRef<str>>(words: &[S]) -> Self {
        Self(
            words
                .iter()
                .map(|w| normalize(w.as_ref()))
                .filter(|w| !w.is_empty())
                .collect(),
        )
    }

    /// Whether `word` (already normalized) is a stop-word
    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.0.contains(word)
    }
}

impl Default for StopWords {
    fn default() -> Self {
        Self::new(STOP_WORDS)
    }
}

/// A normalized user query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    /// Full normalized text
    text: String,
    /// Normalized words in spoken order, stop-words included
    words: Vec<String>,
    /// Distinct content words (stop-words removed)
    tokens: HashSet<String>,
}

impl Query {
    /// Normalize and tokenize a raw query
    #[must_use]
    pub fn parse(raw: &str, stop_words: &StopWords) -> Self {
        let text = normalize(raw);
        let words: Vec<String> = text.split_whitespace().map(ToString::to_string).collect();
        let tokens = words
            .iter()
            .filter(|w| !stop_words.contains(w))
            .cloned()
            .collect();

        Self {
            text,
            words,
            tokens,
        }
    }

    /// No content words left after stop-word removal
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Normalized query text
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Content words
    #[must_use]
    pub const fn tokens(&self) -> &HashSet<String> {
        &self.tokens
    }

    fn contains_sequence(&self, phrase: &[String]) -> bool {
        !phrase.is_empty() && self.words.windows(phrase.len()).any(|w| w == phrase)
    }
}

/// Normalized matching material of one record
#[derive(Debug, Clone, Default)]
pub struct RecordTerms {
    /// Every keyword word, phrases split into their words
    tokens: HashSet<String>,
    /// Distinct multi-word keywords, as word lists
    phrases: Vec<Vec<String>>,
    /// Normalized question text
    question: String,
}

impl RecordTerms {
    /// Extract terms from a record
    #[must_use]
    pub fn new(record: &Record) -> Self {
        let mut tokens = HashSet::new();
        let mut phrases: Vec<Vec<String>> = Vec::new();

        for keyword in &record.keywords {
            let words: Vec<String> = normalize(keyword)
                .split_whitespace()
                .map(ToString::to_string)
                .collect();
            tokens.extend(words.iter().cloned());
            if words.len() > 1 && !phrases.contains(&words) {
                phrases.push(words);
            }
        }

        Self {
            tokens,
            phrases,
            question: normalize(&record.question),
        }
    }
}

/// Per-component score, kept separate for logging and tests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub overlap: u32,
    pub phrase: u32,
    pub order: u32,
    pub question: u32,
}

impl ScoreBreakdown {
    /// Sum of all components
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.overlap + self.phrase + self.order + self.question
    }
}

/// Score a query against a record's terms
#[must_use]
pub fn score_terms(query: &Query, terms: &RecordTerms) -> ScoreBreakdown {
    let overlap = count(query.tokens.intersection(&terms.tokens).count());

    let mut phrase = 0;
    let mut order = 0;
    for words in &terms.phrases {
        let present = words.iter().filter(|w| query.text.contains(w.as_str())).count();
        if present + 1 >= words.len() {
            phrase += PHRASE_BONUS;
        }
        if query.contains_sequence(words) {
            order += ORDER_BONUS;
        }
    }

    let question = if !query.text.is_empty() && terms.question.contains(&query.text) {
        QUESTION_CONTAINS_QUERY_BONUS
    } else if query
        .tokens
        .iter()
        .any(|t| t.chars().count() > QUESTION_WORD_MIN_CHARS && terms.question.contains(t.as_str()))
    {
        QUESTION_WORD_BONUS
    } else {
        0
    };

    ScoreBreakdown {
        overlap,
        phrase,
        order,
        question,
    }
}

/// Score a query against a record
#[must_use]
pub fn score(query: &Query, record: &Record) -> u32 {
    score_terms(query, &RecordTerms::new(record)).total()
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(raw: &str) -> Query {
        Query::parse(raw, &StopWords::default())
    }

    #[test]
    fn test_stop_words_are_removed() {
        let q = query("O que é a energia cinética?");
        let mut tokens: Vec<_> = q.tokens().iter().cloned().collect();
        tokens.sort();
        assert_eq!(tokens, vec!["cinetica", "energia"]);
    }

    #[test]
    fn test_accented_stop_words_are_normalized() {
        assert!(query("são").is_empty());
        assert!(query("nós vós").is_empty());
        assert!(query("   ").is_empty());
    }

    #[test]
    fn test_overlap_only() {
        let record = Record::new("Quem descobriu o Brasil?", "Cabral", &["cabral", "descobrimento"]);
        let breakdown = score_terms(&query("cabral navegador"), &RecordTerms::new(&record));
        assert_eq!(breakdown, ScoreBreakdown { overlap: 1, ..Default::default() });
    }

    #[test]
    fn test_phrase_bonus_tolerates_one_missing_word() {
        let record = Record::new("Pergunta", "r", &["primeira lei newton"]);
        let terms = RecordTerms::new(&record);

        // two of three words present
        let b = score_terms(&query("segunda lei de newton"), &terms);
        assert_eq!(b.phrase, PHRASE_BONUS);
        assert_eq!(b.order, 0);

        // only one of three
        let b = score_terms(&query("lei seca"), &terms);
        assert_eq!(b.phrase, 0);
    }

    #[test]
    fn test_order_bonus_is_additive() {
        let record = Record::new("Pergunta", "r", &["energia cinética"]);
        let b = score_terms(&query("fale sobre energia cinetica"), &RecordTerms::new(&record));
        assert_eq!(b.phrase, PHRASE_BONUS);
        assert_eq!(b.order, ORDER_BONUS);
        assert_eq!(b.overlap, 2);
    }

    #[test]
    fn test_order_bonus_requires_contiguous_words() {
        let record = Record::new("Pergunta", "r", &["energia cinética"]);
        let b = score_terms(&query("energia muito cinetica"), &RecordTerms::new(&record));
        assert_eq!(b.order, 0);
        assert_eq!(b.phrase, PHRASE_BONUS);
    }

    #[test]
    fn test_duplicate_phrases_count_once() {
        let record = Record::new("Pergunta", "r", &["Energia Cinética", "energia cinetica"]);
        let b = score_terms(&query("energia cinetica"), &RecordTerms::new(&record));
        assert_eq!(b.phrase, PHRASE_BONUS);
        assert_eq!(b.order, ORDER_BONUS);
    }

    #[test]
    fn test_question_bonus() {
        let record = Record::new("O que é fotossíntese?", "r", &[]);
        let terms = RecordTerms::new(&record);

        assert_eq!(score_terms(&query("que é fotossintese"), &terms).question, 3);
        assert_eq!(score_terms(&query("fotossintese das plantas"), &terms).question, 1);
        // short words don't earn the word bonus
        assert_eq!(score_terms(&query("xyz que"), &terms).question, 0);
    }

    #[test]
    fn test_spoken_number_keywords_match() {
        let record = Record::new(
            "Quantos ossos tem a mão?",
            "27",
            &crate::text::expand_keywords(&["27", "ossos"])
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>(),
        );
        let q = query("vinte e sete ossos");
        let b = score_terms(&q, &RecordTerms::new(&record));
        assert_eq!(b.overlap, 3);
        assert_eq!(b.order, ORDER_BONUS);
    }

    #[test]
    fn test_monotonic_when_adding_query_tokens_to_keywords() {
        let base = Record::new("Qual a capital da França?", "Paris", &["capital", "europa"]);
        let q = query("capital francesa paris");

        let mut previous = score(&q, &base);
        let mut record = base;
        for token in ["francesa", "paris", "capital"] {
            record.keywords.push(token.to_string());
            let next = score(&q, &record);
            assert!(next >= previous, "adding {token} dropped score {previous} -> {next}");
            previous = next;
        }
    }
}
