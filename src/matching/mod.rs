//! Keyword matching of spoken queries against the knowledge base
//!
//! Search policy:
//! 1. Score every record of the selected subtopic
//! 2. If the best score is below [`WIDEN_THRESHOLD`], also score every other
//!    subtopic of the same topic
//! 3. Keep the first record reaching the highest score; a best score of 0 is no match
//!
//! The search never crosses into other topics.

mod score;

pub use score::{Query, RecordTerms, ScoreBreakdown, StopWords, score, score_terms};

use crate::knowledge::{Record, RecordSource};

/// Scoped best scores below this widen the search to sibling subtopics
pub const WIDEN_THRESHOLD: u32 = 3;

/// Where to look for an answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchScope {
    pub topic: String,
    /// Subtopic searched first; `None` searches the whole topic
    pub subtopic: Option<String>,
}

impl SearchScope {
    /// Scope a search to one subtopic (widening to its topic if needed)
    #[must_use]
    pub fn subtopic(topic: &str, subtopic: &str) -> Self {
        Self {
            topic: topic.to_string(),
            subtopic: Some(subtopic.to_string()),
        }
    }

    /// Scope a search to a whole topic
    #[must_use]
    pub fn topic(topic: &str) -> Self {
        Self {
            topic: topic.to_string(),
            subtopic: None,
        }
    }
}

/// A matched record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub record: Record,
    pub score: u32,
    pub topic: String,
    pub subtopic: String,
}

impl Match {
    /// Qualitative tier of the score
    #[must_use]
    pub const fn tier(&self) -> MatchTier {
        MatchTier::from_score(self.score)
    }
}

/// Outcome of a search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    Found(Match),
    NoMatch,
}

impl MatchResult {
    /// The match, if any
    #[must_use]
    pub const fn as_match(&self) -> Option<&Match> {
        match self {
            Self::Found(m) => Some(m),
            Self::NoMatch => None,
        }
    }

    /// Whether nothing was found
    #[must_use]
    pub const fn is_no_match(&self) -> bool {
        matches!(self, Self::NoMatch)
    }
}

/// Qualitative match quality announced to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchTier {
    /// Score 0; never produced for a [`Match`], kept for completeness
    Found,
    /// Score 1-2
    Minimal,
    /// Score 3-4
    Good,
    /// Score 5 and above
    Excellent,
}

impl MatchTier {
    /// Map a score to its tier
    #[must_use]
    pub const fn from_score(score: u32) -> Self {
        match score {
            5.. => Self::Excellent,
            3..=4 => Self::Good,
            1..=2 => Self::Minimal,
            0 => Self::Found,
        }
    }
}

/// Scores queries against records and applies the hierarchical search policy
#[derive(Debug, Clone, Default)]
pub struct MatchEngine {
    stop_words: StopWords,
}

impl MatchEngine {
    /// Create an engine with the default Portuguese stop-words
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize and tokenize a raw query
    #[must_use]
    pub fn parse_query(&self, raw: &str) -> Query {
        Query::parse(raw, &self.stop_words)
    }

    /// Find the best record for `raw_query` within `scope`.
    ///
    /// Returns [`MatchResult::NoMatch`] without reading any record when the
    /// query has no content words or no scope is given.
    pub fn find<S: RecordSource + ?Sized>(
        &self,
        source: &S,
        raw_query: &str,
        scope: Option<&SearchScope>,
    ) -> MatchResult {
        let query = self.parse_query(raw_query);
        if query.is_empty() {
            tracing::debug!(raw_query, "query has no content words");
            return MatchResult::NoMatch;
        }
        tracing::debug!(tokens = ?query.tokens(), "query keywords");

        let Some(scope) = scope else {
            tracing::debug!("no topic selected, nothing to search");
            return MatchResult::NoMatch;
        };

        let mut best = Best::default();

        if let Some(subtopic) = &scope.subtopic {
            let records = source.records(&scope.topic, subtopic);
            best.scan(&query, &records, &scope.topic, subtopic);
        }

        if best.score < WIDEN_THRESHOLD {
            tracing::debug!(
                topic = %scope.topic,
                scoped_best = best.score,
                "widening search to sibling subtopics"
            );
            for sibling in source.subtopics(&scope.topic) {
                if scope.subtopic.as_deref() == Some(sibling.as_str()) {
                    continue;
                }
                let records = source.records(&scope.topic, &sibling);
                best.scan(&query, &records, &scope.topic, &sibling);
            }
        }

        match best.found {
            Some(found) if best.score > 0 => {
                tracing::info!(
                    score = best.score,
                    question = %found.record.question,
                    subtopic = %found.subtopic,
                    "match found"
                );
                MatchResult::Found(found)
            }
            _ => {
                tracing::info!("no match");
                MatchResult::NoMatch
            }
        }
    }
}

/// Running best across subtopics; replaced only on strict improvement
#[derive(Default)]
struct Best {
    score: u32,
    found: Option<Match>,
}

impl Best {
    fn scan(&mut self, query: &Query, records: &[Record], topic: &str, subtopic: &str) {
        for record in records {
            let breakdown = score_terms(query, &RecordTerms::new(record));
            let total = breakdown.total();
            tracing::trace!(question = %record.question, ?breakdown, total, "scored record");

            if total > self.score {
                self.score = total;
                self.found = Some(Match {
                    record: record.clone(),
                    score: total,
                    topic: topic.to_string(),
                    subtopic: subtopic.to_string(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers() {
        assert_eq!(MatchTier::from_score(0), MatchTier::Found);
        assert_eq!(MatchTier::from_score(1), MatchTier::Minimal);
        assert_eq!(MatchTier::from_score(2), MatchTier::Minimal);
        assert_eq!(MatchTier::from_score(3), MatchTier::Good);
        assert_eq!(MatchTier::from_score(4), MatchTier::Good);
        assert_eq!(MatchTier::from_score(5), MatchTier::Excellent);
        assert_eq!(MatchTier::from_score(40), MatchTier::Excellent);
    }

    /// One-subtopic source
    struct Single(Vec<Record>);

    impl RecordSource for Single {
        fn subtopics(&self, _topic: &str) -> Vec<String> {
            vec!["S".to_string()]
        }

        fn records(&self, _topic: &str, _subtopic: &str) -> Vec<Record> {
            self.0.clone()
        }
    }

    #[test]
    fn test_find_prefers_first_on_ties() {
        let source = Single(vec![
            Record::new("Primeira", "a", &["planeta"]),
            Record::new("Segunda", "b", &["planeta"]),
        ]);
        let scope = SearchScope::subtopic("T", "S");

        let result = MatchEngine::new().find(&source, "planeta", Some(&scope));
        let found = result.as_match().unwrap();
        assert_eq!(found.record.question, "Primeira");
        assert_eq!(found.score, 1);
    }

    #[test]
    fn test_find_zero_is_no_match() {
        let source = Single(vec![Record::new("Nada", "a", &["outro"])]);
        let scope = SearchScope::subtopic("T", "S");
        let engine = MatchEngine::new();

        assert!(engine.find(&source, "planeta", Some(&scope)).is_no_match());
        assert!(engine.find(&source, "o que é", Some(&scope)).is_no_match());
    }
}
