//! Knowledge store: topic index, lazy record loading and sampling

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use rand::Rng;
use rand::seq::SliceRandom;

use super::{Record, RecordSource};
use crate::text::expand_keywords;
use crate::{Error, Result};

/// Extension of subtopic files
const SUBTOPIC_EXTENSION: &str = "json";

/// Subtopics of the current topic sampled when looking for suggestions
const LOCAL_SUBTOPIC_SAMPLE: usize = 3;

/// Other topics sampled when the current topic can't fill the quota
const OTHER_TOPIC_SAMPLE: usize = 2;

/// Subtopics sampled per other topic
const OTHER_SUBTOPIC_SAMPLE: usize = 2;

/// Topic -> subtopic names, built once by a directory scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnowledgeIndex {
    topics: BTreeMap<String, Vec<String>>,
}

impl KnowledgeIndex {
    /// Scan `root` for `<topic>/<subtopic>.json` files.
    ///
    /// Topics without any subtopic file are left out. Names are kept in
    /// sorted order so menus and tie-breaking are stable across runs.
    ///
    /// # Errors
    ///
    /// Returns error if `root` cannot be read
    pub fn scan(root: &Path) -> Result<Self> {
        let mut topics = BTreeMap::new();

        for entry in std::fs::read_dir(root)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let Some(topic) = file_name(&path) else {
                continue;
            };

            let subtopics = match scan_subtopics(&path) {
                Ok(subtopics) => subtopics,
                Err(e) => {
                    tracing::warn!(topic = %topic, error = %e, "skipping unreadable topic directory");
                    continue;
                }
            };

            if !subtopics.is_empty() {
                topics.insert(topic, subtopics);
            }
        }

        Ok(Self { topics })
    }

    /// Topic names in order
    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.topics.keys().map(String::as_str)
    }

    /// Subtopic names of a topic (empty for unknown topics)
    #[must_use]
    pub fn subtopics(&self, topic: &str) -> &[String] {
        self.topics.get(topic).map_or(&[], Vec::as_slice)
    }

    /// Whether `(topic, subtopic)` is a known content unit
    #[must_use]
    pub fn contains(&self, topic: &str, subtopic: &str) -> bool {
        self.subtopics(topic).iter().any(|s| s == subtopic)
    }

    /// Number of topics
    #[must_use]
    pub fn len(&self) -> usize {
        self.topics.len()
    }

    /// Whether no topic was found
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Every `(topic, subtopic)` pair
    fn units(&self) -> Vec<(&str, &str)> {
        self.topics
            .iter()
            .flat_map(|(topic, subs)| subs.iter().map(move |s| (topic.as_str(), s.as_str())))
            .collect()
    }
}

fn scan_subtopics(topic_dir: &Path) -> Result<Vec<String>> {
    let mut subtopics = Vec::new();

    for entry in std::fs::read_dir(topic_dir)? {
        let path = entry?.path();
        let is_subtopic = path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext == OsStr::new(SUBTOPIC_EXTENSION));
        if !is_subtopic {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            subtopics.push(stem.to_string());
        }
    }

    subtopics.sort();
    Ok(subtopics)
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(ToString::to_string)
}

/// A record drawn at random, with where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pick {
    pub record: Record,
    pub topic: String,
    pub subtopic: String,
}

/// A question offered when a query found nothing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub question: String,
    pub topic: String,
    pub subtopic: String,
}

/// Filesystem-backed knowledge base
///
/// The index is read-only after [`KnowledgeStore::open`]; subtopic content is
/// read from disk on every access.
#[derive(Debug, Clone)]
pub struct KnowledgeStore {
    root: PathBuf,
    index: KnowledgeIndex,
}

impl KnowledgeStore {
    /// Open a knowledge base rooted at `root`.
    ///
    /// A missing or unreadable root yields an empty store (logged), not an error.
    #[must_use]
    pub fn open(root: impl Into<PathBuf>) -> Self {
        let root = root.into();

        let index = match KnowledgeIndex::scan(&root) {
            Ok(index) => {
                tracing::info!(
                    root = %root.display(),
                    topics = index.len(),
                    "knowledge index loaded"
                );
                index
            }
            Err(e) => {
                tracing::error!(
                    root = %root.display(),
                    error = %e,
                    "knowledge directory not found"
                );
                KnowledgeIndex::default()
            }
        };

        Self { root, index }
    }

    /// Root directory
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Topic index
    #[must_use]
    pub const fn index(&self) -> &KnowledgeIndex {
        &self.index
    }

    /// Topic names in menu order
    #[must_use]
    pub fn topics(&self) -> Vec<String> {
        self.index.topics().map(ToString::to_string).collect()
    }

    /// Subtopic names of a topic in menu order
    #[must_use]
    pub fn list_subtopics(&self, topic: &str) -> &[String] {
        self.index.subtopics(topic)
    }

    /// Load one subtopic, with numeric keywords expanded.
    ///
    /// Never fails: missing files, unknown units and malformed content are
    /// logged and produce an empty list.
    #[must_use]
    pub fn load_records(&self, topic: &str, subtopic: &str) -> Vec<Record> {
        match self.try_load_records(topic, subtopic) {
            Ok(records) => {
                tracing::debug!(topic, subtopic, count = records.len(), "loaded subtopic");
                records
            }
            Err(e) => {
                tracing::warn!(topic, subtopic, error = %e, "failed to load subtopic");
                Vec::new()
            }
        }
    }

    fn try_load_records(&self, topic: &str, subtopic: &str) -> Result<Vec<Record>> {
        if !self.index.contains(topic, subtopic) {
            return Err(Error::Knowledge(format!("unknown subtopic {topic}/{subtopic}")));
        }

        let path = self
            .root
            .join(topic)
            .join(format!("{subtopic}.{SUBTOPIC_EXTENSION}"));
        let content = std::fs::read_to_string(&path)?;
        let items: Vec<serde_json::Value> = serde_json::from_str(&content)?;

        let records = items
            .into_iter()
            .enumerate()
            .filter_map(|(position, item)| match serde_json::from_value::<Record>(item) {
                Ok(mut record) => {
                    record.keywords = expand_keywords(&record.keywords);
                    Some(record)
                }
                Err(e) => {
                    tracing::warn!(topic, subtopic, position, error = %e, "skipping malformed record");
                    None
                }
            })
            .collect();

        Ok(records)
    }

    /// Draw a random record from a subtopic, or from any non-empty subtopic
    /// of `topic` when `subtopic` is `None`
    #[must_use]
    pub fn random_record(&self, topic: &str, subtopic: Option<&str>) -> Option<Pick> {
        self.random_record_with_rng(topic, subtopic, &mut rand::thread_rng())
    }

    /// [`Self::random_record`] with an explicit random source
    pub fn random_record_with_rng<R: Rng + ?Sized>(
        &self,
        topic: &str,
        subtopic: Option<&str>,
        rng: &mut R,
    ) -> Option<Pick> {
        let mut candidates: Vec<&str> = match subtopic {
            Some(s) => vec![s],
            None => self.index.subtopics(topic).iter().map(String::as_str).collect(),
        };
        candidates.shuffle(rng);

        candidates
            .into_iter()
            .find_map(|sub| self.pick_from(topic, sub, rng))
    }

    /// Draw a random record from anywhere in the knowledge base
    #[must_use]
    pub fn random_record_anywhere(&self) -> Option<Pick> {
        self.random_record_anywhere_with_rng(&mut rand::thread_rng())
    }

    /// [`Self::random_record_anywhere`] with an explicit random source
    pub fn random_record_anywhere_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Pick> {
        let mut units = self.index.units();
        units.shuffle(rng);

        units
            .into_iter()
            .find_map(|(topic, sub)| self.pick_from(topic, sub, rng))
    }

    fn pick_from<R: Rng + ?Sized>(&self, topic: &str, subtopic: &str, rng: &mut R) -> Option<Pick> {
        let records = self.load_records(topic, subtopic);
        records.choose(rng).map(|record| Pick {
            record: record.clone(),
            topic: topic.to_string(),
            subtopic: subtopic.to_string(),
        })
    }

    /// Suggest up to `count` questions, preferring `topic`
    #[must_use]
    pub fn suggest_questions(&self, topic: Option<&str>, count: usize) -> Vec<Suggestion> {
        self.suggest_questions_with_rng(topic, count, &mut rand::thread_rng())
    }

    /// [`Self::suggest_questions`] with an explicit random source.
    ///
    /// Samples (without replacement) a few subtopics of `topic` first, then a
    /// few subtopics of a few other topics until the quota is met.
    pub fn suggest_questions_with_rng<R: Rng + ?Sized>(
        &self,
        topic: Option<&str>,
        count: usize,
        rng: &mut R,
    ) -> Vec<Suggestion> {
        let mut suggestions = Vec::new();
        if count == 0 {
            return suggestions;
        }

        if let Some(topic) = topic {
            let subtopics = self.index.subtopics(topic);
            for subtopic in subtopics.choose_multiple(rng, LOCAL_SUBTOPIC_SAMPLE) {
                self.sample_into(&mut suggestions, topic, subtopic, count, rng);
                if suggestions.len() >= count {
                    suggestions.truncate(count);
                    return suggestions;
                }
            }
        }

        let others: Vec<&str> = self
            .index
            .topics()
            .filter(|t| Some(*t) != topic)
            .collect();
        for other in others.choose_multiple(rng, OTHER_TOPIC_SAMPLE) {
            let subtopics = self.index.subtopics(other);
            for subtopic in subtopics.choose_multiple(rng, OTHER_SUBTOPIC_SAMPLE) {
                let wanted = count - suggestions.len();
                self.sample_into(&mut suggestions, other, subtopic, wanted, rng);
                if suggestions.len() >= count {
                    suggestions.truncate(count);
                    return suggestions;
                }
            }
        }

        suggestions
    }

    fn sample_into<R: Rng + ?Sized>(
        &self,
        out: &mut Vec<Suggestion>,
        topic: &str,
        subtopic: &str,
        amount: usize,
        rng: &mut R,
    ) {
        let records = self.load_records(topic, subtopic);
        out.extend(records.choose_multiple(rng, amount).map(|record| Suggestion {
            question: record.question.clone(),
            topic: topic.to_string(),
            subtopic: subtopic.to_string(),
        }));
    }
}

impl RecordSource for KnowledgeStore {
    fn subtopics(&self, topic: &str) -> Vec<String> {
        self.index.subtopics(topic).to_vec()
    }

    fn records(&self, topic: &str, subtopic: &str) -> Vec<Record> {
        self.load_records(topic, subtopic)
    }
}
