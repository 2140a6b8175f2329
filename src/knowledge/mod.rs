//! Local knowledge base
//!
//! - **record**: the question/answer/keywords unit and its on-disk format
//! - **store**: topic/subtopic index, lazy loading, random draws and suggestions
//!
//! Layout on disk: `<root>/<topic>/<subtopic>.json`, each file a JSON array of
//! `{ "pergunta", "resposta", "palavras_chave" }` objects.

mod record;
mod store;

pub use record::Record;
pub use store::{KnowledgeIndex, KnowledgeStore, Pick, Suggestion};

/// Read access to subtopic content, as needed by the matcher
pub trait RecordSource {
    /// Subtopics of a topic in index order (empty for unknown topics)
    fn subtopics(&self, topic: &str) -> Vec<String>;

    /// Records of one subtopic; load failures yield an empty list
    fn records(&self, topic: &str, subtopic: &str) -> Vec<Record>;
}
