//! Search policy tests: scoping, widening, tie-breaking

mod common;

use std::cell::RefCell;
use std::collections::BTreeMap;

use starlight_kiosk::matching::{MatchEngine, MatchResult, MatchTier, SearchScope, score};
use starlight_kiosk::{KnowledgeStore, Record, RecordSource};

use common::{KINETIC_QUESTION, SKY_QUESTION, knowledge_base, write_subtopic};

/// In-memory source that counts subtopic reads
#[derive(Default)]
struct CountingSource {
    topics: BTreeMap<String, Vec<(String, Vec<Record>)>>,
    reads: RefCell<Vec<(String, String)>>,
}

impl CountingSource {
    fn with(mut self, topic: &str, subtopic: &str, records: Vec<Record>) -> Self {
        self.topics
            .entry(topic.to_string())
            .or_default()
            .push((subtopic.to_string(), records));
        self
    }

    fn reads(&self) -> Vec<(String, String)> {
        self.reads.borrow().clone()
    }

    fn read_topic(&self, topic: &str) -> bool {
        self.reads.borrow().iter().any(|(t, _)| t == topic)
    }
}

impl RecordSource for CountingSource {
    fn subtopics(&self, topic: &str) -> Vec<String> {
        self.topics
            .get(topic)
            .map(|subs| subs.iter().map(|(name, _)| name.clone()).collect())
            .unwrap_or_default()
    }

    fn records(&self, topic: &str, subtopic: &str) -> Vec<Record> {
        self.reads
            .borrow_mut()
            .push((topic.to_string(), subtopic.to_string()));
        self.topics
            .get(topic)
            .and_then(|subs| subs.iter().find(|(name, _)| name == subtopic))
            .map(|(_, records)| records.clone())
            .unwrap_or_default()
    }
}

fn science() -> CountingSource {
    CountingSource::default()
        .with(
            "Ciencia",
            "Planetas",
            vec![
                Record::new("Qual o maior planeta?", "Júpiter", &["maior planeta", "júpiter"]),
                Record::new("Quantas luas tem Marte?", "Duas", &["marte", "luas"]),
            ],
        )
        .with(
            "Ciencia",
            "Estrelas",
            vec![Record::new("O que é uma anã branca?", "Resto estelar", &["anã branca", "estrela"])],
        )
        .with(
            "Ciencia",
            "Cometas",
            vec![Record::new("Do que é feito um cometa?", "Gelo e poeira", &["cometa", "gelo", "poeira"])],
        )
        .with(
            "Arte",
            "Pintura",
            vec![Record::new("Quem pintou a Mona Lisa?", "Leonardo", &["mona lisa", "cometa"])],
        )
}

#[test]
fn test_kinetic_energy_question_matches_well() {
    let dir = knowledge_base();
    let store = KnowledgeStore::open(dir.path());
    let engine = MatchEngine::new();

    let result = engine.find(
        &store,
        "o que é energia cinetica",
        Some(&SearchScope::subtopic("Fisica", "Energia")),
    );

    let found = result.as_match().expect("expected a match");
    assert_eq!(found.record.question, KINETIC_QUESTION);
    assert_eq!(found.subtopic, "Energia");
    assert!(found.score >= 4, "score was {}", found.score);
    assert!(matches!(found.tier(), MatchTier::Good | MatchTier::Excellent));
}

#[test]
fn test_strong_scoped_match_skips_siblings() {
    let source = science();
    let engine = MatchEngine::new();

    let result = engine.find(
        &source,
        "qual é o maior planeta",
        Some(&SearchScope::subtopic("Ciencia", "Planetas")),
    );

    assert!(result.as_match().unwrap().score >= 3);
    assert_eq!(
        source.reads(),
        vec![("Ciencia".to_string(), "Planetas".to_string())]
    );
}

#[test]
fn test_weak_scoped_match_widens_to_siblings() {
    let source = science();
    let engine = MatchEngine::new();

    let result = engine.find(
        &source,
        "cometa",
        Some(&SearchScope::subtopic("Ciencia", "Planetas")),
    );

    let found = result.as_match().unwrap();
    assert_eq!(found.subtopic, "Cometas");
    assert_eq!(found.topic, "Ciencia");
    assert_eq!(source.reads().len(), 3);
}

#[test]
fn test_widened_search_finds_sibling_record_in_store() {
    let dir = knowledge_base();
    let store = KnowledgeStore::open(dir.path());

    let result = MatchEngine::new().find(
        &store,
        "energia cinetica",
        Some(&SearchScope::subtopic("Fisica", "Optica")),
    );

    let found = result.as_match().unwrap();
    assert_eq!(found.record.question, KINETIC_QUESTION);
    assert_eq!(found.subtopic, "Energia");
}

#[test]
fn test_search_never_crosses_topics() {
    let source = science();
    let engine = MatchEngine::new();

    // "mona lisa" only exists under Arte
    let result = engine.find(
        &source,
        "mona lisa",
        Some(&SearchScope::subtopic("Ciencia", "Planetas")),
    );

    assert!(result.is_no_match());
    assert!(!source.read_topic("Arte"));
}

#[test]
fn test_topic_scope_searches_every_subtopic() {
    let dir = knowledge_base();
    let store = KnowledgeStore::open(dir.path());

    let result = MatchEngine::new().find(&store, "céu azul", Some(&SearchScope::topic("Fisica")));

    assert_eq!(result.as_match().unwrap().record.question, SKY_QUESTION);
}

#[test]
fn test_first_record_wins_ties() {
    let source = CountingSource::default().with(
        "T",
        "S",
        vec![
            Record::new("Primeira", "a", &["vulcão"]),
            Record::new("Segunda", "b", &["vulcão"]),
        ],
    );

    let result = MatchEngine::new().find(&source, "vulcão", Some(&SearchScope::subtopic("T", "S")));
    assert_eq!(result.as_match().unwrap().record.question, "Primeira");
}

#[test]
fn test_scoped_record_wins_tie_with_sibling() {
    let source = CountingSource::default()
        .with("T", "A", vec![Record::new("De A", "a", &["vulcão"])])
        .with("T", "B", vec![Record::new("De B", "b", &["vulcão"])]);

    let result = MatchEngine::new().find(&source, "vulcão", Some(&SearchScope::subtopic("T", "B")));

    let found = result.as_match().unwrap();
    assert_eq!(found.record.question, "De B");
    assert_eq!(found.subtopic, "B");
    // widened anyway, since 1 < 3
    assert_eq!(source.reads().len(), 2);
}

#[test]
fn test_query_without_content_words_reads_nothing() {
    let source = science();
    let engine = MatchEngine::new();
    let scope = SearchScope::subtopic("Ciencia", "Planetas");

    assert_eq!(engine.find(&source, "", Some(&scope)), MatchResult::NoMatch);
    assert_eq!(engine.find(&source, "o que é", Some(&scope)), MatchResult::NoMatch);
    assert_eq!(engine.find(&source, "?!", Some(&scope)), MatchResult::NoMatch);
    assert!(source.reads().is_empty());
}

#[test]
fn test_missing_scope_is_no_match() {
    let source = science();

    let result = MatchEngine::new().find(&source, "maior planeta", None);

    assert!(result.is_no_match());
    assert!(source.reads().is_empty());
}

#[test]
fn test_zero_score_everywhere_is_no_match() {
    let source = science();

    let result = MatchEngine::new().find(
        &source,
        "xyzzy plugh",
        Some(&SearchScope::subtopic("Ciencia", "Estrelas")),
    );

    assert!(result.is_no_match());
    assert_eq!(source.reads().len(), 3);
}

#[test]
fn test_unknown_subtopic_still_widens() {
    let source = science();

    let result = MatchEngine::new().find(
        &source,
        "anã branca",
        Some(&SearchScope::subtopic("Ciencia", "Inexistente")),
    );

    assert_eq!(result.as_match().unwrap().subtopic, "Estrelas");
}

#[test]
fn test_adding_query_words_to_keywords_never_lowers_score() {
    let engine = MatchEngine::new();
    let query = engine.parse_query("explique a fotossíntese das plantas verdes");

    let mut record = Record::new("Como as plantas produzem energia?", "Luz", &["clorofila"]);
    let mut previous = score(&query, &record);
    for word in ["plantas", "fotossíntese", "verdes", "plantas verdes"] {
        record.keywords.push(word.to_string());
        let next = score(&query, &record);
        assert!(next >= previous, "{word}: {previous} -> {next}");
        previous = next;
    }
}

#[test]
fn test_spoken_numbers_match_numeric_keywords() {
    let dir = tempfile::tempdir().unwrap();
    write_subtopic(
        dir.path(),
        "Historia",
        "Seculos",
        r#"[{"pergunta": "Em que século estamos?", "resposta": "No século vinte e um.",
             "palavras_chave": [21, "século"]}]"#,
    );
    let store = KnowledgeStore::open(dir.path());
    let scope = SearchScope::subtopic("Historia", "Seculos");
    let engine = MatchEngine::new();

    let spoken = engine.find(&store, "século vinte e um", Some(&scope));
    let digits = engine.find(&store, "século 21", Some(&scope));

    assert!(spoken.as_match().unwrap().score >= 5);
    assert!(digits.as_match().unwrap().score >= 2);
}
