//! Knowledge record

use serde::{Deserialize, Deserializer};

/// One question/answer unit of the knowledge base
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Record {
    /// Canonical question text, read back to the user for confirmation
    #[serde(rename = "pergunta")]
    pub question: String,

    /// Answer spoken once the user confirms
    #[serde(rename = "resposta")]
    pub answer: String,

    /// Single words or multi-word phrases used for matching
    #[serde(
        rename = "palavras_chave",
        default,
        deserialize_with = "deserialize_keywords"
    )]
    pub keywords: Vec<String>,
}

impl Record {
    /// Build a record in code (tests, fixtures)
    #[must_use]
    pub fn new(question: &str, answer: &str, keywords: &[&str]) -> Self {
        Self {
            question: question.to_string(),
            answer: answer.to_string(),
            keywords: keywords.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Accept `null`, strings and numbers in the keyword list.
///
/// Hand-edited files regularly contain `"palavras_chave": [1905, "relatividade"]`
/// or an explicit `null`; numbers are kept as their decimal text, nulls dropped.
fn deserialize_keywords<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<serde_json::Value>> = Option::deserialize(deserializer)?;

    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|value| match value {
            serde_json::Value::String(s) => Some(s),
            serde_json::Value::Number(n) => Some(n.to_string()),
            serde_json::Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
        .collect())
}
