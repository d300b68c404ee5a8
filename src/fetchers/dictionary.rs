use super::JsonFetch;
use crate::core::error::ChatError;
use crate::plugins::{DefinitionRecord, Sense};

use reqwest::Url;
use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;

/// Senses kept from each part-of-speech group of a provider entry.
const SENSES_PER_GROUP: usize = 3;

#[derive(Deserialize)]
struct Entry {
    word: String,
    #[serde(default)]
    phonetic: Option<String>,
    #[serde(default)]
    phonetics: Vec<Phonetic>,
    #[serde(default)]
    meanings: Vec<Meaning>,
}

#[derive(Deserialize)]
struct Phonetic {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Meaning {
    part_of_speech: String,
    #[serde(default)]
    definitions: Vec<ProviderDefinition>,
}

#[derive(Deserialize)]
struct ProviderDefinition {
    definition: String,
    #[serde(default)]
    example: Option<String>,
}

/// Word lookup against a Free Dictionary API style endpoint.
pub struct DictionaryFetcher {
    fetch: Arc<dyn JsonFetch>,
    base_url: String,
}

impl DictionaryFetcher {
    pub fn new(fetch: Arc<dyn JsonFetch>, base_url: &str) -> Self {
        Self {
            fetch,
            base_url: base_url.to_string(),
        }
    }

    pub fn request_url(&self, word: &str) -> Result<String, ChatError> {
        let config_err =
            |detail: String| ChatError::Config(format!("dictionary base_url {}: {}", self.base_url, detail));

        let mut url = Url::parse(&self.base_url).map_err(|e| config_err(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| config_err("cannot be a base".into()))?
            .pop_if_empty()
            .push(word);
        Ok(url.into())
    }

    pub async fn lookup(&self, word: &str) -> Result<DefinitionRecord, ChatError> {
        let url = self.request_url(word)?;
        let body = self.fetch.fetch_json(&url).await?;
        let entries: Vec<Entry> = serde_json::from_value(body)?;
        let entry = entries
            .into_iter()
            .next()
            .ok_or_else(|| ChatError::Serialization("dictionary response has no entries".into()))?;
        to_record(entry)
    }

    /// Provider definition, or the built-in one when the lookup fails.
    pub async fn lookup_or_builtin(&self, word: &str) -> DefinitionRecord {
        match self.lookup(word).await {
            Ok(record) => record,
            Err(e) => {
                warn!(word, error = %e, "dictionary lookup failed, using built-in definition");
                builtin_definition(word)
            }
        }
    }
}

fn to_record(entry: Entry) -> Result<DefinitionRecord, ChatError> {
    let senses: Vec<Sense> = entry
        .meanings
        .into_iter()
        .flat_map(|meaning| {
            let part_of_speech = meaning.part_of_speech;
            meaning
                .definitions
                .into_iter()
                .take(SENSES_PER_GROUP)
                .map(move |def| Sense {
                    part_of_speech: part_of_speech.clone(),
                    definition: def.definition,
                    example: def.example,
                })
        })
        .collect();

    if senses.is_empty() {
        return Err(ChatError::Serialization(format!(
            "dictionary entry for '{}' has no definitions",
            entry.word
        )));
    }

    let pronunciation = entry
        .phonetic
        .filter(|p| !p.trim().is_empty())
        .or_else(|| {
            entry
                .phonetics
                .into_iter()
                .filter_map(|p| p.text)
                .find(|t| !t.trim().is_empty())
        });

    Ok(DefinitionRecord {
        word: entry.word,
        pronunciation,
        senses,
    })
}

fn sense(part_of_speech: &str, definition: &str, example: &str) -> Sense {
    Sense {
        part_of_speech: part_of_speech.to_string(),
        definition: definition.to_string(),
        example: Some(example.to_string()),
    }
}

/// Offline definitions: a few seed words, a placeholder for everything else.
pub fn builtin_definition(word: &str) -> DefinitionRecord {
    let known = match word {
        "hello" => sense(
            "interjection",
            "Used as a greeting or to begin a telephone conversation.",
            "Hello, how are you?",
        ),
        "computer" => sense(
            "noun",
            "An electronic device for storing and processing data.",
            "I use my computer for work.",
        ),
        "artificial" => sense(
            "adjective",
            "Made or produced by human beings rather than occurring naturally.",
            "Artificial intelligence is advancing rapidly.",
        ),
        _ => sense(
            "noun",
            "A sample definition for demonstration purposes.",
            "This is an example sentence.",
        ),
    };

    DefinitionRecord {
        word: word.to_string(),
        pronunciation: None,
        senses: vec![known],
    }
}
