use super::{ExecutionResult, FailureKind, Payload, PluginDescriptor, PluginExecutor, PluginMatch};
use crate::core::error::ChatError;
use crate::fetchers::dictionary::DictionaryFetcher;

use async_trait::async_trait;
use std::sync::Arc;

pub const NAME: &str = "dictionary";

pub struct DictionaryPlugin {
    fetcher: DictionaryFetcher,
}

impl DictionaryPlugin {
    pub fn new(fetcher: DictionaryFetcher) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl PluginExecutor for DictionaryPlugin {
    async fn execute(&self, _input: &str, matched: &PluginMatch) -> ExecutionResult {
        let word = matched.argument().to_lowercase();
        if word.is_empty() {
            return ExecutionResult::failure(
                FailureKind::MissingArgument,
                "Please specify a word to define",
            );
        }

        let record = self.fetcher.lookup_or_builtin(&word).await;
        ExecutionResult::card(Payload::Definition(record))
    }
}

pub fn descriptor(fetcher: DictionaryFetcher) -> Result<PluginDescriptor, ChatError> {
    PluginDescriptor::new(
        NAME,
        "Get definitions for any word",
        r"(?i)^/define\s+(.+)$",
        "/define [word]",
        Arc::new(DictionaryPlugin::new(fetcher)),
    )?
    .with_natural_language(&[
        r"(?:define|definition of|what does|what's the meaning of) ([a-zA-Z]+)",
        r"(?:meaning of) ([a-zA-Z]+)",
    ])
}
