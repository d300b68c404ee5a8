use super::ExecutionResult;
use crate::core::error::ChatError;

use async_trait::async_trait;
use regex::{Captures, Regex, RegexBuilder};
use std::fmt;
use std::sync::Arc;

/// The capability behind one plugin.
///
/// Executors never return an error: every failure is folded into the
/// [`ExecutionResult`] so a bad lookup degrades one message, not the session.
#[async_trait]
pub trait PluginExecutor: Send + Sync {
    async fn execute(&self, input: &str, matched: &PluginMatch) -> ExecutionResult;
}

/// Owned capture groups of the pattern that selected a plugin.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginMatch {
    groups: Vec<Option<String>>,
}

impl PluginMatch {
    pub fn from_captures(captures: &Captures<'_>) -> Self {
        Self {
            groups: captures
                .iter()
                .map(|group| group.map(|m| m.as_str().to_string()))
                .collect(),
        }
    }

    #[cfg(test)]
    pub fn from_groups<I, S>(groups: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self {
            groups: groups.into_iter().map(|g| g.map(Into::into)).collect(),
        }
    }

    pub fn group(&self, index: usize) -> Option<&str> {
        self.groups.get(index).and_then(|g| g.as_deref())
    }

    /// First capture group with surrounding whitespace removed, or `""`.
    pub fn argument(&self) -> &str {
        self.group(1).map(str::trim).unwrap_or_default()
    }
}

pub struct PluginDescriptor {
    name: String,
    description: String,
    exact_pattern: Regex,
    invocation_hint: String,
    natural_language_patterns: Vec<Regex>,
    executor: Arc<dyn PluginExecutor>,
}

impl PluginDescriptor {
    /// Builds a descriptor from its slash-command pattern.
    ///
    /// The pattern must be anchored at the start of input (`^` or `\A`,
    /// optionally after inline flags such as `(?i)`).
    pub fn new(
        name: &str,
        description: &str,
        exact_pattern: &str,
        invocation_hint: &str,
        executor: Arc<dyn PluginExecutor>,
    ) -> Result<Self, ChatError> {
        if !is_start_anchored(exact_pattern) {
            return Err(ChatError::Pattern(format!(
                "exact pattern for '{}' must be anchored at the start: {}",
                name, exact_pattern
            )));
        }

        Ok(Self {
            name: name.to_string(),
            description: description.to_string(),
            exact_pattern: Regex::new(exact_pattern)?,
            invocation_hint: invocation_hint.to_string(),
            natural_language_patterns: Vec::new(),
            executor,
        })
    }

    /// Appends natural-language patterns, compiled case-insensitively and
    /// tried in the given order.
    pub fn with_natural_language(mut self, patterns: &[&str]) -> Result<Self, ChatError> {
        for pattern in patterns {
            let compiled = RegexBuilder::new(pattern).case_insensitive(true).build()?;
            self.natural_language_patterns.push(compiled);
        }
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn invocation_hint(&self) -> &str {
        &self.invocation_hint
    }

    pub fn match_exact(&self, input: &str) -> Option<PluginMatch> {
        self.exact_pattern
            .captures(input)
            .map(|caps| PluginMatch::from_captures(&caps))
    }

    /// Tries each natural-language pattern in declared order.
    pub fn match_natural_language(&self, input: &str) -> Option<PluginMatch> {
        self.natural_language_patterns
            .iter()
            .find_map(|pattern| pattern.captures(input))
            .map(|caps| PluginMatch::from_captures(&caps))
    }

    pub async fn invoke(&self, input: &str, matched: &PluginMatch) -> ExecutionResult {
        self.executor.execute(input, matched).await
    }
}

impl fmt::Debug for PluginDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginDescriptor")
            .field("name", &self.name)
            .field("exact_pattern", &self.exact_pattern.as_str())
            .field("invocation_hint", &self.invocation_hint)
            .field("natural_language_patterns", &self.natural_language_patterns.len())
            .finish_non_exhaustive()
    }
}

fn is_start_anchored(pattern: &str) -> bool {
    let mut rest = pattern;
    while let Some(group) = rest.strip_prefix("(?") {
        match group.find(')') {
            Some(end) if group[..end].chars().all(|c| c.is_ascii_alphabetic() || c == '-') => {
                rest = &group[end + 1..];
            }
            _ => break,
        }
    }
    rest.starts_with('^') || rest.starts_with("\\A")
}
