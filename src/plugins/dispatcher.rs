use super::{
    ExecutionResult, calculator, dictionary,
    handler::{PluginDescriptor, PluginMatch},
    registry::PluginRegistry,
    weather,
};
use crate::config::Config;
use crate::core::error::ChatError;
use crate::fetchers::{JsonFetch, dictionary::DictionaryFetcher, weather::WeatherFetcher};
use std::sync::Arc;
use tracing::{debug, info};

/// Which matching stage selected the plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPass {
    Exact,
    NaturalLanguage,
}

#[derive(Debug)]
pub enum DispatchOutcome {
    NoMatch,
    Matched {
        plugin: Arc<PluginDescriptor>,
        pass: MatchPass,
        result: ExecutionResult,
    },
}

impl DispatchOutcome {
    pub fn plugin_name(&self) -> Option<&str> {
        match self {
            DispatchOutcome::NoMatch => None,
            DispatchOutcome::Matched { plugin, .. } => Some(plugin.name()),
        }
    }
}

#[derive(Clone)]
pub struct PluginDispatcher {
    registry: Arc<PluginRegistry>,
}

impl PluginDispatcher {
    pub fn new(registry: Arc<PluginRegistry>) -> Self {
        Self { registry }
    }

    /// Runs the first plugin whose patterns match `input`.
    ///
    /// Every slash-command pattern is tried before any natural-language
    /// pattern. Within a pass, registration order decides. At most one
    /// executor runs per call.
    pub async fn dispatch(&self, input: &str) -> DispatchOutcome {
        let (plugin, pass, matched) = match self.find_match(input) {
            Some(found) => found,
            None => {
                debug!(input, "no plugin matched");
                return DispatchOutcome::NoMatch;
            }
        };

        info!(plugin = plugin.name(), ?pass, "dispatching to plugin");
        let result = plugin.invoke(input, &matched).await;
        debug!(plugin = plugin.name(), success = result.success(), "plugin finished");
        if let Some(message) = result.error_message() {
            debug!(
                plugin = plugin.name(),
                kind = ?result.failure_kind(),
                message,
                "plugin reported failure"
            );
        }

        DispatchOutcome::Matched {
            plugin,
            pass,
            result,
        }
    }

    fn find_match(
        &self,
        input: &str,
    ) -> Option<(Arc<PluginDescriptor>, MatchPass, PluginMatch)> {
        let exact = self.registry.iter().find_map(|plugin| {
            plugin
                .match_exact(input)
                .map(|m| (Arc::clone(plugin), MatchPass::Exact, m))
        });
        if exact.is_some() {
            return exact;
        }

        self.registry.iter().find_map(|plugin| {
            plugin
                .match_natural_language(input)
                .map(|m| (Arc::clone(plugin), MatchPass::NaturalLanguage, m))
        })
    }

    pub fn list_invocation_hints(&self) -> Vec<String> {
        self.registry.list_invocation_hints()
    }

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }
}

/// Registers the built-in plugins: weather, calculator, dictionary.
pub fn create_plugin_registry(
    config: &Config,
    fetch: Arc<dyn JsonFetch>,
) -> Result<PluginDispatcher, ChatError> {
    let mut registry = PluginRegistry::new();

    registry.register(weather::descriptor(WeatherFetcher::new(
        Arc::clone(&fetch),
        &config.weather.base_url,
        &config.weather.api_key,
    ))?);
    registry.register(calculator::descriptor()?);
    registry.register(dictionary::descriptor(DictionaryFetcher::new(
        fetch,
        &config.dictionary.base_url,
    ))?);
    debug!(plugins = registry.len(), "plugin registry ready");

    Ok(PluginDispatcher::new(Arc::new(registry)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetchers::OfflineFetcher;
    use crate::plugins::{CalculationRecord, FailureKind, Payload, PluginExecutor};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct CallLog(Arc<Mutex<Vec<String>>>);

    impl CallLog {
        fn calls(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    struct Recording {
        label: &'static str,
        log: CallLog,
        fail: bool,
    }

    #[async_trait]
    impl PluginExecutor for Recording {
        async fn execute(&self, _input: &str, matched: &PluginMatch) -> ExecutionResult {
            self.log
                .0
                .lock()
                .unwrap()
                .push(format!("{}:{}", self.label, matched.argument()));
            if self.fail {
                return ExecutionResult::failure(FailureKind::EvaluationFailure, "boom");
            }
            ExecutionResult::card(Payload::Calculation(CalculationRecord {
                expression: self.label.to_string(),
                result: 1.0,
            }))
        }
    }

    fn plugin(
        label: &'static str,
        exact: &str,
        natural: &[&str],
        log: &CallLog,
    ) -> PluginDescriptor {
        plugin_with(label, exact, natural, log, false)
    }

    fn plugin_with(
        label: &'static str,
        exact: &str,
        natural: &[&str],
        log: &CallLog,
        fail: bool,
    ) -> PluginDescriptor {
        let executor = Arc::new(Recording {
            label,
            log: log.clone(),
            fail,
        });
        PluginDescriptor::new(label, "test plugin", exact, &format!("/{label}"), executor)
            .unwrap()
            .with_natural_language(natural)
            .unwrap()
    }

    fn dispatcher(plugins: Vec<PluginDescriptor>) -> PluginDispatcher {
        let mut registry = PluginRegistry::new();
        for p in plugins {
            registry.register(p);
        }
        PluginDispatcher::new(Arc::new(registry))
    }

    #[tokio::test]
    async fn exact_match_beats_earlier_natural_language_match() {
        let log = CallLog::default();
        let d = dispatcher(vec![
            plugin("chatty", r"^/chatty\s+(.+)$", &[r"(.+)"], &log),
            plugin("strict", r"^/strict\s+(.+)$", &[], &log),
        ]);

        let outcome = d.dispatch("/strict go").await;

        assert_eq!(outcome.plugin_name(), Some("strict"));
        assert!(matches!(
            outcome,
            DispatchOutcome::Matched {
                pass: MatchPass::Exact,
                ..
            }
        ));
        assert_eq!(log.calls(), vec!["strict:go"]);
    }

    #[tokio::test]
    async fn first_registered_exact_match_wins() {
        let log = CallLog::default();
        let d = dispatcher(vec![
            plugin("a", r"^/run\s+(.+)$", &[], &log),
            plugin("b", r"^/run\s+(.+)$", &[], &log),
        ]);

        let outcome = d.dispatch("/run it").await;

        assert_eq!(outcome.plugin_name(), Some("a"));
        assert_eq!(log.calls(), vec!["a:it"]);
    }

    #[tokio::test]
    async fn natural_language_pass_is_first_plugin_then_first_pattern() {
        let log = CallLog::default();
        let d = dispatcher(vec![
            plugin("first", r"^/first\s+(.+)$", &[r"tell me about (\w+)", r"about (\w+)"], &log),
            plugin("second", r"^/second\s+(.+)$", &[r"please tell me about (\w+)"], &log),
        ]);

        let outcome = d.dispatch("please tell me about rust").await;

        assert_eq!(outcome.plugin_name(), Some("first"));
        assert!(matches!(
            outcome,
            DispatchOutcome::Matched {
                pass: MatchPass::NaturalLanguage,
                ..
            }
        ));
        assert_eq!(log.calls(), vec!["first:rust"]);
    }

    #[tokio::test]
    async fn failed_executor_does_not_fall_through() {
        let log = CallLog::default();
        let d = dispatcher(vec![
            plugin_with("broken", r"^/go\s+(.+)$", &[], &log, true),
            plugin("backup", r"^/go\s+(.+)$", &[], &log),
        ]);

        match d.dispatch("/go now").await {
            DispatchOutcome::Matched { plugin, result, .. } => {
                assert_eq!(plugin.name(), "broken");
                assert!(!result.success());
                assert_eq!(result.error_message(), Some("boom"));
            }
            DispatchOutcome::NoMatch => panic!("expected a match"),
        }
        assert_eq!(log.calls(), vec!["broken:now"]);
    }

    #[tokio::test]
    async fn unmatched_input_runs_nothing() {
        let log = CallLog::default();
        let d = dispatcher(vec![plugin("a", r"^/a\s+(.+)$", &[r"alpha (\w+)"], &log)]);

        assert!(matches!(d.dispatch("hello there").await, DispatchOutcome::NoMatch));
        assert!(log.calls().is_empty());
    }

    #[test]
    fn hints_are_listed_once_in_registration_order() {
        let log = CallLog::default();
        let d = dispatcher(vec![
            plugin("zeta", r"^/zeta", &[], &log),
            plugin("alpha", r"^/alpha", &[], &log),
            plugin("mid", r"^/mid", &[], &log),
        ]);

        assert_eq!(d.list_invocation_hints(), vec!["/zeta", "/alpha", "/mid"]);
    }

    #[test]
    fn duplicate_names_are_kept_in_order() {
        let log = CallLog::default();
        let d = dispatcher(vec![
            plugin("dup", r"^/dup", &[], &log),
            plugin("dup", r"^/dup", &[], &log),
        ]);

        assert_eq!(d.registry().len(), 2);
        assert_eq!(d.list_invocation_hints(), vec!["/dup", "/dup"]);
    }

    #[tokio::test]
    async fn builtin_registry_routes_commands_and_questions() {
        let d = create_plugin_registry(&Config::default(), Arc::new(OfflineFetcher)).unwrap();

        assert_eq!(
            d.list_invocation_hints(),
            vec!["/weather [city]", "/calc [expression]", "/define [word]"]
        );
        assert_eq!(d.dispatch("/calc 1+1").await.plugin_name(), Some("calculator"));
        assert_eq!(d.dispatch("/WEATHER Oslo").await.plugin_name(), Some("weather"));
        assert_eq!(
            d.dispatch("What is the weather in Paris?").await.plugin_name(),
            Some("weather")
        );
        assert_eq!(d.dispatch("what is 6 * 7?").await.plugin_name(), Some("calculator"));
        assert_eq!(
            d.dispatch("definition of serendipity").await.plugin_name(),
            Some("dictionary")
        );
        assert!(matches!(d.dispatch("good morning").await, DispatchOutcome::NoMatch));
    }

    #[tokio::test]
    async fn slash_command_overrides_natural_language_of_earlier_plugin() {
        let d = create_plugin_registry(&Config::default(), Arc::new(OfflineFetcher)).unwrap();

        // Would also match the weather plugin's "weather in ..." phrasing.
        let outcome = d.dispatch("/define weather in paris").await;
        assert_eq!(outcome.plugin_name(), Some("dictionary"));
    }
}
