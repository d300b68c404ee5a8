use super::{ExecutionResult, FailureKind, Payload, PluginDescriptor, PluginExecutor, PluginMatch};
use crate::core::error::ChatError;
use crate::fetchers::weather::WeatherFetcher;

use async_trait::async_trait;
use std::sync::Arc;

pub const NAME: &str = "weather";

pub struct WeatherPlugin {
    fetcher: WeatherFetcher,
}

impl WeatherPlugin {
    pub fn new(fetcher: WeatherFetcher) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl PluginExecutor for WeatherPlugin {
    async fn execute(&self, _input: &str, matched: &PluginMatch) -> ExecutionResult {
        let city = matched.argument();
        if city.is_empty() {
            return ExecutionResult::failure(
                FailureKind::MissingArgument,
                "Please specify a city name",
            );
        }

        let record = self.fetcher.current_or_synthetic(city).await;
        ExecutionResult::card(Payload::Weather(record))
    }
}

pub fn descriptor(fetcher: WeatherFetcher) -> Result<PluginDescriptor, ChatError> {
    PluginDescriptor::new(
        NAME,
        "Get current weather information for any city",
        r"(?i)^/weather\s+(.+)$",
        "/weather [city]",
        Arc::new(WeatherPlugin::new(fetcher)),
    )?
    .with_natural_language(&[
        r"(?:what's|what is|how's|how is) the weather (?:in|for|at) ([^?]+)",
        r"weather (?:in|for|at) ([^?]+)",
        r"temperature (?:in|for|at) ([^?]+)",
    ])
}
