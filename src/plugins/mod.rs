pub mod calculator;
pub mod dictionary;
pub mod dispatcher;
pub mod handler;
pub mod registry;
pub mod weather;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use dispatcher::{DispatchOutcome, PluginDispatcher, create_plugin_registry};
pub use handler::{PluginDescriptor, PluginExecutor, PluginMatch};

/// How the front end should draw a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresentationHint {
    Text,
    Card,
    Table,
    Image,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    /// The trigger matched but captured nothing usable.
    MissingArgument,
    /// The argument contains input the plugin refuses to process.
    ValidationFailure,
    /// A lookup service failed; weather and dictionary mask this with fallback data.
    UpstreamFailure,
    /// The argument was accepted but could not be computed.
    EvaluationFailure,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl fmt::Display for PluginFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub location: String,
    pub temperature_celsius: i32,
    pub condition: String,
    pub humidity_percent: u8,
    pub wind_speed_kph: u32,
    pub icon_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRecord {
    pub expression: String,
    pub result: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sense {
    pub part_of_speech: String,
    pub definition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefinitionRecord {
    pub word: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronunciation: Option<String>,
    pub senses: Vec<Sense>,
}

/// Plugin-specific result data, one variant per built-in plugin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Payload {
    Weather(WeatherRecord),
    Calculation(CalculationRecord),
    Definition(DefinitionRecord),
}

/// Outcome of one executor run. A result holds either a payload or a
/// failure, never both.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionResult {
    pub outcome: Result<Payload, PluginFailure>,
    pub presentation: PresentationHint,
}

impl ExecutionResult {
    pub fn card(payload: Payload) -> Self {
        Self {
            outcome: Ok(payload),
            presentation: PresentationHint::Card,
        }
    }

    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            outcome: Err(PluginFailure {
                kind,
                message: message.into(),
            }),
            presentation: PresentationHint::Text,
        }
    }

    pub fn success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn payload(&self) -> Option<&Payload> {
        self.outcome.as_ref().ok()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.outcome.as_ref().err().map(|f| f.message.as_str())
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        self.outcome.as_ref().err().map(|f| f.kind)
    }
}
