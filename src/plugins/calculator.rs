use super::{
    CalculationRecord, ExecutionResult, FailureKind, Payload, PluginDescriptor, PluginExecutor,
    PluginMatch,
};
use crate::core::error::ChatError;
use crate::core::evaluator::{evaluate, round_for_display};

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

pub const NAME: &str = "calculator";

const INVALID_CHARACTERS: &str = "Expression contains invalid characters. Only numbers and basic \
operators (+, -, *, /, parentheses) are allowed.";
const INVALID_EXPRESSION: &str = "Invalid mathematical expression";

fn is_allowed(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '+' | '-' | '*' | '/' | '(' | ')' | '.') || c.is_whitespace()
}

/// Drops every character outside the calculator alphabet.
pub fn sanitize(expression: &str) -> String {
    expression.chars().filter(|c| is_allowed(*c)).collect()
}

pub struct CalculatorPlugin;

#[async_trait]
impl PluginExecutor for CalculatorPlugin {
    async fn execute(&self, _input: &str, matched: &PluginMatch) -> ExecutionResult {
        let expression = matched.argument();
        if expression.is_empty() {
            return ExecutionResult::failure(
                FailureKind::MissingArgument,
                "Please provide a mathematical expression",
            );
        }

        // Reject rather than evaluate a stripped version of what was typed.
        if sanitize(expression) != expression {
            return ExecutionResult::failure(FailureKind::ValidationFailure, INVALID_CHARACTERS);
        }

        match evaluate(expression) {
            Ok(value) => ExecutionResult::card(Payload::Calculation(CalculationRecord {
                expression: expression.to_string(),
                result: round_for_display(value),
            })),
            Err(e) => {
                debug!(expression, error = %e, "expression rejected");
                ExecutionResult::failure(FailureKind::EvaluationFailure, INVALID_EXPRESSION)
            }
        }
    }
}

pub fn descriptor() -> Result<PluginDescriptor, ChatError> {
    PluginDescriptor::new(
        NAME,
        "Evaluate mathematical expressions safely",
        r"(?i)^/calc\s+(.+)$",
        "/calc [expression]",
        Arc::new(CalculatorPlugin),
    )?
    .with_natural_language(&[
        r"(?:calculate|compute|what's|what is) (.+?)(?:\?|$)",
        r"(?:solve|evaluate) (.+?)(?:\?|$)",
    ])
}
