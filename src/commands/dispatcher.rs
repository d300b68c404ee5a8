use super::{
    ChatSession,
    handler::{
        ClearCommand, DeleteHistoryCommand, HelpCommand, ListHistoryCommand, LoadHistoryCommand,
        QuitCommand, SaveHistoryCommand,
    },
    registry::CommandRegistry,
};
use crate::core::error::ChatError;
use std::sync::Arc;

/// Routes `/name args...` to session commands. Anything else, including
/// slash words that name no session command, is left for the plugins.
#[derive(Clone)]
pub struct CommandDispatcher {
    registry: Arc<CommandRegistry>,
}

impl CommandDispatcher {
    pub fn new(registry: Arc<CommandRegistry>) -> Self {
        Self { registry }
    }

    /// `None` when `input` is not a session command.
    pub fn try_execute(
        &self,
        input: &str,
        session: &mut ChatSession,
    ) -> Option<Result<Option<String>, ChatError>> {
        let rest = input.trim().strip_prefix('/')?;
        let mut parts = rest.split_whitespace();
        let command = parts.next()?;
        if !self.registry.contains(command) {
            return None;
        }

        let args: Vec<&str> = parts.collect();
        Some(self.registry.execute(command, &args, session))
    }

    pub fn get_command_names(&self) -> Vec<String> {
        self.registry.get_command_names()
    }
}

pub fn create_command_registry() -> CommandDispatcher {
    let mut registry = CommandRegistry::new();

    registry.register("quit", QuitCommand);
    registry.register("help", HelpCommand);
    registry.register("clear", ClearCommand);
    registry.register("save", SaveHistoryCommand);
    registry.register("load", LoadHistoryCommand);
    registry.register("list", ListHistoryCommand);
    registry.register("delete", DeleteHistoryCommand);

    CommandDispatcher::new(Arc::new(registry))
}
