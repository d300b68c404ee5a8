pub mod dispatcher;
pub mod handler;
pub mod registry;

use crate::conversation::{Conversation, HistoryStore};
pub use dispatcher::{CommandDispatcher, create_command_registry};

/// Mutable state the session commands operate on.
pub struct ChatSession {
    pub conversation: Conversation,
    pub history: HistoryStore,
    pub plugin_hints: Vec<String>,
    pub should_continue: bool,
}

impl ChatSession {
    pub fn new(history: HistoryStore, plugin_hints: Vec<String>) -> Self {
        Self {
            conversation: Conversation::new(),
            history,
            plugin_hints,
            should_continue: true,
        }
    }
}
