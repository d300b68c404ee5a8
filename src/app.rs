use crate::commands::{ChatSession, CommandDispatcher};
use crate::conversation::{HistoryStore, MessageKind, Sender};
use crate::core::error::ChatError;
use crate::display;
use crate::input;
use crate::plugins::{DispatchOutcome, ExecutionResult, PluginDispatcher};

use console::style;
use is_terminal::IsTerminal;
use rand::seq::SliceRandom;
use std::io;
use std::path::PathBuf;
use tracing::debug;

/// Replies for messages no plugin claims.
pub const GENERIC_REPLIES: [&str; 5] = [
    "I understand you're asking about something. Try using one of my plugin commands like /weather, /calc, or /define for specific functionality!",
    "That's an interesting question! I can help you with weather information, calculations, or word definitions using my plugins.",
    "I'm here to help! Use /weather [city] for weather, /calc [expression] for math, or /define [word] for definitions.",
    "For the best experience, try my plugin commands. Type / to see available options!",
    "I can assist you with various tasks through my plugin system. What would you like to explore?",
];

/// What the front end shows for one input line.
#[derive(Debug)]
pub enum Reply {
    Nothing,
    Info(String),
    Plugin {
        name: String,
        result: ExecutionResult,
    },
    Generic(&'static str),
    Error(String),
}

pub struct Application {
    plugins: PluginDispatcher,
    commands: CommandDispatcher,
    history_dir: PathBuf,
}

impl Application {
    pub fn new(plugins: PluginDispatcher, commands: CommandDispatcher, history_dir: PathBuf) -> Self {
        Self {
            plugins,
            commands,
            history_dir,
        }
    }

    pub fn new_session(&self) -> ChatSession {
        ChatSession::new(
            HistoryStore::new(&self.history_dir),
            self.plugins.list_invocation_hints(),
        )
    }

    /// Handles one line: session commands first, then plugin dispatch, then
    /// a generic reply. Everything but session commands is recorded in the
    /// conversation.
    pub async fn handle_message(&self, session: &mut ChatSession, input: &str) -> Reply {
        let input = input.trim();
        if input.is_empty() {
            return Reply::Nothing;
        }

        if let Some(outcome) = self.commands.try_execute(input, session) {
            return match outcome {
                Ok(Some(output)) => Reply::Info(output),
                Ok(None) => Reply::Nothing,
                Err(e) => Reply::Error(e.to_string()),
            };
        }

        session
            .conversation
            .add_message(Sender::User, input, MessageKind::Text);

        let outcome = self.plugins.dispatch(input).await;
        debug!(plugin = ?outcome.plugin_name(), "message handled");

        match outcome {
            DispatchOutcome::Matched {
                plugin,
                pass,
                result,
            } => {
                let name = plugin.name().to_string();
                debug!(plugin = %name, ?pass, "recording plugin reply");
                match &result.outcome {
                    Ok(payload) => {
                        session.conversation.add_message(
                            Sender::Assistant,
                            &format!("Successfully executed {} plugin", name),
                            MessageKind::Plugin {
                                plugin_name: name.clone(),
                                payload: payload.clone(),
                            },
                        );
                    }
                    Err(failure) => {
                        session.conversation.add_message(
                            Sender::Assistant,
                            &failure.message,
                            MessageKind::Text,
                        );
                    }
                }
                Reply::Plugin { name, result }
            }
            DispatchOutcome::NoMatch => {
                let reply = generic_reply();
                session
                    .conversation
                    .add_message(Sender::Assistant, reply, MessageKind::Text);
                Reply::Generic(reply)
            }
        }
    }

    /// One-shot when `query` is given, line by line when stdin is piped,
    /// interactive otherwise.
    pub async fn run(&self, query: Option<String>) -> Result<(), ChatError> {
        let mut session = self.new_session();

        if let Some(query) = query {
            let reply = self.handle_message(&mut session, &query).await;
            show(reply);
            return Ok(());
        }

        if !io::stdin().is_terminal() {
            debug!("reading messages from stdin");
            for line in io::stdin().lines() {
                let line = line?;
                let reply = self.handle_message(&mut session, &line).await;
                show(reply);
                if !session.should_continue {
                    break;
                }
            }
            return Ok(());
        }

        self.run_interactive(&mut session).await
    }

    async fn run_interactive(&self, session: &mut ChatSession) -> Result<(), ChatError> {
        println!(
            "{} Type '/help' for plugins and commands. Press Ctrl+D or type /quit to exit.",
            style("neochat").bold().magenta()
        );
        let registry = self.plugins.registry();
        if !registry.is_empty() {
            println!("{}", style("Plugins:").bold());
            for plugin in registry.iter() {
                println!(
                    "  {:<20} {}",
                    style(plugin.invocation_hint()).cyan(),
                    plugin.description()
                );
            }
        }

        let mut editor =
            input::create_editor(&self.commands.get_command_names(), &session.plugin_hints)?;

        while session.should_continue {
            let Some(line) = input::read_input(&mut editor)? else {
                break;
            };
            let reply = self.handle_message(session, &line).await;
            show(reply);
        }

        input::save_history(&mut editor)?;
        Ok(())
    }
}

fn generic_reply() -> &'static str {
    GENERIC_REPLIES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(GENERIC_REPLIES[0])
}

fn show(reply: Reply) {
    match reply {
        Reply::Nothing => {}
        Reply::Info(text) => display::print_info(&text),
        Reply::Plugin { name, result } => display::print_result(&name, &result),
        Reply::Generic(text) => display::print_reply(text),
        Reply::Error(message) => display::print_error(&message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::create_command_registry;
    use crate::config::Config;
    use crate::fetchers::OfflineFetcher;
    use crate::plugins::{FailureKind, Payload, create_plugin_registry};
    use std::sync::Arc;

    fn app(dir: &std::path::Path) -> Application {
        let plugins = create_plugin_registry(&Config::default(), Arc::new(OfflineFetcher)).unwrap();
        Application::new(plugins, create_command_registry(), dir.to_path_buf())
    }

    #[tokio::test]
    async fn plugin_success_is_recorded_as_plugin_message() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());
        let mut session = app.new_session();

        let reply = app.handle_message(&mut session, "/calc 2 * (3 + 4)").await;

        let Reply::Plugin { name, result } = reply else {
            panic!("expected plugin reply");
        };
        assert_eq!(name, "calculator");
        assert!(result.success());

        let messages = &session.conversation.messages;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].sender, Sender::User);
        assert_eq!(messages[1].content, "Successfully executed calculator plugin");
        assert!(matches!(
            &messages[1].kind,
            MessageKind::Plugin { plugin_name, payload: Payload::Calculation(record) }
                if plugin_name == "calculator" && record.result == 14.0
        ));
        assert_eq!(session.conversation.title, "/calc 2 * (3 + 4)");
    }

    #[tokio::test]
    async fn plugin_failure_is_recorded_as_text() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());
        let mut session = app.new_session();

        let reply = app.handle_message(&mut session, "/calc 2 +").await;

        let Reply::Plugin { result, .. } = reply else {
            panic!("expected plugin reply");
        };
        assert_eq!(result.failure_kind(), Some(FailureKind::EvaluationFailure));
        let last = session.conversation.messages.last().unwrap();
        assert_eq!(last.content, "Invalid mathematical expression");
        assert_eq!(last.kind, MessageKind::Text);
    }

    #[tokio::test]
    async fn offline_weather_still_answers() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());
        let mut session = app.new_session();

        let reply = app.handle_message(&mut session, "/weather Oslo").await;

        let Reply::Plugin { name, result } = reply else {
            panic!("expected plugin reply");
        };
        assert_eq!(name, "weather");
        assert!(matches!(
            result.payload(),
            Some(Payload::Weather(record)) if record.location == "Oslo"
        ));
    }

    #[tokio::test]
    async fn unmatched_text_gets_a_generic_reply() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());
        let mut session = app.new_session();

        let reply = app.handle_message(&mut session, "good morning").await;

        let Reply::Generic(text) = reply else {
            panic!("expected generic reply");
        };
        assert!(GENERIC_REPLIES.contains(&text));
        assert_eq!(session.conversation.len(), 2);
    }

    #[tokio::test]
    async fn session_commands_run_before_plugins() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());
        let mut session = app.new_session();

        let reply = app.handle_message(&mut session, "/help").await;
        let Reply::Info(text) = reply else {
            panic!("expected help text");
        };
        assert!(text.contains("/define [word]"));
        assert!(session.conversation.is_empty());

        assert!(matches!(
            app.handle_message(&mut session, "/quit").await,
            Reply::Nothing
        ));
        assert!(!session.should_continue);
    }

    #[tokio::test]
    async fn blank_input_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());
        let mut session = app.new_session();

        assert!(matches!(
            app.handle_message(&mut session, "   ").await,
            Reply::Nothing
        ));
        assert!(session.conversation.is_empty());
    }

    #[tokio::test]
    async fn history_commands_use_the_configured_directory() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());
        let mut session = app.new_session();

        app.handle_message(&mut session, "/calc 1 + 1").await;
        let reply = app.handle_message(&mut session, "/save today").await;

        assert!(matches!(reply, Reply::Info(_)));
        assert!(dir.path().join("today.json").exists());

        let reply = app.handle_message(&mut session, "/load missing").await;
        assert!(matches!(reply, Reply::Error(_)));
    }
}
