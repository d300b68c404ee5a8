use super::ChatSession;
use crate::core::error::ChatError;

use console::style;

pub trait SessionCommand: Send + Sync {
    fn execute(&self, session: &mut ChatSession, args: &[&str])
    -> Result<Option<String>, ChatError>;
    fn help(&self) -> &'static str;
}

pub struct QuitCommand;
pub struct HelpCommand;
pub struct ClearCommand;
pub struct SaveHistoryCommand;
pub struct LoadHistoryCommand;
pub struct ListHistoryCommand;
pub struct DeleteHistoryCommand;

impl SessionCommand for QuitCommand {
    fn execute(
        &self,
        session: &mut ChatSession,
        _args: &[&str],
    ) -> Result<Option<String>, ChatError> {
        session.should_continue = false;
        Ok(None)
    }

    fn help(&self) -> &'static str {
        "/quit - Exit the chat session"
    }
}

impl SessionCommand for HelpCommand {
    fn execute(
        &self,
        session: &mut ChatSession,
        _args: &[&str],
    ) -> Result<Option<String>, ChatError> {
        let mut lines = vec![style("Plugins").bold().underlined().to_string()];
        lines.extend(session.plugin_hints.iter().map(|hint| format!("  {}", hint)));
        lines.push(String::new());
        lines.push(style("Session commands").bold().underlined().to_string());
        lines.extend(
            [
                HelpCommand.help(),
                ClearCommand.help(),
                SaveHistoryCommand.help(),
                LoadHistoryCommand.help(),
                ListHistoryCommand.help(),
                DeleteHistoryCommand.help(),
                QuitCommand.help(),
            ]
            .iter()
            .map(|help| format!("  {}", help)),
        );
        lines.push(String::new());
        lines.push(
            "Questions like \"what is the weather in Paris?\" or \"define serendipity\" work too."
                .to_string(),
        );

        Ok(Some(lines.join("\n")))
    }

    fn help(&self) -> &'static str {
        "/help - Show plugins and session commands"
    }
}

impl SessionCommand for ClearCommand {
    fn execute(
        &self,
        session: &mut ChatSession,
        _args: &[&str],
    ) -> Result<Option<String>, ChatError> {
        session.conversation.clear();
        Ok(Some("Chat history cleared.".to_string()))
    }

    fn help(&self) -> &'static str {
        "/clear - Clear conversation history"
    }
}

impl SessionCommand for SaveHistoryCommand {
    fn execute(
        &self,
        session: &mut ChatSession,
        args: &[&str],
    ) -> Result<Option<String>, ChatError> {
        if session.conversation.is_empty() {
            return Ok(Some("Nothing to save yet.".to_string()));
        }

        let path = session
            .history
            .save(&session.conversation, args.first().copied())?;
        Ok(Some(format!("History saved to: {}", path.display())))
    }

    fn help(&self) -> &'static str {
        "/save [filename] - Save the conversation to a file"
    }
}

impl SessionCommand for LoadHistoryCommand {
    fn execute(
        &self,
        session: &mut ChatSession,
        args: &[&str],
    ) -> Result<Option<String>, ChatError> {
        let Some(name) = args.first() else {
            return Ok(Some("Please specify a filename".to_string()));
        };

        session.conversation = session.history.load(name)?;
        Ok(Some(format!(
            "Loaded \"{}\" ({} messages)",
            session.conversation.title,
            session.conversation.len()
        )))
    }

    fn help(&self) -> &'static str {
        "/load <filename> - Load a saved conversation"
    }
}

impl SessionCommand for ListHistoryCommand {
    fn execute(
        &self,
        session: &mut ChatSession,
        _args: &[&str],
    ) -> Result<Option<String>, ChatError> {
        let files = session.history.list()?;
        if files.is_empty() {
            Ok(Some(format!(
                "No history files found in {}",
                session.history.dir().display()
            )))
        } else {
            Ok(Some(files.join("\n")))
        }
    }

    fn help(&self) -> &'static str {
        "/list - List saved conversations"
    }
}

impl SessionCommand for DeleteHistoryCommand {
    fn execute(
        &self,
        session: &mut ChatSession,
        args: &[&str],
    ) -> Result<Option<String>, ChatError> {
        let Some(name) = args.first() else {
            return Ok(Some("Please specify a filename to delete".to_string()));
        };

        if session.history.delete(name)? {
            Ok(Some(format!("Deleted history file: {}", name)))
        } else {
            Ok(Some(format!("File not found: {}", name)))
        }
    }

    fn help(&self) -> &'static str {
        "/delete <filename> - Delete a saved conversation"
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::{ChatSession, create_command_registry};
    use crate::conversation::{HistoryStore, MessageKind, Sender};

    fn session(dir: &std::path::Path) -> ChatSession {
        ChatSession::new(
            HistoryStore::new(dir),
            vec!["/weather [city]".to_string(), "/calc [expression]".to_string()],
        )
    }

    #[test]
    fn non_session_input_is_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path());
        let commands = create_command_registry();

        assert!(commands.try_execute("/weather Paris", &mut session).is_none());
        assert!(commands.try_execute("hello", &mut session).is_none());
        assert!(commands.try_execute("/", &mut session).is_none());
    }

    #[test]
    fn quit_stops_the_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path());
        let commands = create_command_registry();

        let output = commands.try_execute("/quit", &mut session).unwrap().unwrap();
        assert_eq!(output, None);
        assert!(!session.should_continue);
    }

    #[test]
    fn help_lists_plugin_hints() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path());
        let commands = create_command_registry();

        let output = commands
            .try_execute("/help", &mut session)
            .unwrap()
            .unwrap()
            .unwrap();
        assert!(output.contains("/weather [city]"));
        assert!(output.contains("/calc [expression]"));
        assert!(output.contains("/quit"));
    }

    #[test]
    fn save_list_load_delete_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path());
        let commands = create_command_registry();
        session
            .conversation
            .add_message(Sender::User, "/calc 2 + 2", MessageKind::Text);

        commands.try_execute("/save first", &mut session).unwrap().unwrap();
        let listing = commands
            .try_execute("/list", &mut session)
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(listing, "first.json");

        commands.try_execute("/clear", &mut session).unwrap().unwrap();
        assert!(session.conversation.is_empty());

        commands.try_execute("/load first.json", &mut session).unwrap().unwrap();
        assert_eq!(session.conversation.title, "/calc 2 + 2");
        assert_eq!(session.conversation.len(), 1);

        let deleted = commands
            .try_execute("/delete first.json", &mut session)
            .unwrap()
            .unwrap()
            .unwrap();
        assert!(deleted.starts_with("Deleted"));
        assert!(session.history.list().unwrap().is_empty());
    }

    #[test]
    fn saving_an_empty_conversation_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path());
        let commands = create_command_registry();

        let output = commands
            .try_execute("/save empty", &mut session)
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(output, "Nothing to save yet.");
        assert!(session.history.list().unwrap().is_empty());
    }

    #[test]
    fn loading_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path());
        let commands = create_command_registry();

        let result = commands.try_execute("/load nope.json", &mut session).unwrap();
        assert!(result.is_err());
    }

    #[test]
    fn command_names_are_sorted() {
        let names = create_command_registry().get_command_names();
        assert_eq!(
            names,
            vec!["clear", "delete", "help", "list", "load", "quit", "save"]
        );
    }
}
