use crate::config::Config;
use crate::core::error::ChatError;

use console::style;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::{Highlighter, MatchingBracketHighlighter};
use rustyline::hint::{Hinter, HistoryHinter};
use rustyline::history::FileHistory;
use rustyline::validate::Validator;
use rustyline::{CompletionType, Context, EditMode, Editor, Helper};
use std::borrow::Cow;

/// One completion target: what is inserted and what the list shows.
#[derive(Debug, Clone, PartialEq)]
struct Candidate {
    command: String,
    display: String,
}

/// Completes `/` prefixes against session commands and plugin invocation
/// hints.
pub struct CommandCompleter {
    candidates: Vec<Candidate>,
}

impl CommandCompleter {
    pub fn new(command_names: &[String], plugin_hints: &[String]) -> Self {
        let commands = command_names.iter().map(|name| Candidate {
            command: format!("/{}", name),
            display: format!("/{}", name),
        });
        let plugins = plugin_hints.iter().map(|hint| Candidate {
            command: hint.split_whitespace().next().unwrap_or(hint).to_string(),
            display: hint.clone(),
        });

        Self {
            candidates: commands.chain(plugins).collect(),
        }
    }

    /// Candidates whose text after `/` contains what was typed after `/`.
    pub fn matches(&self, typed: &str) -> Vec<Pair> {
        let Some(needle) = typed.strip_prefix('/') else {
            return Vec::new();
        };
        let needle = needle.to_lowercase();

        self.candidates
            .iter()
            .filter(|candidate| {
                candidate
                    .display
                    .trim_start_matches('/')
                    .to_lowercase()
                    .contains(&needle)
            })
            .map(|candidate| Pair {
                display: candidate.display.clone(),
                replacement: format!("{} ", candidate.command),
            })
            .collect()
    }

    /// The rest of the only command starting with `typed`, if exactly one
    /// does.
    fn inline_hint(&self, typed: &str) -> Option<String> {
        if typed.len() < 2 || typed.contains(char::is_whitespace) {
            return None;
        }

        let mut found = self
            .candidates
            .iter()
            .filter(|candidate| candidate.display.starts_with(typed));
        match (found.next(), found.next()) {
            (Some(only), None) => Some(only.display[typed.len()..].to_string()),
            _ => None,
        }
    }
}

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let typed = &line[..pos];
        if !typed.starts_with('/') || typed.contains(char::is_whitespace) {
            return Ok((pos, Vec::new()));
        }
        Ok((0, self.matches(typed)))
    }
}

/// Helper struct that combines all rustyline components
pub struct ChatHelper {
    completer: CommandCompleter,
    highlighter: MatchingBracketHighlighter,
    history_hinter: HistoryHinter,
}

impl ChatHelper {
    pub fn new(command_names: &[String], plugin_hints: &[String]) -> Self {
        Self {
            completer: CommandCompleter::new(command_names, plugin_hints),
            highlighter: MatchingBracketHighlighter::new(),
            history_hinter: HistoryHinter {},
        }
    }
}

impl Helper for ChatHelper {}

impl Completer for ChatHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        self.completer.complete(line, pos, ctx)
    }
}

impl Hinter for ChatHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<String> {
        if pos == line.len() {
            if let Some(hint) = self.completer.inline_hint(line) {
                return Some(hint);
            }
        }
        self.history_hinter.hint(line, pos, ctx)
    }
}

impl Highlighter for ChatHelper {
    fn highlight<'l>(&self, line: &'l str, pos: usize) -> Cow<'l, str> {
        self.highlighter.highlight(line, pos)
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(style(hint).dim().to_string())
    }

    fn highlight_candidate<'c>(
        &self,
        candidate: &'c str,
        completion: CompletionType,
    ) -> Cow<'c, str> {
        self.highlighter.highlight_candidate(candidate, completion)
    }
}

// Unbalanced input goes through so the calculator can report it.
impl Validator for ChatHelper {}

/// Creates a configured rustyline editor
pub fn create_editor(
    command_names: &[String],
    plugin_hints: &[String],
) -> Result<Editor<ChatHelper, FileHistory>, ChatError> {
    let config = rustyline::Config::builder()
        .history_ignore_space(true)
        .completion_type(CompletionType::List)
        .edit_mode(EditMode::Emacs)
        .build();

    let mut editor = Editor::with_config(config)
        .map_err(|e| ChatError::Input(format!("Failed to create line editor: {}", e)))?;
    editor.set_helper(Some(ChatHelper::new(command_names, plugin_hints)));

    let _ = editor.load_history(&Config::input_history_path());

    Ok(editor)
}

/// Reads a line of input. `None` on Ctrl-C or Ctrl-D.
pub fn read_input(
    editor: &mut Editor<ChatHelper, FileHistory>,
) -> Result<Option<String>, ChatError> {
    let prompt = style("> ").bold().cyan().to_string();
    match editor.readline(&prompt) {
        Ok(line) => {
            if !line.trim().is_empty() {
                editor.add_history_entry(line.as_str())?;
            }
            Ok(Some(line))
        }
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Saves the editor history
pub fn save_history(editor: &mut Editor<ChatHelper, FileHistory>) -> Result<(), ChatError> {
    let history_path = Config::input_history_path();

    if let Some(parent) = history_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    editor
        .save_history(&history_path)
        .map_err(|e| ChatError::Input(format!("Failed to save history: {}", e)))
}
