//! Conversation bookkeeping and on-disk history files.

use crate::core::error::ChatError;
use crate::plugins::Payload;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const DEFAULT_TITLE: &str = "New Chat";
const TITLE_CHARS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    Plugin { plugin_name: String, payload: Payload },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub sender: Sender,
    pub content: String,
    pub kind: MessageKind,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,
    pub title: String,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: DEFAULT_TITLE.to_string(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Appends a message. The first user message names an untitled
    /// conversation.
    pub fn add_message(&mut self, sender: Sender, content: &str, kind: MessageKind) -> Uuid {
        let now = Utc::now();
        let message = Message {
            id: Uuid::new_v4(),
            sender,
            content: content.to_string(),
            kind,
            timestamp: now,
        };
        let id = message.id;

        if self.title == DEFAULT_TITLE && sender == Sender::User {
            self.title = title_from(content);
        }

        self.messages.push(message);
        self.updated_at = now;
        id
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.title = DEFAULT_TITLE.to_string();
        self.updated_at = Utc::now();
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

fn title_from(content: &str) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(TITLE_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

/// Conversation files kept as pretty JSON in one directory.
pub struct HistoryStore {
    dir: PathBuf,
}

impl HistoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn resolve(&self, name: &str) -> Result<PathBuf, ChatError> {
        let name = name.trim();
        let plain = Path::new(name)
            .file_name()
            .is_some_and(|file| file == OsStr::new(name));
        if name.is_empty() || !plain {
            return Err(ChatError::History(format!("invalid history file name: {:?}", name)));
        }

        let mut path = self.dir.join(name);
        if path.extension().is_none() {
            path.set_extension("json");
        }
        Ok(path)
    }

    /// Writes `conversation`, named after the current time when `name` is
    /// `None`.
    pub fn save(&self, conversation: &Conversation, name: Option<&str>) -> Result<PathBuf, ChatError> {
        let name = match name {
            Some(name) => name.to_string(),
            None => chrono::Local::now().format("%Y%m%d_%H%M%S.json").to_string(),
        };
        let path = self.resolve(&name)?;

        fs::create_dir_all(&self.dir)?;
        let file = fs::File::create(&path)?;
        serde_json::to_writer_pretty(file, conversation)?;
        Ok(path)
    }

    pub fn load(&self, name: &str) -> Result<Conversation, ChatError> {
        let path = self.resolve(name)?;
        if !path.exists() {
            return Err(ChatError::History(format!("File not found: {}", path.display())));
        }
        let file = fs::File::open(&path)?;
        Ok(serde_json::from_reader(file)?)
    }

    /// History file names, sorted.
    pub fn list(&self) -> Result<Vec<String>, ChatError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                files.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        files.sort();
        Ok(files)
    }

    /// Returns `false` when there was nothing to delete.
    pub fn delete(&self, name: &str) -> Result<bool, ChatError> {
        let path = self.resolve(name)?;
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)?;
        Ok(true)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
