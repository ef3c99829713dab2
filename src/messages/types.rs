use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Who a transcript line belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    System,
    User,
    Assistant,
}

impl Speaker {
    fn prefix(self) -> &'static str {
        match self {
            Speaker::System => "[System] ",
            Speaker::User => "You: ",
            Speaker::Assistant => "AI: ",
        }
    }
}

/// One line of the conversation log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: Uuid,
    pub speaker: Speaker,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl LogEntry {
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            speaker,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Speaker::System, text)
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Speaker::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Speaker::Assistant, text)
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.speaker.prefix(), self.text)
    }
}
