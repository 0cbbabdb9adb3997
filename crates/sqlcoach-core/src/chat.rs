//! Chat conversation entries

use chrono::{DateTime, Local};

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

/// One entry of the in-memory conversation
///
/// Messages live only for the current run and are never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    /// Creation time in unix milliseconds; doubles as the copy-key prefix
    pub id: i64,
    pub role: ChatRole,
    pub content: String,
    pub suggestions: Vec<String>,
    pub context_aware: Option<bool>,
    pub created_at: DateTime<Local>,
}

impl ChatMessage {
    pub fn user(id: i64, content: impl Into<String>) -> Self {
        Self {
            id,
            role: ChatRole::User,
            content: content.into(),
            suggestions: Vec::new(),
            context_aware: None,
            created_at: Local::now(),
        }
    }

    pub fn assistant(id: i64, content: impl Into<String>, suggestions: Vec<String>) -> Self {
        Self {
            id,
            role: ChatRole::Assistant,
            content: content.into(),
            suggestions,
            context_aware: None,
            created_at: Local::now(),
        }
    }

    pub fn with_context_aware(mut self, context_aware: Option<bool>) -> Self {
        self.context_aware = context_aware;
        self
    }

    pub fn is_user(&self) -> bool {
        self.role == ChatRole::User
    }

    /// Copy key for the code segment at `segment_index` of this message
    pub fn segment_key(&self, segment_index: usize) -> String {
        format!("{}-{}", self.id, segment_index)
    }
}
