//! Chat panel state: conversation, input and context-aware greetings

use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;
use sqlcoach_core::{ChatMessage, ConversationalContext, Page};

/// Emoji markers that prefix suggestion chips
static SUGGESTION_MARKERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[📚🎯💡🔍❓💼📖⚡]").expect("Invalid suggestion marker regex"));

pub const SEND_FAILED_TOAST: &str = "Failed to send message";
pub const CLEAR_OK_TOAST: &str = "Chat history cleared";
pub const CLEAR_FAILED_TOAST: &str = "Failed to clear chat";

const FALLBACK_REPLY: &str = "Sorry, I'm having trouble responding right now. Try asking about SQL syntax, practice modules, or check the cheat sheet for quick reference!";

#[derive(Debug, Clone, Default)]
pub struct ChatState {
    pub open: bool,
    pub fullscreen: bool,
    pub messages: Vec<ChatMessage>,
    pub input: String,
    /// A reply is in flight
    pub loading: bool,
    /// Lines scrolled up from the bottom
    pub scroll: u16,
    /// Suggestion last picked with Tab
    pub suggestion_cursor: Option<usize>,
    last_id: i64,
}

impl ChatState {
    /// Unique, increasing message id based on the wall clock
    pub fn next_id(&mut self) -> i64 {
        let now = Utc::now().timestamp_millis();
        self.last_id = now.max(self.last_id + 1);
        self.last_id
    }

    /// Open the panel; an empty conversation gets a welcome message
    pub fn open(&mut self, ctx: &ConversationalContext) {
        self.open = true;
        if self.messages.is_empty() {
            let id = self.next_id();
            self.messages.push(welcome_message(ctx, id));
        }
    }

    pub fn close(&mut self) {
        self.open = false;
        self.fullscreen = false;
    }

    /// Replace the conversation with a fresh welcome message
    pub fn reset(&mut self, ctx: &ConversationalContext) {
        self.messages.clear();
        self.scroll = 0;
        self.suggestion_cursor = None;
        let id = self.next_id();
        self.messages.push(welcome_message(ctx, id));
    }

    /// Append the user's message and take the input; `None` for blank input
    pub fn take_input(&mut self) -> Option<String> {
        if self.input.trim().is_empty() || self.loading {
            return None;
        }
        let text = std::mem::take(&mut self.input);
        let id = self.next_id();
        self.messages.push(ChatMessage::user(id, text.clone()));
        self.loading = true;
        self.scroll = 0;
        self.suggestion_cursor = None;
        Some(text)
    }

    pub fn push_reply(&mut self, content: String, suggestions: Vec<String>, aware: Option<bool>) {
        let id = self.next_id();
        self.messages
            .push(ChatMessage::assistant(id, content, suggestions).with_context_aware(aware));
        self.loading = false;
        self.scroll = 0;
    }

    /// Apology shown when the assistant cannot answer
    pub fn push_fallback(&mut self) {
        self.push_reply(
            FALLBACK_REPLY.to_string(),
            vec![
                "📚 Visit Cheat Sheet".to_string(),
                "🎯 Try Practice Modules".to_string(),
            ],
            None,
        );
    }

    /// Suggestions of the most recent assistant message
    pub fn latest_suggestions(&self) -> &[String] {
        self.messages
            .iter()
            .rev()
            .find(|m| !m.is_user())
            .map(|m| m.suggestions.as_slice())
            .unwrap_or(&[])
    }

    /// Copy suggestion `index` into the input, without its emoji marker
    pub fn pick_suggestion(&mut self, index: usize) -> bool {
        let Some(suggestion) = self.latest_suggestions().get(index) else {
            return false;
        };
        self.input = strip_suggestion_markers(suggestion);
        self.suggestion_cursor = Some(index);
        true
    }

    /// Index of the suggestion after the last picked one
    pub fn next_suggestion_index(&self) -> Option<usize> {
        let count = self.latest_suggestions().len();
        if count == 0 {
            return None;
        }
        Some(self.suggestion_cursor.map_or(0, |i| (i + 1) % count))
    }

    /// Header status line
    pub fn status(&self, ctx: &ConversationalContext) -> String {
        if self.loading {
            "Typing...".to_string()
        } else if ctx.in_practice_module() {
            format!("Helping with {}", ctx.current_module)
        } else {
            "Ready to help!".to_string()
        }
    }
}

/// Greeting that depends on where the user is
pub fn welcome_message(ctx: &ConversationalContext, id: i64) -> ChatMessage {
    let (content, suggestions) = if ctx.in_practice_module() {
        (
            format!(
                "👋 Hi! I see you're working on {}. How can I help you with this module?",
                ctx.current_module
            ),
            ["❓ Explain this concept", "💡 Give me a hint", "🔍 Show me examples"],
        )
    } else if ctx.current_page == Page::Cheatsheet {
        (
            "👋 Hi! I see you're browsing the cheat sheet. Need help understanding any SQL commands?"
                .to_string(),
            ["🔍 Explain a command", "💼 Show business examples", "📖 Related concepts"],
        )
    } else {
        (
            "👋 Hi! I'm your SQL learning assistant. I can help you with:".to_string(),
            ["📚 SQL syntax questions", "🎯 Practice guidance", "💡 Concept explanations"],
        )
    };

    ChatMessage::assistant(
        id,
        content,
        suggestions.iter().map(|s| s.to_string()).collect(),
    )
}

/// Remove emoji markers and surrounding whitespace from a suggestion
pub fn strip_suggestion_markers(suggestion: &str) -> String {
    SUGGESTION_MARKERS
        .replace_all(suggestion, "")
        .trim()
        .to_string()
}
