//! Handler module - TEA update function and event handlers
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch
//! - `keys`: Key event handlers per screen and focus
//! - `navigation`: Screen switching and context updates
//! - `cheatsheet`: Cheat sheet handlers
//! - `practice`: Module list and question/answer flow
//! - `analysis`: Analytics dashboard handlers
//! - `chat`: Chat panel handlers

pub(crate) mod analysis;
pub(crate) mod chat;
pub(crate) mod cheatsheet;
pub(crate) mod keys;
pub(crate) mod navigation;
pub(crate) mod practice;
pub(crate) mod update;


use sqlcoach_core::{ChatRequest, Difficulty, DynamicExampleRequest, EvaluateAnswerRequest};

use crate::message::Message;

// Re-export main entry point
pub use update::update;

#[cfg(test)]
pub(crate) use keys::handle_key;

/// Actions that the event loop should perform after update
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateAction {
    /// Probe backend liveness
    CheckHealth,

    /// Fetch all cheat-sheet entries
    LoadCheatSheet,

    /// Generate a business example for a cheat-sheet entry
    GenerateExample {
        entry_id: i64,
        request: DynamicExampleRequest,
    },

    /// Fetch modules and the user's progress together
    LoadPracticeList { user_id: String },

    /// Fetch module detail and the first question together
    LoadModule {
        module_id: i64,
        generation: u64,
        difficulty: Difficulty,
    },

    EvaluateAnswer {
        module_id: i64,
        generation: u64,
        request: EvaluateAnswerRequest,
    },

    LoadQuestion {
        module_id: i64,
        generation: u64,
        difficulty: Difficulty,
    },

    /// Fetch analytics, detailed analytics and learning path together
    LoadAnalysis { user_id: String, generation: u64 },

    SendChat { request: ChatRequest },

    ClearChat,

    /// Put `text` on the clipboard for the block `key`
    Copy { key: String, text: String },
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Optional action for the event loop to perform
    pub action: Option<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            action: None,
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            message: None,
            action: Some(action),
        }
    }
}
