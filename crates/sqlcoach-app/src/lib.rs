//! sqlcoach-app - Application state and orchestration for SQL Coach
//!
//! This crate implements the TEA (The Elm Architecture) pattern for state
//! management: a [`Message`] goes through [`handler::update`], which mutates
//! [`AppState`] and may return an [`UpdateAction`]. Actions are executed by
//! [`process::process_message`] against a [`sqlcoach_client::Backend`].
//!
//! Also home to configuration loading, the anonymous session identity, the
//! shared conversational context and the clipboard bridge.

pub mod actions;
pub mod analysis;
pub mod chat;
pub mod cheatsheet;
pub mod clipboard;
pub mod config;
pub mod context_store;
pub mod copy_state;
pub mod handler;
pub mod input_key;
pub mod message;
pub mod practice;
pub mod process;
pub mod session_identity;
pub mod state;
pub mod toast;

// Re-export main types
pub use clipboard::{Clipboard, ClipboardBridge, NoClipboard};
pub use context_store::ContextStore;
pub use handler::{UpdateAction, UpdateResult};
pub use input_key::InputKey;
pub use message::Message;
pub use process::{process_message, Runtime};
pub use session_identity::{FileStore, MemoryStore, SessionIdentity};
pub use state::{AppPhase, AppState, Screen};
