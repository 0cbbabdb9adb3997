//! Chat panel handlers

use sqlcoach_core::prelude::*;
use sqlcoach_core::{ChatReply, ChatRequest};

use crate::chat::{CLEAR_FAILED_TOAST, CLEAR_OK_TOAST, SEND_FAILED_TOAST};
use crate::state::AppState;

use super::{UpdateAction, UpdateResult};

pub fn handle_toggle(state: &mut AppState) -> UpdateResult {
    if state.chat.open {
        state.chat.close();
    } else {
        let ctx = state.context.snapshot();
        state.chat.open(&ctx);
    }
    state.copy_focus.clear();
    UpdateResult::none()
}

/// Leave full screen first, then close
pub fn handle_escape(state: &mut AppState) -> UpdateResult {
    if state.chat.fullscreen {
        state.chat.fullscreen = false;
    } else {
        state.chat.close();
        state.copy_focus.clear();
    }
    UpdateResult::none()
}

pub fn handle_send(state: &mut AppState) -> UpdateResult {
    let Some(message) = state.chat.take_input() else {
        return UpdateResult::none();
    };
    let request = ChatRequest {
        message,
        context: state.context.page_context(),
    };
    UpdateResult::action(UpdateAction::SendChat { request })
}

pub fn handle_reply(state: &mut AppState, reply: ChatReply) -> UpdateResult {
    if reply.response.trim().is_empty() {
        state.chat.push_fallback();
    } else {
        state
            .chat
            .push_reply(reply.response, reply.suggested_actions, reply.context_aware);
    }
    UpdateResult::none()
}

/// The apology reply is the only trace of a failed turn besides the toast
pub fn handle_failed(state: &mut AppState, error: String) -> UpdateResult {
    warn!("Chat message failed: {}", error);
    state.chat.push_fallback();
    state.toasts.error(SEND_FAILED_TOAST);
    UpdateResult::none()
}

pub fn handle_cleared(state: &mut AppState) -> UpdateResult {
    let ctx = state.context.snapshot();
    state.chat.reset(&ctx);
    state.copy_focus.clear();
    state.toasts.success(CLEAR_OK_TOAST);
    UpdateResult::none()
}

/// The local conversation is kept when the backend refuses to clear
pub fn handle_clear_failed(state: &mut AppState, error: String) -> UpdateResult {
    warn!("Clearing chat history failed: {}", error);
    state.toasts.error(CLEAR_FAILED_TOAST);
    UpdateResult::none()
}
