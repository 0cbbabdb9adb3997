//! Message processing: TEA update loop plus action dispatch
//!
//! [`Runtime`] owns everything actions need beyond the state: the backend,
//! the message sender, the clipboard and the pending "Copied!" reset timer.

use std::sync::Arc;

use sqlcoach_client::Backend;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::actions::handle_action;
use crate::clipboard::{ClipboardBridge, CopyOutcome, COPY_RESET_DELAY};
use crate::handler::{self, UpdateAction};
use crate::message::Message;
use crate::state::AppState;

/// Side-effect context for [`process_message`]
pub struct Runtime<B> {
    backend: Arc<B>,
    msg_tx: mpsc::Sender<Message>,
    clipboard: ClipboardBridge,
    copy_reset: Option<JoinHandle<()>>,
}

impl<B> Runtime<B>
where
    B: Backend + Sync + 'static,
{
    pub fn new(backend: Arc<B>, msg_tx: mpsc::Sender<Message>, clipboard: ClipboardBridge) -> Self {
        Self {
            backend,
            msg_tx,
            clipboard,
            copy_reset: None,
        }
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    /// Copy synchronously, spawn everything else
    fn dispatch(&mut self, state: &mut AppState, action: UpdateAction) {
        match action {
            UpdateAction::Copy { key, text } => self.copy(state, &key, &text),
            other => handle_action(other, &self.backend, self.msg_tx.clone()),
        }
    }

    /// Copy now and schedule the reset; a newer copy replaces the timer
    fn copy(&mut self, state: &mut AppState, key: &str, text: &str) {
        let outcome = self
            .clipboard
            .copy(text, key, &mut state.copy, &mut state.toasts);

        if let CopyOutcome::Copied { generation } = outcome {
            if let Some(previous) = self.copy_reset.take() {
                previous.abort();
            }
            let msg_tx = self.msg_tx.clone();
            self.copy_reset = Some(tokio::spawn(async move {
                tokio::time::sleep(COPY_RESET_DELAY).await;
                let _ = msg_tx.send(Message::CopyResetElapsed { generation }).await;
            }));
        }
    }
}

impl<B> Drop for Runtime<B> {
    fn drop(&mut self) {
        if let Some(timer) = self.copy_reset.take() {
            timer.abort();
        }
    }
}

impl<B> std::fmt::Debug for Runtime<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("clipboard", &self.clipboard)
            .field("copy_reset_pending", &self.copy_reset.is_some())
            .finish_non_exhaustive()
    }
}

/// Process a message through the TEA update function
pub fn process_message<B>(state: &mut AppState, message: Message, runtime: &mut Runtime<B>)
where
    B: Backend + Sync + 'static,
{
    let mut msg = Some(message);
    while let Some(m) = msg {
        let result = handler::update(state, m);

        if let Some(action) = result.action {
            runtime.dispatch(state, action);
        }

        msg = result.message;
    }
}
