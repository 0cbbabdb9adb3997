//! Main TUI runner - entry point and event loop

use std::sync::Arc;

use ratatui::DefaultTerminal;
use sqlcoach_app::actions::handle_action;
use sqlcoach_app::{
    process_message, AppState, Clipboard, ClipboardBridge, ContextStore, Message, Runtime,
    UpdateAction,
};
use sqlcoach_client::Backend;
use sqlcoach_core::prelude::*;
use tokio::sync::mpsc;

use crate::terminal::TerminalGuard;
use crate::{event, render};

/// Message channel capacity
const CHANNEL_CAPACITY: usize = 256;

/// Run the TUI until the user quits
pub async fn run<B>(backend: B, mut state: AppState, clipboard: Box<dyn Clipboard>) -> Result<()>
where
    B: Backend + Sync + 'static,
{
    info!(
        "Starting SQL Coach UI (user {}, backend {})",
        state.user_id, state.settings.api.base_url
    );

    let mut guard = TerminalGuard::init()?;

    let (msg_tx, msg_rx) = mpsc::channel::<Message>(CHANNEL_CAPACITY);
    let backend = Arc::new(backend);

    // Nothing the user does triggers the first health check
    handle_action(UpdateAction::CheckHealth, &backend, msg_tx.clone());
    spawn_context_logger(&state.context);

    let mut runtime = Runtime::new(backend, msg_tx, ClipboardBridge::new(clipboard));
    let result = run_loop(guard.terminal(), &mut state, msg_rx, &mut runtime);

    if let Err(ref e) = result {
        error!("UI loop ended with error: {}", e);
    } else {
        info!("SQL Coach UI closed");
    }
    result
}

/// Trace every context change; the task ends with the store
fn spawn_context_logger(context: &ContextStore) {
    let mut rx = context.subscribe();
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let ctx = rx.borrow_and_update().clone();
            debug!(
                "Context: page={} module={:?} question_len={}",
                ctx.current_page.as_str(),
                ctx.current_module,
                ctx.current_question.len()
            );
        }
    });
}

/// Main event loop
fn run_loop<B>(
    terminal: &mut DefaultTerminal,
    state: &mut AppState,
    mut msg_rx: mpsc::Receiver<Message>,
    runtime: &mut Runtime<B>,
) -> Result<()>
where
    B: Backend + Sync + 'static,
{
    while !state.should_quit() {
        // Results of background tasks
        while let Ok(msg) = msg_rx.try_recv() {
            process_message(state, msg, runtime);
        }

        terminal.draw(|frame| render::view(frame, state))?;

        if let Some(message) = event::poll()? {
            process_message(state, message, runtime);
        }
    }

    Ok(())
}
