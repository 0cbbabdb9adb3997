//! Shared "where is the user" record
//!
//! One [`ContextStore`] is created at startup and handed to whoever needs it.
//! Updates are shallow merges, applied synchronously and broadcast to every
//! subscriber. There is no history: the last writer wins.

use std::sync::Arc;

use sqlcoach_core::{ContextUpdate, ConversationalContext, Page, PageContext};
use tokio::sync::watch;

/// Cloneable handle to the conversational context
#[derive(Debug, Clone)]
pub struct ContextStore {
    tx: Arc<watch::Sender<ConversationalContext>>,
}

impl Default for ContextStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(ConversationalContext::default());
        Self { tx: Arc::new(tx) }
    }

    /// Merge `update` into the context and notify subscribers
    pub fn update(&self, update: ContextUpdate) {
        self.tx.send_modify(|ctx| ctx.merge(update));
    }

    /// Record a route change; `module` is empty outside a module
    pub fn set_route(&self, page: Page, module: impl Into<String>) {
        self.update(ContextUpdate::route(page, module));
    }

    pub fn snapshot(&self) -> ConversationalContext {
        self.tx.borrow().clone()
    }

    /// Receiver that sees every later update
    pub fn subscribe(&self) -> watch::Receiver<ConversationalContext> {
        self.tx.subscribe()
    }

    /// Annotation for chat requests
    pub fn page_context(&self) -> PageContext {
        self.tx.borrow().page_context()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_is_visible_in_snapshot() {
        let store = ContextStore::new();
        store.set_route(Page::Practice, "Module 4");

        let ctx = store.snapshot();
        assert_eq!(ctx.current_page, Page::Practice);
        assert_eq!(ctx.current_module, "Module 4");
    }

    #[test]
    fn test_clones_share_state() {
        let store = ContextStore::new();
        let other = store.clone();
        other.update(ContextUpdate::default().question("Find top customers"));
        assert_eq!(store.snapshot().current_question, "Find top customers");
    }

    #[test]
    fn test_last_writer_wins() {
        let store = ContextStore::new();
        store.update(ContextUpdate::default().module("Joins"));
        store.update(ContextUpdate::default().module("Aggregates"));
        assert_eq!(store.snapshot().current_module, "Aggregates");
    }

    #[tokio::test]
    async fn test_subscribers_are_notified() {
        let store = ContextStore::new();
        let mut rx = store.subscribe();

        store.set_route(Page::Cheatsheet, "");

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().current_page, Page::Cheatsheet);
    }

    #[test]
    fn test_page_context_defaults_to_dashboard() {
        let store = ContextStore::new();
        assert_eq!(store.page_context().page, "dashboard");
    }
}
