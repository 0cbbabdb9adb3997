//! "Where is the user" record consumed by the chat assistant

use serde_json::{Map, Value};

use crate::types::{Page, PageContext};

/// Snapshot of the user's position in the app
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConversationalContext {
    pub current_page: Page,
    pub current_module: String,
    pub current_question: String,
    pub user_progress: Map<String, Value>,
}

/// Partial update; `None` fields are left untouched
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContextUpdate {
    pub current_page: Option<Page>,
    pub current_module: Option<String>,
    pub current_question: Option<String>,
    pub user_progress: Option<Map<String, Value>>,
}

impl ContextUpdate {
    /// Route change: page plus module (empty when leaving a module)
    pub fn route(page: Page, module: impl Into<String>) -> Self {
        Self {
            current_page: Some(page),
            current_module: Some(module.into()),
            ..Default::default()
        }
    }

    pub fn page(mut self, page: Page) -> Self {
        self.current_page = Some(page);
        self
    }

    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.current_module = Some(module.into());
        self
    }

    pub fn question(mut self, question: impl Into<String>) -> Self {
        self.current_question = Some(question.into());
        self
    }

    pub fn progress(mut self, progress: Map<String, Value>) -> Self {
        self.user_progress = Some(progress);
        self
    }
}

impl ConversationalContext {
    /// Shallow merge: every field present in `update` replaces ours
    pub fn merge(&mut self, update: ContextUpdate) {
        if let Some(page) = update.current_page {
            self.current_page = page;
        }
        if let Some(module) = update.current_module {
            self.current_module = module;
        }
        if let Some(question) = update.current_question {
            self.current_question = question;
        }
        if let Some(progress) = update.user_progress {
            self.user_progress = progress;
        }
    }

    /// True when the user is inside a practice module
    pub fn in_practice_module(&self) -> bool {
        self.current_page == Page::Practice && !self.current_module.is_empty()
    }

    /// Annotation sent with chat requests
    pub fn page_context(&self) -> PageContext {
        PageContext {
            page: self.current_page.as_str().to_string(),
            module: self.current_module.clone(),
            question: self.current_question.clone(),
            progress: self.user_progress.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_is_shallow_and_partial() {
        let mut ctx = ConversationalContext {
            current_page: Page::Practice,
            current_module: "Joins".into(),
            current_question: "Q1".into(),
            user_progress: Map::new(),
        };

        ctx.merge(ContextUpdate::default().question("Q2"));
        assert_eq!(ctx.current_module, "Joins");
        assert_eq!(ctx.current_question, "Q2");

        let mut progress = Map::new();
        progress.insert("questionCount".into(), json!(2));
        ctx.merge(ContextUpdate::default().progress(progress.clone()));
        assert_eq!(ctx.user_progress, progress);
    }

    #[test]
    fn test_route_update_clears_module() {
        let mut ctx = ConversationalContext::default();
        ctx.merge(ContextUpdate::route(Page::Practice, "Module 3"));
        assert!(ctx.in_practice_module());

        ctx.merge(ContextUpdate::route(Page::Analysis, ""));
        assert_eq!(ctx.current_page, Page::Analysis);
        assert!(ctx.current_module.is_empty());
        assert!(!ctx.in_practice_module());
    }

    #[test]
    fn test_default_page_context_is_dashboard() {
        let ctx = ConversationalContext::default();
        let pc = ctx.page_context();
        assert_eq!(pc.page, "dashboard");
        assert!(pc.module.is_empty());
    }
}
