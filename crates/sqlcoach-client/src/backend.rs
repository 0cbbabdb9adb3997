//! Backend operations
//!
//! The [`Backend`] trait is the single seam between the application and the
//! learning service. The TUI uses [`crate::HttpBackend`]; tests script
//! responses with `FakeBackend` (feature `test-helpers`).

use sqlcoach_core::prelude::*;
use sqlcoach_core::{
    BusinessQuestion, ChatReply, ChatRequest, CheatSheetEntry, DetailedAnalytics, Difficulty,
    DynamicExample, DynamicExampleRequest, EvaluateAnswerRequest, Evaluation, HealthStatus,
    LearningModule, LearningPath, ModuleProgress, UserAnalytics,
};

/// Learning backend operations
///
/// All business logic (question generation, evaluation, analytics, chat)
/// lives behind this trait; the client only forwards requests.
#[trait_variant::make(Backend: Send)]
pub trait LocalBackend {
    // ── Cheat sheet ──────────────────────────────────────────────

    /// All cheat-sheet entries
    async fn cheat_sheet(&self) -> Result<Vec<CheatSheetEntry>>;

    /// Entries of one category
    async fn cheat_sheet_by_category(&self, category: &str) -> Result<Vec<CheatSheetEntry>>;

    /// Server-side search over entries
    async fn search_cheat_sheet(&self, term: &str) -> Result<Vec<CheatSheetEntry>>;

    /// Generate a business-scenario example for an entry
    async fn dynamic_example(&self, request: &DynamicExampleRequest) -> Result<DynamicExample>;

    // ── Practice ─────────────────────────────────────────────────

    async fn modules(&self) -> Result<Vec<LearningModule>>;

    async fn module(&self, module_id: i64) -> Result<LearningModule>;

    /// Generate an adaptive question for a module at `difficulty`
    async fn business_question(
        &self,
        module_id: i64,
        difficulty: Difficulty,
    ) -> Result<BusinessQuestion>;

    async fn evaluate_answer(&self, request: &EvaluateAnswerRequest) -> Result<Evaluation>;

    /// Per-module progress of a user
    async fn progress(&self, user_id: &str) -> Result<Vec<ModuleProgress>>;

    // ── Analysis ─────────────────────────────────────────────────

    async fn analytics(&self, user_id: &str) -> Result<UserAnalytics>;

    async fn detailed_analytics(&self, user_id: &str) -> Result<DetailedAnalytics>;

    async fn learning_path(&self, user_id: &str) -> Result<LearningPath>;

    // ── Chat ─────────────────────────────────────────────────────

    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatReply>;

    /// Clear the backend's conversation memory
    async fn clear_chat(&self) -> Result<()>;

    // ── Health ───────────────────────────────────────────────────

    async fn health(&self) -> Result<HealthStatus>;

    async fn chatbot_health(&self) -> Result<HealthStatus>;
}
