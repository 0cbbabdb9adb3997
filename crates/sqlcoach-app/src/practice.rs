//! Practice screens: module list and the question/answer flow
//!
//! The module screen is a small state machine:
//!
//! ```text
//! Loading ─▶ QuestionPresented ─▶ Submitting ─▶ AnswerSubmitted
//!                   ▲                                  │
//!                   └────────── NextQuestionLoading ◀──┘
//! ```
//!
//! Every request carries the module id and a request generation. A result
//! whose module is no longer shown, or whose generation is older than the
//! latest request, is dropped.

use std::collections::HashMap;

use serde_json::{json, Map, Value};
use sqlcoach_core::prelude::*;
use sqlcoach_core::{BusinessQuestion, Difficulty, Evaluation, LearningModule, ModuleProgress};

/// Shown when an empty answer is submitted
pub const EMPTY_ANSWER: &str = "Please enter your SQL query";

// ─────────────────────────────────────────────────────────────────────────────
// Module list
// ─────────────────────────────────────────────────────────────────────────────

/// Summary line of the module list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PracticeOverview {
    pub modules_started: usize,
    pub modules_total: usize,
    pub total_correct: u32,
    pub total_attempted: u32,
}

#[derive(Debug, Clone, Default)]
pub struct PracticeListState {
    pub modules: Vec<LearningModule>,
    pub progress: HashMap<i64, ModuleProgress>,
    pub loading: bool,
    pub loaded: bool,
    pub selected: usize,
}

impl PracticeListState {
    pub fn set_data(&mut self, mut modules: Vec<LearningModule>, progress: Vec<ModuleProgress>) {
        modules.sort_by_key(|m| m.order_index);
        self.modules = modules;
        self.progress = progress.into_iter().map(|p| (p.module_id, p)).collect();
        self.loading = false;
        self.loaded = true;
        if self.selected >= self.modules.len() {
            self.selected = self.modules.len().saturating_sub(1);
        }
    }

    /// Progress of a module; unstarted modules get zeroed progress
    pub fn progress_for(&self, module_id: i64) -> ModuleProgress {
        self.progress
            .get(&module_id)
            .cloned()
            .unwrap_or_else(|| ModuleProgress::not_started(module_id))
    }

    pub fn overview(&self) -> PracticeOverview {
        let progress: Vec<ModuleProgress> = self
            .modules
            .iter()
            .map(|m| self.progress_for(m.id))
            .collect();

        PracticeOverview {
            modules_started: progress.iter().filter(|p| p.is_started()).count(),
            modules_total: self.modules.len(),
            total_correct: progress.iter().map(|p| p.questions_correct).sum(),
            total_attempted: progress.iter().map(|p| p.questions_attempted).sum(),
        }
    }

    pub fn selected_module(&self) -> Option<&LearningModule> {
        self.modules.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if !self.modules.is_empty() {
            self.selected = (self.selected + 1) % self.modules.len();
        }
    }

    pub fn select_prev(&mut self) {
        let len = self.modules.len();
        if len > 0 {
            self.selected = (self.selected + len - 1) % len;
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Module flow
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default)]
pub enum PracticePhase {
    /// Module detail and first question in flight
    #[default]
    Loading,
    /// The module could not be loaded; `r` retries
    LoadFailed,
    QuestionPresented,
    Submitting,
    AnswerSubmitted(Evaluation),
    NextQuestionLoading(Evaluation),
}

impl PracticePhase {
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            PracticePhase::Loading
                | PracticePhase::Submitting
                | PracticePhase::NextQuestionLoading(_)
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct PracticeState {
    pub module_id: i64,
    pub module: Option<LearningModule>,
    pub question: Option<BusinessQuestion>,
    pub phase: PracticePhase,
    pub answer: String,
    /// Answer editor has keyboard focus
    pub editing: bool,
    pub show_hints: bool,
    /// 1-based number of the current question
    pub question_count: u32,
    generation: u64,
    pub scroll: u16,
}

impl PracticeState {
    pub fn new(module_id: i64) -> Self {
        Self {
            module_id,
            ..Default::default()
        }
    }

    /// Start a new request; older in-flight results become stale
    pub fn begin_request(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a result for `module_id`/`generation` still belongs here
    pub fn accepts(&self, module_id: i64, generation: u64) -> bool {
        self.module_id == module_id && self.generation == generation
    }

    /// Module name, or `Module {id}` until the detail arrives
    pub fn module_label(&self) -> String {
        self.module
            .as_ref()
            .map(|m| m.name.clone())
            .unwrap_or_else(|| format!("Module {}", self.module_id))
    }

    pub fn difficulty(&self) -> Difficulty {
        self.question
            .as_ref()
            .map(|q| q.difficulty)
            .unwrap_or_default()
    }

    pub fn evaluation(&self) -> Option<&Evaluation> {
        match &self.phase {
            PracticePhase::AnswerSubmitted(e) | PracticePhase::NextQuestionLoading(e) => Some(e),
            _ => None,
        }
    }

    /// Install a new question and clear the previous answer
    pub fn present(&mut self, question: BusinessQuestion) {
        self.question = Some(question);
        self.question_count += 1;
        self.phase = PracticePhase::QuestionPresented;
        self.answer.clear();
        self.show_hints = false;
        self.scroll = 0;
    }

    /// Clear answer, feedback and hints
    pub fn reset_answer(&mut self) {
        self.answer.clear();
        self.show_hints = false;
        if matches!(self.phase, PracticePhase::AnswerSubmitted(_)) {
            self.phase = PracticePhase::QuestionPresented;
        }
    }

    /// `userProgress` recorded in the conversational context
    pub fn progress_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("questionCount".into(), json!(self.question_count));
        map.insert("difficulty".into(), json!(self.difficulty().as_str()));
        map.insert("module".into(), json!(self.module_label()));
        map
    }
}

/// Blank answers never reach the backend
pub fn validate_answer(answer: &str) -> Result<()> {
    if answer.trim().is_empty() {
        return Err(Error::validation(EMPTY_ANSWER));
    }
    Ok(())
}

/// Difficulty of the question after `evaluation`.
///
/// The backend's suggestion wins; otherwise a score at or above `threshold`
/// moves to medium and anything lower goes back to easy.
pub fn next_difficulty(evaluation: &Evaluation, threshold: f64) -> Difficulty {
    if let Some(next) = evaluation
        .next_difficulty
        .as_deref()
        .and_then(Difficulty::parse)
    {
        return next;
    }

    if evaluation.normalized_score() >= threshold {
        Difficulty::Medium
    } else {
        Difficulty::Easy
    }
}
