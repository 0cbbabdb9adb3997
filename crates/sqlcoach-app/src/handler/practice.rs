//! Practice handlers: module list and the question/answer flow

use sqlcoach_core::prelude::*;
use sqlcoach_core::{
    BusinessQuestion, ContextUpdate, EvaluateAnswerRequest, Evaluation, LearningModule,
    ModuleProgress, Page,
};

use crate::practice::{next_difficulty, validate_answer, PracticePhase, PracticeState};
use crate::state::AppState;

use super::{UpdateAction, UpdateResult};

pub const LIST_FAILED_TOAST: &str = "Failed to load practice data";
pub const MODULE_FAILED_TOAST: &str = "Failed to load practice module";
pub const SUBMIT_FAILED_TOAST: &str = "Failed to submit answer";
pub const NEXT_FAILED_TOAST: &str = "Failed to load next question";

// ─────────────────────────────────────────────────────────
// Module list
// ─────────────────────────────────────────────────────────

pub fn handle_list_loaded(
    state: &mut AppState,
    modules: Vec<LearningModule>,
    progress: Vec<ModuleProgress>,
) -> UpdateResult {
    state.practice_list.set_data(modules, progress);
    UpdateResult::none()
}

pub fn handle_list_failed(state: &mut AppState, error: String) -> UpdateResult {
    warn!("Practice data load failed: {}", error);
    state.practice_list.loading = false;
    state.toasts.error(LIST_FAILED_TOAST);
    UpdateResult::none()
}

// ─────────────────────────────────────────────────────────
// Module flow
// ─────────────────────────────────────────────────────────

/// The practice state that `module_id`/`generation` was requested for
fn current(state: &mut AppState, module_id: i64, generation: u64) -> Option<&mut PracticeState> {
    match state.practice.as_mut() {
        Some(practice) if practice.accepts(module_id, generation) => Some(practice),
        _ => {
            debug!(
                "Dropping stale practice result (module {}, generation {})",
                module_id, generation
            );
            None
        }
    }
}

/// Record the shown question in the conversational context
fn publish_question(state: &AppState) {
    let Some(practice) = &state.practice else {
        return;
    };
    let question = practice
        .question
        .as_ref()
        .map(|q| q.question.clone())
        .unwrap_or_default();

    state.context.update(
        ContextUpdate::route(Page::Practice, practice.module_label())
            .question(question)
            .progress(practice.progress_map()),
    );
}

pub fn handle_module_loaded(
    state: &mut AppState,
    module_id: i64,
    generation: u64,
    module: LearningModule,
    question: BusinessQuestion,
) -> UpdateResult {
    let Some(practice) = current(state, module_id, generation) else {
        return UpdateResult::none();
    };
    info!("Module {} loaded: {}", module_id, module.name);
    practice.module = Some(module);
    practice.present(question);

    publish_question(state);
    UpdateResult::none()
}

pub fn handle_module_load_failed(
    state: &mut AppState,
    module_id: i64,
    generation: u64,
    error: String,
) -> UpdateResult {
    let Some(practice) = current(state, module_id, generation) else {
        return UpdateResult::none();
    };
    practice.phase = PracticePhase::LoadFailed;
    warn!("Module {} load failed: {}", module_id, error);
    state.toasts.error(MODULE_FAILED_TOAST);
    UpdateResult::none()
}

pub fn handle_retry(state: &mut AppState) -> UpdateResult {
    let difficulty = state.settings.practice.start_difficulty;
    let Some(practice) = state.practice.as_mut() else {
        return UpdateResult::none();
    };
    if practice.phase != PracticePhase::LoadFailed {
        return UpdateResult::none();
    }

    let generation = practice.begin_request();
    practice.phase = PracticePhase::Loading;
    UpdateResult::action(UpdateAction::LoadModule {
        module_id: practice.module_id,
        generation,
        difficulty,
    })
}

/// Give or take focus of the answer editor; locked once feedback is shown
pub fn handle_set_editing(state: &mut AppState, editing: bool) -> UpdateResult {
    if let Some(practice) = state.practice.as_mut() {
        practice.editing = editing && practice.phase == PracticePhase::QuestionPresented;
    }
    UpdateResult::none()
}

pub fn handle_answer_changed(state: &mut AppState, text: String) -> UpdateResult {
    if let Some(practice) = state.practice.as_mut() {
        if practice.editing {
            practice.answer = text;
        }
    }
    UpdateResult::none()
}

pub fn handle_submit(state: &mut AppState) -> UpdateResult {
    let user_id = state.user_id.clone();
    let Some(practice) = state.practice.as_mut() else {
        return UpdateResult::none();
    };
    if practice.phase != PracticePhase::QuestionPresented {
        return UpdateResult::none();
    }
    let Some(question) = practice.question.as_ref() else {
        return UpdateResult::none();
    };

    if let Err(e) = validate_answer(&practice.answer) {
        state.toasts.error(e.to_string());
        return UpdateResult::none();
    }

    let request = EvaluateAnswerRequest {
        question_id: question.question_id.clone(),
        user_sql: practice.answer.clone(),
        expected_sql: question.expected_sql.clone(),
        question_context: question.question.clone(),
        user_id,
    };

    practice.editing = false;
    practice.phase = PracticePhase::Submitting;
    let generation = practice.begin_request();

    UpdateResult::action(UpdateAction::EvaluateAnswer {
        module_id: practice.module_id,
        generation,
        request,
    })
}

pub fn handle_evaluated(
    state: &mut AppState,
    module_id: i64,
    generation: u64,
    evaluation: Evaluation,
) -> UpdateResult {
    let Some(practice) = current(state, module_id, generation) else {
        return UpdateResult::none();
    };
    debug!(
        "Answer evaluated: correct={} score={}",
        evaluation.is_correct, evaluation.score
    );
    practice.phase = PracticePhase::AnswerSubmitted(evaluation);
    state.copy_focus.clear();
    UpdateResult::none()
}

pub fn handle_evaluation_failed(
    state: &mut AppState,
    module_id: i64,
    generation: u64,
    error: String,
) -> UpdateResult {
    let Some(practice) = current(state, module_id, generation) else {
        return UpdateResult::none();
    };
    // The answer is kept so it can be resubmitted
    practice.phase = PracticePhase::QuestionPresented;
    warn!("Answer evaluation failed: {}", error);
    state.toasts.error(SUBMIT_FAILED_TOAST);
    UpdateResult::none()
}

pub fn handle_next_question(state: &mut AppState) -> UpdateResult {
    let threshold = state.settings.practice.advance_threshold;
    let Some(practice) = state.practice.as_mut() else {
        return UpdateResult::none();
    };
    let PracticePhase::AnswerSubmitted(evaluation) = &practice.phase else {
        return UpdateResult::none();
    };
    let evaluation = evaluation.clone();

    let difficulty = next_difficulty(&evaluation, threshold);
    practice.phase = PracticePhase::NextQuestionLoading(evaluation);
    let generation = practice.begin_request();

    UpdateResult::action(UpdateAction::LoadQuestion {
        module_id: practice.module_id,
        generation,
        difficulty,
    })
}

pub fn handle_question_loaded(
    state: &mut AppState,
    module_id: i64,
    generation: u64,
    question: BusinessQuestion,
) -> UpdateResult {
    let Some(practice) = current(state, module_id, generation) else {
        return UpdateResult::none();
    };
    practice.present(question);
    state.copy_focus.clear();

    publish_question(state);
    UpdateResult::none()
}

pub fn handle_question_failed(
    state: &mut AppState,
    module_id: i64,
    generation: u64,
    error: String,
) -> UpdateResult {
    let Some(practice) = current(state, module_id, generation) else {
        return UpdateResult::none();
    };
    if let PracticePhase::NextQuestionLoading(evaluation) = &practice.phase {
        practice.phase = PracticePhase::AnswerSubmitted(evaluation.clone());
    }
    warn!("Next question load failed: {}", error);
    state.toasts.error(NEXT_FAILED_TOAST);
    UpdateResult::none()
}

pub fn handle_toggle_hints(state: &mut AppState) -> UpdateResult {
    if let Some(practice) = state.practice.as_mut() {
        if practice.question.is_some() {
            practice.show_hints = !practice.show_hints;
        }
    }
    UpdateResult::none()
}

pub fn handle_reset_answer(state: &mut AppState) -> UpdateResult {
    if let Some(practice) = state.practice.as_mut() {
        if !practice.phase.is_busy() {
            practice.reset_answer();
            state.copy_focus.clear();
        }
    }
    UpdateResult::none()
}
