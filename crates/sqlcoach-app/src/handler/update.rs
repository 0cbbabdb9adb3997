//! Main update function - handles state transitions (TEA pattern)

use std::time::Instant;

use crate::message::Message;
use crate::state::{AppPhase, AppState};

use super::{analysis, chat, cheatsheet, keys::handle_key, navigation, practice, UpdateAction};
use super::UpdateResult;

/// Process a message and update state
/// Returns optional follow-up message and/or action
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        Message::Quit => {
            state.phase = AppPhase::Quitting;
            UpdateResult::none()
        }

        Message::Key(key) => match handle_key(state, key) {
            Some(msg) => UpdateResult::message(msg),
            None => UpdateResult::none(),
        },

        Message::Tick => {
            state.toasts.expire(Instant::now());
            UpdateResult::none()
        }

        Message::HealthChecked { healthy } => {
            state.backend_healthy = Some(healthy);
            if !healthy {
                state
                    .toasts
                    .error("Backend unreachable - check the API URL in config.toml");
            }
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Navigation
        // ─────────────────────────────────────────────────────────
        Message::Navigate(screen) => navigation::handle_navigate(state, screen),
        Message::OpenModule { module_id } => navigation::handle_open_module(state, module_id),
        Message::OpenSelectedModule => match state.practice_list.selected_module() {
            Some(module) => navigation::handle_open_module(state, module.id),
            None => UpdateResult::none(),
        },
        Message::Back => navigation::handle_back(state),
        Message::DashboardSelectNext => {
            let len = crate::state::Screen::MENU.len();
            state.dashboard_selected = (state.dashboard_selected + 1) % len;
            UpdateResult::none()
        }
        Message::DashboardSelectPrev => {
            let len = crate::state::Screen::MENU.len();
            state.dashboard_selected = (state.dashboard_selected + len - 1) % len;
            UpdateResult::none()
        }
        Message::DashboardOpenSelected => {
            let screen = crate::state::Screen::MENU[state.dashboard_selected];
            navigation::handle_navigate(state, screen)
        }
        Message::ScrollUp => navigation::handle_scroll(state, -1),
        Message::ScrollDown => navigation::handle_scroll(state, 1),
        Message::PageUp => navigation::handle_scroll(state, -10),
        Message::PageDown => navigation::handle_scroll(state, 10),

        // ─────────────────────────────────────────────────────────
        // Copy
        // ─────────────────────────────────────────────────────────
        Message::CopyFocused => {
            let targets = state.copy_targets();
            match state.copy_focus.resolve(&targets) {
                Some(target) => UpdateResult::action(UpdateAction::Copy {
                    key: target.key.clone(),
                    text: target.text.clone(),
                }),
                None => {
                    state.toasts.info("No code block to copy here");
                    UpdateResult::none()
                }
            }
        }
        Message::CopyFocusNext => {
            let targets = state.copy_targets();
            state.copy_focus.next(&targets);
            UpdateResult::none()
        }
        Message::CopyFocusPrev => {
            let targets = state.copy_targets();
            state.copy_focus.prev(&targets);
            UpdateResult::none()
        }
        Message::CopyResetElapsed { generation } => {
            state.copy.reset_if(generation);
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Cheat Sheet
        // ─────────────────────────────────────────────────────────
        Message::CheatSheetLoaded { entries } => cheatsheet::handle_loaded(state, entries),
        Message::CheatSheetLoadFailed { error } => cheatsheet::handle_load_failed(state, error),
        Message::CheatSheetSearchFocus(focused) => {
            state.cheatsheet.searching = focused;
            UpdateResult::none()
        }
        Message::CheatSheetSearch { text } => {
            state.cheatsheet.set_search(text);
            UpdateResult::none()
        }
        Message::CheatSheetSelectNext => {
            state.cheatsheet.select_next();
            UpdateResult::none()
        }
        Message::CheatSheetSelectPrev => {
            state.cheatsheet.select_prev();
            UpdateResult::none()
        }
        Message::CheatSheetNextCategory => {
            state.cheatsheet.next_category();
            UpdateResult::none()
        }
        Message::CheatSheetPrevCategory => {
            state.cheatsheet.prev_category();
            UpdateResult::none()
        }
        Message::GenerateExample => cheatsheet::handle_generate_example(state),
        Message::ExampleGenerated { entry_id, example } => {
            cheatsheet::handle_example_generated(state, entry_id, example)
        }
        Message::ExampleFailed { entry_id, error } => {
            cheatsheet::handle_example_failed(state, entry_id, error)
        }
        Message::CloseExample => {
            state.cheatsheet.example = None;
            state.cheatsheet.generating = None;
            state.copy_focus.clear();
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Practice
        // ─────────────────────────────────────────────────────────
        Message::PracticeListLoaded { modules, progress } => {
            practice::handle_list_loaded(state, modules, progress)
        }
        Message::PracticeListFailed { error } => practice::handle_list_failed(state, error),
        Message::PracticeSelectNext => {
            state.practice_list.select_next();
            UpdateResult::none()
        }
        Message::PracticeSelectPrev => {
            state.practice_list.select_prev();
            UpdateResult::none()
        }
        Message::ModuleLoaded {
            module_id,
            generation,
            module,
            question,
        } => practice::handle_module_loaded(state, module_id, generation, module, question),
        Message::ModuleLoadFailed {
            module_id,
            generation,
            error,
        } => practice::handle_module_load_failed(state, module_id, generation, error),
        Message::RetryModule => practice::handle_retry(state),
        Message::StartEditing => practice::handle_set_editing(state, true),
        Message::StopEditing => practice::handle_set_editing(state, false),
        Message::AnswerChanged { text } => practice::handle_answer_changed(state, text),
        Message::SubmitAnswer => practice::handle_submit(state),
        Message::AnswerEvaluated {
            module_id,
            generation,
            evaluation,
        } => practice::handle_evaluated(state, module_id, generation, evaluation),
        Message::EvaluationFailed {
            module_id,
            generation,
            error,
        } => practice::handle_evaluation_failed(state, module_id, generation, error),
        Message::NextQuestion => practice::handle_next_question(state),
        Message::QuestionLoaded {
            module_id,
            generation,
            question,
        } => practice::handle_question_loaded(state, module_id, generation, question),
        Message::QuestionLoadFailed {
            module_id,
            generation,
            error,
        } => practice::handle_question_failed(state, module_id, generation, error),
        Message::ToggleHints => practice::handle_toggle_hints(state),
        Message::ResetAnswer => practice::handle_reset_answer(state),

        // ─────────────────────────────────────────────────────────
        // Analysis
        // ─────────────────────────────────────────────────────────
        Message::RefreshAnalysis => analysis::handle_refresh(state),
        Message::AnalysisLoaded { generation, data } => {
            analysis::handle_loaded(state, generation, *data)
        }
        Message::AnalysisFailed { generation, error } => {
            analysis::handle_failed(state, generation, error)
        }

        // ─────────────────────────────────────────────────────────
        // Chat
        // ─────────────────────────────────────────────────────────
        Message::ToggleChat => chat::handle_toggle(state),
        Message::ToggleChatFullscreen => {
            if state.chat.open {
                state.chat.fullscreen = !state.chat.fullscreen;
            }
            UpdateResult::none()
        }
        Message::ChatEscape => chat::handle_escape(state),
        Message::ChatInputChanged { text } => {
            state.chat.input = text;
            state.chat.suggestion_cursor = None;
            UpdateResult::none()
        }
        Message::SendChat => chat::handle_send(state),
        Message::ChatReplyReceived { reply } => chat::handle_reply(state, reply),
        Message::ChatFailed { error } => chat::handle_failed(state, error),
        Message::ClearChat => UpdateResult::action(UpdateAction::ClearChat),
        Message::ChatCleared => chat::handle_cleared(state),
        Message::ChatClearFailed { error } => chat::handle_clear_failed(state, error),
        Message::NextSuggestion => {
            if let Some(index) = state.chat.next_suggestion_index() {
                state.chat.pick_suggestion(index);
            }
            UpdateResult::none()
        }
        Message::ChatScrollUp => {
            state.chat.scroll = state.chat.scroll.saturating_add(3);
            UpdateResult::none()
        }
        Message::ChatScrollDown => {
            state.chat.scroll = state.chat.scroll.saturating_sub(3);
            UpdateResult::none()
        }
    }
}
