//! Screen switching, scrolling and route updates of the conversational context

use sqlcoach_core::Page;

use crate::practice::PracticeState;
use crate::state::{AppState, Screen};

use super::{UpdateAction, UpdateResult};

/// Switch to `screen`, recording the route and starting its data load
pub fn handle_navigate(state: &mut AppState, screen: Screen) -> UpdateResult {
    // A module screen is only entered through OpenModule
    let screen = match screen {
        Screen::PracticeModule if state.practice.is_none() => Screen::PracticeList,
        other => other,
    };

    if screen != Screen::PracticeModule {
        // In-flight module results are dropped with the state
        state.practice = None;
        state.context.set_route(screen.page(), "");
    }

    state.screen = screen;
    state.copy_focus.clear();

    match screen {
        Screen::Dashboard | Screen::PracticeModule => UpdateResult::none(),
        Screen::CheatSheet => {
            if state.cheatsheet.loaded || state.cheatsheet.loading {
                return UpdateResult::none();
            }
            state.cheatsheet.loading = true;
            UpdateResult::action(UpdateAction::LoadCheatSheet)
        }
        Screen::PracticeList => {
            state.practice_list.loading = true;
            UpdateResult::action(UpdateAction::LoadPracticeList {
                user_id: state.user_id.clone(),
            })
        }
        Screen::Analysis => {
            let generation = state.analysis.begin_request();
            state.analysis.scroll = 0;
            UpdateResult::action(UpdateAction::LoadAnalysis {
                user_id: state.user_id.clone(),
                generation,
            })
        }
    }
}

/// Open the practice screen of `module_id` and load its first question
pub fn handle_open_module(state: &mut AppState, module_id: i64) -> UpdateResult {
    let mut practice = PracticeState::new(module_id);
    let generation = practice.begin_request();

    state
        .context
        .set_route(Page::Practice, practice.module_label());
    state.practice = Some(practice);
    state.screen = Screen::PracticeModule;
    state.copy_focus.clear();

    UpdateResult::action(UpdateAction::LoadModule {
        module_id,
        generation,
        difficulty: state.settings.practice.start_difficulty,
    })
}

/// Leave the current screen: module → list → dashboard
pub fn handle_back(state: &mut AppState) -> UpdateResult {
    match state.screen {
        Screen::Dashboard => UpdateResult::none(),
        Screen::PracticeModule => handle_navigate(state, Screen::PracticeList),
        Screen::CheatSheet | Screen::PracticeList | Screen::Analysis => {
            handle_navigate(state, Screen::Dashboard)
        }
    }
}

/// Scroll the current screen by `delta` lines (negative is up)
pub fn handle_scroll(state: &mut AppState, delta: i32) -> UpdateResult {
    match state.screen {
        Screen::PracticeModule => {
            if let Some(practice) = state.practice.as_mut() {
                practice.scroll = scrolled(practice.scroll, delta);
            }
        }
        Screen::Analysis => {
            state.analysis.scroll = scrolled(state.analysis.scroll, delta);
        }
        Screen::CheatSheet => {
            for _ in 0..delta.unsigned_abs() {
                if delta < 0 {
                    state.cheatsheet.select_prev();
                } else {
                    state.cheatsheet.select_next();
                }
            }
        }
        Screen::PracticeList => {
            for _ in 0..delta.unsigned_abs() {
                if delta < 0 {
                    state.practice_list.select_prev();
                } else {
                    state.practice_list.select_next();
                }
            }
        }
        Screen::Dashboard => {}
    }
    UpdateResult::none()
}

fn scrolled(offset: u16, delta: i32) -> u16 {
    let next = i32::from(offset) + delta;
    next.clamp(0, i32::from(u16::MAX)) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrolled_saturates() {
        assert_eq!(scrolled(0, -1), 0);
        assert_eq!(scrolled(5, -10), 0);
        assert_eq!(scrolled(5, 10), 15);
    }
}
