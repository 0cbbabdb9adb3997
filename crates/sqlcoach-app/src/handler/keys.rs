//! Key event handlers for the screens and text fields

use crate::input_key::{edit_line, edit_text, InputKey};
use crate::message::Message;
use crate::practice::PracticePhase;
use crate::state::{AppState, Screen};

/// Convert key events to messages based on what has keyboard focus
pub fn handle_key(state: &AppState, key: InputKey) -> Option<Message> {
    // Force quit from every mode
    if key.is_force_quit() {
        return Some(Message::Quit);
    }

    // Ctrl shortcuts work while typing too
    match key {
        InputKey::CharCtrl('t') => return Some(Message::ToggleChat),
        InputKey::CharCtrl('y') => return Some(Message::CopyFocused),
        InputKey::CharCtrl('n') => return Some(Message::CopyFocusNext),
        InputKey::CharCtrl('p') => return Some(Message::CopyFocusPrev),
        _ => {}
    }

    if state.chat.open {
        return handle_key_chat(state, key);
    }

    match state.screen {
        Screen::CheatSheet if state.cheatsheet.searching => handle_key_search_input(state, key),
        Screen::PracticeModule if state.practice.as_ref().is_some_and(|p| p.editing) => {
            handle_key_answer_editor(state, key)
        }
        _ => handle_key_normal(state, key),
    }
}

/// Handle key events while the chat panel is open
fn handle_key_chat(state: &AppState, key: InputKey) -> Option<Message> {
    match key {
        InputKey::Enter => Some(Message::SendChat),
        InputKey::Esc => Some(Message::ChatEscape),
        InputKey::CharCtrl('f') => Some(Message::ToggleChatFullscreen),
        InputKey::CharCtrl('l') => Some(Message::ClearChat),
        InputKey::Tab => Some(Message::NextSuggestion),
        InputKey::Up | InputKey::PageUp => Some(Message::ChatScrollUp),
        InputKey::Down | InputKey::PageDown => Some(Message::ChatScrollDown),
        other => {
            edit_line(&state.chat.input, &other).map(|text| Message::ChatInputChanged { text })
        }
    }
}

/// Handle key events in the cheat-sheet search field
fn handle_key_search_input(state: &AppState, key: InputKey) -> Option<Message> {
    match key {
        // Keep the query, leave the field
        InputKey::Esc | InputKey::Enter => Some(Message::CheatSheetSearchFocus(false)),

        // Results stay navigable while typing
        InputKey::Up => Some(Message::CheatSheetSelectPrev),
        InputKey::Down => Some(Message::CheatSheetSelectNext),

        other => edit_line(&state.cheatsheet.search, &other)
            .map(|text| Message::CheatSheetSearch { text }),
    }
}

/// Handle key events in the SQL answer editor
fn handle_key_answer_editor(state: &AppState, key: InputKey) -> Option<Message> {
    let answer = state
        .practice
        .as_ref()
        .map(|p| p.answer.as_str())
        .unwrap_or_default();

    match key {
        InputKey::Esc => Some(Message::StopEditing),
        InputKey::CharCtrl('s') | InputKey::F(5) => Some(Message::SubmitAnswer),
        other => edit_text(answer, &other).map(|text| Message::AnswerChanged { text }),
    }
}

/// Handle key events when no text field has focus
fn handle_key_normal(state: &AppState, key: InputKey) -> Option<Message> {
    match key {
        InputKey::Char('q') => return Some(Message::Quit),

        // ─────────────────────────────────────────────────────────
        // Navigation
        // ─────────────────────────────────────────────────────────
        InputKey::Char('1') => return Some(Message::Navigate(Screen::CheatSheet)),
        InputKey::Char('2') => return Some(Message::Navigate(Screen::PracticeList)),
        InputKey::Char('3') => return Some(Message::Navigate(Screen::Analysis)),
        InputKey::Char('h') => return Some(Message::Navigate(Screen::Dashboard)),
        InputKey::Char('t') => return Some(Message::ToggleChat),

        // ─────────────────────────────────────────────────────────
        // Copy
        // ─────────────────────────────────────────────────────────
        InputKey::Char('c' | 'y') => return Some(Message::CopyFocused),
        InputKey::Char(']') => return Some(Message::CopyFocusNext),
        InputKey::Char('[') => return Some(Message::CopyFocusPrev),

        InputKey::PageUp => return Some(Message::PageUp),
        InputKey::PageDown => return Some(Message::PageDown),
        _ => {}
    }

    match state.screen {
        Screen::Dashboard => handle_key_dashboard(key),
        Screen::CheatSheet => handle_key_cheatsheet(state, key),
        Screen::PracticeList => handle_key_practice_list(key),
        Screen::PracticeModule => handle_key_practice_module(state, key),
        Screen::Analysis => handle_key_analysis(key),
    }
}

fn handle_key_dashboard(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Up | InputKey::Char('k') => Some(Message::DashboardSelectPrev),
        InputKey::Down | InputKey::Char('j') => Some(Message::DashboardSelectNext),
        InputKey::Enter => Some(Message::DashboardOpenSelected),
        _ => None,
    }
}

fn handle_key_cheatsheet(state: &AppState, key: InputKey) -> Option<Message> {
    // The example modal captures Esc and Enter
    if state.cheatsheet.example.is_some() {
        return match key {
            InputKey::Esc | InputKey::Enter => Some(Message::CloseExample),
            InputKey::Char('g') => Some(Message::GenerateExample),
            _ => None,
        };
    }

    match key {
        InputKey::Esc => Some(Message::Back),
        InputKey::Char('/') => Some(Message::CheatSheetSearchFocus(true)),
        InputKey::Up | InputKey::Char('k') => Some(Message::CheatSheetSelectPrev),
        InputKey::Down | InputKey::Char('j') => Some(Message::CheatSheetSelectNext),
        InputKey::Left | InputKey::BackTab => Some(Message::CheatSheetPrevCategory),
        InputKey::Right | InputKey::Tab => Some(Message::CheatSheetNextCategory),
        InputKey::Enter | InputKey::Char('g') => Some(Message::GenerateExample),
        _ => None,
    }
}

fn handle_key_practice_list(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Esc => Some(Message::Back),
        InputKey::Up | InputKey::Char('k') => Some(Message::PracticeSelectPrev),
        InputKey::Down | InputKey::Char('j') => Some(Message::PracticeSelectNext),
        InputKey::Enter => Some(Message::OpenSelectedModule),
        InputKey::Char('r') => Some(Message::Navigate(Screen::PracticeList)),
        _ => None,
    }
}

fn handle_key_practice_module(state: &AppState, key: InputKey) -> Option<Message> {
    let phase = state.practice.as_ref().map(|p| &p.phase);

    match key {
        InputKey::Esc => Some(Message::Back),
        InputKey::Up | InputKey::Char('k') => Some(Message::ScrollUp),
        InputKey::Down | InputKey::Char('j') => Some(Message::ScrollDown),

        InputKey::Char('e' | 'i') | InputKey::Enter
            if phase == Some(&PracticePhase::QuestionPresented) =>
        {
            Some(Message::StartEditing)
        }
        InputKey::CharCtrl('s') | InputKey::F(5) => Some(Message::SubmitAnswer),
        InputKey::Char('n') if matches!(phase, Some(PracticePhase::AnswerSubmitted(_))) => {
            Some(Message::NextQuestion)
        }
        InputKey::Char('?') => Some(Message::ToggleHints),
        InputKey::Char('x') => Some(Message::ResetAnswer),
        InputKey::Char('r') if phase == Some(&PracticePhase::LoadFailed) => {
            Some(Message::RetryModule)
        }
        _ => None,
    }
}

fn handle_key_analysis(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Esc => Some(Message::Back),
        InputKey::Up | InputKey::Char('k') => Some(Message::ScrollUp),
        InputKey::Down | InputKey::Char('j') => Some(Message::ScrollDown),
        InputKey::Char('r') => Some(Message::RefreshAnalysis),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::practice::PracticeState;

    fn key(c: char) -> InputKey {
        InputKey::Char(c)
    }

    #[test]
    fn test_ctrl_c_quits_everywhere() {
        let mut state = AppState::default();
        assert!(matches!(
            handle_key(&state, InputKey::CharCtrl('c')),
            Some(Message::Quit)
        ));
        state.chat.open = true;
        assert!(matches!(
            handle_key(&state, InputKey::CharCtrl('c')),
            Some(Message::Quit)
        ));
    }

    #[test]
    fn test_number_keys_navigate() {
        let state = AppState::default();
        assert!(matches!(
            handle_key(&state, key('2')),
            Some(Message::Navigate(Screen::PracticeList))
        ));
    }

    #[test]
    fn test_letters_go_to_chat_input_when_open() {
        let mut state = AppState::default();
        state.chat.open = true;
        state.chat.input = "SELEC".into();

        match handle_key(&state, key('q')) {
            Some(Message::ChatInputChanged { text }) => assert_eq!(text, "SELECq"),
            other => panic!("expected input change, got {other:?}"),
        }
        assert!(matches!(
            handle_key(&state, InputKey::Enter),
            Some(Message::SendChat)
        ));
    }

    #[test]
    fn test_slash_focuses_search() {
        let state = AppState {
            screen: Screen::CheatSheet,
            ..Default::default()
        };
        assert!(matches!(
            handle_key(&state, key('/')),
            Some(Message::CheatSheetSearchFocus(true))
        ));
    }

    #[test]
    fn test_search_field_takes_letters() {
        let mut state = AppState {
            screen: Screen::CheatSheet,
            ..Default::default()
        };
        state.cheatsheet.searching = true;
        state.cheatsheet.search = "joi".into();

        match handle_key(&state, key('n')) {
            Some(Message::CheatSheetSearch { text }) => assert_eq!(text, "join"),
            other => panic!("expected search input, got {other:?}"),
        }
    }

    #[test]
    fn test_answer_editor_enter_is_newline() {
        let mut state = AppState {
            screen: Screen::PracticeModule,
            ..Default::default()
        };
        let mut practice = PracticeState::new(1);
        practice.phase = PracticePhase::QuestionPresented;
        practice.editing = true;
        practice.answer = "SELECT *".into();
        state.practice = Some(practice);

        match handle_key(&state, InputKey::Enter) {
            Some(Message::AnswerChanged { text }) => assert_eq!(text, "SELECT *\n"),
            other => panic!("expected answer change, got {other:?}"),
        }
        assert!(matches!(
            handle_key(&state, InputKey::CharCtrl('s')),
            Some(Message::SubmitAnswer)
        ));
    }

    #[test]
    fn test_next_question_only_after_feedback() {
        let mut state = AppState {
            screen: Screen::PracticeModule,
            ..Default::default()
        };
        let mut practice = PracticeState::new(1);
        practice.phase = PracticePhase::QuestionPresented;
        state.practice = Some(practice);
        assert!(handle_key(&state, key('n')).is_none());

        state.practice.as_mut().unwrap().phase =
            PracticePhase::AnswerSubmitted(Default::default());
        assert!(matches!(
            handle_key(&state, key('n')),
            Some(Message::NextQuestion)
        ));
    }

    #[test]
    fn test_ctrl_y_copies_while_typing() {
        let mut state = AppState::default();
        state.chat.open = true;
        assert!(matches!(
            handle_key(&state, InputKey::CharCtrl('y')),
            Some(Message::CopyFocused)
        ));
    }

    #[test]
    fn test_unknown_key_returns_none() {
        let state = AppState::default();
        assert!(handle_key(&state, key('z')).is_none());
    }
}
