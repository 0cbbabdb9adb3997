//! Application state (Model in TEA pattern)

use sqlcoach_core::{segments, Page};

use crate::analysis::AnalysisState;
use crate::chat::ChatState;
use crate::cheatsheet::CheatSheetState;
use crate::config::Settings;
use crate::context_store::ContextStore;
use crate::copy_state::{CopyFocus, CopyState, CopyTarget};
use crate::practice::{PracticeListState, PracticeState};
use crate::toast::Toasts;

/// Key of the SQL example in the cheat-sheet example modal
pub const EXAMPLE_SQL_KEY: &str = "example-sql";

/// Key of the reference solution shown with feedback
pub const CORRECT_SQL_KEY: &str = "correct-sql";

/// Lifecycle of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppPhase {
    #[default]
    Running,
    Quitting,
}

/// Top-level screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Dashboard,
    CheatSheet,
    PracticeList,
    PracticeModule,
    Analysis,
}

impl Screen {
    /// Screens reachable from the dashboard menu, in menu order
    pub const MENU: [Screen; 3] = [Screen::CheatSheet, Screen::PracticeList, Screen::Analysis];

    pub fn page(&self) -> Page {
        match self {
            Screen::Dashboard => Page::Dashboard,
            Screen::CheatSheet => Page::Cheatsheet,
            Screen::PracticeList | Screen::PracticeModule => Page::Practice,
            Screen::Analysis => Page::Analysis,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Screen::Dashboard => "Home",
            Screen::CheatSheet => "Cheat Sheet",
            Screen::PracticeList => "Practice",
            Screen::PracticeModule => "Practice",
            Screen::Analysis => "Analysis",
        }
    }
}

/// Complete application state
#[derive(Debug)]
pub struct AppState {
    pub phase: AppPhase,
    pub screen: Screen,
    pub settings: Settings,

    /// Anonymous session user id
    pub user_id: String,

    /// Shared "where is the user" record
    pub context: ContextStore,

    pub toasts: Toasts,
    pub copy: CopyState,
    pub copy_focus: CopyFocus,

    /// Result of the startup health probe
    pub backend_healthy: Option<bool>,

    pub dashboard_selected: usize,
    pub cheatsheet: CheatSheetState,
    pub practice_list: PracticeListState,
    /// Present while a module screen is shown
    pub practice: Option<PracticeState>,
    pub analysis: AnalysisState,
    pub chat: ChatState,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Settings::default(), "user_local", ContextStore::new())
    }
}

impl AppState {
    pub fn new(settings: Settings, user_id: impl Into<String>, context: ContextStore) -> Self {
        let toasts = Toasts::new(settings.ui.toast_duration());
        Self {
            phase: AppPhase::Running,
            screen: Screen::Dashboard,
            settings,
            user_id: user_id.into(),
            context,
            toasts,
            copy: CopyState::default(),
            copy_focus: CopyFocus::default(),
            backend_healthy: None,
            dashboard_selected: 0,
            cheatsheet: CheatSheetState::default(),
            practice_list: PracticeListState::default(),
            practice: None,
            analysis: AnalysisState::default(),
            chat: ChatState::default(),
        }
    }

    pub fn should_quit(&self) -> bool {
        self.phase == AppPhase::Quitting
    }

    pub fn page(&self) -> Page {
        self.screen.page()
    }

    /// A text field has keyboard focus, so letters are input, not commands
    pub fn is_typing(&self) -> bool {
        if self.chat.open {
            return true;
        }
        match self.screen {
            Screen::CheatSheet => self.cheatsheet.searching,
            Screen::PracticeModule => self.practice.as_ref().is_some_and(|p| p.editing),
            _ => false,
        }
    }

    /// Code blocks the user can copy right now, in display order.
    ///
    /// The chat panel takes precedence over the screen behind it.
    pub fn copy_targets(&self) -> Vec<CopyTarget> {
        let mut targets = Vec::new();

        if self.chat.open {
            for message in &self.chat.messages {
                push_code_targets(&mut targets, &message.content, |i| message.segment_key(i));
            }
            return targets;
        }

        match self.screen {
            Screen::CheatSheet => {
                if let Some(view) = &self.cheatsheet.example {
                    if !view.example.sql_example.trim().is_empty() {
                        targets.push(CopyTarget::new(
                            EXAMPLE_SQL_KEY,
                            view.example.sql_example.trim(),
                        ));
                    }
                    push_code_targets(&mut targets, &view.example.explanation, |i| {
                        format!("example-{i}")
                    });
                } else if let Some(entry) = self.cheatsheet.selected_entry() {
                    targets.push(CopyTarget::new(
                        format!("cheatsheet-{}", entry.id),
                        entry.syntax.clone(),
                    ));
                }
            }
            Screen::PracticeModule => {
                if let Some(practice) = &self.practice {
                    practice_targets(&mut targets, practice);
                }
            }
            Screen::Analysis => {
                if let Some(data) = &self.analysis.data {
                    for (s, suggestion) in data.learning_path.suggestions.iter().enumerate() {
                        push_code_targets(&mut targets, &suggestion.reason, |i| {
                            format!("suggestion-{s}-{i}")
                        });
                    }
                }
            }
            Screen::Dashboard | Screen::PracticeList => {}
        }

        targets
    }

    /// Key of the block that `c`/`y` would copy
    pub fn focused_copy_key(&self) -> Option<String> {
        let targets = self.copy_targets();
        self.copy_focus.resolve(&targets).map(|t| t.key.clone())
    }
}

fn practice_targets(targets: &mut Vec<CopyTarget>, practice: &PracticeState) {
    let Some(question) = &practice.question else {
        return;
    };

    push_code_targets(targets, &question.question, |i| format!("question-{i}"));

    if practice.show_hints {
        for (h, hint) in question.hints.iter().enumerate() {
            push_code_targets(targets, hint, |i| format!("hint-{h}-{i}"));
        }
    }

    if let Some(evaluation) = practice.evaluation() {
        push_code_targets(targets, &evaluation.feedback, |i| format!("feedback-{i}"));
        if let Some(sql) = evaluation.correct_sql.as_deref() {
            if !sql.trim().is_empty() {
                targets.push(CopyTarget::new(CORRECT_SQL_KEY, sql.trim()));
            }
        }
    }
}

/// Add one target per code segment of `text`, keyed by segment index
fn push_code_targets(
    targets: &mut Vec<CopyTarget>,
    text: &str,
    key: impl Fn(usize) -> String,
) {
    targets.extend(
        segments(text)
            .enumerate()
            .filter(|(_, segment)| segment.is_code())
            .map(|(i, segment)| CopyTarget::new(key(i), segment.content)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::practice::PracticePhase;
    use sqlcoach_core::{BusinessQuestion, Difficulty, Evaluation};

    fn question() -> BusinessQuestion {
        BusinessQuestion {
            question_id: "q1".into(),
            module_id: None,
            module_name: None,
            difficulty: Difficulty::Easy,
            question: "Find orders:\n```sql\nSELECT * FROM orders\n```".into(),
            hints: vec!["Filter with:\n```sql\nWHERE total > 100\n```".into()],
            expected_sql: None,
        }
    }

    #[test]
    fn test_practice_targets_follow_visibility() {
        let mut state = AppState {
            screen: Screen::PracticeModule,
            ..Default::default()
        };
        let mut practice = PracticeState::new(1);
        practice.present(question());
        state.practice = Some(practice);

        let keys: Vec<_> = state.copy_targets().into_iter().map(|t| t.key).collect();
        assert_eq!(keys, vec!["question-1"]);

        let practice = state.practice.as_mut().unwrap();
        practice.show_hints = true;
        practice.phase = PracticePhase::AnswerSubmitted(Evaluation {
            feedback: "```sql\nSELECT id FROM orders\n```".into(),
            correct_sql: Some("SELECT id FROM orders".into()),
            ..Default::default()
        });

        let keys: Vec<_> = state.copy_targets().into_iter().map(|t| t.key).collect();
        assert_eq!(
            keys,
            vec!["question-1", "hint-0-1", "feedback-0", CORRECT_SQL_KEY]
        );
    }

    #[test]
    fn test_chat_targets_use_message_ids() {
        let mut state = AppState::default();
        state.chat.open = true;
        state.chat.push_reply("Try:\n```sql\nSELECT 1\n```".into(), vec![], None);
        let id = state.chat.messages[0].id;

        let targets = state.copy_targets();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].key, format!("{id}-1"));
        assert_eq!(targets[0].text, "SELECT 1");
    }

    #[test]
    fn test_typing_modes() {
        let mut state = AppState::default();
        assert!(!state.is_typing());
        state.screen = Screen::CheatSheet;
        state.cheatsheet.searching = true;
        assert!(state.is_typing());
        state.cheatsheet.searching = false;
        state.chat.open = true;
        assert!(state.is_typing());
    }

    #[test]
    fn test_screen_pages() {
        assert_eq!(Screen::PracticeModule.page(), Page::Practice);
        assert_eq!(Screen::Dashboard.page(), Page::Dashboard);
    }
}
