//! Message types for the application (TEA pattern)

use sqlcoach_core::{
    BusinessQuestion, ChatReply, CheatSheetEntry, DynamicExample, Evaluation, LearningModule,
    ModuleProgress,
};

use crate::analysis::AnalysisData;
use crate::input_key::InputKey;
use crate::state::Screen;

/// All possible messages/actions in the application
#[derive(Debug, Clone)]
pub enum Message {
    /// Keyboard event from terminal
    Key(InputKey),

    /// Periodic tick (toast expiry)
    Tick,

    /// Quit immediately
    Quit,

    // ─────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────
    /// Switch to a top-level screen
    Navigate(Screen),
    /// Open the practice screen of a module
    OpenModule { module_id: i64 },
    /// Open the module highlighted in the module list
    OpenSelectedModule,
    /// Leave the current screen (module → list → dashboard)
    Back,
    DashboardSelectNext,
    DashboardSelectPrev,
    DashboardOpenSelected,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,

    /// Backend health probe finished
    HealthChecked { healthy: bool },

    // ─────────────────────────────────────────────────────────
    // Copy
    // ─────────────────────────────────────────────────────────
    /// Copy the focused code block
    CopyFocused,
    CopyFocusNext,
    CopyFocusPrev,
    /// The "Copied!" delay for `generation` elapsed
    CopyResetElapsed { generation: u64 },

    // ─────────────────────────────────────────────────────────
    // Cheat Sheet
    // ─────────────────────────────────────────────────────────
    CheatSheetLoaded { entries: Vec<CheatSheetEntry> },
    CheatSheetLoadFailed { error: String },
    /// Give or take keyboard focus of the search field
    CheatSheetSearchFocus(bool),
    CheatSheetSearch { text: String },
    CheatSheetSelectNext,
    CheatSheetSelectPrev,
    CheatSheetNextCategory,
    CheatSheetPrevCategory,
    /// Generate a business example for the selected entry
    GenerateExample,
    ExampleGenerated {
        entry_id: i64,
        example: DynamicExample,
    },
    ExampleFailed { entry_id: i64, error: String },
    CloseExample,

    // ─────────────────────────────────────────────────────────
    // Practice List
    // ─────────────────────────────────────────────────────────
    PracticeListLoaded {
        modules: Vec<LearningModule>,
        progress: Vec<ModuleProgress>,
    },
    PracticeListFailed { error: String },
    PracticeSelectNext,
    PracticeSelectPrev,

    // ─────────────────────────────────────────────────────────
    // Practice Module
    // ─────────────────────────────────────────────────────────
    ModuleLoaded {
        module_id: i64,
        generation: u64,
        module: LearningModule,
        question: BusinessQuestion,
    },
    ModuleLoadFailed {
        module_id: i64,
        generation: u64,
        error: String,
    },
    RetryModule,
    StartEditing,
    StopEditing,
    AnswerChanged { text: String },
    SubmitAnswer,
    AnswerEvaluated {
        module_id: i64,
        generation: u64,
        evaluation: Evaluation,
    },
    EvaluationFailed {
        module_id: i64,
        generation: u64,
        error: String,
    },
    NextQuestion,
    QuestionLoaded {
        module_id: i64,
        generation: u64,
        question: BusinessQuestion,
    },
    QuestionLoadFailed {
        module_id: i64,
        generation: u64,
        error: String,
    },
    ToggleHints,
    ResetAnswer,

    // ─────────────────────────────────────────────────────────
    // Analysis
    // ─────────────────────────────────────────────────────────
    RefreshAnalysis,
    AnalysisLoaded {
        generation: u64,
        data: Box<AnalysisData>,
    },
    AnalysisFailed { generation: u64, error: String },

    // ─────────────────────────────────────────────────────────
    // Chat
    // ─────────────────────────────────────────────────────────
    ToggleChat,
    ToggleChatFullscreen,
    /// Esc in the chat: leave full screen first, then close
    ChatEscape,
    ChatInputChanged { text: String },
    SendChat,
    ChatReplyReceived { reply: ChatReply },
    ChatFailed { error: String },
    ClearChat,
    ChatCleared,
    ChatClearFailed { error: String },
    /// Put the next suggestion of the latest reply into the input
    NextSuggestion,
    ChatScrollUp,
    ChatScrollDown,
}
