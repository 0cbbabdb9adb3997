//! Custom widgets for the SQL Coach TUI

mod analysis;
mod chat_panel;
mod cheatsheet;
pub mod code_block;
mod dashboard;
mod header;
pub mod modal_overlay;
mod practice_list;
mod practice_module;
pub mod prose;
pub mod segmented;
mod status_bar;
mod toasts;

pub use analysis::AnalysisView;
pub use chat_panel::ChatPanel;
pub use cheatsheet::CheatSheetView;
pub use code_block::{highlight_sql, CodeBlock};
pub use dashboard::Dashboard;
pub use header::MainHeader;
pub use practice_list::PracticeListView;
pub use practice_module::PracticeModuleView;
pub use prose::ProseRenderer;
pub use segmented::{ContentContext, SegmentedContent};
pub use status_bar::StatusBar;
pub use toasts::ToastStack;
