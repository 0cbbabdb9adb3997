//! sqlcoach-tui - Terminal UI for SQL Coach
//!
//! This crate provides the ratatui-based terminal interface. It drives the
//! TEA loop from sqlcoach-app and adds terminal rendering, event polling,
//! the OSC 52 clipboard and widget display.

pub mod clipboard;
pub mod event;
pub mod layout;
pub mod render;
pub mod runner;
pub mod terminal;
pub mod theme;
pub mod widgets;

#[cfg(test)]
pub mod test_utils;

// Re-export main entry points
pub use clipboard::Osc52Clipboard;
pub use runner::run;
