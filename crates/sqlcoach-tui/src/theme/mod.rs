//! Centralized theme for the SQL Coach TUI.
//!
//! - `palette` - Raw color constants
//! - `styles` - Semantic style builder functions
//! - [`RenderTheme`] - Styles handed to the prose and code renderers

pub mod palette;
pub mod styles;

use ratatui::style::{Modifier, Style};

/// Name of the bundled syntect theme used for SQL highlighting
pub const SYNTAX_THEME: &str = "base16-ocean.dark";

/// Styles for rendered backend content (Markdown prose and SQL code)
#[derive(Debug, Clone, PartialEq)]
pub struct RenderTheme {
    pub text: Style,
    pub h1: Style,
    pub h2: Style,
    pub h3: Style,
    pub inline_code: Style,
    pub quote: Style,
    pub list_marker: Style,
    pub rule: Style,
    /// Code block body (background and fallback foreground)
    pub code: Style,
    pub code_header: Style,
    pub code_header_focused: Style,
    pub copy_hint: Style,
    pub copied: Style,
    pub syntax_theme: &'static str,
}

impl Default for RenderTheme {
    fn default() -> Self {
        Self {
            text: Style::default().fg(palette::TEXT_PRIMARY),
            h1: Style::default()
                .fg(palette::ACCENT)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            h2: Style::default()
                .fg(palette::ACCENT)
                .add_modifier(Modifier::BOLD),
            h3: Style::default()
                .fg(palette::TEXT_BRIGHT)
                .add_modifier(Modifier::BOLD),
            inline_code: Style::default()
                .fg(palette::INLINE_CODE_FG)
                .bg(palette::CODE_BG),
            quote: Style::default()
                .fg(palette::TEXT_SECONDARY)
                .add_modifier(Modifier::ITALIC),
            list_marker: Style::default().fg(palette::ACCENT),
            rule: Style::default().fg(palette::BORDER_DIM),
            code: Style::default().fg(palette::TEXT_PRIMARY).bg(palette::CODE_BG),
            code_header: Style::default()
                .fg(palette::TEXT_SECONDARY)
                .bg(palette::CODE_HEADER_BG),
            code_header_focused: Style::default()
                .fg(palette::CONTRAST_FG)
                .bg(palette::ACCENT)
                .add_modifier(Modifier::BOLD),
            copy_hint: Style::default().fg(palette::STATUS_YELLOW),
            copied: Style::default()
                .fg(palette::STATUS_GREEN)
                .add_modifier(Modifier::BOLD),
            syntax_theme: SYNTAX_THEME,
        }
    }
}
