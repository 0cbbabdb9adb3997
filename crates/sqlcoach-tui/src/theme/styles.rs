//! Semantic style builders.

use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders};
use sqlcoach_app::toast::ToastKind;
use sqlcoach_core::{Difficulty, Priority};

use super::palette;

// --- Text styles ---
pub fn text_primary() -> Style {
    Style::default().fg(palette::TEXT_PRIMARY)
}

pub fn text_secondary() -> Style {
    Style::default().fg(palette::TEXT_SECONDARY)
}

pub fn text_muted() -> Style {
    Style::default().fg(palette::TEXT_MUTED)
}

pub fn text_bold() -> Style {
    Style::default()
        .fg(palette::TEXT_BRIGHT)
        .add_modifier(Modifier::BOLD)
}

// --- Border styles ---
pub fn border_inactive() -> Style {
    Style::default().fg(palette::BORDER_DIM)
}

pub fn border_active() -> Style {
    Style::default().fg(palette::BORDER_ACTIVE)
}

// --- Accent styles ---
pub fn accent() -> Style {
    Style::default().fg(palette::ACCENT)
}

pub fn accent_bold() -> Style {
    Style::default()
        .fg(palette::ACCENT)
        .add_modifier(Modifier::BOLD)
}

pub fn keybinding() -> Style {
    Style::default().fg(palette::STATUS_YELLOW)
}

pub fn status_red() -> Style {
    Style::default().fg(palette::STATUS_RED)
}

pub fn status_green() -> Style {
    Style::default().fg(palette::STATUS_GREEN)
}

pub fn status_yellow() -> Style {
    Style::default().fg(palette::STATUS_YELLOW)
}

/// "Black on Cyan" - used for focused+selected items across widgets
pub fn focused_selected() -> Style {
    Style::default()
        .fg(palette::CONTRAST_FG)
        .bg(palette::ACCENT)
        .add_modifier(Modifier::BOLD)
}

// --- Block builders ---
pub fn glass_block(focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            border_active()
        } else {
            border_inactive()
        })
}

/// Rounded block with a title, for screen panels
pub fn titled_block(title: &str, focused: bool) -> Block<'_> {
    glass_block(focused).title(format!(" {} ", title))
}

pub fn modal_block(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_active())
        .style(Style::default().bg(palette::POPUP_BG))
}

// --- Domain indicators ---

/// `(icon, Style)` for a toast
pub fn toast_indicator(kind: ToastKind) -> (&'static str, Style) {
    match kind {
        ToastKind::Success => ("✓", Style::default().fg(palette::STATUS_GREEN)),
        ToastKind::Error => (
            "✗",
            Style::default()
                .fg(palette::STATUS_RED)
                .add_modifier(Modifier::BOLD),
        ),
        ToastKind::Info => ("ℹ", Style::default().fg(palette::STATUS_BLUE)),
    }
}

pub fn difficulty_style(difficulty: Difficulty) -> Style {
    let color = match difficulty {
        Difficulty::Easy => palette::STATUS_GREEN,
        Difficulty::Medium => palette::STATUS_YELLOW,
        Difficulty::Hard => palette::STATUS_RED,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

/// Green from 80%, yellow from 50%, red below
pub fn score_style(percent: u32) -> Style {
    let color = if percent >= 80 {
        palette::STATUS_GREEN
    } else if percent >= 50 {
        palette::STATUS_YELLOW
    } else {
        palette::STATUS_RED
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

pub fn priority_indicator(priority: Priority) -> (&'static str, Style) {
    match priority {
        Priority::High => ("▲ High", Style::default().fg(palette::STATUS_RED)),
        Priority::Medium => ("● Medium", Style::default().fg(palette::STATUS_YELLOW)),
        Priority::Low => ("▼ Low", Style::default().fg(palette::STATUS_GREEN)),
    }
}
