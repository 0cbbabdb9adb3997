//! Bottom status bar: key hints for whatever has focus, plus the location
//! the assistant sees.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Widget,
};
use sqlcoach_app::practice::PracticePhase;
use sqlcoach_app::{AppState, Screen};

use crate::theme::{palette, styles};

type Hint = (&'static str, &'static str);

/// Key hints for the current input mode, most important first
pub fn hints(state: &AppState) -> Vec<Hint> {
    if state.chat.open {
        let mut hints = vec![("Enter", "send"), ("Esc", "close")];
        if !state.chat.latest_suggestions().is_empty() {
            hints.push(("Tab", "suggestion"));
        }
        hints.extend([("^F", "fullscreen"), ("^L", "clear"), ("^Y", "copy")]);
        return hints;
    }

    match state.screen {
        Screen::CheatSheet if state.cheatsheet.searching => {
            vec![("Enter", "done"), ("↑↓", "select"), ("Esc", "keep query")]
        }
        Screen::CheatSheet if state.cheatsheet.example.is_some() => {
            vec![("Esc", "close"), ("g", "regenerate"), ("c", "copy"), ("[ ]", "focus")]
        }
        Screen::CheatSheet => vec![
            ("j/k", "select"),
            ("Tab", "category"),
            ("/", "search"),
            ("g", "example"),
            ("c", "copy"),
            ("t", "chat"),
            ("Esc", "home"),
        ],
        Screen::PracticeModule => practice_hints(state),
        Screen::PracticeList => vec![
            ("j/k", "select"),
            ("Enter", "open"),
            ("r", "reload"),
            ("t", "chat"),
            ("Esc", "home"),
        ],
        Screen::Analysis => vec![
            ("j/k", "scroll"),
            ("r", "refresh"),
            ("c", "copy"),
            ("t", "chat"),
            ("Esc", "home"),
        ],
        Screen::Dashboard => vec![
            ("j/k", "select"),
            ("Enter", "open"),
            ("1-3", "jump"),
            ("t", "chat"),
            ("q", "quit"),
        ],
    }
}

fn practice_hints(state: &AppState) -> Vec<Hint> {
    let Some(practice) = state.practice.as_ref() else {
        return vec![("Esc", "back")];
    };
    if practice.editing {
        return vec![("^S", "submit"), ("Esc", "stop editing")];
    }
    match practice.phase {
        PracticePhase::QuestionPresented => vec![
            ("e", "answer"),
            ("^S", "submit"),
            ("?", "hints"),
            ("x", "reset"),
            ("c", "copy"),
            ("t", "chat"),
            ("Esc", "back"),
        ],
        PracticePhase::AnswerSubmitted(_) => vec![
            ("n", "next question"),
            ("j/k", "scroll"),
            ("c", "copy"),
            ("t", "chat"),
            ("Esc", "back"),
        ],
        PracticePhase::LoadFailed => vec![("r", "retry"), ("Esc", "back")],
        _ => vec![("Esc", "back")],
    }
}

pub struct StatusBar<'a> {
    state: &'a AppState,
}

impl<'a> StatusBar<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn hint_spans(&self) -> Vec<Span<'static>> {
        let mut spans = vec![Span::raw(" ")];
        for (i, (key, action)) in hints(self.state).into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled("  ", styles::text_muted()));
            }
            spans.push(Span::styled(key, styles::keybinding()));
            spans.push(Span::styled(format!(" {}", action), styles::text_secondary()));
        }
        spans
    }

    fn location(&self) -> Line<'static> {
        let ctx = self.state.context.snapshot();
        let mut spans = vec![Span::styled(
            ctx.current_page.as_str().to_string(),
            styles::text_muted(),
        )];
        if ctx.in_practice_module() {
            spans.push(Span::styled(" › ", styles::text_muted()));
            spans.push(Span::styled(ctx.current_module, styles::text_secondary()));
        }
        let errors = self.state.toasts.error_count();
        if errors > 0 {
            spans.push(Span::styled(" │ ", styles::text_muted()));
            spans.push(Span::styled(format!("{} error(s)", errors), styles::status_red()));
        }
        spans.push(Span::raw(" "));
        Line::from(spans)
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        buf.set_style(area, Style::default().bg(palette::DEEPEST_BG));

        let hints = Line::from(self.hint_spans());
        let location = self.location();
        let hints_width = hints.width() as u16;
        let location_width = location.width() as u16;

        buf.set_line(area.x, area.y, &hints, area.width);
        // Location only when it does not overlap the hints
        if hints_width + location_width < area.width {
            let x = area.x + area.width - location_width;
            buf.set_line(x, area.y, &location, location_width);
        }
    }
}
