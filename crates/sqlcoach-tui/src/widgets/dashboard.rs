//! Home screen: greeting and the menu of learning areas

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Margin, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use sqlcoach_app::{AppState, Screen};

use crate::theme::styles;

fn describe(screen: Screen) -> &'static str {
    match screen {
        Screen::CheatSheet => "Browse SQL commands and generate real-world examples",
        Screen::PracticeList => "Solve business questions that adapt to your level",
        Screen::Analysis => "Track accuracy, progress and what to study next",
        Screen::Dashboard | Screen::PracticeModule => "",
    }
}

pub struct Dashboard<'a> {
    state: &'a AppState,
}

impl<'a> Dashboard<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn intro(&self) -> Vec<Line<'static>> {
        vec![
            Line::from(Span::styled("Welcome to SQL Coach", styles::accent_bold())),
            Line::from(Span::styled(
                "Learn SQL through business scenarios, with an assistant one key away.",
                styles::text_secondary(),
            )),
            Line::default(),
        ]
    }

    fn menu(&self) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        for (i, screen) in Screen::MENU.iter().enumerate() {
            let selected = i == self.state.dashboard_selected;
            let (marker, title_style) = if selected {
                ("▶ ", styles::focused_selected())
            } else {
                ("  ", styles::text_bold())
            };
            lines.push(Line::from(vec![
                Span::styled(marker, styles::accent()),
                Span::styled(format!("[{}] ", i + 1), styles::keybinding()),
                Span::styled(format!(" {} ", screen.title()), title_style),
            ]));
            lines.push(Line::from(Span::styled(
                format!("       {}", describe(*screen)),
                styles::text_muted(),
            )));
            lines.push(Line::default());
        }
        lines
    }

    fn footer(&self) -> Vec<Line<'static>> {
        let backend = match self.state.backend_healthy {
            Some(true) => Span::styled("Backend online", styles::status_green()),
            Some(false) => Span::styled(
                format!("Backend unreachable at {}", self.state.settings.api.base_url),
                styles::status_red(),
            ),
            None => Span::styled("Checking backend...", styles::text_muted()),
        };
        vec![
            Line::from(backend),
            Line::from(vec![
                Span::styled("Session ", styles::text_muted()),
                Span::styled(self.state.user_id.clone(), styles::text_secondary()),
            ]),
        ]
    }
}

impl Widget for Dashboard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::titled_block("Home", true);
        let inner = block.inner(area);
        block.render(area, buf);

        let [intro, menu, footer] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .areas(inner.inner(Margin::new(1, 0)));

        Paragraph::new(self.intro())
            .wrap(Wrap { trim: true })
            .render(intro, buf);
        Paragraph::new(self.menu()).render(menu, buf);
        Paragraph::new(self.footer()).render(footer, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_state, TestTerminal};

    #[test]
    fn test_dashboard_lists_menu() {
        let state = create_test_state();
        let mut term = TestTerminal::new();

        term.render_widget(Dashboard::new(&state), term.area());

        assert!(term.buffer_contains("Welcome to SQL Coach"));
        assert!(term.buffer_contains("[1]  Cheat Sheet"));
        assert!(term.buffer_contains("[2]  Practice"));
        assert!(term.buffer_contains("[3]  Analysis"));
        assert!(term.buffer_contains("user_test"));
    }

    #[test]
    fn test_dashboard_marks_selection() {
        let mut state = create_test_state();
        state.dashboard_selected = 2;
        let mut term = TestTerminal::new();

        term.render_widget(Dashboard::new(&state), term.area());

        assert!(term.buffer_contains("▶ [3]"));
        assert!(!term.buffer_contains("▶ [1]"));
    }

    #[test]
    fn test_dashboard_backend_status() {
        let mut state = create_test_state();
        state.backend_healthy = Some(false);
        let mut term = TestTerminal::new();

        term.render_widget(Dashboard::new(&state), term.area());

        assert!(term.buffer_contains("Backend unreachable"));
    }
}
