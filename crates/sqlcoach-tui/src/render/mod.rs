//! Main render/view function (View in TEA pattern)


use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::Frame;
use sqlcoach_app::{AppState, Screen};

use crate::layout::{self, ChatPlacement};
use crate::theme::{palette, RenderTheme};
use crate::widgets;

fn chat_placement(state: &AppState) -> ChatPlacement {
    match (state.chat.open, state.chat.fullscreen) {
        (false, _) => ChatPlacement::Closed,
        (true, false) => ChatPlacement::Docked,
        (true, true) => ChatPlacement::FullScreen,
    }
}

/// Render the complete UI (View function in TEA)
///
/// Pure: reads the state, never modifies it.
pub fn view(frame: &mut Frame, state: &AppState) {
    let area = frame.area();
    let theme = RenderTheme::default();

    frame.render_widget(
        Block::default().style(Style::default().bg(palette::DEEPEST_BG)),
        area,
    );

    let areas = layout::create(area, chat_placement(state));

    frame.render_widget(
        widgets::MainHeader::new(state.screen).backend_healthy(state.backend_healthy),
        areas.header,
    );

    if !areas.body.is_empty() {
        match state.screen {
            Screen::Dashboard => frame.render_widget(widgets::Dashboard::new(state), areas.body),
            Screen::CheatSheet => {
                frame.render_widget(widgets::CheatSheetView::new(state, &theme), areas.body)
            }
            Screen::PracticeList => frame.render_widget(
                widgets::PracticeListView::new(&state.practice_list),
                areas.body,
            ),
            Screen::PracticeModule => {
                frame.render_widget(widgets::PracticeModuleView::new(state, &theme), areas.body)
            }
            Screen::Analysis => {
                frame.render_widget(widgets::AnalysisView::new(state, &theme), areas.body)
            }
        }
    }

    if let Some(chat_area) = areas.chat {
        frame.render_widget(widgets::ChatPanel::new(state, &theme), chat_area);
    }

    frame.render_widget(widgets::StatusBar::new(state), areas.status);

    // Toasts float over everything below the header
    let toast_area = Rect {
        y: areas.header.y + areas.header.height,
        height: area.height.saturating_sub(areas.header.height + areas.status.height),
        ..area
    };
    frame.render_widget(widgets::ToastStack::new(&state.toasts), toast_area);
}
