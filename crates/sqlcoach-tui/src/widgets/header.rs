//! Header bar widget
//!
//! App title, screen tabs with their number keys, and the backend status.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};
use sqlcoach_app::Screen;

use crate::theme::{palette, styles};

pub struct MainHeader {
    screen: Screen,
    backend_healthy: Option<bool>,
}

impl MainHeader {
    pub fn new(screen: Screen) -> Self {
        Self {
            screen,
            backend_healthy: None,
        }
    }

    pub fn backend_healthy(mut self, healthy: Option<bool>) -> Self {
        self.backend_healthy = healthy;
        self
    }

    fn title(&self) -> Line<'static> {
        Line::from(vec![
            Span::raw(" "),
            Span::styled(
                "SQL Coach",
                Style::default()
                    .fg(palette::ACCENT)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" / ", styles::text_muted()),
            Span::styled(self.screen.title(), styles::text_secondary()),
        ])
    }

    fn tabs(&self) -> Line<'static> {
        let mut spans = Vec::new();
        for (i, screen) in Screen::MENU.iter().enumerate() {
            let active = screen.page() == self.screen.page();
            let label_style = if active {
                styles::focused_selected()
            } else {
                styles::text_secondary()
            };
            spans.push(Span::styled("[", styles::text_muted()));
            spans.push(Span::styled((i + 1).to_string(), styles::keybinding()));
            spans.push(Span::styled("] ", styles::text_muted()));
            spans.push(Span::styled(screen.title(), label_style));
            spans.push(Span::raw("  "));
        }
        Line::from(spans)
    }

    fn status(&self) -> Line<'static> {
        let (icon, label, style) = match self.backend_healthy {
            Some(true) => ("●", "online", styles::status_green()),
            Some(false) => ("●", "offline", styles::status_red()),
            None => ("○", "connecting", styles::text_muted()),
        };
        Line::from(vec![
            Span::styled(icon, style),
            Span::raw(" "),
            Span::styled(label, style),
            Span::raw(" "),
        ])
    }
}

impl Widget for MainHeader {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(false).style(Style::default().bg(palette::CARD_BG));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let title = self.title();
        let tabs = self.tabs();
        let status = self.status();
        let title_width = title.width() as u16;
        let tabs_width = tabs.width() as u16;
        let status_width = status.width() as u16;

        buf.set_line(inner.x, inner.y, &title, inner.width);

        // Tabs and status only when they fit after the title
        let tabs_x = inner.x + title_width + 3;
        if title_width + 3 + tabs_width <= inner.width {
            buf.set_line(tabs_x, inner.y, &tabs, tabs_width);
        }
        if title_width + 3 + tabs_width + status_width <= inner.width {
            let status_x = inner.x + inner.width - status_width;
            buf.set_line(status_x, inner.y, &status, status_width);
        }
    }
}
