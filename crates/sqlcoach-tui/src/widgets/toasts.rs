//! Toast stack in the top-right corner

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget, Wrap},
};
use sqlcoach_app::toast::Toasts;
use unicode_width::UnicodeWidthStr;

use crate::theme::{palette, styles};

const MAX_WIDTH: u16 = 44;
const MIN_WIDTH: u16 = 16;

pub struct ToastStack<'a> {
    toasts: &'a Toasts,
}

impl<'a> ToastStack<'a> {
    pub fn new(toasts: &'a Toasts) -> Self {
        Self { toasts }
    }
}

impl Widget for ToastStack<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = MAX_WIDTH.min(area.width);
        if width < MIN_WIDTH {
            return;
        }
        let x = area.x + area.width - width;
        let mut y = area.y;
        let bottom = area.y + area.height;

        for toast in self.toasts.visible() {
            let (icon, style) = styles::toast_indicator(toast.kind);
            // Borders plus the icon column
            let text_width = usize::from(width.saturating_sub(4)).max(1);
            let rows = toast.message.width().div_ceil(text_width).max(1) as u16;
            let height = rows + 2;
            if y + height > bottom {
                break;
            }

            let rect = Rect::new(x, y, width, height);
            Clear.render(rect, buf);
            let block = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(style)
                .style(Style::default().bg(palette::POPUP_BG));
            Paragraph::new(Line::from(vec![
                Span::styled(format!("{} ", icon), style),
                Span::styled(toast.message.clone(), styles::text_primary()),
            ]))
            .wrap(Wrap { trim: true })
            .block(block)
            .render(rect, buf);

            y += height;
        }
    }
}
