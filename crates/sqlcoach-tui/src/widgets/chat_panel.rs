//! Chat panel: conversation, suggestion chips and the input line
//!
//! The conversation is anchored to the bottom; `ChatState::scroll` counts
//! rows scrolled up from the newest message.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Margin, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use sqlcoach_app::chat::ChatState;
use sqlcoach_app::AppState;
use sqlcoach_core::ChatMessage;
use unicode_width::UnicodeWidthStr;

use super::segmented::{ContentContext, SegmentedContent};
use crate::theme::{palette, styles, RenderTheme};

const INPUT_ROWS: u16 = 3;
const MAX_SUGGESTION_ROWS: u16 = 3;

/// Rows a line takes when word-wrapped to `width`
pub fn wrapped_rows(line: &Line<'_>, width: u16) -> usize {
    let width = usize::from(width.max(1));
    let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
    if text.is_empty() {
        return 1;
    }

    let mut rows = 1;
    let mut used = 0;
    for word in text.split_inclusive(' ') {
        let word_width = word.width();
        let visible = word.trim_end().width();
        if used + visible <= width {
            used += word_width;
            continue;
        }
        if used > 0 {
            rows += 1;
            used = 0;
        }
        // Words longer than a row break anywhere
        if visible > width {
            rows += (visible - 1) / width;
            used = visible % width;
        } else {
            used = word_width;
        }
    }
    rows
}

fn total_rows(lines: &[Line<'_>], width: u16) -> u16 {
    let rows: usize = lines.iter().map(|l| wrapped_rows(l, width)).sum();
    u16::try_from(rows).unwrap_or(u16::MAX)
}

pub struct ChatPanel<'a> {
    state: &'a AppState,
    theme: &'a RenderTheme,
}

impl<'a> ChatPanel<'a> {
    pub fn new(state: &'a AppState, theme: &'a RenderTheme) -> Self {
        Self { state, theme }
    }

    fn chat(&self) -> &ChatState {
        &self.state.chat
    }

    fn message_header(&self, message: &ChatMessage) -> Line<'static> {
        let (name, style) = if message.is_user() {
            ("You", Style::default().fg(palette::USER_BUBBLE))
        } else {
            ("Assistant", Style::default().fg(palette::ASSISTANT_BUBBLE))
        };
        let mut spans = vec![Span::styled(name, style.add_modifier(Modifier::BOLD))];
        if self.state.settings.ui.show_timestamps {
            spans.push(Span::styled(
                format!(" · {}", message.created_at.format("%H:%M")),
                styles::text_muted(),
            ));
        }
        if message.context_aware == Some(true) {
            spans.push(Span::styled(" · context-aware", styles::text_muted()));
        }
        Line::from(spans)
    }

    fn conversation(&self, width: u16) -> Vec<Line<'static>> {
        let ctx = ContentContext::from_state(self.state, self.theme);
        let mut lines = Vec::new();
        for message in &self.chat().messages {
            if !lines.is_empty() {
                lines.push(Line::default());
            }
            lines.push(self.message_header(message));
            lines.extend(
                SegmentedContent::new(&message.content, &ctx, |i| message.segment_key(i))
                    .lines(width),
            );
        }
        if self.chat().loading {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled("Typing...", styles::text_muted())));
        }
        lines
    }

    fn suggestions(&self) -> Option<Line<'static>> {
        let chat = self.chat();
        let suggestions = chat.latest_suggestions();
        if suggestions.is_empty() || chat.loading {
            return None;
        }
        let mut spans = vec![Span::styled("Tab ", styles::keybinding())];
        for (i, suggestion) in suggestions.iter().enumerate() {
            let style = if chat.suggestion_cursor == Some(i) {
                styles::focused_selected()
            } else {
                styles::accent()
            };
            spans.push(Span::styled(format!("[{}]", suggestion), style));
            spans.push(Span::raw(" "));
        }
        Some(Line::from(spans))
    }

    fn input_line(&self) -> Line<'static> {
        let chat = self.chat();
        let mut spans = vec![Span::styled("› ", styles::accent())];
        if chat.input.is_empty() {
            spans.push(Span::styled("▏", styles::accent()));
            spans.push(Span::styled(
                "Ask about SQL, hints or concepts...",
                styles::text_muted(),
            ));
        } else {
            spans.push(Span::styled(chat.input.clone(), styles::text_primary()));
            spans.push(Span::styled("▏", styles::accent()));
        }
        Line::from(spans)
    }
}

impl Widget for ChatPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chat = self.chat();
        let status = chat.status(&self.state.context.snapshot());
        let title = if chat.fullscreen {
            "SQL Assistant (full screen)"
        } else {
            "SQL Assistant"
        };
        let status = Line::from(Span::styled(format!(" {} ", status), styles::text_secondary()));
        let block = styles::titled_block(title, true).title_top(status.right_aligned());
        let inner = block.inner(area).inner(Margin::new(1, 0));
        block.render(area, buf);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let suggestions = self.suggestions();
        let suggestion_rows = suggestions
            .as_ref()
            .map(|line| {
                total_rows(std::slice::from_ref(line), inner.width).min(MAX_SUGGESTION_ROWS)
            })
            .unwrap_or(0);
        let [messages_area, suggestions_area, input_area] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(suggestion_rows),
            Constraint::Length(INPUT_ROWS),
        ])
        .areas(inner);

        let lines = self.conversation(messages_area.width);
        let total = total_rows(&lines, messages_area.width);
        let max_offset = total.saturating_sub(messages_area.height);
        let offset = max_offset.saturating_sub(chat.scroll);
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((offset, 0))
            .render(messages_area, buf);

        if let Some(line) = suggestions {
            Paragraph::new(line)
                .wrap(Wrap { trim: true })
                .render(suggestions_area, buf);
        }

        let input_block = Block::default()
            .borders(Borders::TOP)
            .border_style(styles::border_inactive());
        let input_inner = input_block.inner(input_area);
        input_block.render(input_area, buf);
        let input = self.input_line();
        // Keep the end of long input visible
        let input_rows = total_rows(std::slice::from_ref(&input), input_inner.width);
        Paragraph::new(input)
            .wrap(Wrap { trim: false })
            .scroll((input_rows.saturating_sub(input_inner.height), 0))
            .render(input_inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_state, TestTerminal};
    use sqlcoach_core::ConversationalContext;

    fn open_state() -> AppState {
        let mut state = create_test_state();
        state.chat.open(&ConversationalContext::default());
        state
    }

    fn render(state: &AppState, width: u16, height: u16) -> TestTerminal {
        let theme = RenderTheme::default();
        let mut term = TestTerminal::with_size(width, height);
        term.render_widget(ChatPanel::new(state, &theme), term.area());
        term
    }

    #[test]
    fn test_wrapped_rows() {
        assert_eq!(wrapped_rows(&Line::from(""), 10), 1);
        assert_eq!(wrapped_rows(&Line::from("short"), 10), 1);
        assert_eq!(wrapped_rows(&Line::from("aaaa bbbb cccc"), 10), 2);
        assert_eq!(wrapped_rows(&Line::from("x".repeat(25)), 10), 3);
    }

    #[test]
    fn test_welcome_and_status() {
        let state = open_state();
        let term = render(&state, 60, 20);

        assert!(term.buffer_contains("SQL Assistant"));
        assert!(term.buffer_contains("Ready to help!"));
        assert!(term.buffer_contains("SQL learning assistant"));
        assert!(term.buffer_contains("SQL syntax questions]"));
        assert!(term.buffer_contains("Ask about SQL"));
    }

    #[test]
    fn test_code_in_reply_gets_copy_affordance() {
        let mut state = open_state();
        state.chat.input = "how do I count?".into();
        state.chat.take_input();
        state.chat.push_reply(
            "Like this:\n```sql\nSELECT COUNT(*) FROM orders\n```".into(),
            vec![],
            Some(true),
        );

        let term = render(&state, 60, 30);

        assert!(term.buffer_contains("how do I count?"));
        assert!(term.buffer_contains("│ SELECT COUNT(*) FROM orders"));
        assert!(term.buffer_contains("⧉ Copy"));
        assert!(term.buffer_contains("context-aware"));
    }

    #[test]
    fn test_loading_shows_typing() {
        let mut state = open_state();
        state.chat.input = "hello".into();
        state.chat.take_input();

        let term = render(&state, 60, 20);

        assert!(term.buffer_contains("Typing..."));
        assert!(!term.buffer_contains("SQL syntax questions]"));
    }

    #[test]
    fn test_newest_message_visible_in_small_panel() {
        let mut state = open_state();
        for i in 0..10 {
            state.chat.input = format!("question number {}", i);
            state.chat.take_input();
            state.chat.push_reply(format!("answer number {}", i), vec![], None);
        }

        let term = render(&state, 50, 12);
        assert!(term.buffer_contains("answer number 9"));
        assert!(!term.buffer_contains("answer number 0"));

        state.chat.scroll = 500;
        let term = render(&state, 50, 12);
        assert!(!term.buffer_contains("answer number 9"));
    }
}
