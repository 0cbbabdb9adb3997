//! Backend text split into Markdown prose and copyable SQL blocks
//!
//! Used by every place that shows model-generated text: chat messages, the
//! cheat-sheet example, practice question/hints/feedback and the learning
//! path. Code block keys come from the caller so that they match the copy
//! targets the app state exposes.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::widgets::{Paragraph, Widget, Wrap};
use sqlcoach_app::copy_state::CopyState;
use sqlcoach_app::AppState;
use sqlcoach_core::segments;

use super::code_block::{CodeBlock, DEFAULT_LABEL};
use super::prose::ProseRenderer;
use crate::theme::RenderTheme;

/// What the renderers need from the app state
pub struct ContentContext<'a> {
    pub theme: &'a RenderTheme,
    pub copy: &'a CopyState,
    /// Key of the block with copy focus
    pub focus: Option<String>,
    pub code_max_height: u16,
}

impl<'a> ContentContext<'a> {
    pub fn from_state(state: &'a AppState, theme: &'a RenderTheme) -> Self {
        Self {
            theme,
            copy: &state.copy,
            focus: state.focused_copy_key(),
            code_max_height: state.settings.ui.code_max_height,
        }
    }

    pub fn is_focused(&self, key: &str) -> bool {
        self.focus.as_deref() == Some(key)
    }

    /// One standalone block, e.g. a cheat-sheet syntax or reference solution
    pub fn code_block(&self, code: &str, key: &str, label: &str) -> Vec<Line<'static>> {
        CodeBlock::new(code, key, self.copy, self.theme)
            .label(label)
            .focused(self.is_focused(key))
            .max_height(self.code_max_height)
            .lines()
    }
}

/// Prose and code segments of one text
pub struct SegmentedContent<'a> {
    text: &'a str,
    ctx: &'a ContentContext<'a>,
    key: Box<dyn Fn(usize) -> String + 'a>,
    code_label: &'a str,
}

impl<'a> SegmentedContent<'a> {
    /// `key` maps a segment index to the copy key of that code block
    pub fn new(
        text: &'a str,
        ctx: &'a ContentContext<'a>,
        key: impl Fn(usize) -> String + 'a,
    ) -> Self {
        Self {
            text,
            ctx,
            key: Box::new(key),
            code_label: DEFAULT_LABEL,
        }
    }

    pub fn code_label(mut self, label: &'a str) -> Self {
        self.code_label = label;
        self
    }

    pub fn lines(&self, width: u16) -> Vec<Line<'static>> {
        let prose = ProseRenderer::new(self.ctx.theme);
        let mut lines: Vec<Line<'static>> = Vec::new();

        for (index, segment) in segments(self.text).enumerate() {
            let rendered = if segment.is_code() {
                self.ctx
                    .code_block(&segment.content, &(self.key)(index), self.code_label)
            } else {
                prose.render(&segment.content, width)
            };
            if rendered.is_empty() {
                continue;
            }
            if !lines.is_empty() {
                lines.push(Line::default());
            }
            lines.extend(rendered);
        }

        lines
    }
}

impl Widget for SegmentedContent<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.lines(area.width))
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "Use **JOIN**:\n```sql\nSELECT *\nFROM a JOIN b ON a.id = b.id\n```\nThat's it.";

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn context<'a>(theme: &'a RenderTheme, copy: &'a CopyState) -> ContentContext<'a> {
        ContentContext {
            theme,
            copy,
            focus: None,
            code_max_height: 12,
        }
    }

    #[test]
    fn test_prose_and_code_interleave() {
        let theme = RenderTheme::default();
        let copy = CopyState::default();
        let ctx = context(&theme, &copy);

        let lines = SegmentedContent::new(TEXT, &ctx, |i| format!("m-{i}")).lines(40);
        let texts: Vec<String> = lines.iter().map(text).collect();

        assert_eq!(
            texts,
            vec![
                "Use JOIN:",
                "",
                "SQL Code  ⧉ Copy",
                "│ SELECT *",
                "│ FROM a JOIN b ON a.id = b.id",
                "",
                "That's it.",
            ]
        );
    }

    #[test]
    fn test_keys_follow_segment_index() {
        let theme = RenderTheme::default();
        let mut copy = CopyState::default();
        copy.activate("m-1");
        let ctx = context(&theme, &copy);

        let lines = SegmentedContent::new(TEXT, &ctx, |i| format!("m-{i}")).lines(40);
        assert!(text(&lines[2]).contains("✓ Copied!"));

        let lines = SegmentedContent::new(TEXT, &ctx, |i| format!("other-{i}")).lines(40);
        assert!(!text(&lines[2]).contains("Copied"));
    }

    #[test]
    fn test_focus_and_label() {
        let theme = RenderTheme::default();
        let copy = CopyState::default();
        let ctx = ContentContext {
            focus: Some("hint-0-1".into()),
            ..context(&theme, &copy)
        };

        let lines = SegmentedContent::new(TEXT, &ctx, |i| format!("hint-0-{i}"))
            .code_label("SQL Hint")
            .lines(40);
        assert_eq!(text(&lines[2]), "▶ SQL Hint  ⧉ Copy [c]");
    }

    #[test]
    fn test_plain_text_has_no_code_block() {
        let theme = RenderTheme::default();
        let copy = CopyState::default();
        let ctx = context(&theme, &copy);

        let lines = SegmentedContent::new("Just prose.", &ctx, |i| i.to_string()).lines(40);
        assert_eq!(lines.len(), 1);
        assert_eq!(text(&lines[0]), "Just prose.");
    }
}
