//! Markdown prose renderer
//!
//! Turns the prose segments of backend text into styled lines. Headings,
//! emphasis, inline code, lists and block quotes get theme styles; raw HTML
//! is shown literally; everything else falls back to its plain text.
//! Wrapping is left to the `Paragraph` that displays the lines.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::theme::RenderTheme;

const BULLET: &str = "• ";
const QUOTE_GUTTER: &str = "│ ";
const LIST_INDENT: usize = 2;

/// Renders Markdown into logical lines
#[derive(Debug, Clone, Copy)]
pub struct ProseRenderer<'t> {
    theme: &'t RenderTheme,
}

impl<'t> ProseRenderer<'t> {
    pub fn new(theme: &'t RenderTheme) -> Self {
        Self { theme }
    }

    /// Render `markdown`; `width` only sizes horizontal rules
    pub fn render(&self, markdown: &str, width: u16) -> Vec<Line<'static>> {
        let mut builder = LineBuilder::new(self.theme, width);
        for event in Parser::new_ext(markdown, Options::ENABLE_STRIKETHROUGH) {
            builder.event(event);
        }
        builder.finish()
    }
}

/// Containers whose end needs bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Open {
    Paragraph,
    Heading,
    Quote,
    List,
    Item,
    CodeBlock,
    /// Pushed an inline style patch
    Styled,
    Other,
}

struct ListLevel {
    next_number: Option<u64>,
}

struct LineBuilder<'t> {
    theme: &'t RenderTheme,
    width: u16,
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    open: Vec<Open>,
    style_patches: Vec<Style>,
    lists: Vec<ListLevel>,
    quote_depth: usize,
    in_code_block: bool,
    /// Marker for the first line of the current list item
    item_marker: Option<String>,
    /// Width of the hanging indent under a list marker
    item_hang: usize,
}

impl<'t> LineBuilder<'t> {
    fn new(theme: &'t RenderTheme, width: u16) -> Self {
        Self {
            theme,
            width,
            lines: Vec::new(),
            current: Vec::new(),
            open: Vec::new(),
            style_patches: Vec::new(),
            lists: Vec::new(),
            quote_depth: 0,
            in_code_block: false,
            item_marker: None,
            item_hang: 0,
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush();
        while self.lines.last().is_some_and(|l| l.spans.is_empty()) {
            self.lines.pop();
        }
        self.lines
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(_) => self.end(),
            Event::Text(text) => {
                if self.in_code_block {
                    for line in text.lines() {
                        self.current
                            .push(Span::styled(line.to_string(), self.theme.code));
                        self.flush();
                    }
                } else {
                    self.push_text(text.into_string());
                }
            }
            Event::Code(code) => self
                .current
                .push(Span::styled(code.into_string(), self.theme.inline_code)),
            Event::Html(html) => {
                for line in html.lines() {
                    self.push_text(line.to_string());
                    self.flush();
                }
            }
            Event::InlineHtml(html) => self.push_text(html.into_string()),
            Event::SoftBreak => self.push_text(" ".to_string()),
            Event::HardBreak => self.flush(),
            Event::Rule => {
                self.flush();
                self.block_gap();
                let rule = "─".repeat(usize::from(self.width.max(1)));
                self.lines.push(Line::from(Span::styled(rule, self.theme.rule)));
            }
            Event::TaskListMarker(checked) => {
                self.push_text(if checked { "[x] " } else { "[ ] " }.to_string())
            }
            Event::FootnoteReference(name) => self.push_text(format!("[^{}]", name)),
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        let open = match tag {
            Tag::Paragraph => {
                self.block_gap();
                Open::Paragraph
            }
            Tag::Heading { level, .. } => {
                self.block_gap();
                let style = match level {
                    HeadingLevel::H1 => self.theme.h1,
                    HeadingLevel::H2 => self.theme.h2,
                    _ => self.theme.h3,
                };
                self.style_patches.push(style);
                Open::Heading
            }
            Tag::BlockQuote(_) => {
                self.flush();
                self.block_gap();
                self.quote_depth += 1;
                Open::Quote
            }
            Tag::CodeBlock(kind) => {
                self.flush();
                self.block_gap();
                if let CodeBlockKind::Fenced(lang) = kind {
                    if !lang.is_empty() {
                        self.lines
                            .push(Line::from(Span::styled(lang.into_string(), self.theme.rule)));
                    }
                }
                self.in_code_block = true;
                Open::CodeBlock
            }
            Tag::List(start) => {
                self.flush();
                if self.lists.is_empty() {
                    self.block_gap();
                }
                self.lists.push(ListLevel { next_number: start });
                Open::List
            }
            Tag::Item => {
                self.flush();
                let marker = match self.lists.last_mut() {
                    Some(ListLevel {
                        next_number: Some(n),
                    }) => {
                        let marker = format!("{}. ", n);
                        *n += 1;
                        marker
                    }
                    _ => BULLET.to_string(),
                };
                self.item_hang = marker.chars().count();
                self.item_marker = Some(marker);
                Open::Item
            }
            Tag::Emphasis => self.patch(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.patch(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => self.patch(Style::default().add_modifier(Modifier::CROSSED_OUT)),
            Tag::Link { .. } => self.patch(Style::default().add_modifier(Modifier::UNDERLINED)),
            _ => Open::Other,
        };
        self.open.push(open);
    }

    fn end(&mut self) {
        match self.open.pop() {
            Some(Open::Paragraph) => self.flush(),
            Some(Open::Heading) => {
                self.flush();
                self.style_patches.pop();
            }
            Some(Open::Quote) => {
                self.flush();
                self.quote_depth = self.quote_depth.saturating_sub(1);
            }
            Some(Open::CodeBlock) => {
                self.flush();
                self.in_code_block = false;
            }
            Some(Open::List) => {
                self.flush();
                self.lists.pop();
            }
            Some(Open::Item) => {
                self.flush();
                self.item_marker = None;
            }
            Some(Open::Styled) => {
                self.style_patches.pop();
            }
            Some(Open::Other) | None => {}
        }
    }

    fn patch(&mut self, style: Style) -> Open {
        self.style_patches.push(style);
        Open::Styled
    }

    fn text_style(&self) -> Style {
        let base = if self.quote_depth > 0 {
            self.theme.text.patch(self.theme.quote)
        } else {
            self.theme.text
        };
        self.style_patches
            .iter()
            .fold(base, |style, patch| style.patch(*patch))
    }

    fn push_text(&mut self, text: String) {
        let style = self.text_style();
        self.current.push(Span::styled(text, style));
    }

    /// Blank line between top-level blocks
    fn block_gap(&mut self) {
        if !self.lists.is_empty() {
            return;
        }
        if self.lines.last().is_some_and(|l| !l.spans.is_empty()) {
            self.lines.push(Line::default());
        }
    }

    /// Emit the pending spans as one line with quote and list prefixes
    fn flush(&mut self) {
        if self.current.is_empty() {
            return;
        }

        let mut spans = Vec::with_capacity(self.current.len() + 2);
        if self.quote_depth > 0 {
            spans.push(Span::styled(
                QUOTE_GUTTER.repeat(self.quote_depth),
                self.theme.rule,
            ));
        }
        if !self.lists.is_empty() {
            let indent = " ".repeat((self.lists.len() - 1) * LIST_INDENT);
            match self.item_marker.take() {
                Some(marker) => {
                    spans.push(Span::raw(indent));
                    spans.push(Span::styled(marker, self.theme.list_marker));
                }
                None => spans.push(Span::raw(format!(
                    "{}{}",
                    indent,
                    " ".repeat(self.item_hang)
                ))),
            }
        }
        spans.append(&mut self.current);
        self.lines.push(Line::from(spans));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(markdown: &str) -> Vec<Line<'static>> {
        ProseRenderer::new(&RenderTheme::default()).render(markdown, 20)
    }

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn texts(lines: &[Line<'_>]) -> Vec<String> {
        lines.iter().map(text).collect()
    }

    #[test]
    fn test_headings_use_theme_levels() {
        let theme = RenderTheme::default();
        let lines = render("# One\n\n## Two\n\n#### Four");

        assert_eq!(texts(&lines), vec!["One", "", "Two", "", "Four"]);
        assert_eq!(lines[0].spans[0].style, theme.text.patch(theme.h1));
        assert_eq!(lines[2].spans[0].style, theme.text.patch(theme.h2));
        assert_eq!(lines[4].spans[0].style, theme.text.patch(theme.h3));
    }

    #[test]
    fn test_bold_and_italic_combine() {
        let lines = render("plain ***both*** done");
        let both = lines[0]
            .spans
            .iter()
            .find(|s| s.content == "both")
            .unwrap();

        assert!(both.style.add_modifier.contains(Modifier::BOLD));
        assert!(both.style.add_modifier.contains(Modifier::ITALIC));
        assert_eq!(text(&lines[0]), "plain both done");
    }

    #[test]
    fn test_inline_code_is_themed() {
        let theme = RenderTheme::default();
        let lines = render("Use `COUNT(*)` here");
        let code = lines[0]
            .spans
            .iter()
            .find(|s| s.content == "COUNT(*)")
            .unwrap();
        assert_eq!(code.style, theme.inline_code);
    }

    #[test]
    fn test_paragraphs_separated_by_blank_line() {
        let lines = render("First line\nsame paragraph\n\nSecond");
        assert_eq!(
            texts(&lines),
            vec!["First line same paragraph", "", "Second"]
        );
    }

    #[test]
    fn test_lists_with_markers_and_nesting() {
        let lines = render("- a\n- b\n  - c\n\n1. one\n2. two");
        assert_eq!(
            texts(&lines),
            vec!["• a", "• b", "  • c", "", "1. one", "2. two"]
        );
    }

    #[test]
    fn test_block_quote_gutter() {
        let lines = render("> quoted");
        assert_eq!(text(&lines[0]), "│ quoted");
        assert!(lines[0].spans[1]
            .style
            .add_modifier
            .contains(Modifier::ITALIC));
    }

    #[test]
    fn test_raw_html_is_literal() {
        let lines = render("Hello <b>world</b>");
        assert_eq!(text(&lines[0]), "Hello <b>world</b>");

        let lines = render("<div>block</div>");
        assert_eq!(text(&lines[0]), "<div>block</div>");
    }

    #[test]
    fn test_fallbacks_keep_text() {
        let lines = render("See [docs](https://example.com)\n\n---\n\n```python\nprint(1)\n```");
        let all = texts(&lines);

        assert_eq!(all[0], "See docs");
        assert!(all.contains(&"─".repeat(20)));
        assert!(all.contains(&"print(1)".to_string()));
    }

    #[test]
    fn test_empty_input() {
        assert!(render("").is_empty());
        assert!(render("   \n\n").is_empty());
    }
}
