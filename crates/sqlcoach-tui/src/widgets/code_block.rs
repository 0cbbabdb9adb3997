//! SQL code block with syntax highlighting and a copy affordance
//!
//! The header shows the block label and `⧉ Copy`, switching to
//! `✓ Copied!` while the block's key is the active copy key. Blocks taller
//! than the configured height are folded until they get copy focus, so every
//! line stays reachable.

use std::sync::LazyLock;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};
use sqlcoach_app::copy_state::CopyState;
use sqlcoach_core::prelude::*;
use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::theme::{styles, RenderTheme};

static SYNTAXES: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEMES: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

pub const DEFAULT_LABEL: &str = "SQL Code";
const GUTTER: &str = "│ ";
const FOCUS_MARKER: &str = "▶ ";

/// Highlight SQL into one line per source line.
///
/// Falls back to unstyled text when the syntax or theme is missing.
pub fn highlight_sql(code: &str, theme: &RenderTheme) -> Vec<Line<'static>> {
    let syntax = SYNTAXES.find_syntax_by_token("sql");
    let syntax_theme = THEMES.themes.get(theme.syntax_theme);
    let (Some(syntax), Some(syntax_theme)) = (syntax, syntax_theme) else {
        debug!("SQL highlighting unavailable, rendering plain code");
        return plain_lines(code, theme);
    };

    let mut highlighter = HighlightLines::new(syntax, syntax_theme);
    LinesWithEndings::from(code)
        .map(|line| match highlighter.highlight_line(line, &SYNTAXES) {
            Ok(ranges) => Line::from(
                ranges
                    .into_iter()
                    .map(|(style, text)| {
                        Span::styled(
                            text.trim_end_matches(['\n', '\r']).to_string(),
                            convert_style(style, theme.code),
                        )
                    })
                    .collect::<Vec<_>>(),
            ),
            Err(e) => {
                trace!("Highlight failed for line: {}", e);
                Line::from(Span::styled(
                    line.trim_end_matches(['\n', '\r']).to_string(),
                    theme.code,
                ))
            }
        })
        .collect()
}

fn plain_lines(code: &str, theme: &RenderTheme) -> Vec<Line<'static>> {
    code.lines()
        .map(|line| Line::from(Span::styled(line.to_string(), theme.code)))
        .collect()
}

/// Syntect foreground and font style on top of the block's base style
fn convert_style(style: syntect::highlighting::Style, base: Style) -> Style {
    let fg = style.foreground;
    let mut converted = base.fg(Color::Rgb(fg.r, fg.g, fg.b));
    if style.font_style.contains(FontStyle::BOLD) {
        converted = converted.add_modifier(Modifier::BOLD);
    }
    if style.font_style.contains(FontStyle::ITALIC) {
        converted = converted.add_modifier(Modifier::ITALIC);
    }
    if style.font_style.contains(FontStyle::UNDERLINE) {
        converted = converted.add_modifier(Modifier::UNDERLINED);
    }
    converted
}

/// A highlighted SQL block identified by its copy key
pub struct CodeBlock<'a> {
    code: &'a str,
    key: &'a str,
    copy: &'a CopyState,
    theme: &'a RenderTheme,
    label: &'a str,
    focused: bool,
    max_height: Option<u16>,
}

impl<'a> CodeBlock<'a> {
    pub fn new(code: &'a str, key: &'a str, copy: &'a CopyState, theme: &'a RenderTheme) -> Self {
        Self {
            code,
            key,
            copy,
            theme,
            label: DEFAULT_LABEL,
            focused: false,
            max_height: None,
        }
    }

    pub fn label(mut self, label: &'a str) -> Self {
        self.label = label;
        self
    }

    /// The block is the target of `c`/`y`
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Fold unfocused blocks to this many code rows
    pub fn max_height(mut self, rows: u16) -> Self {
        self.max_height = Some(rows.max(1));
        self
    }

    fn header(&self) -> Line<'static> {
        let (label_style, marker) = if self.focused {
            (self.theme.code_header_focused, FOCUS_MARKER)
        } else {
            (self.theme.code_header, "")
        };
        let affordance = if self.copy.is_active(self.key) {
            Span::styled("✓ Copied!", self.theme.copied)
        } else if self.focused {
            Span::styled("⧉ Copy [c]", self.theme.copy_hint)
        } else {
            Span::styled("⧉ Copy", styles::text_muted())
        };

        Line::from(vec![
            Span::styled(format!("{}{} ", marker, self.label), label_style),
            Span::raw(" "),
            affordance,
        ])
    }

    /// Header, gutter-prefixed code and the fold notice
    pub fn lines(&self) -> Vec<Line<'static>> {
        let mut code = highlight_sql(self.code.trim_end(), self.theme);
        let hidden = match self.max_height {
            Some(rows) if !self.focused && code.len() > usize::from(rows) => {
                let hidden = code.len() - usize::from(rows);
                code.truncate(usize::from(rows));
                hidden
            }
            _ => 0,
        };

        let gutter = if self.focused {
            styles::border_active()
        } else {
            styles::border_inactive()
        };

        let mut lines = Vec::with_capacity(code.len() + 2);
        lines.push(self.header());
        lines.extend(code.into_iter().map(|line| {
            let mut spans = vec![Span::styled(GUTTER, gutter)];
            spans.extend(line.spans);
            Line::from(spans)
        }));
        if hidden > 0 {
            let noun = if hidden == 1 { "line" } else { "lines" };
            lines.push(Line::from(vec![
                Span::styled(GUTTER, gutter),
                Span::styled(
                    format!("… {} more {} ([ ] to focus)", hidden, noun),
                    styles::text_muted(),
                ),
            ]));
        }
        lines
    }
}

impl Widget for CodeBlock<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.lines()).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;
    use insta::assert_snapshot;

    const QUERY: &str = "SELECT name\nFROM users\nWHERE id = 1;";

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_highlight_keeps_text() {
        let theme = RenderTheme::default();
        let lines = highlight_sql(QUERY, &theme);

        let texts: Vec<String> = lines.iter().map(text).collect();
        assert_eq!(texts, vec!["SELECT name", "FROM users", "WHERE id = 1;"]);
    }

    #[test]
    fn test_highlight_colors_keywords() {
        let theme = RenderTheme::default();
        let lines = highlight_sql("SELECT 1", &theme);
        let select = &lines[0].spans[0];

        assert!(select.content.starts_with("SELECT"));
        assert!(matches!(select.style.fg, Some(Color::Rgb(..))));
        assert_eq!(select.style.bg, theme.code.bg);
    }

    #[test]
    fn test_unknown_theme_falls_back_to_plain() {
        let theme = RenderTheme {
            syntax_theme: "no-such-theme",
            ..RenderTheme::default()
        };
        let lines = highlight_sql(QUERY, &theme);

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].spans[0].style, theme.code);
    }

    #[test]
    fn test_code_block_render() {
        let theme = RenderTheme::default();
        let copy = CopyState::default();
        let mut term = TestTerminal::with_size(30, 5);

        term.render_widget(CodeBlock::new(QUERY, "k", &copy, &theme), term.area());

        assert_snapshot!("code_block_basic", term.trimmed_content());
    }

    #[test]
    fn test_copied_state_follows_active_key() {
        let theme = RenderTheme::default();
        let mut copy = CopyState::default();
        copy.activate("q-1");

        let active = CodeBlock::new(QUERY, "q-1", &copy, &theme).lines();
        let other = CodeBlock::new(QUERY, "q-2", &copy, &theme).lines();

        assert!(text(&active[0]).contains("✓ Copied!"));
        assert!(text(&other[0]).contains("⧉ Copy"));
        assert!(!text(&other[0]).contains("Copied"));
    }

    #[test]
    fn test_custom_label_and_focus_marker() {
        let theme = RenderTheme::default();
        let copy = CopyState::default();

        let lines = CodeBlock::new(QUERY, "k", &copy, &theme)
            .label("SQL Hint")
            .focused(true)
            .lines();

        assert_eq!(text(&lines[0]), "▶ SQL Hint  ⧉ Copy [c]");
    }

    #[test]
    fn test_long_block_folds_until_focused() {
        let theme = RenderTheme::default();
        let copy = CopyState::default();
        let code = (1..=20)
            .map(|i| format!("SELECT {};", i))
            .collect::<Vec<_>>()
            .join("\n");

        let folded = CodeBlock::new(&code, "k", &copy, &theme)
            .max_height(12)
            .lines();
        // header + 12 rows + notice
        assert_eq!(folded.len(), 14);
        assert!(text(&folded[13]).contains("8 more lines"));

        let expanded = CodeBlock::new(&code, "k", &copy, &theme)
            .max_height(12)
            .focused(true)
            .lines();
        assert_eq!(expanded.len(), 21);
        assert_eq!(text(&expanded[20]), "│ SELECT 20;");
    }
}
